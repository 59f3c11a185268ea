use crate::core::community::Leiden;
use crate::core::graph::error_graph::ErrorGraph;
use crate::core::io::pae::crop_to_residues;
use crate::core::models::domain::{ConstraintDocument, RigidBody};
use crate::core::models::matrix::ErrorMatrix;
use crate::core::models::residue::ResidueTable;
use crate::engine::config::DecompositionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use crate::engine::tasks::partition::Partition;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct DecompositionResult {
    pub partition: Partition,
    /// Rigid bodies after gap resolution, one per retained cluster, in cluster order.
    /// Bodies whose regions were all flexible are empty.
    pub bodies: Vec<RigidBody>,
    pub gap_adjustments: usize,
    pub document: ConstraintDocument,
}

impl DecompositionResult {
    /// Clusters that reached the minimum size, largest first.
    pub fn retained_clusters(&self) -> &[Vec<usize>] {
        self.partition.retained()
    }
}

/// `matrix` covers the whole model and is cropped to the residues in `residues`.
#[instrument(skip_all, name = "decomposition_workflow")]
pub fn run(
    matrix: &ErrorMatrix,
    residues: &ResidueTable,
    config: &DecompositionConfig,
    reporter: &ProgressReporter,
) -> Result<DecompositionResult, EngineError> {
    // === Phase 1: Build the residue graph ===
    let (first, last) = residues
        .first_residue_number()
        .zip(residues.last_residue_number())
        .ok_or_else(|| EngineError::InvalidFormat("coordinate table has no records".into()))?;
    info!(first, last, "Starting decomposition.");

    let graph = reporter.phase("Building Graph", || -> Result<ErrorGraph, EngineError> {
        let window = crop_to_residues(matrix, first, last)?;
        let graph = ErrorGraph::from_matrix(&window, &config.graph.edge_weighting());
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "Residue graph built."
        );
        Ok(graph)
    })?;

    // === Phase 2: Partition into clusters ===
    let partition = reporter.phase("Clustering", || {
        tasks::partition::run(&graph, &Leiden::new(), &config.clustering, reporter)
    });

    // === Phase 3: Segment and classify each retained cluster ===
    let boundaries = residues.chain_boundaries();
    debug!(?boundaries, "Chain boundaries.");
    let mut bodies = reporter.phase("Classifying Regions", || {
        classify_clusters(partition.retained(), first, &boundaries, residues, config, reporter)
    })?;

    // === Phase 4: Gap resolution ===
    let gap_adjustments = reporter.phase("Resolving Gaps", || {
        tasks::gap_resolution::resolve_gaps(&mut bodies, config.min_gap)
    });
    drop_collapsed_domains(&mut bodies);

    // === Phase 5: Assemble the constraint document ===
    let document = ConstraintDocument::new(bodies.iter().cloned());
    if document.is_empty() {
        warn!(
            min_cluster_size = config.clustering.min_cluster_size,
            "No rigid domains found; the constraint document will be empty."
        );
    }
    info!(
        clusters = partition.clusters.len(),
        retained = partition.retained().len(),
        bodies = document.len(),
        gap_adjustments,
        "Decomposition complete."
    );

    Ok(DecompositionResult {
        partition,
        bodies,
        gap_adjustments,
        document,
    })
}

fn classify_clusters(
    clusters: &[Vec<usize>],
    offset: i64,
    boundaries: &BTreeSet<usize>,
    residues: &ResidueTable,
    config: &DecompositionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<RigidBody>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: clusters.len() as u64,
    });

    let classify_cluster = |cluster: &Vec<usize>| -> Result<RigidBody, EngineError> {
        let mut domains = Vec::new();
        for region in tasks::segmentation::segment(cluster, boundaries) {
            if let Some(domain) = tasks::classification::classify(
                region,
                offset,
                residues,
                &config.classification,
            )? {
                domains.push(domain);
            }
        }
        reporter.report(Progress::TaskIncrement);
        Ok(RigidBody::new(domains))
    };

    #[cfg(not(feature = "parallel"))]
    let bodies = clusters.iter().map(classify_cluster).collect();

    #[cfg(feature = "parallel")]
    let bodies = clusters.par_iter().map(classify_cluster).collect();

    reporter.report(Progress::TaskFinish);
    bodies
}

fn drop_collapsed_domains(bodies: &mut [RigidBody]) {
    for body in bodies.iter_mut() {
        body.domains.retain(|domain| {
            let keep = !domain.is_collapsed();
            if !keep {
                warn!(%domain, "Dropping domain left without residues by gap resolution.");
            }
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::constraints::render_constraints;
    use crate::core::models::residue::ResidueRecord;
    use crate::engine::config::DecompositionConfigBuilder;
    use std::sync::{Arc, Mutex};

    /// Two tightly coupled blocks of residues with high mutual error between them.
    fn block_matrix(sizes: &[usize], inner: f64, cross: f64) -> ErrorMatrix {
        let block_of: Vec<usize> = sizes
            .iter()
            .enumerate()
            .flat_map(|(b, &n)| std::iter::repeat_n(b, n))
            .collect();
        let n = block_of.len();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            0.0
                        } else if block_of[i] == block_of[j] {
                            inner
                        } else {
                            cross
                        }
                    })
                    .collect()
            })
            .collect();
        ErrorMatrix::from_rows(&rows).unwrap()
    }

    fn table(segments: &[(&str, usize, f64)]) -> ResidueTable {
        let mut records = Vec::new();
        let mut resnum = 1;
        for &(segment, count, confidence) in segments {
            for positional in 1..=count as i64 {
                records.push(ResidueRecord {
                    residue_number: resnum,
                    segment_id: segment.to_string(),
                    positional_id: positional,
                    confidence,
                });
                resnum += 1;
            }
        }
        ResidueTable::new(records)
    }

    #[test]
    fn two_chains_become_fixed_and_mobile_bodies() {
        let matrix = block_matrix(&[8, 6], 1.0, 25.0);
        let residues = table(&[("PROA", 8, 90.0), ("PROB", 6, 85.0)]);
        let config = DecompositionConfig::default();

        let result = run(&matrix, &residues, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(result.retained_clusters().len(), 2);
        assert_eq!(result.retained_clusters()[0], (0..8).collect::<Vec<_>>());
        assert_eq!(
            render_constraints(&result.document).unwrap(),
            "define fixed1 sele ( resid 1:8 .and. segid PROA ) end\n\
             cons fix sele fixed1 end\n\
             \n\
             define rigid1 sele ( resid 1:6 .and. segid PROB ) end\n\
             shape desc dock1 rigid sele rigid1 end\n\
             \n\
             return\n"
        );
    }

    #[test]
    fn chain_boundary_splits_a_cluster_spanning_two_chains() {
        let matrix = block_matrix(&[12], 1.0, 25.0);
        let residues = table(&[("PROA", 6, 90.0), ("PROB", 6, 90.0)]);
        let config = DecompositionConfig::default();

        let result = run(&matrix, &residues, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(result.bodies.len(), 1);
        let domains: Vec<(i64, i64, &str)> = result.bodies[0]
            .iter()
            .map(|d| (d.start, d.end, d.segment_id.as_str()))
            .collect();
        assert_eq!(domains, vec![(1, 6, "PROA"), (1, 6, "PROB")]);
    }

    #[test]
    fn low_confidence_cluster_produces_no_block() {
        let matrix = block_matrix(&[8, 6], 1.0, 25.0);
        let residues = table(&[("PROA", 8, 40.0), ("PROB", 6, 85.0)]);
        let result = run(
            &matrix,
            &residues,
            &DecompositionConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(result.bodies[0].is_empty());
        assert!(result.document.fixed_body().is_none());
        let text = render_constraints(&result.document).unwrap();
        assert!(!text.contains("cons fix"));
        assert!(text.contains("shape desc dock1"));
    }

    #[test]
    fn no_retained_cluster_yields_terminator_only() {
        let matrix = block_matrix(&[3, 3], 1.0, 25.0);
        let residues = table(&[("PROA", 6, 90.0)]);
        let result = run(
            &matrix,
            &residues,
            &DecompositionConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(result.retained_clusters().is_empty());
        assert_eq!(render_constraints(&result.document).unwrap(), "return\n");
    }

    #[test]
    fn matrix_is_cropped_to_coordinate_window() {
        // Residues 3..=8 of a 10-residue model, all in one tight block.
        let matrix = block_matrix(&[2, 6, 2], 1.0, 25.0);
        let records = (3..=8)
            .map(|n| ResidueRecord {
                residue_number: n,
                segment_id: "A".to_string(),
                positional_id: n,
                confidence: 70.0,
            })
            .collect();
        let residues = ResidueTable::new(records);

        let result = run(
            &matrix,
            &residues,
            &DecompositionConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.retained_clusters(), &[(0..6).collect::<Vec<_>>()]);
        assert_eq!(result.bodies[0].domains[0].start, 3);
        assert_eq!(result.bodies[0].domains[0].end, 8);
    }

    #[test]
    fn window_outside_matrix_is_invalid_format() {
        let matrix = block_matrix(&[4], 1.0, 25.0);
        let residues = table(&[("A", 6, 90.0)]);
        let result = run(
            &matrix,
            &residues,
            &DecompositionConfig::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidFormat(_))));
    }

    #[test]
    fn empty_residue_table_is_invalid_format() {
        let matrix = block_matrix(&[4], 1.0, 25.0);
        let result = run(
            &matrix,
            &ResidueTable::default(),
            &DecompositionConfig::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::InvalidFormat(_))));
    }

    #[test]
    fn reports_every_phase() {
        let matrix = block_matrix(&[6], 1.0, 25.0);
        let residues = table(&[("A", 6, 90.0)]);
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = phases.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));
        let config = DecompositionConfigBuilder::new().min_cluster_size(3).build().unwrap();

        run(&matrix, &residues, &config, &reporter).unwrap();

        assert_eq!(
            *phases.lock().unwrap(),
            vec!["Building Graph", "Clustering", "Classifying Regions", "Resolving Gaps"]
        );
    }
}
