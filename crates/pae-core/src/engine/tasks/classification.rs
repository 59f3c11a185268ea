use super::segmentation::Region;
use crate::core::models::domain::RigidDomain;
use crate::core::models::residue::ResidueTable;
use crate::engine::config::ClassificationConfig;
use crate::engine::error::EngineError;
use tracing::{debug, trace};

// Scores <= 0 mean "no data".
pub fn mean_confidence(table: &ResidueTable, first: i64, last: i64) -> Option<f64> {
    let (sum, count) = table
        .records_in_range(first, last)
        .map(|r| r.confidence)
        .filter(|&c| c > 0.0)
        .fold((0.0, 0usize), |(sum, count), c| (sum + c, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `offset` is the residue number of vertex index 0.
pub fn classify(
    region: Region,
    offset: i64,
    table: &ResidueTable,
    config: &ClassificationConfig,
) -> Result<Option<RigidDomain>, EngineError> {
    let first = offset + region.first as i64;
    let last = offset + region.last as i64;

    let Some(mean) = mean_confidence(table, first, last) else {
        debug!(first, last, "Region has no confidence data; treating as flexible.");
        return Ok(None);
    };
    if !config.is_rigid(mean) {
        trace!(first, last, mean, "Region is flexible.");
        return Ok(None);
    }

    let start = table.identity(first)?.positional_id;
    let end_identity = table.identity(last)?;
    let domain = RigidDomain::new(start, end_identity.positional_id, end_identity.segment_id);
    trace!(first, last, mean, %domain, "Region is rigid.");
    Ok(Some(domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::ResidueRecord;
    use crate::engine::config::DecompositionConfig;

    fn record(residue_number: i64, segment_id: &str, positional_id: i64, confidence: f64) -> ResidueRecord {
        ResidueRecord {
            residue_number,
            segment_id: segment_id.to_string(),
            positional_id,
            confidence,
        }
    }

    fn config() -> ClassificationConfig {
        DecompositionConfig::default().classification
    }

    fn uniform_table(first: i64, last: i64, confidence: f64) -> ResidueTable {
        ResidueTable::new(
            (first..=last)
                .map(|n| record(n, "PROA", n + 100, confidence))
                .collect(),
        )
    }

    #[test]
    fn confident_region_is_rigid() {
        let table = uniform_table(1, 20, 80.0);
        let region = Region { first: 10, last: 14 };
        let domain = classify(region, 1, &table, &config()).unwrap().unwrap();
        assert_eq!(domain, RigidDomain::new(111, 115, "PROA"));
    }

    #[test]
    fn low_confidence_region_is_flexible() {
        let table = uniform_table(1, 20, 30.0);
        let region = Region { first: 0, last: 5 };
        assert_eq!(classify(region, 1, &table, &config()).unwrap(), None);
    }

    #[test]
    fn mean_exactly_at_threshold_follows_policy() {
        let table = uniform_table(1, 5, 50.0);
        let region = Region { first: 0, last: 4 };
        let mut config = config();
        assert_eq!(classify(region, 1, &table, &config).unwrap(), None);
        config.rigid_at_threshold = true;
        assert!(classify(region, 1, &table, &config).unwrap().is_some());
    }

    #[test]
    fn missing_scores_are_excluded_from_the_mean() {
        let table = ResidueTable::new(vec![
            record(1, "A", 1, 0.0),
            record(2, "A", 2, 60.0),
            record(3, "A", 3, -1.0),
            record(4, "A", 4, 70.0),
        ]);
        let mean = mean_confidence(&table, 1, 4).unwrap();
        approx::assert_relative_eq!(mean, 65.0);
    }

    #[test]
    fn mean_is_taken_over_atom_records() {
        let table = ResidueTable::new(vec![
            record(1, "A", 1, 90.0),
            record(1, "A", 1, 90.0),
            record(1, "A", 1, 90.0),
            record(2, "A", 2, 30.0),
        ]);
        approx::assert_relative_eq!(mean_confidence(&table, 1, 2).unwrap(), 75.0);
    }

    #[test]
    fn region_without_data_is_flexible() {
        let table = uniform_table(1, 5, 0.0);
        let region = Region { first: 0, last: 4 };
        assert_eq!(mean_confidence(&table, 1, 5), None);
        assert_eq!(classify(region, 1, &table, &config()).unwrap(), None);
    }

    #[test]
    fn segment_id_comes_from_last_residue() {
        let table = ResidueTable::new(vec![
            record(1, "PROA", 40, 90.0),
            record(2, "PROB", 1, 90.0),
        ]);
        let region = Region { first: 0, last: 1 };
        let domain = classify(region, 1, &table, &config()).unwrap().unwrap();
        assert_eq!(domain, RigidDomain::new(40, 1, "PROB"));
    }

    #[test]
    fn conflicting_positional_ids_are_invalid() {
        let table = ResidueTable::new(vec![
            record(1, "A", 1, 90.0),
            record(1, "A", 2, 90.0),
            record(2, "A", 3, 90.0),
        ]);
        let region = Region { first: 0, last: 1 };
        assert!(matches!(
            classify(region, 1, &table, &config()),
            Err(EngineError::InvalidFormat(_))
        ));
    }

    #[test]
    fn missing_end_residue_is_invalid() {
        let table = ResidueTable::new(vec![record(1, "A", 1, 90.0), record(3, "A", 3, 90.0)]);
        let region = Region { first: 0, last: 1 };
        assert!(matches!(
            classify(region, 1, &table, &config()),
            Err(EngineError::InvalidFormat(_))
        ));
    }
}
