use crate::cli::RunArgs;
use crate::config::PartialDecompositionConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use paeconst::{
    core::io::{
        clusters::write_cluster_table_to_path, constraints::write_constraints_to_path,
        crd::CrdFile, pae::PaeFile, traits::InputFile,
    },
    engine::progress::ProgressReporter,
    workflows::{self, decompose::DecompositionResult},
};
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    run_with_progress(args, CliProgressHandler::new())
}

fn run_with_progress(args: RunArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialDecompositionConfig::from_file(path)?,
        None => PartialDecompositionConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    info!("Loading PAE matrix from {:?}", &args.pae);
    let matrix = PaeFile::load(&args.pae)?;
    info!("Loading coordinates from {:?}", &args.crd);
    let residues = CrdFile::load(&args.crd)?;
    info!(
        "Read a {}x{} PAE matrix and {} residues.",
        matrix.size(),
        matrix.size(),
        residues.residue_count()
    );

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting rigid-body decomposition...");
    let result = workflows::decompose::run(&matrix, &residues, &config, &reporter)?;

    write_outputs(&args, &result)?;
    report_summary(&args, &result);
    Ok(())
}

fn write_outputs(args: &RunArgs, result: &DecompositionResult) -> Result<()> {
    info!("Writing cluster table to {:?}", &args.clusters);
    write_cluster_table_to_path(result.retained_clusters(), &args.clusters).map_err(|e| {
        CliError::FileWriting {
            path: args.clusters.clone(),
            source: e.into(),
        }
    })?;

    info!("Writing constraints to {:?}", &args.output);
    write_constraints_to_path(&result.document, &args.output).map_err(|e| {
        CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        }
    })?;
    Ok(())
}

fn report_summary(args: &RunArgs, result: &DecompositionResult) {
    if result.document.is_empty() {
        warn!("No rigid domains were found.");
        println!("Warning: no rigid domains found; the constraint file only terminates the stream.");
    } else {
        let domains: usize = result.bodies.iter().map(|b| b.len()).sum();
        println!(
            "✓ {} rigid domain(s) in {} body(ies) written to: {}",
            domains,
            result.document.len(),
            args.output.display()
        );
    }
    println!(
        "  {} cluster(s) retained, table written to: {}",
        result.retained_clusters().len(),
        args.clusters.display()
    );
}
