use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "PAEConst CLI - Decompose a predicted structure into rigid bodies from its PAE matrix and write CHARMM constraints.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster residues by predicted aligned error and write rigid-body constraints.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the PAE matrix in JSON format (AlphaFold 2/3, ColabFold).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub pae: PathBuf,

    /// Path to the CHARMM coordinate file (extended CRD) with pLDDT in the weighting column.
    #[arg(short = 'r', long, required = true, value_name = "PATH")]
    pub crd: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the constraint file.
    #[arg(short, long, default_value = "const.inp", value_name = "PATH")]
    pub output: PathBuf,

    /// Path for the cluster table.
    #[arg(long, default_value = "clusters.csv", value_name = "PATH")]
    pub clusters: PathBuf,

    // --- Graph Overrides ---
    /// Override the exponent applied to PAE values when weighting edges.
    #[arg(long, value_name = "FLOAT")]
    pub pae_power: Option<f64>,

    /// Override the PAE value (in Angstroms) at or above which no edge is created.
    #[arg(long, value_name = "FLOAT")]
    pub pae_cutoff: Option<f64>,

    // --- Clustering Overrides ---
    /// Override the clustering resolution. Higher values give smaller clusters.
    #[arg(long, value_name = "FLOAT")]
    pub resolution: Option<f64>,

    /// Override the minimum number of residues a cluster needs to be kept.
    #[arg(long, value_name = "INT")]
    pub min_cluster_size: Option<usize>,

    // --- Classification Overrides ---
    /// Override the mean pLDDT a region must exceed to be rigid.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub plddt_threshold: Option<f64>,

    /// Treat regions whose mean pLDDT equals the threshold as rigid.
    #[arg(long)]
    pub rigid_at_threshold: bool,

    // --- Gap Resolution Overrides ---
    /// Override the minimum gap, in residue ids, between domains of one segment.
    #[arg(long, value_name = "INT")]
    pub min_gap: Option<i64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S clustering.resolution=0.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
