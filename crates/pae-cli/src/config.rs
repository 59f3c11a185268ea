use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use paeconst::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialGraphConfig {
    #[serde(rename = "pae-power")]
    pae_power: Option<f64>,
    #[serde(rename = "pae-cutoff")]
    pae_cutoff: Option<f64>,
    epsilon: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialClusteringConfig {
    resolution: Option<f64>,
    #[serde(rename = "min-cluster-size")]
    min_cluster_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialClassificationConfig {
    #[serde(rename = "plddt-threshold")]
    plddt_threshold: Option<f64>,
    #[serde(rename = "rigid-at-threshold")]
    rigid_at_threshold: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialGapResolutionConfig {
    #[serde(rename = "min-gap")]
    min_gap: Option<i64>,
}

/// Settings read from a TOML file, every value optional.
///
/// ```toml
/// [graph]
/// pae-power = 1.4
/// pae-cutoff = 10.0
///
/// [clustering]
/// resolution = 1.0
/// min-cluster-size = 5
///
/// [classification]
/// plddt-threshold = 50.0
/// rigid-at-threshold = false
///
/// [gap-resolution]
/// min-gap = 2
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDecompositionConfig {
    graph: Option<PartialGraphConfig>,
    clustering: Option<PartialClusteringConfig>,
    classification: Option<PartialClassificationConfig>,
    #[serde(rename = "gap-resolution")]
    gap_resolution: Option<PartialGapResolutionConfig>,
}

impl PartialDecompositionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Combines file values, `--set` overrides and dedicated flags into the final
    /// configuration. Flags win over `--set`, which wins over the file; anything
    /// left unset takes the library default.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<core_config::DecompositionConfig> {
        self.apply_set_values(&args.set_values)?;

        let graph = self.graph.take().unwrap_or_default();
        let clustering = self.clustering.take().unwrap_or_default();
        let classification = self.classification.take().unwrap_or_default();
        let gap_resolution = self.gap_resolution.take().unwrap_or_default();

        let mut builder = core_config::DecompositionConfigBuilder::new();
        if let Some(v) = args.pae_power.or(graph.pae_power) {
            builder = builder.pae_power(v);
        }
        if let Some(v) = args.pae_cutoff.or(graph.pae_cutoff) {
            builder = builder.pae_cutoff(v);
        }
        if let Some(v) = graph.epsilon {
            builder = builder.epsilon(v);
        }
        if let Some(v) = args.resolution.or(clustering.resolution) {
            builder = builder.resolution(v);
        }
        if let Some(v) = args.min_cluster_size.or(clustering.min_cluster_size) {
            builder = builder.min_cluster_size(v);
        }
        if let Some(v) = args.plddt_threshold.or(classification.plddt_threshold) {
            builder = builder.plddt_threshold(v);
        }
        if args.rigid_at_threshold {
            builder = builder.rigid_at_threshold(true);
        } else if let Some(v) = classification.rigid_at_threshold {
            builder = builder.rigid_at_threshold(v);
        }
        if let Some(v) = args.min_gap.or(gap_resolution.min_gap) {
            builder = builder.min_gap(v);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "graph.pae-power" => {
                    self.graph.get_or_insert_with(Default::default).pae_power =
                        Some(parse_value(key, value_str)?);
                }
                "graph.pae-cutoff" => {
                    self.graph.get_or_insert_with(Default::default).pae_cutoff =
                        Some(parse_value(key, value_str)?);
                }
                "graph.epsilon" => {
                    self.graph.get_or_insert_with(Default::default).epsilon =
                        Some(parse_value(key, value_str)?);
                }
                "clustering.resolution" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .resolution = Some(parse_value(key, value_str)?);
                }
                "clustering.min-cluster-size" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .min_cluster_size = Some(parse_value(key, value_str)?);
                }
                "classification.plddt-threshold" => {
                    self.classification
                        .get_or_insert_with(Default::default)
                        .plddt_threshold = Some(parse_value(key, value_str)?);
                }
                "classification.rigid-at-threshold" => {
                    self.classification
                        .get_or_insert_with(Default::default)
                        .rigid_at_threshold = Some(parse_value(key, value_str)?);
                }
                "gap-resolution.min-gap" => {
                    self.gap_resolution
                        .get_or_insert_with(Default::default)
                        .min_gap = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}
