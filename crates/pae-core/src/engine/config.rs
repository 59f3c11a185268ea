use crate::core::graph::error_graph::EdgeWeighting;
use thiserror::Error;

pub const DEFAULT_PAE_POWER: f64 = 1.4;
pub const DEFAULT_PAE_CUTOFF: f64 = 10.0;
pub const DEFAULT_RESOLUTION: f64 = 1.0;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;
pub const DEFAULT_PLDDT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_MIN_GAP: i64 = 2;
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Factor between the human-facing resolution and the native CPM resolution.
pub const RESOLUTION_SCALE: f64 = 100.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {value} ({reason})")]
    InvalidValue {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// How the error matrix is turned into a weighted graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub pae_power: f64,
    pub pae_cutoff: f64,
    pub epsilon: f64,
}

impl GraphConfig {
    pub fn edge_weighting(&self) -> EdgeWeighting {
        EdgeWeighting {
            power: self.pae_power,
            cutoff: self.pae_cutoff,
            epsilon: self.epsilon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig {
    /// Human-facing resolution, roughly 0.1-5. Divided by [`RESOLUTION_SCALE`]
    /// before reaching the clustering primitive.
    pub resolution: f64,
    pub min_cluster_size: usize,
}

impl ClusteringConfig {
    pub fn native_resolution(&self) -> f64 {
        self.resolution / RESOLUTION_SCALE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationConfig {
    /// Regions whose mean confidence does not exceed this value are flexible.
    pub plddt_threshold: f64,
    /// Whether a mean exactly at the threshold counts as rigid.
    pub rigid_at_threshold: bool,
}

impl ClassificationConfig {
    pub fn is_rigid(&self, mean_confidence: f64) -> bool {
        if self.rigid_at_threshold {
            mean_confidence >= self.plddt_threshold
        } else {
            mean_confidence > self.plddt_threshold
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionConfig {
    pub graph: GraphConfig,
    pub clustering: ClusteringConfig,
    pub classification: ClassificationConfig,
    /// Minimum separation, in positional units, between neighbouring domains of a segment.
    pub min_gap: i64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig {
                pae_power: DEFAULT_PAE_POWER,
                pae_cutoff: DEFAULT_PAE_CUTOFF,
                epsilon: DEFAULT_EPSILON,
            },
            clustering: ClusteringConfig {
                resolution: DEFAULT_RESOLUTION,
                min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            },
            classification: ClassificationConfig {
                plddt_threshold: DEFAULT_PLDDT_THRESHOLD,
                rigid_at_threshold: false,
            },
            min_gap: DEFAULT_MIN_GAP,
        }
    }
}

#[derive(Default)]
pub struct DecompositionConfigBuilder {
    pae_power: Option<f64>,
    pae_cutoff: Option<f64>,
    epsilon: Option<f64>,
    resolution: Option<f64>,
    min_cluster_size: Option<usize>,
    plddt_threshold: Option<f64>,
    rigid_at_threshold: Option<bool>,
    min_gap: Option<i64>,
}

impl DecompositionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pae_power(mut self, power: f64) -> Self {
        self.pae_power = Some(power);
        self
    }
    pub fn pae_cutoff(mut self, cutoff: f64) -> Self {
        self.pae_cutoff = Some(cutoff);
        self
    }
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }
    pub fn min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = Some(size);
        self
    }
    pub fn plddt_threshold(mut self, threshold: f64) -> Self {
        self.plddt_threshold = Some(threshold);
        self
    }
    pub fn rigid_at_threshold(mut self, rigid: bool) -> Self {
        self.rigid_at_threshold = Some(rigid);
        self
    }
    pub fn min_gap(mut self, gap: i64) -> Self {
        self.min_gap = Some(gap);
        self
    }

    /// Fills unset values with defaults and validates the result.
    pub fn build(self) -> Result<DecompositionConfig, ConfigError> {
        let pae_power = self.pae_power.unwrap_or(DEFAULT_PAE_POWER);
        let pae_cutoff = self.pae_cutoff.unwrap_or(DEFAULT_PAE_CUTOFF);
        let epsilon = self.epsilon.unwrap_or(DEFAULT_EPSILON);
        let resolution = self.resolution.unwrap_or(DEFAULT_RESOLUTION);
        let min_cluster_size = self.min_cluster_size.unwrap_or(DEFAULT_MIN_CLUSTER_SIZE);
        let plddt_threshold = self.plddt_threshold.unwrap_or(DEFAULT_PLDDT_THRESHOLD);
        let min_gap = self.min_gap.unwrap_or(DEFAULT_MIN_GAP);

        check(pae_power.is_finite() && pae_power >= 0.0, "pae_power", pae_power, "must be a finite number >= 0")?;
        check(pae_cutoff.is_finite() && pae_cutoff > 0.0, "pae_cutoff", pae_cutoff, "must be a finite number > 0")?;
        check(epsilon.is_finite() && epsilon > 0.0, "epsilon", epsilon, "must be a finite number > 0")?;
        check(resolution.is_finite() && resolution > 0.0, "resolution", resolution, "must be a finite number > 0")?;
        check(min_cluster_size >= 1, "min_cluster_size", min_cluster_size, "must be at least 1")?;
        check(plddt_threshold.is_finite(), "plddt_threshold", plddt_threshold, "must be finite")?;
        check(min_gap >= 1, "min_gap", min_gap, "must be at least 1")?;

        Ok(DecompositionConfig {
            graph: GraphConfig {
                pae_power,
                pae_cutoff,
                epsilon,
            },
            clustering: ClusteringConfig {
                resolution,
                min_cluster_size,
            },
            classification: ClassificationConfig {
                plddt_threshold,
                rigid_at_threshold: self.rigid_at_threshold.unwrap_or(false),
            },
            min_gap,
        })
    }
}

fn check(
    ok: bool,
    parameter: &'static str,
    value: impl ToString,
    reason: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            value: value.to_string(),
            reason,
        })
    }
}
