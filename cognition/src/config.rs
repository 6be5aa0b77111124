//! Configuration for the resolution pipeline.

use serde::{Deserialize, Serialize};

use crate::types::{CognitionError, Result};

/// Hard cap on reasoning passes per run.
pub const MAX_ITERATIONS: usize = 5;

/// Configuration for a [`crate::CognitivePipeline`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CognitionConfig {
    /// Reasoning engine configuration
    #[serde(default)]
    pub engine: EngineConfig,
    /// Expression evaluator configuration
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    /// Knowledge lookup configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Verification configuration
    #[serde(default)]
    pub verification: VerificationConfig,
    /// Phrasing configuration
    #[serde(default)]
    pub phrasing: PhrasingConfig,
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CognitionConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| CognitionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| CognitionError::Config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.engine.early_exit_threshold) {
            return Err(CognitionError::Config(format!(
                "engine.early_exit_threshold {} outside [0, 1]",
                self.engine.early_exit_threshold
            )));
        }
        let tolerance = self.verification.tolerance;
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(CognitionError::Config(format!(
                "verification.tolerance must be positive, got {}",
                self.verification.tolerance
            )));
        }
        Ok(())
    }
}

/// Reasoning engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Stop iterating once a pass is more confident than this
    pub early_exit_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            early_exit_threshold: 0.9,
        }
    }
}

/// Expression evaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Read `3x4` as multiplication (raises a parse warning)
    pub implicit_multiplication: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            implicit_multiplication: true,
        }
    }
}

/// Knowledge lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Shortest query token considered
    pub min_token_len: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { min_token_len: 3 }
    }
}

/// Verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Enable the self-correction loop
    pub enabled: bool,
    /// Absolute difference that counts as a mismatch
    pub tolerance: f64,
    /// Re-derive expressions with more than two operands
    pub verify_nary: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: 1e-3,
            verify_nary: true,
        }
    }
}

/// Phrasing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhrasingConfig {
    /// Seed for template selection (entropy when unset)
    pub seed: Option<u64>,
}

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CognitionConfig::default();
        assert_eq!(config.engine.early_exit_threshold, 0.9);
        assert_eq!(config.knowledge.min_token_len, 3);
        assert!(config.verification.enabled);
        assert!(config.phrasing.seed.is_none());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = CognitionConfig::default();
        config.phrasing.seed = Some(7);
        let yaml = config.to_yaml().unwrap();
        let parsed = CognitionConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.phrasing.seed, Some(7));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = CognitionConfig::from_yaml("verification:\n  enabled: false\n  tolerance: 0.01\n  verify_nary: false\n").unwrap();
        assert!(!config.verification.enabled);
        assert_eq!(config.engine.early_exit_threshold, 0.9);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = CognitionConfig::from_yaml("engine:\n  early_exit_threshold: 1.5\n");
        assert!(matches!(result, Err(CognitionError::Config(_))));
    }
}
