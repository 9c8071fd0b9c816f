use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::render_settings::{
    AUTO_TRANSITION_INTERVAL_MS, HIDDEN_RECHECK_MS, TRANSITION_DURATION_MS,
};

use crate::engine::phases::PhaseId;
use crate::error::{VisualizerError, VisualizerResult};

/// Runtime configuration, loadable from `assets/visualizer.json`.
/// Missing fields take their defaults.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub initial_phase: PhaseId,
    /// Overrides the tier default (60 desktop, 30 mobile).
    pub target_fps: Option<u32>,
    pub transition_duration_ms: f64,
    pub auto_transition_interval_ms: f64,
    pub auto_start: bool,
    pub hidden_recheck_ms: f64,
    /// Fixes resource generation for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            initial_phase: PhaseId::Neuron,
            target_fps: None,
            transition_duration_ms: TRANSITION_DURATION_MS,
            auto_transition_interval_ms: AUTO_TRANSITION_INTERVAL_MS,
            auto_start: true,
            hidden_recheck_ms: HIDDEN_RECHECK_MS,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> VisualizerResult<()> {
        if self.target_fps == Some(0) {
            return Err(VisualizerError::Configuration(
                "target_fps must be greater than zero".into(),
            ));
        }
        if !(self.transition_duration_ms >= 0.0) {
            return Err(VisualizerError::Configuration(
                "transition_duration_ms must not be negative".into(),
            ));
        }
        if !(self.auto_transition_interval_ms > 0.0) {
            return Err(VisualizerError::Configuration(
                "auto_transition_interval_ms must be positive".into(),
            ));
        }
        if !(self.hidden_recheck_ms > 0.0) {
            return Err(VisualizerError::Configuration(
                "hidden_recheck_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{ "initial_phase": "cosmos", "target_fps": 24 }"#).unwrap();
        assert_eq!(config.initial_phase, PhaseId::Cosmos);
        assert_eq!(config.target_fps, Some(24));
        assert_eq!(config.transition_duration_ms, TRANSITION_DURATION_MS);
        assert!(config.auto_start);
        config.validate().unwrap();
    }

    #[test]
    fn zero_rates_are_rejected() {
        let config = VisualizerConfig {
            target_fps: Some(0),
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(VisualizerError::Configuration(_))
        ));

        let config = VisualizerConfig {
            auto_transition_interval_ms: 0.0,
            ..default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_phase_name_fails_to_parse() {
        assert!(serde_json::from_str::<VisualizerConfig>(r#"{ "initial_phase": "galaxy" }"#).is_err());
    }
}
