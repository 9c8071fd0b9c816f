use crate::engine::phases::PhaseId;

/// Visualizer error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VisualizerError {
    #[error("Initialisation error: {0}")]
    Initialization(String),
    #[error("Resource build error for phase '{phase}': {reason}")]
    ResourceBuild { phase: PhaseId, reason: String },
    #[error("Render frame error: {0}")]
    RenderFrame(String),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(&'static str),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl VisualizerError {
    pub fn resource_build(phase: PhaseId, reason: impl Into<String>) -> Self {
        Self::ResourceBuild {
            phase,
            reason: reason.into(),
        }
    }
}

pub type VisualizerResult<T> = Result<T, VisualizerError>;
