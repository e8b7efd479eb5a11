use std::fmt;

/// Acquisition step that failed while constructing a `Game`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AcquireStage {
    Subsystem,
    Window,
    RenderContext,
}

impl fmt::Display for AcquireStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AcquireStage::Subsystem => "windowing subsystem initialization",
            AcquireStage::Window => "window creation",
            AcquireStage::RenderContext => "render context creation",
        })
    }
}

/// The display could not be acquired.
///
/// Everything acquired before the failing step has already been released
/// when this error is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed: {cause}")]
pub struct InitializationError {
    stage: AcquireStage,
    cause: String,
}

impl InitializationError {
    pub fn new(stage: AcquireStage, cause: impl Into<String>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }

    /// Wraps a backend error, keeping its whole context chain in the cause.
    pub(crate) fn from_platform(stage: AcquireStage, err: anyhow::Error) -> Self {
        Self::new(stage, format!("{err:#}"))
    }

    pub fn stage(&self) -> AcquireStage {
        self.stage
    }

    /// Platform-provided reason for the failure.
    pub fn cause(&self) -> &str {
        &self.cause
    }
}
