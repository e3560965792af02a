use crate::model::Settings;

/// Error returned by an embedder whose rendering context rejected a case's
/// settings. Per-case and non-fatal: the driver records it and moves on.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("applying settings for case '{case}' failed: {reason}")]
pub struct ApplyError {
    pub case: String,
    pub reason: String,
}

impl ApplyError {
    pub fn new(case: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            reason: reason.into(),
        }
    }
}

/// Write access to the embedder's rendering context, borrowed only for the
/// duration of each call.
///
/// The driver never touches the renderer directly; every settings write goes
/// through this seam, which keeps the engine testable with a fake applier and
/// zero rendering dependencies.
pub trait SettingsApplier {
    /// Apply one case's settings bundle to the live context.
    fn apply(&mut self, case_name: &str, settings: &Settings) -> Result<(), ApplyError>;
}

/// Applier that accepts everything and remembers what it saw, for tests and
/// the CLI dry-run path.
#[derive(Debug, Default)]
pub struct RecordingApplier {
    pub applied: Vec<(String, Settings)>,
    /// Case names this applier should reject.
    pub reject: Vec<String>,
}

impl SettingsApplier for RecordingApplier {
    fn apply(&mut self, case_name: &str, settings: &Settings) -> Result<(), ApplyError> {
        if self.reject.iter().any(|r| r == case_name) {
            return Err(ApplyError::new(case_name, "rejected by test applier"));
        }
        self.applied.push((case_name.to_string(), settings.clone()));
        Ok(())
    }
}
