use std::collections::{BTreeMap, BTreeSet};

use crate::{
    catalog,
    error::{FramesweepError, FramesweepResult},
};

/// One parameter value inside a test case's settings bundle.
///
/// Values deserialize untagged, so spec documents write plain JSON scalars:
/// `true`, `4`, `0.5`, `"aces"`. Whole numbers deserialize as [`Int`];
/// fractional numbers as [`Float`].
///
/// [`Int`]: SettingValue::Int
/// [`Float`]: SettingValue::Float
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(String),
}

impl SettingValue {
    /// Short kind label used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Float(_) => "float",
            SettingValue::Choice(_) => "choice",
        }
    }
}

/// Mapping from catalog parameter key to value, stable iteration order.
pub type Settings = BTreeMap<String, SettingValue>;

/// One named configuration of renderer/material/view parameters to be
/// applied and captured.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TestCase {
    pub name: String,
    pub settings: Settings,
    /// Capture artifact name; defaults to the case name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl TestCase {
    /// Name under which the embedder should save this case's capture.
    pub fn screenshot_name(&self) -> &str {
        self.screenshot.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> FramesweepResult<()> {
        if self.name.trim().is_empty() {
            return Err(FramesweepError::malformed_spec(
                "test case name must be non-empty",
            ));
        }
        for (key, value) in &self.settings {
            let Some(kind) = catalog::kind_of(key) else {
                return Err(FramesweepError::malformed_spec(format!(
                    "case '{}' uses unknown parameter key '{}'",
                    self.name, key
                )));
            };
            kind.check(&self.name, key, value)?;
        }
        Ok(())
    }
}

/// The ordered sequence of test cases for one automation run.
///
/// Execution order is list order. An empty plan is legal; a driver over it is
/// immediately finished.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TestPlan {
    pub cases: Vec<TestCase>,
}

impl TestPlan {
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn validate(&self) -> FramesweepResult<()> {
        let mut seen = BTreeSet::new();
        for case in &self.cases {
            case.validate()?;
            if !seen.insert(case.name.as_str()) {
                return Err(FramesweepError::malformed_spec(format!(
                    "duplicate test case name '{}'",
                    case.name
                )));
            }
        }
        Ok(())
    }
}

/// Engine timing and verbosity knobs, immutable after construction.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Minimum time the driver waits between applying a case's settings and
    /// signaling the capture point. Seconds.
    pub sleep_duration: f64,
    /// Minimum frame count for the same settle window. Both this and
    /// `sleep_duration` must be cleared before capture is signaled.
    pub min_frame_count: u32,
    /// If true, per-case progress is emitted through the reporter.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sleep_duration: 0.2,
            min_frame_count: 2,
            verbose: true,
        }
    }
}

impl Options {
    pub fn validate(&self) -> FramesweepResult<()> {
        if !self.sleep_duration.is_finite() {
            return Err(FramesweepError::invalid_options(
                "sleepDuration must be finite",
            ));
        }
        if self.sleep_duration < 0.0 {
            return Err(FramesweepError::invalid_options(format!(
                "sleepDuration must be >= 0 (got {})",
                self.sleep_duration
            )));
        }
        Ok(())
    }
}
