//! Loader for JSON automation specs.
//!
//! A spec document is an object with a required `cases` array and optional
//! engine options at the top level:
//!
//! ```json
//! {
//!   "sleepDuration": 0.2,
//!   "minFrameCount": 2,
//!   "verbose": true,
//!   "cases": [
//!     { "name": "aa_msaa4", "settings": { "view.antialiasing": "msaa4" } }
//!   ]
//! }
//! ```
//!
//! Unknown top-level keys are rejected just like unknown parameter keys: a
//! typoed option name must fail the load, not silently fall back to a
//! default. Parsing is total and side-effect-free; it never touches a
//! rendering context. Structural failures surface as
//! [`FramesweepError::MalformedSpec`], out-of-range option values as
//! [`FramesweepError::InvalidOptions`].

use crate::{
    error::{FramesweepError, FramesweepResult},
    model::{Options, TestCase, TestPlan},
};

const TOP_LEVEL_KEYS: &[&str] = &["cases", "minFrameCount", "sleepDuration", "verbose"];

/// Loose option values as they appear in the document. Range checking happens
/// in [`RawOptions::into_options`] so that a negative `minFrameCount` reports
/// as an option problem, not a parse problem.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOptions {
    sleep_duration: f64,
    min_frame_count: i64,
    verbose: bool,
}

impl Default for RawOptions {
    fn default() -> Self {
        let options = Options::default();
        Self {
            sleep_duration: options.sleep_duration,
            min_frame_count: i64::from(options.min_frame_count),
            verbose: options.verbose,
        }
    }
}

impl RawOptions {
    fn into_options(self) -> FramesweepResult<Options> {
        let min_frame_count = u32::try_from(self.min_frame_count).map_err(|_| {
            FramesweepError::invalid_options(format!(
                "minFrameCount must be in [0, {}] (got {})",
                u32::MAX,
                self.min_frame_count
            ))
        })?;
        let options = Options {
            sleep_duration: self.sleep_duration,
            min_frame_count,
            verbose: self.verbose,
        };
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, serde::Deserialize)]
struct SpecDoc {
    #[serde(flatten)]
    options: RawOptions,
    cases: Vec<TestCase>,
}

/// Parse a spec document into a validated plan plus the options it embeds.
///
/// Omitted option fields take their defaults (0.2 s, 2 frames, verbose).
pub fn parse_spec(json: &str) -> FramesweepResult<(TestPlan, Options)> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| FramesweepError::malformed_spec(e.to_string()))?;
    let Some(map) = value.as_object() else {
        return Err(FramesweepError::malformed_spec("spec must be a JSON object"));
    };
    for key in map.keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            return Err(FramesweepError::malformed_spec(format!(
                "unknown top-level key '{key}' (expected one of {TOP_LEVEL_KEYS:?})"
            )));
        }
    }

    let doc: SpecDoc = serde_json::from_value(value)
        .map_err(|e| FramesweepError::malformed_spec(e.to_string()))?;
    let plan = TestPlan { cases: doc.cases };
    plan.validate()?;
    let options = doc.options.into_options()?;
    Ok((plan, options))
}
