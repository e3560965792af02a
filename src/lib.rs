//! Framesweep drives a rendering harness through a scripted sweep of
//! parameter settings and signals when each configuration is stable enough to
//! capture.
//!
//! # Sweep overview
//!
//! 1. **Load**: a JSON spec (or the built-in default sequence) becomes a
//!    [`TestPlan`], an ordered list of named settings bundles.
//! 2. **Apply**: each frame, the embedder ticks the engine; entering a case
//!    writes its settings into the rendering context through the embedder's
//!    [`SettingsApplier`].
//! 3. **Settle**: the engine waits until both a minimum elapsed time and a
//!    minimum frame count have passed, so the renderer has stabilized.
//! 4. **Capture**: [`AutomationEngine::should_capture_now`] flips to true;
//!    taking the screenshot is the embedder's job. The next tick advances to
//!    the next case, until the plan is exhausted.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No blocking**: `tick` is O(1); waiting is state across ticks, never a
//!   sleep.
//! - **No IO in the engine**: screenshots and the rendering context belong to
//!   the embedder, reached only through injected traits.
//! - **Deterministic**: spec loading is pure, and the default plan is a fixed
//!   cross-product that never varies between runs.
#![forbid(unsafe_code)]

pub mod applier;
pub mod catalog;
pub mod default_plan;
pub mod driver;
pub mod error;
pub mod model;
pub mod report;
pub mod spec;

mod engine;

pub use applier::{ApplyError, RecordingApplier, SettingsApplier};
pub use catalog::{CATALOG_VERSION, SettingKind, kind_of, known_keys};
pub use default_plan::{DEFAULT_PLAN_VERSION, default_plan};
pub use driver::{Driver, Phase};
pub use engine::AutomationEngine;
pub use error::{FramesweepError, FramesweepResult};
pub use model::{Options, SettingValue, Settings, TestCase, TestPlan};
pub use report::{LogReporter, NullReporter, Reporter, SweepEvent};
pub use spec::parse_spec;
