//! Catalog of parameter keys the engine knows how to drive.
//!
//! The spec loader rejects any key not listed here rather than silently
//! ignoring it, so spec/engine version drift surfaces at load time instead of
//! as a sweep that quietly tests nothing.

use crate::{
    error::{FramesweepError, FramesweepResult},
    model::SettingValue,
};

/// Bumped whenever a key is added, removed, or changes kind.
pub const CATALOG_VERSION: u32 = 1;

/// Expected value shape for one catalog key.
#[derive(Clone, Copy, Debug)]
pub enum SettingKind {
    Bool,
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Choice(&'static [&'static str]),
}

impl SettingKind {
    /// Validate `value` against this kind. `case` and `key` only feed the
    /// error message.
    pub fn check(&self, case: &str, key: &str, value: &SettingValue) -> FramesweepResult<()> {
        match (self, value) {
            (SettingKind::Bool, SettingValue::Bool(_)) => Ok(()),
            (SettingKind::Int { min, max }, SettingValue::Int(v)) => {
                if v < min || v > max {
                    return Err(FramesweepError::malformed_spec(format!(
                        "case '{case}': '{key}' = {v} is outside [{min}, {max}]"
                    )));
                }
                Ok(())
            }
            // Whole-number JSON literals land as Int; float keys accept them.
            (SettingKind::Float { .. }, SettingValue::Int(v)) => {
                self.check(case, key, &SettingValue::Float(*v as f64))
            }
            (SettingKind::Float { min, max }, SettingValue::Float(v)) => {
                if !v.is_finite() {
                    return Err(FramesweepError::malformed_spec(format!(
                        "case '{case}': '{key}' must be finite"
                    )));
                }
                if *v < *min || *v > *max {
                    return Err(FramesweepError::malformed_spec(format!(
                        "case '{case}': '{key}' = {v} is outside [{min}, {max}]"
                    )));
                }
                Ok(())
            }
            (SettingKind::Choice(allowed), SettingValue::Choice(v)) => {
                if !allowed.contains(&v.as_str()) {
                    return Err(FramesweepError::malformed_spec(format!(
                        "case '{case}': '{key}' has unknown choice '{v}' (expected one of {allowed:?})"
                    )));
                }
                Ok(())
            }
            (expected, got) => Err(FramesweepError::malformed_spec(format!(
                "case '{case}': '{key}' expects {} but got {}",
                expected.name(),
                got.kind_name()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SettingKind::Bool => "bool",
            SettingKind::Int { .. } => "int",
            SettingKind::Float { .. } => "float",
            SettingKind::Choice(_) => "choice",
        }
    }
}

/// Antialiasing modes, also the first axis of the default plan.
pub const ANTIALIASING_MODES: &[&str] = &["none", "fxaa", "msaa4", "msaa8"];

/// Tone-mapping operators, also the second axis of the default plan.
pub const TONE_MAPPING_OPERATORS: &[&str] = &["linear", "aces", "filmic"];

/// Skybox environments selectable by a case.
pub const SKYBOX_ENVIRONMENTS: &[&str] = &["neutral", "studio", "sunset"];

const CATALOG: &[(&str, SettingKind)] = &[
    ("material.metallic", SettingKind::Float { min: 0.0, max: 1.0 }),
    ("material.roughness", SettingKind::Float { min: 0.0, max: 1.0 }),
    ("scene.skybox", SettingKind::Choice(SKYBOX_ENVIRONMENTS)),
    ("view.antialiasing", SettingKind::Choice(ANTIALIASING_MODES)),
    ("view.bloom_enabled", SettingKind::Bool),
    ("view.dithering", SettingKind::Bool),
    ("view.msaa_samples", SettingKind::Int { min: 1, max: 8 }),
    (
        "view.render_scale",
        SettingKind::Float {
            min: 0.25,
            max: 2.0,
        },
    ),
    ("view.shadows_enabled", SettingKind::Bool),
    (
        "view.tone_mapping",
        SettingKind::Choice(TONE_MAPPING_OPERATORS),
    ),
];

/// Look up the expected kind for a parameter key.
pub fn kind_of(key: &str) -> Option<&'static SettingKind> {
    CATALOG
        .binary_search_by(|(k, _)| k.cmp(&key))
        .ok()
        .map(|i| &CATALOG[i].1)
}

/// All known parameter keys, sorted.
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(k, _)| *k)
}
