//! The built-in test sequence used when no spec is supplied.

use crate::{
    catalog::{ANTIALIASING_MODES, TONE_MAPPING_OPERATORS},
    model::{SettingValue, Settings, TestCase, TestPlan},
};

/// Bumped whenever the generated sequence changes, so golden screenshot sets
/// can be tied to a plan revision.
pub const DEFAULT_PLAN_VERSION: u32 = 1;

const BLOOM_STATES: &[(&str, bool)] = &[("bloom_off", false), ("bloom_on", true)];

/// Build the default plan: the full cross-product of antialiasing mode,
/// tone-mapping operator, and bloom state.
///
/// Pure function of the built-in catalog. Case names are the axis values
/// joined by `_` (for example `msaa4_aces_bloom_on`), in lockstep with
/// iteration order, so two independent calls always produce identical plans.
pub fn default_plan() -> TestPlan {
    let mut cases = Vec::with_capacity(
        ANTIALIASING_MODES.len() * TONE_MAPPING_OPERATORS.len() * BLOOM_STATES.len(),
    );
    for aa in ANTIALIASING_MODES {
        for tm in TONE_MAPPING_OPERATORS {
            for (bloom_label, bloom) in BLOOM_STATES {
                let name = format!("{aa}_{tm}_{bloom_label}");
                let mut settings = Settings::new();
                settings.insert(
                    "view.antialiasing".to_string(),
                    SettingValue::Choice((*aa).to_string()),
                );
                settings.insert(
                    "view.tone_mapping".to_string(),
                    SettingValue::Choice((*tm).to_string()),
                );
                settings.insert(
                    "view.bloom_enabled".to_string(),
                    SettingValue::Bool(*bloom),
                );
                cases.push(TestCase {
                    screenshot: Some(name.clone()),
                    name,
                    settings,
                });
            }
        }
    }
    TestPlan { cases }
}
