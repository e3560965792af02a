use crate::{
    applier::{ApplyError, SettingsApplier},
    default_plan::default_plan,
    driver::{Driver, Phase},
    error::FramesweepResult,
    model::{Options, TestPlan},
    report::{LogReporter, Reporter},
    spec::parse_spec,
};

/// The automation engine: a plan plus the driver that walks it.
///
/// Construction either parses a JSON spec ([`AutomationEngine::from_json`]) or
/// synthesizes the built-in default sequence
/// ([`AutomationEngine::default_test`]); both yield the same engine type. The
/// embedder calls [`tick`] once per rendered frame and polls
/// [`should_capture_now`] for capture points. Release is `Drop`: the engine is
/// a single-owner value, so double-destroy and use-after-destroy are
/// compile-time errors rather than runtime contracts.
///
/// Not `Sync`: exactly one embedder owns the tick loop, on the render thread.
///
/// [`tick`]: AutomationEngine::tick
/// [`should_capture_now`]: AutomationEngine::should_capture_now
pub struct AutomationEngine {
    driver: Driver,
}

impl AutomationEngine {
    /// Create an engine from a JSON spec, including any options it embeds.
    pub fn from_json(spec: &str) -> FramesweepResult<Self> {
        let (plan, options) = parse_spec(spec)?;
        Self::from_plan(plan, options)
    }

    /// Create an engine over an already-built plan.
    pub fn from_plan(plan: TestPlan, options: Options) -> FramesweepResult<Self> {
        let mut driver = Driver::new(plan, options)?;
        if options.verbose {
            driver.set_reporter(Box::new(LogReporter));
        }
        Ok(Self { driver })
    }

    /// Create an engine for the built-in default test sequence. Never fails:
    /// the default plan and default options are valid by construction.
    pub fn default_test() -> Self {
        match Self::from_plan(default_plan(), Options::default()) {
            Ok(engine) => engine,
            // The built-in plan and default options are valid by construction.
            Err(_) => unreachable!("default plan must be valid"),
        }
    }

    /// Swap in a custom progress sink, replacing the verbose log reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.driver.set_reporter(reporter);
        self
    }

    /// Finish the whole sweep on the first apply failure instead of skipping
    /// past the broken case.
    pub fn halt_on_apply_error(mut self, halt: bool) -> Self {
        self.driver.set_halt_on_apply_error(halt);
        self
    }

    /// Advance by one rendered frame. `delta_time` is the frame duration in
    /// seconds; `applier` is the embedder's rendering context, borrowed for
    /// this call only.
    pub fn tick(&mut self, delta_time: f64, applier: &mut dyn SettingsApplier) {
        self.driver.tick(delta_time, applier);
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn phase(&self) -> Phase {
        self.driver.phase()
    }

    pub fn current_case_name(&self) -> Option<&str> {
        self.driver.current_case_name()
    }

    pub fn current_screenshot_name(&self) -> Option<&str> {
        self.driver.current_screenshot_name()
    }

    pub fn case_index(&self) -> usize {
        self.driver.case_index()
    }

    pub fn case_count(&self) -> usize {
        self.driver.case_count()
    }

    /// True while a capture should be taken for the current case. Polling
    /// latches the point; the next tick advances to the following case.
    pub fn should_capture_now(&mut self) -> bool {
        self.driver.should_capture_now()
    }

    pub fn last_apply_error(&self) -> Option<&ApplyError> {
        self.driver.last_apply_error()
    }
}
