use crate::{
    applier::{ApplyError, SettingsApplier},
    error::FramesweepResult,
    model::{Options, TestCase, TestPlan},
    report::{NullReporter, Reporter, SweepEvent},
};

/// Where the driver is inside the current case's apply/settle/capture cycle.
///
/// `Applying` and `Advancing` are transient: they begin and end inside a
/// single [`Driver::tick`] call, so the phase observed between ticks is one of
/// `Idle`, `Waiting`, `ReadyToCapture`, or `Finished`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Applying,
    Waiting,
    ReadyToCapture,
    Advancing,
    Finished,
}

/// Tick-driven state machine that walks a [`TestPlan`].
///
/// The driver performs no I/O and never blocks: waiting is state held across
/// successive `tick` calls, one per rendered frame, on the embedder's render
/// thread. The rendering context is only reachable through the
/// [`SettingsApplier`] borrowed by each tick.
pub struct Driver {
    plan: TestPlan,
    options: Options,
    reporter: Box<dyn Reporter>,
    cursor: usize,
    elapsed_time: f64,
    elapsed_frames: u32,
    phase: Phase,
    capture_polled: bool,
    halt_on_apply_error: bool,
    last_apply_error: Option<ApplyError>,
}

impl Driver {
    /// Build a driver over a validated plan. Fails on invalid plan contents
    /// or out-of-range options; no partially constructed driver escapes.
    pub fn new(plan: TestPlan, options: Options) -> FramesweepResult<Self> {
        plan.validate()?;
        options.validate()?;
        Ok(Self {
            plan,
            options,
            reporter: Box::new(NullReporter),
            cursor: 0,
            elapsed_time: 0.0,
            elapsed_frames: 0,
            phase: Phase::Idle,
            capture_polled: false,
            halt_on_apply_error: false,
            last_apply_error: None,
        })
    }

    /// Replace the progress sink. Effective from the next tick.
    ///
    /// The driver reports unconditionally; verbosity policy lives entirely in
    /// the choice of reporter (the engine wires [`NullReporter`] for quiet
    /// runs).
    pub fn set_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporter = reporter;
    }

    /// Treat an apply failure as fatal for the whole sweep instead of
    /// skipping past the broken case.
    pub fn set_halt_on_apply_error(&mut self, halt: bool) {
        self.halt_on_apply_error = halt;
    }

    /// Advance the state machine by one rendered frame.
    ///
    /// `delta_time` is the frame's wall-clock duration in seconds, supplied
    /// by the embedder. O(1), never waits, and always completes its phase
    /// transition even when the applier fails.
    #[tracing::instrument(level = "trace", skip(self, applier))]
    pub fn tick(&mut self, delta_time: f64, applier: &mut dyn SettingsApplier) {
        match self.phase {
            Phase::Finished => return,
            Phase::Idle => {
                if self.plan.is_empty() {
                    self.finish();
                    return;
                }
                self.apply_current(applier);
            }
            Phase::ReadyToCapture => {
                // Hold the capture point until the embedder has seen it.
                if !self.capture_polled {
                    return;
                }
                self.phase = Phase::Advancing;
                self.cursor += 1;
                if self.cursor >= self.plan.len() {
                    self.finish();
                    return;
                }
                self.apply_current(applier);
            }
            Phase::Waiting | Phase::Applying | Phase::Advancing => {}
        }
        if self.phase == Phase::Finished {
            return;
        }

        // The applying tick counts as the first settle frame.
        self.elapsed_frames = self.elapsed_frames.saturating_add(1);
        if delta_time.is_finite() && delta_time > 0.0 {
            self.elapsed_time += delta_time;
        }
        if self.elapsed_time >= self.options.sleep_duration
            && self.elapsed_frames >= self.options.min_frame_count
        {
            self.phase = Phase::ReadyToCapture;
            self.reporter.report(SweepEvent::ReadyToCapture {
                index: self.cursor,
                count: self.plan.len(),
                name: &self.plan.cases[self.cursor].name,
            });
        }
    }

    /// True until the plan is exhausted.
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Finished
    }

    /// Phase observed after the last tick.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the case currently being settled or captured, if any.
    pub fn current_case_name(&self) -> Option<&str> {
        self.current_case().map(|c| c.name.as_str())
    }

    /// Capture artifact name for the current case, if any.
    pub fn current_screenshot_name(&self) -> Option<&str> {
        self.current_case().map(|c| c.screenshot_name())
    }

    /// Zero-based index of the current case.
    pub fn case_index(&self) -> usize {
        self.cursor
    }

    pub fn case_count(&self) -> usize {
        self.plan.len()
    }

    /// True exactly while the current case has cleared both settle floors and
    /// has not yet been advanced past. Polling latches the capture point: the
    /// first tick after a positive poll moves to the next case, while a
    /// driver that is never polled holds position instead of skipping cases.
    pub fn should_capture_now(&mut self) -> bool {
        if self.phase == Phase::ReadyToCapture {
            self.capture_polled = true;
            true
        } else {
            false
        }
    }

    /// Most recent applier rejection, kept until the next successful apply.
    pub fn last_apply_error(&self) -> Option<&ApplyError> {
        self.last_apply_error.as_ref()
    }

    fn current_case(&self) -> Option<&TestCase> {
        match self.phase {
            Phase::Idle | Phase::Finished => None,
            _ => self.plan.cases.get(self.cursor),
        }
    }

    fn apply_current(&mut self, applier: &mut dyn SettingsApplier) {
        self.phase = Phase::Applying;
        self.elapsed_time = 0.0;
        self.elapsed_frames = 0;
        self.capture_polled = false;

        let count = self.plan.len();
        let case = &self.plan.cases[self.cursor];
        self.reporter.report(SweepEvent::CaseStarted {
            index: self.cursor,
            count,
            name: &case.name,
        });
        match applier.apply(&case.name, &case.settings) {
            Ok(()) => {
                self.last_apply_error = None;
                self.phase = Phase::Waiting;
            }
            Err(err) => {
                self.reporter.report(SweepEvent::ApplyFailed {
                    index: self.cursor,
                    count,
                    error: &err,
                });
                self.last_apply_error = Some(err);
                if self.halt_on_apply_error {
                    self.finish();
                } else {
                    self.phase = Phase::Waiting;
                }
            }
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.reporter.report(SweepEvent::Finished {
            count: self.plan.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        applier::RecordingApplier,
        model::{SettingValue, Settings, TestCase},
    };

    fn plan(names: &[&str]) -> TestPlan {
        TestPlan {
            cases: names
                .iter()
                .map(|n| {
                    let mut settings = Settings::new();
                    settings.insert(
                        "view.bloom_enabled".to_string(),
                        SettingValue::Bool(true),
                    );
                    TestCase {
                        name: (*n).to_string(),
                        settings,
                        screenshot: None,
                    }
                })
                .collect(),
        }
    }

    fn options(sleep: f64, frames: u32) -> Options {
        Options {
            sleep_duration: sleep,
            min_frame_count: frames,
            verbose: false,
        }
    }

    /// Tick until finished, polling the capture point every frame. Returns
    /// the case names in capture order.
    fn run_to_completion(driver: &mut Driver, applier: &mut RecordingApplier, dt: f64) -> Vec<String> {
        let mut captured = Vec::new();
        for _ in 0..10_000 {
            if !driver.is_running() {
                return captured;
            }
            driver.tick(dt, applier);
            if driver.should_capture_now() {
                captured.push(driver.current_case_name().unwrap().to_string());
            }
        }
        panic!("sweep did not terminate");
    }

    #[test]
    fn empty_plan_finishes_on_first_tick() {
        let mut driver = Driver::new(plan(&[]), options(0.0, 0)).unwrap();
        assert!(driver.is_running());
        assert_eq!(driver.phase(), Phase::Idle);
        driver.tick(0.016, &mut RecordingApplier::default());
        assert!(!driver.is_running());
        assert_eq!(driver.current_case_name(), None);
    }

    #[test]
    fn visits_every_case_once_in_order() {
        let mut driver = Driver::new(plan(&["a", "b", "c"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier::default();
        let captured = run_to_completion(&mut driver, &mut applier, 0.016);
        assert_eq!(captured, vec!["a", "b", "c"]);
        let applied: Vec<_> = applier.applied.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(applied, vec!["a", "b", "c"]);
    }

    #[test]
    fn zero_floors_reach_capture_in_one_tick_per_case() {
        let mut driver = Driver::new(plan(&["a"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier::default();
        driver.tick(0.016, &mut applier);
        assert_eq!(driver.phase(), Phase::ReadyToCapture);
        assert!(driver.should_capture_now());
    }

    #[test]
    fn capture_requires_both_floors() {
        // Frame floor cleared long before the time floor.
        let mut driver = Driver::new(plan(&["a"]), options(1.0, 2)).unwrap();
        let mut applier = RecordingApplier::default();
        for _ in 0..20 {
            driver.tick(0.01, &mut applier);
            assert!(!driver.should_capture_now());
        }
        // Time floor cleared in one huge frame, frame floor still pending.
        let mut driver = Driver::new(plan(&["a"]), options(0.1, 5)).unwrap();
        driver.tick(10.0, &mut applier);
        assert!(!driver.should_capture_now());
        for _ in 0..3 {
            driver.tick(10.0, &mut applier);
            assert!(!driver.should_capture_now());
        }
        driver.tick(10.0, &mut applier);
        assert!(driver.should_capture_now());
    }

    #[test]
    fn worked_example_from_the_settle_contract() {
        // Two cases, sleep 0.2 s, 2 frames, ticking at 0.1 s.
        let mut driver = Driver::new(plan(&["a", "b"]), options(0.2, 2)).unwrap();
        let mut applier = RecordingApplier::default();

        driver.tick(0.1, &mut applier); // applies 'a', settle frame 1
        assert_eq!(driver.phase(), Phase::Waiting);
        assert!(!driver.should_capture_now());

        driver.tick(0.1, &mut applier); // settle frame 2: both floors met
        assert_eq!(driver.phase(), Phase::ReadyToCapture);
        assert!(driver.should_capture_now());

        driver.tick(0.1, &mut applier); // advances and applies 'b'
        assert_eq!(driver.current_case_name(), Some("b"));
        assert_eq!(driver.phase(), Phase::Waiting);
    }

    #[test]
    fn unpolled_driver_holds_the_capture_point() {
        let mut driver = Driver::new(plan(&["a", "b"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier::default();
        driver.tick(0.016, &mut applier);
        assert_eq!(driver.phase(), Phase::ReadyToCapture);
        for _ in 0..5 {
            driver.tick(0.016, &mut applier);
            assert_eq!(driver.phase(), Phase::ReadyToCapture);
        }
        assert_eq!(driver.current_case_name(), Some("a"));
        assert!(driver.should_capture_now());
        driver.tick(0.016, &mut applier);
        assert_eq!(driver.current_case_name(), Some("b"));
    }

    #[test]
    fn apply_failure_advances_past_the_broken_case() {
        let mut driver = Driver::new(plan(&["a", "bad", "c"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier {
            reject: vec!["bad".to_string()],
            ..RecordingApplier::default()
        };
        let captured = run_to_completion(&mut driver, &mut applier, 0.016);
        // The broken case still settles and reaches its capture point so the
        // embedder can photograph the wreckage; only the apply was rejected.
        assert_eq!(captured, vec!["a", "bad", "c"]);
        let applied: Vec<_> = applier.applied.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(applied, vec!["a", "c"]);
    }

    #[test]
    fn apply_failure_halts_when_configured() {
        let mut driver = Driver::new(plan(&["a", "bad", "c"]), options(0.0, 0)).unwrap();
        driver.set_halt_on_apply_error(true);
        let mut applier = RecordingApplier {
            reject: vec!["bad".to_string()],
            ..RecordingApplier::default()
        };
        let captured = run_to_completion(&mut driver, &mut applier, 0.016);
        assert_eq!(captured, vec!["a"]);
        assert!(!driver.is_running());
        assert_eq!(driver.last_apply_error().unwrap().case, "bad");
    }

    #[test]
    fn last_apply_error_clears_on_next_success() {
        let mut driver = Driver::new(plan(&["bad", "b"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier {
            reject: vec!["bad".to_string()],
            ..RecordingApplier::default()
        };
        driver.tick(0.016, &mut applier);
        assert!(driver.last_apply_error().is_some());
        assert!(driver.should_capture_now());
        driver.tick(0.016, &mut applier); // applies 'b' successfully
        assert!(driver.last_apply_error().is_none());
    }

    #[test]
    fn ticks_after_finished_are_no_ops() {
        let mut driver = Driver::new(plan(&["a"]), options(0.0, 0)).unwrap();
        let mut applier = RecordingApplier::default();
        run_to_completion(&mut driver, &mut applier, 0.016);
        assert!(!driver.is_running());
        for _ in 0..3 {
            driver.tick(0.016, &mut applier);
        }
        assert!(!driver.is_running());
        assert_eq!(applier.applied.len(), 1);
        assert!(!driver.should_capture_now());
    }

    #[test]
    fn nonsense_delta_time_cannot_poison_the_clock() {
        let mut driver = Driver::new(plan(&["a"]), options(0.2, 1)).unwrap();
        let mut applier = RecordingApplier::default();
        driver.tick(f64::NAN, &mut applier);
        driver.tick(-5.0, &mut applier);
        assert!(!driver.should_capture_now());
        driver.tick(0.2, &mut applier);
        assert!(driver.should_capture_now());
    }

    #[test]
    fn reporter_sees_each_case_with_correct_index_and_count() {
        use crate::report::{Reporter, SweepEvent};
        use std::{cell::RefCell, rc::Rc};

        #[derive(Default)]
        struct Collector(Rc<RefCell<Vec<(usize, usize, String)>>>);

        impl Reporter for Collector {
            fn report(&mut self, event: SweepEvent<'_>) {
                if let SweepEvent::CaseStarted { index, count, name } = event {
                    self.0.borrow_mut().push((index, count, name.to_string()));
                }
            }
        }

        let events = Rc::new(RefCell::new(Vec::new()));
        // verbose=false on purpose: the driver reports to whatever sink it
        // holds; the flag only steers the engine's default reporter choice.
        let mut driver = Driver::new(
            plan(&["a", "b"]),
            Options {
                sleep_duration: 0.0,
                min_frame_count: 0,
                verbose: false,
            },
        )
        .unwrap();
        driver.set_reporter(Box::new(Collector(events.clone())));
        let mut applier = RecordingApplier::default();
        run_to_completion(&mut driver, &mut applier, 0.016);

        let seen = events.borrow();
        assert_eq!(
            *seen,
            vec![(0, 2, "a".to_string()), (1, 2, "b".to_string())]
        );
    }
}
