use crate::applier::ApplyError;

/// Progress notification emitted by the driver as it walks the plan.
///
/// Indices are zero-based; `count` is the total number of cases in the plan.
#[derive(Clone, Debug, PartialEq)]
pub enum SweepEvent<'a> {
    /// A case's settings were just applied and its settle window started.
    CaseStarted {
        index: usize,
        count: usize,
        name: &'a str,
    },
    /// The settle window elapsed; the embedder should capture now.
    ReadyToCapture {
        index: usize,
        count: usize,
        name: &'a str,
    },
    /// The embedder's applier rejected the case. The sweep continues unless
    /// configured to halt.
    ApplyFailed {
        index: usize,
        count: usize,
        error: &'a ApplyError,
    },
    /// The plan is exhausted.
    Finished { count: usize },
}

/// Sink for sweep progress. Implementations must be infallible; a reporting
/// problem must never interrupt the sweep.
pub trait Reporter {
    fn report(&mut self, event: SweepEvent<'_>);
}

/// Reporter that writes progress through `tracing`, one line per event, in the
/// `[3/12] aa_msaa4` shape.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: SweepEvent<'_>) {
        match event {
            SweepEvent::CaseStarted { index, count, name } => {
                tracing::info!("[{}/{}] {}", index + 1, count, name);
            }
            SweepEvent::ReadyToCapture { index, count, name } => {
                tracing::info!("[{}/{}] {} ready to capture", index + 1, count, name);
            }
            SweepEvent::ApplyFailed {
                index,
                count,
                error,
            } => {
                tracing::warn!("[{}/{}] {}", index + 1, count, error);
            }
            SweepEvent::Finished { count } => {
                tracing::info!("sweep finished ({count} cases)");
            }
        }
    }
}

/// Reporter that discards everything; wired when `verbose` is off.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: SweepEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collecting(Vec<String>);

    impl Reporter for Collecting {
        fn report(&mut self, event: SweepEvent<'_>) {
            self.0.push(format!("{event:?}"));
        }
    }

    #[test]
    fn events_carry_one_based_display_index() {
        // LogReporter formats index+1; the event itself stays zero-based.
        let event = SweepEvent::CaseStarted {
            index: 0,
            count: 3,
            name: "first",
        };
        let mut sink = Collecting::default();
        sink.report(event);
        assert!(sink.0[0].contains("index: 0"));
    }

    #[test]
    fn null_reporter_is_a_no_op() {
        let mut reporter = NullReporter;
        reporter.report(SweepEvent::Finished { count: 0 });
    }
}
