//! Paint-pass outcomes.
//!
//! Views never fail a paint: when something is off they draw what they can
//! and report a [`PaintOutcome::Degraded`] to the scene's [`DiagnosticsSink`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintOutcome {
    Ok,
    /// Drawn with a fallback; the reason says what was skipped.
    Degraded(String),
}

impl PaintOutcome {
    pub fn degraded(reason: impl Into<String>) -> Self {
        PaintOutcome::Degraded(reason.into())
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, PaintOutcome::Ok)
    }

    /// Keeps the first degradation.
    #[must_use]
    pub fn and(self, other: PaintOutcome) -> PaintOutcome {
        match self {
            PaintOutcome::Ok => other,
            degraded => degraded,
        }
    }
}

impl fmt::Display for PaintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintOutcome::Ok => f.write_str("ok"),
            PaintOutcome::Degraded(reason) => write!(f, "degraded: {reason}"),
        }
    }
}

/// Receives the outcome of every reporting view's paint pass.
pub trait DiagnosticsSink {
    fn report(&self, view: &str, outcome: &PaintOutcome);
}

/// Logs a warning when a view starts degrading and an info line when it
/// recovers. Repeats of the same outcome are not logged again.
#[derive(Debug, Default)]
pub struct LogSink {
    last: RefCell<HashMap<String, PaintOutcome>>,
}

impl DiagnosticsSink for LogSink {
    fn report(&self, view: &str, outcome: &PaintOutcome) {
        let mut last = self.last.borrow_mut();
        let previous = last.get(view);
        if previous == Some(outcome) || (previous.is_none() && outcome.is_ok()) {
            return;
        }
        match outcome {
            PaintOutcome::Degraded(reason) => log::warn!("{view}: paint degraded: {reason}"),
            PaintOutcome::Ok => log::info!("{view}: paint recovered"),
        }
        last.insert(view.to_string(), outcome.clone());
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: RefCell<Vec<(String, PaintOutcome)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, PaintOutcome)> {
        self.reports.borrow().clone()
    }

    /// Reasons of degraded reports, in order.
    pub fn degraded(&self) -> Vec<String> {
        self.reports
            .borrow()
            .iter()
            .filter_map(|(_, o)| match o {
                PaintOutcome::Degraded(reason) => Some(reason.clone()),
                PaintOutcome::Ok => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.reports.borrow_mut().clear();
    }
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, view: &str, outcome: &PaintOutcome) {
        self.reports.borrow_mut().push((view.to_string(), outcome.clone()));
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Rc<S> {
    fn report(&self, view: &str, outcome: &PaintOutcome) {
        (**self).report(view, outcome)
    }
}
