//! Debug sink for per-stage score explanations.
//!
//! Stages record `(subject, delta, reason)` tuples while they run. With
//! debug mode off the sink is a no-op, so explanation strings are never even
//! built; either way the numeric results are unaffected.

use serde::Serialize;
use std::collections::BTreeMap;

/// One recorded explanation: the weight delta a stage applied and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub weight: f64,
    pub reason: String,
}

/// Receiver for stage explanations, keyed by subject (garment slug).
pub trait DebugSink {
    /// Whether recording is live. Stages use this to skip building reason
    /// strings when nobody is listening.
    fn enabled(&self) -> bool;

    fn record(&mut self, subject: &str, delta: f64, reason: String);
}

/// Sink used when debug mode is off: discards everything.
pub struct NoopDebugSink;

impl DebugSink for NoopDebugSink {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _subject: &str, _delta: f64, _reason: String) {}
}

/// Collecting sink used when debug mode is on. One log exists per stage per
/// recommendation request.
#[derive(Debug, Default)]
pub struct DebugLog {
    entries: BTreeMap<String, Vec<Explanation>>,
}

impl DebugLog {
    pub fn new() -> DebugLog {
        DebugLog::default()
    }

    /// The explanations recorded for a subject, in recording order.
    pub fn for_subject(&self, subject: &str) -> Vec<Explanation> {
        self.entries.get(subject).cloned().unwrap_or_default()
    }
}

impl DebugSink for DebugLog {
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, subject: &str, delta: f64, reason: String) {
        self.entries
            .entry(subject.to_string())
            .or_default()
            .push(Explanation {
                weight: delta,
                reason,
            });
    }
}
