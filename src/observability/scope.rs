//! Start/complete logging around one command

use std::time::Instant;

use super::logger::{Logger, Severity};

/// Logs `{name}_BEGIN` on creation and `{name}_COMPLETE` or `{name}_FAILED`
/// when finished. A scope dropped without either logs `{name}_INCOMPLETE`.
///
/// Completion lines carry an `elapsed_ms` field.
pub struct ObservationScope {
    name: &'static str,
    started: Instant,
    finished: bool,
}

impl ObservationScope {
    pub fn new(name: &'static str) -> Self {
        Logger::trace(&format!("{}_BEGIN", name), &[]);
        Self {
            name,
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, fields: &[(&str, &str)]) {
        self.finish(Severity::Info, "COMPLETE", fields);
    }

    pub fn fail(mut self, reason: &str) {
        self.finish(Severity::Error, "FAILED", &[("reason", reason)]);
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    fn finish(&mut self, severity: Severity, suffix: &str, fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms().to_string();
        let mut all_fields: Vec<(&str, &str)> = fields.to_vec();
        all_fields.push(("elapsed_ms", elapsed.as_str()));
        Logger::log(severity, &format!("{}_{}", self.name, suffix), &all_fields);
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_complete() {
        let scope = ObservationScope::new("TEST");
        scope.complete_with_fields(&[("queries", "2")]);
    }

    #[test]
    fn test_scope_fail() {
        ObservationScope::new("TEST").fail("bad input");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        assert!(scope.elapsed_ms() < 60_000);
        drop(scope);
    }
}
