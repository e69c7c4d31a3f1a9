/// Per-individual elapsed-time counter bounded to `[reset_value, timeout]`.
///
/// The timer starts at `reset_value` rather than zero, so a time bonus of the form
/// `k / value` stays finite right after a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoppableTimer {
    value: f64,
    reset_value: f64,
    timeout: f64,
}

impl StoppableTimer {
    /// # Panics
    ///
    /// Panics unless `0 < reset_value <= timeout`.
    #[must_use]
    pub fn new(reset_value: f64, timeout: f64) -> Self {
        assert!(reset_value > 0.0, "timer reset value must be positive");
        assert!(
            reset_value <= timeout,
            "timer reset value {reset_value} exceeds timeout {timeout}"
        );
        Self {
            value: reset_value,
            reset_value,
            timeout,
        }
    }

    /// Advances the timer by `dt`, saturating at the timeout.
    ///
    /// Returns `true` once the timer is stopped.
    pub fn advance(&mut self, dt: f64) -> bool {
        if self.value + dt >= self.timeout {
            self.value = self.timeout;
            return true;
        }
        self.value += dt;
        false
    }

    pub fn reset(&mut self) {
        self.value = self.reset_value;
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.value >= self.timeout
    }
}
