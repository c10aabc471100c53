//! Parameter smoothing over a fixed number of steps.

/// Trajectory of a [`RampedValue`] between its current value and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    /// Constant increment per step.
    Linear,
    /// Constant factor per step; values must stay positive.
    Exponential,
}

/// A control value that approaches each new target over a fixed number of
/// steps instead of jumping.
///
/// Advancing past the last step snaps to the exact target, so the
/// accumulated floating-point error of the incremental updates never leaks
/// into the settled value.
#[derive(Debug, Clone)]
pub struct RampedValue {
    kind: RampKind,
    value: f64,
    target: f64,
    steps: u32,
    count_down: u32,
    increment: f64,
}

impl RampedValue {
    /// Creates a settled value that will ramp over `steps` steps.
    ///
    /// Exponential ramps require a positive starting value.
    pub fn new(kind: RampKind, value: f64, steps: u32) -> Self {
        debug_assert!(
            kind == RampKind::Linear || value > 0.0,
            "value needs to be positive for exponential ramping"
        );
        Self {
            kind,
            value,
            target: value,
            steps,
            count_down: 0,
            increment: 0.0,
        }
    }

    /// The current value without advancing.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Advances one step and returns the new value.
    #[inline]
    pub fn next_value(&mut self) -> f64 {
        if self.count_down == 0 {
            // Snap: the incremental updates may be slightly imprecise.
            self.value = self.target;
            return self.value;
        }
        self.count_down -= 1;
        match self.kind {
            RampKind::Linear => self.value += self.increment,
            RampKind::Exponential => self.value *= self.increment,
        }
        self.value
    }

    /// Sets a new target, returning whether any ramping is needed.
    pub fn set(&mut self, target: f64) -> bool {
        self.target = target;
        if self.steps == 0 || self.value == target {
            self.value = target;
            self.count_down = 0;
            return false;
        }
        match self.kind {
            RampKind::Linear => {
                self.increment = (target - self.value) / self.steps as f64;
            }
            RampKind::Exponential => {
                debug_assert!(
                    self.value > 0.0 && target > 0.0,
                    "value needs to be positive for exponential ramping"
                );
                self.increment = (target / self.value).powf(1.0 / self.steps as f64);
            }
        }
        self.count_down = self.steps;
        true
    }

    /// Jumps to `value` without ramping.
    pub fn set_immediately(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.count_down = 0;
    }

    /// Sets the step count for subsequent targets.
    pub fn set_steps(&mut self, steps: u32) {
        self.steps = steps;
    }

    /// Sets the step count from a duration in milliseconds.
    pub fn set_time(&mut self, milliseconds: f64, sample_rate: f64) {
        debug_assert!(milliseconds >= 0.0 && sample_rate > 0.0);
        self.steps = (milliseconds / 1000.0 * sample_rate) as u32;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_ramping(&self) -> bool {
        self.count_down > 0
    }

    pub fn kind(&self) -> RampKind {
        self.kind
    }
}
