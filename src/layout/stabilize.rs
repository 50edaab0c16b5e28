use std::time::Duration;

/// Hard wall-clock budget after which the layout is frozen.
#[derive(Clone, Debug)]
pub struct Stabilizer {
    budget: Duration,
    elapsed: Duration,
    frozen: bool,
}

impl Stabilizer {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            elapsed: Duration::ZERO,
            frozen: false,
        }
    }

    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.frozen = false;
    }

    /// Advances the clock; returns `true` exactly once, when the budget runs out.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.frozen {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.budget {
            self.frozen = true;
            return true;
        }
        false
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_budget() {
        let mut stabilizer = Stabilizer::new(Duration::from_secs(3));
        assert!(!stabilizer.advance(Duration::from_millis(2_999)));
        assert!(stabilizer.advance(Duration::from_millis(1)));
        assert!(stabilizer.is_frozen());
        assert!(!stabilizer.advance(Duration::from_secs(10)));
        assert_eq!(stabilizer.remaining(), Duration::ZERO);
    }

    #[test]
    fn restart_resets_clock() {
        let mut stabilizer = Stabilizer::new(Duration::from_secs(3));
        stabilizer.advance(Duration::from_secs(5));
        stabilizer.restart();
        assert!(!stabilizer.is_frozen());
        assert_eq!(stabilizer.elapsed(), Duration::ZERO);
        assert_eq!(stabilizer.remaining(), Duration::from_secs(3));
    }
}
