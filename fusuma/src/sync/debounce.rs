/// A single cancel-and-reschedule deadline on a virtual timeline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// (Re)arm: any pending deadline is replaced.
    pub fn trigger(&mut self, now_ms: u64) {
        self.trigger_after(now_ms, self.delay_ms);
    }

    pub fn trigger_after(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|d| d <= now_ms)
    }

    /// Disarm and return true if the deadline has passed.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrigger_pushes_deadline() {
        let mut d = Debouncer::new(300);
        d.trigger(1_000);
        d.trigger(1_200);
        assert_eq!(d.deadline(), Some(1_500));
        assert!(!d.is_due(1_499));
        assert!(d.take_due(1_500));
        assert!(!d.is_armed());
        assert!(!d.take_due(2_000));
    }

    #[test]
    fn test_cancel() {
        let mut d = Debouncer::new(300);
        d.trigger(0);
        d.cancel();
        assert!(!d.is_due(10_000));
    }

    #[test]
    fn test_trigger_after_custom_delay() {
        let mut d = Debouncer::new(300);
        d.trigger_after(100, 5_000);
        assert_eq!(d.deadline(), Some(5_100));
    }
}
