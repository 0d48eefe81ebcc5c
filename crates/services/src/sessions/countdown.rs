/// Identifies one started countdown.
///
/// A handle stays valid until its countdown expires, is cancelled, or is
/// replaced by a newer one. Ticks carrying any other handle are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownHandle {
    generation: u64,
    question: usize,
}

impl CountdownHandle {
    /// Index of the question whose feedback started this countdown.
    #[must_use]
    pub fn question(&self) -> usize {
        self.question
    }
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    Stale,
    Running { remaining: u32 },
    Expired,
}

/// Cancellable countdown driven by explicit ticks.
///
/// Real time only enters through whoever calls `tick`, so tests step it one
/// unit at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    start: u32,
    remaining: u32,
    active: Option<CountdownHandle>,
    generation: u64,
}

impl Countdown {
    #[must_use]
    pub fn new(start: u32) -> Self {
        Self {
            start,
            remaining: start,
            active: None,
            generation: 0,
        }
    }

    /// Start counting for `question`, cancelling any pending countdown.
    pub(crate) fn start(&mut self, question: usize) -> CountdownHandle {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let handle = CountdownHandle {
            generation: self.generation,
            question,
        };
        self.active = Some(handle);
        handle
    }

    /// Stop ticking and reset to the starting value.
    pub(crate) fn cancel(&mut self) -> Option<CountdownHandle> {
        self.remaining = self.start;
        self.active.take()
    }

    pub(crate) fn tick(&mut self, handle: CountdownHandle) -> Tick {
        if self.active != Some(handle) {
            return Tick::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.cancel();
            Tick::Expired
        } else {
            Tick::Running {
                remaining: self.remaining,
            }
        }
    }

    #[must_use]
    pub fn active(&self) -> Option<CountdownHandle> {
        self.active
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_start_ticks_and_resets() {
        let mut countdown = Countdown::new(3);
        let handle = countdown.start(0);

        assert_eq!(countdown.tick(handle), Tick::Running { remaining: 2 });
        assert_eq!(countdown.tick(handle), Tick::Running { remaining: 1 });
        assert_eq!(countdown.tick(handle), Tick::Expired);

        assert!(!countdown.is_running());
        assert_eq!(countdown.remaining(), 3);
        assert_eq!(countdown.tick(handle), Tick::Stale);
    }

    #[test]
    fn restart_invalidates_previous_handle() {
        let mut countdown = Countdown::new(5);
        let first = countdown.start(0);
        let _ = countdown.tick(first);
        let second = countdown.start(1);

        assert_ne!(first, second);
        assert_eq!(countdown.remaining(), 5);
        assert_eq!(countdown.tick(first), Tick::Stale);
        assert_eq!(countdown.tick(second), Tick::Running { remaining: 4 });
        assert_eq!(second.question(), 1);
    }

    #[test]
    fn cancel_stops_ticking() {
        let mut countdown = Countdown::new(2);
        let handle = countdown.start(4);
        assert_eq!(countdown.cancel(), Some(handle));
        assert_eq!(countdown.tick(handle), Tick::Stale);
        assert_eq!(countdown.cancel(), None);
    }
}
