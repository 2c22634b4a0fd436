//! Narration lines shown to the player.

use std::collections::VecDeque;

use derive_more::Deref;

/// Bounded buffer of user-visible message lines.
///
/// Once the buffer is full, the oldest line is dropped for every new one.
#[derive(Clone, Debug, Deref)]
pub struct MsgLog {
    #[deref]
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for MsgLog {
    fn default() -> Self {
        MsgLog::new(100)
    }
}

impl MsgLog {
    pub fn new(capacity: usize) -> Self {
        MsgLog {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::trace!("msg: {line}");
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &str> + '_ {
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(n))
            .map(|s| s.as_str())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Format a line into a message log.
#[macro_export]
macro_rules! msg {
    ($log:expr; $($arg:tt)*) => {
        $log.push(format!($($arg)*))
    };
}
