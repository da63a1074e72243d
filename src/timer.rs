/// Whole seconds elapsed in the current session. Driven externally by a
/// one-second tick; it has no clock of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    elapsed: u32,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to zero and starts counting.
    pub fn restart(&mut self) {
        self.elapsed = 0;
        self.running = true;
    }

    /// Freezes the current value.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances one second. Returns false (and does nothing) when stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        true
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// `Time: m:ss`, minutes unpadded.
pub fn format_elapsed(secs: u32) -> String {
    format!("Time: {}:{:02}", secs / 60, secs % 60)
}
