use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);
const MAX_DISPLAY_SECS: u64 = 999;

/// Display clock for the HUD. Starts on the first reveal, stops when the game
/// ends and is cancelled by a restart. It never touches the board.
#[derive(Clone, Debug, Default)]
pub struct GameTimer {
    started: Option<Instant>,
    frozen: Option<Duration>,
    next_tick: Option<Instant>,
}

impl GameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Instant) {
        if self.started.is_some() { return; }
        self.started = Some(now);
        self.frozen = None;
        self.next_tick = Some(now + TICK);
    }

    /// Freezes the elapsed time; later ticks never fire.
    pub fn stop(&mut self, now: Instant) {
        if let Some(started) = self.started {
            if self.frozen.is_none() {
                self.frozen = Some(now.saturating_duration_since(started));
            }
        }
        self.next_tick = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// True when at least one whole tick elapsed since the previous poll.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(next) = self.next_tick else { return false };
        if now < next { return false; }
        let behind = now.duration_since(next).as_secs();
        self.next_tick = Some(next + TICK * (behind as u32 + 1));
        true
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started, self.frozen) {
            (_, Some(frozen)) => frozen,
            (Some(started), None) => now.saturating_duration_since(started),
            (None, None) => Duration::ZERO,
        }
    }

    /// Whole seconds capped at 999, zero-padded: "000".."999".
    pub fn display(&self, now: Instant) -> String {
        format!("{:03}", self.elapsed(now).as_secs().min(MAX_DISPLAY_SECS))
    }
}
