use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Supplies a monotonic "now" in seconds.
///
/// Injected into the [`Clock`] at construction so a whole scene shares one
/// time base and tests can drive time by hand.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Debug)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven time source for tests and deterministic playback.
///
/// Cloning yields a handle onto the same underlying time, so a test can keep
/// one handle while the clock owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: f64) {
        self.now.set(t);
    }

    pub fn advance(&self, dt: f64) {
        self.now.set(self.now.get() + dt);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// When a step (or a batch of steps) should begin.
///
/// `SyncNow` is the default: every resolution between two frame ticks yields
/// the identical instant, so independent `start` calls still begin in
/// lockstep.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StartTime {
    /// First `now()` sampled since the current frame began; cached so later
    /// resolutions in the same frame agree exactly.
    #[default]
    SyncNow,
    /// The time source's current instant, sampled fresh.
    Now,
    /// Wait for the next frame tick; the step starts at that frame's time.
    NextFrame,
    /// The previous frame's tick time (falls back to now before any frame).
    PreviousFrame,
    /// A literal instant on the clock's time base.
    At(f64),
}

/// The scene's shared time base plus per-frame bookkeeping.
pub struct Clock {
    source: Box<dyn TimeSource>,
    current_frame: Option<f64>,
    previous_frame: Option<f64>,
    sync_now: Cell<Option<f64>>,
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("current_frame", &self.current_frame)
            .field("previous_frame", &self.previous_frame)
            .field("sync_now", &self.sync_now.get())
            .finish()
    }
}

impl Clock {
    pub fn new(source: Box<dyn TimeSource>) -> Self {
        Self {
            source,
            current_frame: None,
            previous_frame: None,
            sync_now: Cell::new(None),
        }
    }

    /// Clock over the system monotonic time.
    pub fn system() -> Self {
        Self::new(Box::new(SystemTimeSource::new()))
    }

    /// Clock over a hand-driven source; returns the driving handle.
    pub fn manual() -> (Self, ManualTimeSource) {
        let source = ManualTimeSource::new();
        (Self::new(Box::new(source.clone())), source)
    }

    pub fn now(&self) -> f64 {
        self.source.now()
    }

    /// Record a frame boundary. Returns the frame's time.
    pub(crate) fn begin_frame(&mut self) -> f64 {
        let now = self.source.now();
        self.previous_frame = self.current_frame;
        self.current_frame = Some(now);
        self.sync_now.set(None);
        now
    }

    pub fn previous_frame_time(&self) -> Option<f64> {
        self.previous_frame
    }

    /// First call since the last frame boundary samples and caches `now()`;
    /// subsequent calls return the identical value.
    pub fn synchronized_now(&self) -> f64 {
        match self.sync_now.get() {
            Some(t) => t,
            None => {
                let t = self.now();
                self.sync_now.set(Some(t));
                t
            }
        }
    }

    /// Resolve a start-time anchor to a concrete instant, or `None` for
    /// "wait for the next frame".
    pub fn resolve(&self, when: StartTime) -> Option<f64> {
        match when {
            StartTime::At(t) => Some(t),
            StartTime::Now => Some(self.now()),
            StartTime::SyncNow => Some(self.synchronized_now()),
            StartTime::PreviousFrame => Some(self.previous_frame.unwrap_or_else(|| self.now())),
            StartTime::NextFrame => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronized_now_is_stable_within_a_frame() {
        let (mut clock, time) = Clock::manual();
        clock.begin_frame();
        time.set(1.0);
        let a = clock.resolve(StartTime::SyncNow).unwrap();
        time.set(2.0);
        let b = clock.resolve(StartTime::SyncNow).unwrap();
        assert_eq!(a, b);

        time.set(3.0);
        clock.begin_frame();
        let c = clock.resolve(StartTime::SyncNow).unwrap();
        assert_eq!(c, 3.0);
    }

    #[test]
    fn previous_frame_anchor_tracks_frame_boundaries() {
        let (mut clock, time) = Clock::manual();
        time.set(1.0);
        clock.begin_frame();
        time.set(2.0);
        clock.begin_frame();
        assert_eq!(clock.resolve(StartTime::PreviousFrame), Some(1.0));
    }

    #[test]
    fn next_frame_resolves_to_none() {
        let (clock, _) = Clock::manual();
        assert_eq!(clock.resolve(StartTime::NextFrame), None);
        assert_eq!(clock.resolve(StartTime::At(4.5)), Some(4.5));
    }

    #[test]
    fn manual_source_handles_share_time() {
        let (clock, time) = Clock::manual();
        time.advance(2.5);
        assert_eq!(clock.now(), 2.5);
    }
}
