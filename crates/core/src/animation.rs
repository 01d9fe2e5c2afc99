use crate::transform::ViewTransform;

/// How long a click-to-focus transition takes, in seconds.
pub const FOCUS_DURATION: f64 = 0.75;
/// How long the hover fill fades, in seconds.
pub const HOVER_FADE_DURATION: f64 = 0.2;
/// Frame gaps longer than this are treated as this long.
const MAX_FRAME_DELTA: f64 = 0.25;

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t).mul_add(t, 2.0) / 2.0
    }
}

/// Progress of an animation driven by frame ticks.
///
/// The first tick only records the clock; elapsed time then grows by the
/// clamped gap between ticks, so a stalled frame never skips the animation
/// and a clock going backwards never reverses it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    elapsed: f64,
    last_tick: Option<f64>,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            elapsed: 0.0,
            last_tick: None,
        }
    }

    pub fn advance(&mut self, now_seconds: f64) -> f64 {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));
        self.elapsed += delta;
        self.last_tick = Some(now_seconds);
        self.elapsed
    }

    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Eased transition between two view transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusAnimation {
    from: ViewTransform,
    to: ViewTransform,
    duration: f64,
    clock: Clock,
}

impl FocusAnimation {
    pub const fn new(from: ViewTransform, to: ViewTransform) -> Self {
        Self {
            from,
            to,
            duration: FOCUS_DURATION,
            clock: Clock::new(),
        }
    }

    pub const fn target(&self) -> ViewTransform {
        self.to
    }

    /// Transform at the current progress, without advancing.
    pub fn current(&self) -> ViewTransform {
        if self.is_finished() {
            return self.to;
        }
        let t = ease_cubic_in_out(self.clock.elapsed() / self.duration);
        self.from.lerp(&self.to, t)
    }

    /// Advance to `now_seconds` and return the transform to display.
    pub fn advance(&mut self, now_seconds: f64) -> ViewTransform {
        self.clock.advance(now_seconds);
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.elapsed() >= self.duration
    }
}

/// Hover fill intensity in `[0, 1]` that fades toward on or off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    level: f64,
    rising: bool,
    last_tick: Option<f64>,
}

impl Fade {
    pub const fn rising() -> Self {
        Self {
            level: 0.0,
            rising: true,
            last_tick: None,
        }
    }

    pub fn set_rising(&mut self, rising: bool) {
        self.rising = rising;
    }

    pub fn advance(&mut self, now_seconds: f64) -> f64 {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));
        self.last_tick = Some(now_seconds);
        let step = delta / HOVER_FADE_DURATION;
        self.level = if self.rising {
            (self.level + step).min(1.0)
        } else {
            (self.level - step).max(0.0)
        };
        self.level
    }

    pub const fn level(&self) -> f64 {
        self.level
    }

    pub fn is_gone(&self) -> bool {
        !self.rising && self.level <= 0.0
    }
}
