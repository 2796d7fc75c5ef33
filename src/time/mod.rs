mod clock;
#[doc(hidden)]
pub mod duration;
pub mod human;

pub use clock::{Clock, FnClock, MockClock, SystemClock};
pub use human::MillisExt;

use log::{debug, trace};

/// Whether a call should restart the interval
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum ResetMode {
    /// Restart the interval from the current clock reading
    Restart,
    /// Leave the start point where it is
    Keep,
}

/// Like a kitchen timer that never makes you wait
///
/// A `Timer` remembers when it was last reset and how long its interval is.
/// Instead of sleeping, the control loop polls it and carries on with other
/// work when the interval has not passed yet.
///
/// All arithmetic is done on the clock's wrapping `u32` millisecond counter,
/// so elapsed time stays correct across a counter rollover as long as no
/// more than one full wrap happens between reset and poll.
///
/// While disabled, every trigger query answers `false`, every numeric query
/// answers [`Timer::disabled_value`], and the mutators do nothing.
/// [`Timer::is_enabled`] and the enable switches are never affected.
///
/// ```
/// use polltimer::time::{MockClock, ResetMode, Timer};
///
/// let clock = MockClock::new();
/// let mut blink = Timer::with_clock(clock.clone(), 500);
///
/// assert!(!blink.triggered(ResetMode::Restart));
///
/// clock.advance(500);
/// assert!(blink.triggered(ResetMode::Restart));
/// assert_eq!(blink.time_since_last_reset(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Timer<C = SystemClock> {
    clock: C,
    duration: u32,
    started_at: u32,
    enabled: bool,
    latched: bool,
    disabled_value: u32,
}

impl Timer<SystemClock> {
    /// Create a timer running on the system clock
    pub fn new(duration: u32) -> Self {
        Self::with_clock(SystemClock, duration)
    }

    /// Create a timer running on the system clock that reports
    /// `disabled_value` from numeric queries while disabled
    pub fn new_with_disabled_value(duration: u32, disabled_value: u32) -> Self {
        Self::with_clock_and_disabled_value(SystemClock, duration, disabled_value)
    }
}

impl<C: Clock> Timer<C> {
    /// Create a timer reading time from `clock`
    pub fn with_clock(clock: C, duration: u32) -> Self {
        Self::with_clock_and_disabled_value(clock, duration, 0)
    }

    /// Create a timer reading time from `clock` that reports
    /// `disabled_value` from numeric queries while disabled
    pub fn with_clock_and_disabled_value(clock: C, duration: u32, disabled_value: u32) -> Self {
        let started_at = clock.now_ms();

        Self {
            clock,
            duration,
            started_at,
            enabled: true,
            latched: false,
            disabled_value,
        }
    }

    /// Get the clock this timer reads
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Milliseconds since the last reset
    pub fn time_since_last_reset(&self) -> u32 {
        if !self.enabled {
            return self.disabled_value;
        }

        self.ticks_since_start()
    }

    /// Milliseconds left before the interval passes, zero once it has
    pub fn time_until_trigger(&self) -> u32 {
        if !self.enabled {
            return self.disabled_value;
        }

        self.duration.saturating_sub(self.ticks_since_start())
    }

    /// Get the length of the interval
    pub fn duration(&self) -> u32 {
        if !self.enabled {
            return self.disabled_value;
        }

        self.duration
    }

    /// Check if the interval has passed
    ///
    /// With [`ResetMode::Restart`], a positive answer also resets the timer,
    /// so the next `true` comes one full interval later. With
    /// [`ResetMode::Keep`], the answer stays `true` on every poll until
    /// something else resets the timer.
    pub fn triggered(&mut self, mode: ResetMode) -> bool {
        if !self.enabled || !self.interval_passed() {
            return false;
        }

        trace!("timer fired after {}ms", self.ticks_since_start());
        self.apply(mode);

        true
    }

    /// Check if the interval is still running
    ///
    /// This is not a plain negation of [`Timer::triggered`]: a disabled
    /// timer is neither triggered nor not triggered, so both answer `false`.
    pub fn not_triggered(&self) -> bool {
        self.enabled && !self.interval_passed()
    }

    /// Check if the interval has passed, answering `true` only once
    ///
    /// The first poll after the interval passes returns `true` and latches.
    /// Every later poll returns `false` until [`Timer::reset`] re-arms it.
    pub fn first_trigger(&mut self) -> bool {
        if !self.enabled || self.latched {
            return false;
        }

        if self.interval_passed() {
            trace!("one-shot timer latched after {}ms", self.ticks_since_start());
            self.latched = true;
            return true;
        }

        false
    }

    /// Start a new interval from now and re-arm [`Timer::first_trigger`]
    pub fn reset(&mut self) {
        if self.enabled {
            self.rearm();
        }
    }

    /// Change the length of the interval
    pub fn set_duration(&mut self, duration: u32, mode: ResetMode) {
        if !self.enabled {
            return;
        }

        self.duration = duration;
        self.apply(mode);
    }

    /// Lengthen the interval, saturating at `u32::MAX`
    pub fn add_time(&mut self, delta: u32, mode: ResetMode) {
        if !self.enabled {
            return;
        }

        self.duration = self.duration.saturating_add(delta);
        self.apply(mode);
    }

    /// Shorten the interval, stopping at zero
    pub fn take_time(&mut self, delta: u32, mode: ResetMode) {
        if !self.enabled {
            return;
        }

        self.duration = self.duration.saturating_sub(delta);
        self.apply(mode);
    }

    /// Resume reporting from the interval and start point kept while disabled
    pub fn enable(&mut self) {
        debug!("timer enabled");
        self.enabled = true;
    }

    /// Stop reporting activity without touching the interval or its start
    pub fn disable(&mut self) {
        debug!("timer disabled");
        self.enabled = false;
    }

    /// Check the enabled flag, which is never substituted
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip between enabled and disabled
    pub fn negate_state(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Get the value numeric queries report while disabled
    pub fn disabled_value(&self) -> u32 {
        self.disabled_value
    }

    /// Set the value numeric queries report while disabled
    pub fn set_disabled_value(&mut self, disabled_value: u32) {
        self.disabled_value = disabled_value;
    }

    fn ticks_since_start(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.started_at)
    }

    fn interval_passed(&self) -> bool {
        self.ticks_since_start() >= self.duration
    }

    fn apply(&mut self, mode: ResetMode) {
        if mode == ResetMode::Restart {
            self.rearm();
        }
    }

    fn rearm(&mut self) {
        self.started_at = self.clock.now_ms();
        self.latched = false;
        trace!("timer restarted at {}ms", self.started_at);
    }
}

#[cfg(test)]
mod test {
    use super::{Clock, MockClock, ResetMode, Timer};

    fn timer(duration: u32) -> (MockClock, Timer<MockClock>) {
        let clock = MockClock::new();
        let timer = Timer::with_clock(clock.clone(), duration);

        (clock, timer)
    }

    #[test]
    fn fresh_timer_has_not_triggered() {
        let (_clock, mut timer) = timer(1000);

        assert_eq!(timer.time_since_last_reset(), 0);
        assert!(!timer.triggered(ResetMode::Keep));
        assert!(timer.not_triggered());
        assert!(timer.is_enabled());
        assert_eq!(timer.disabled_value(), 0);
    }

    #[test]
    fn kitchen_scenario() {
        let (clock, mut timer) = timer(1000);

        assert!(!timer.triggered(ResetMode::Keep));

        clock.advance(1000);

        assert!(timer.triggered(ResetMode::Keep));
        assert_eq!(timer.time_until_trigger(), 0);

        timer.reset();

        assert_eq!(timer.time_since_last_reset(), 0);
    }

    #[test]
    fn keep_mode_stays_triggered_until_reset() {
        let (clock, mut timer) = timer(100);

        clock.advance(150);

        for _ in 0..5 {
            assert!(timer.triggered(ResetMode::Keep));
            clock.advance(10);
        }
        assert!(!timer.not_triggered());

        timer.reset();

        assert!(!timer.triggered(ResetMode::Keep));
        assert!(timer.not_triggered());
    }

    #[test]
    fn restart_mode_fires_once_per_interval() {
        let (clock, mut timer) = timer(100);

        clock.advance(99);
        assert!(!timer.triggered(ResetMode::Restart));

        clock.advance(1);
        assert!(timer.triggered(ResetMode::Restart));
        assert!(!timer.triggered(ResetMode::Restart));
        assert_eq!(timer.time_since_last_reset(), 0);

        clock.advance(40);
        assert_eq!(timer.time_since_last_reset(), 40);
        assert_eq!(timer.time_until_trigger(), 60);

        clock.advance(60);
        assert!(timer.triggered(ResetMode::Restart));
    }

    #[test]
    fn restart_is_relative_to_the_poll_not_the_deadline() {
        let (clock, mut timer) = timer(100);

        clock.advance(130);
        assert!(timer.triggered(ResetMode::Restart));

        clock.advance(99);
        assert!(!timer.triggered(ResetMode::Restart));
    }

    #[test]
    fn first_trigger_fires_once_per_reset() {
        let (clock, mut timer) = timer(200);

        assert!(!timer.first_trigger());

        clock.advance(200);
        assert!(timer.first_trigger());
        assert!(!timer.first_trigger());

        clock.advance(1000);
        assert!(!timer.first_trigger());

        timer.reset();
        assert!(!timer.first_trigger());

        clock.advance(200);
        assert!(timer.first_trigger());
        assert!(!timer.first_trigger());
    }

    #[test]
    fn first_trigger_does_not_move_start() {
        let (clock, mut timer) = timer(200);

        clock.advance(250);
        assert!(timer.first_trigger());

        assert_eq!(timer.time_since_last_reset(), 250);
        assert!(timer.triggered(ResetMode::Keep));
    }

    #[test]
    fn time_until_trigger_saturates() {
        let (clock, timer) = timer(300);

        assert_eq!(timer.time_until_trigger(), 300);

        clock.advance(299);
        assert_eq!(timer.time_until_trigger(), 1);

        clock.advance(1);
        assert_eq!(timer.time_until_trigger(), 0);

        clock.advance(5000);
        assert_eq!(timer.time_until_trigger(), 0);
    }

    #[test]
    fn zero_duration_is_always_triggered() {
        let (_clock, mut timer) = timer(0);

        assert!(timer.triggered(ResetMode::Restart));
        assert!(timer.triggered(ResetMode::Restart));
        assert!(!timer.not_triggered());
    }

    #[test]
    fn disabled_timer_substitutes_and_ignores_mutators() {
        let clock = MockClock::new();
        let mut timer = Timer::with_clock_and_disabled_value(clock.clone(), 500, 42);

        timer.disable();

        assert_eq!(timer.duration(), 42);
        assert_eq!(timer.time_since_last_reset(), 42);
        assert_eq!(timer.time_until_trigger(), 42);
        assert!(!timer.triggered(ResetMode::Restart));
        assert!(!timer.is_enabled());

        clock.advance(300);
        timer.reset();
        timer.set_duration(10, ResetMode::Restart);
        timer.add_time(10, ResetMode::Restart);
        timer.take_time(10, ResetMode::Restart);

        timer.enable();

        assert_eq!(timer.duration(), 500);
        assert_eq!(timer.time_since_last_reset(), 300);
        assert_eq!(timer.time_until_trigger(), 200);
    }

    #[test]
    fn disabled_mutators_keep_latch() {
        let (clock, mut timer) = timer(100);

        clock.advance(100);
        assert!(timer.first_trigger());

        timer.disable();
        timer.reset();
        timer.set_duration(400, ResetMode::Restart);
        timer.add_time(50, ResetMode::Restart);
        timer.take_time(50, ResetMode::Restart);
        timer.enable();

        assert!(!timer.first_trigger());
        assert_eq!(timer.duration(), 100);
        assert_eq!(timer.time_since_last_reset(), 100);
    }

    #[test]
    fn disabled_timer_reports_no_activity() {
        let (clock, mut timer) = timer(100);

        clock.advance(100);
        timer.disable();

        assert!(!timer.triggered(ResetMode::Keep));
        assert!(!timer.triggered(ResetMode::Restart));
        assert!(!timer.not_triggered());
        assert!(!timer.first_trigger());

        timer.enable();

        assert!(timer.first_trigger());
        assert!(timer.triggered(ResetMode::Keep));
    }

    #[test]
    fn disabling_keeps_latch() {
        let (clock, mut timer) = timer(100);

        clock.advance(100);
        assert!(timer.first_trigger());

        timer.disable();
        timer.enable();

        assert!(!timer.first_trigger());
    }

    #[test]
    fn not_triggered_while_running() {
        let (clock, mut timer) = timer(100);

        timer.disable();
        assert!(!timer.not_triggered());

        timer.enable();
        assert!(timer.not_triggered());

        clock.advance(100);
        assert!(!timer.not_triggered());
    }

    #[test]
    fn negate_state_twice_restores() {
        let (_clock, mut timer) = timer(100);

        timer.negate_state();
        assert!(!timer.is_enabled());

        timer.negate_state();
        assert!(timer.is_enabled());
    }

    #[test]
    fn take_time_floors_at_zero() {
        let (_clock, mut timer) = timer(100);

        timer.take_time(40, ResetMode::Keep);
        assert_eq!(timer.duration(), 60);

        timer.take_time(1000, ResetMode::Keep);
        assert_eq!(timer.duration(), 0);
    }

    #[test]
    fn add_time_saturates() {
        let (_clock, mut timer) = timer(u32::MAX - 5);

        timer.add_time(10, ResetMode::Keep);

        assert_eq!(timer.duration(), u32::MAX);
    }

    #[test]
    fn duration_changes_reset_only_when_asked() {
        let (clock, mut timer) = timer(100);

        clock.advance(80);
        timer.add_time(50, ResetMode::Keep);
        assert_eq!(timer.time_since_last_reset(), 80);
        assert_eq!(timer.time_until_trigger(), 70);

        timer.set_duration(60, ResetMode::Keep);
        assert!(timer.triggered(ResetMode::Keep));

        timer.set_duration(60, ResetMode::Restart);
        assert_eq!(timer.time_since_last_reset(), 0);
        assert!(!timer.triggered(ResetMode::Keep));

        clock.advance(30);
        timer.take_time(10, ResetMode::Restart);
        assert_eq!(timer.duration(), 50);
        assert_eq!(timer.time_since_last_reset(), 0);
    }

    #[test]
    fn set_duration_rearms_latch() {
        let (clock, mut timer) = timer(100);

        clock.advance(100);
        assert!(timer.first_trigger());

        timer.set_duration(100, ResetMode::Restart);
        clock.advance(100);

        assert!(timer.first_trigger());
    }

    #[test]
    fn elapsed_survives_clock_wraparound() {
        let clock = MockClock::starting_at(u32::MAX - 100);
        let mut timer = Timer::with_clock(clock.clone(), 500);

        clock.advance(150);
        assert_eq!(clock.now_ms(), 49);

        assert_eq!(timer.time_since_last_reset(), 150);
        assert_eq!(timer.time_until_trigger(), 350);
        assert!(!timer.triggered(ResetMode::Keep));

        clock.advance(350);
        assert!(timer.triggered(ResetMode::Restart));
        assert_eq!(timer.time_since_last_reset(), 0);
    }

    #[test]
    fn set_disabled_value_applies_to_queries() {
        let (_clock, mut timer) = timer(100);

        timer.set_disabled_value(7);
        timer.disable();

        assert_eq!(timer.duration(), 7);
        assert_eq!(timer.disabled_value(), 7);
    }
}
