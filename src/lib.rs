//! Non-blocking interval timers for cooperative control loops
//!
//! A [`Timer`] is polled rather than waited on: the loop asks whether the
//! interval has passed and carries on with other work either way. Time comes
//! from an injected [`Clock`](time::Clock) reading a wrapping `u32`
//! millisecond counter, so timers keep working across counter rollover and
//! can be driven by a [`MockClock`](time::MockClock) in tests.
//!
//! ```
//! use polltimer::time::{MockClock, ResetMode, Timer};
//!
//! let clock = MockClock::new();
//! let mut timer = Timer::with_clock(clock.clone(), 1000);
//!
//! assert!(!timer.triggered(ResetMode::Keep));
//!
//! clock.advance(1000);
//! assert!(timer.triggered(ResetMode::Keep));
//! assert_eq!(timer.time_until_trigger(), 0);
//!
//! timer.reset();
//! assert_eq!(timer.time_since_last_reset(), 0);
//! ```

pub mod config;
pub mod hooks;
pub mod schedule;
pub mod shorthand;
pub mod time;

pub use config::{default_config_path, Config, TimerConfig};
pub use schedule::{Event, Mode, Schedule, TimerStatus};
pub use time::{ResetMode, Timer};
