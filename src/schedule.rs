//! Several named timers polled from one control loop

use std::fmt;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::time::{Clock, ResetMode, Timer};

/// How a scheduled timer reports that its interval has passed
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fire on every interval, restarting each time
    #[default]
    Repeat,
    /// Fire once, then stay quiet until re-armed
    Once,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Repeat => write!(f, "repeat"),
            Mode::Once => write!(f, "once"),
        }
    }
}

/// A timer firing during [`Schedule::poll`]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Event {
    pub name: String,
    pub mode: Mode,
    /// Clock reading when the firing was observed
    pub at_ms: u32,
}

/// What a scheduled timer reports right now
///
/// Numeric fields come from the gated queries, so a disabled timer shows
/// its disabled value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TimerStatus {
    pub name: String,
    pub mode: Mode,
    pub enabled: bool,
    pub duration: u32,
    pub elapsed: u32,
    pub remaining: u32,
}

#[derive(Debug)]
struct Entry<C> {
    name: String,
    mode: Mode,
    timer: Timer<C>,
}

/// Named timers sharing one clock
#[derive(Debug)]
pub struct Schedule<C> {
    clock: C,
    entries: Vec<Entry<C>>,
}

impl<C: Clock + Clone> Schedule<C> {
    /// Create an empty schedule
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            entries: Vec::new(),
        }
    }

    /// Create a schedule with every timer in the config, all starting now
    pub fn from_config(config: &Config, clock: C) -> Self {
        let mut schedule = Self::new(clock);

        for timer_config in &config.timers {
            let timer = timer_config.build(schedule.clock.clone());
            schedule.add(&timer_config.name, timer_config.mode, timer);
        }

        schedule
    }

    /// Add a timer under `name`
    pub fn add(&mut self, name: &str, mode: Mode, timer: Timer<C>) {
        debug!("scheduling {} ({})", name, mode);

        self.entries.push(Entry {
            name: name.to_string(),
            mode,
            timer,
        });
    }

    /// Number of scheduled timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Poll every timer once, in the order they were added
    pub fn poll(&mut self) -> Vec<Event> {
        let at_ms = self.clock.now_ms();
        let mut events = Vec::new();

        for entry in self.entries.iter_mut() {
            let fired = match entry.mode {
                Mode::Repeat => entry.timer.triggered(ResetMode::Restart),
                Mode::Once => entry.timer.first_trigger(),
            };

            if fired {
                debug!("{} fired at {}ms", entry.name, at_ms);

                events.push(Event {
                    name: entry.name.clone(),
                    mode: entry.mode,
                    at_ms,
                });
            }
        }

        events
    }

    /// Look up a timer by name
    pub fn get(&self, name: &str) -> Result<&Timer<C>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.timer)
            .with_context(|| format!("No timer named {}", name))
    }

    /// Look up a timer by name for changes
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Timer<C>> {
        self.entries
            .iter_mut()
            .find(|entry| entry.name == name)
            .map(|entry| &mut entry.timer)
            .with_context(|| format!("No timer named {}", name))
    }

    /// Flip a timer between enabled and disabled
    pub fn toggle(&mut self, name: &str) -> Result<()> {
        let timer = self.get_mut(name)?;
        timer.negate_state();

        debug!("{} is now {}", name, if timer.is_enabled() { "enabled" } else { "disabled" });

        Ok(())
    }

    /// Restart a timer's interval, letting a `once` timer fire again
    pub fn rearm(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.reset();

        Ok(())
    }

    /// Report the state of every timer
    pub fn snapshot(&self) -> Vec<TimerStatus> {
        self.entries
            .iter()
            .map(|entry| TimerStatus {
                name: entry.name.clone(),
                mode: entry.mode,
                enabled: entry.timer.is_enabled(),
                duration: entry.timer.duration(),
                elapsed: entry.timer.time_since_last_reset(),
                remaining: entry.timer.time_until_trigger(),
            })
            .collect()
    }
}
