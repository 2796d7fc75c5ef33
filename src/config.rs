use std::{fs::read_to_string, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use colored::Colorize;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::hooks;
use crate::schedule::Mode;
use crate::time::{Clock, Timer};

/// Global configuration values
///
/// The configuration is stored in a TOML file in the current user's
/// config directory, which is `~/.config/polltimer/config.toml` by default.
///
/// A config can be loaded from a file with [`Config::load`].
/// You can also use [`Config::init`] to create a default config file if one
/// does not exist at the given path.
///
/// To save a config to the filesystem, use [`Config::save`].
///
/// ## File Format
///
/// The configuration file is written as a TOML file.
/// Durations may be written either as an integer count of milliseconds
/// or as a humanized string like `"1m30s"` or `"250ms"`.
///
/// ```toml
/// tick = "10ms"
///
/// [[timers]]
/// name = "blink"
/// duration = "500ms"
///
/// [[timers]]
/// name = "warmup"
/// duration = "5s"
/// mode = "once"
/// disabled_value = 0
/// enabled = true
/// ```
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Directory to find hook executables
    ///
    /// Default is a directory called `hooks` inside the config directory.
    /// Serialized as an absolute path.
    #[serde(default = "default_hooks_directory")]
    pub hooks_directory: PathBuf,
    /// How long the control loop waits between polls
    ///
    /// Default is 10 milliseconds.
    #[serde(default = "default_tick", with = "crate::time::duration::human")]
    pub tick: u32,
    /// Named timers polled by the control loop
    #[serde(default)]
    pub timers: Vec<TimerConfig>,
}

/// One named timer in the config file
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimerConfig {
    pub name: String,
    #[serde(with = "crate::time::duration::human")]
    pub duration: u32,
    /// Value reported by numeric queries while the timer is disabled
    #[serde(default)]
    pub disabled_value: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: Mode,
}

impl TimerConfig {
    /// Create an enabled, repeating timer config
    pub fn new(name: &str, duration: u32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            disabled_value: 0,
            enabled: true,
            mode: Mode::default(),
        }
    }

    /// Build the timer this entry describes, starting now on `clock`
    pub fn build<C: Clock>(&self, clock: C) -> Timer<C> {
        let mut timer = Timer::with_clock_and_disabled_value(clock, self.duration, self.disabled_value);

        if !self.enabled {
            timer.disable();
        }

        timer
    }
}

impl Config {
    /// Returns the current config, creating a default config file if one does not exist
    pub fn init(config_path: &Path) -> Result<Self> {
        if let Some(conf) = Config::load(config_path)? {
            Ok(conf)
        } else {
            let conf = Config::default();

            println!(
                "Creating config file at {}",
                config_path.display().to_string().cyan()
            );

            conf.save(config_path)?;

            Ok(conf)
        }
    }

    /// Reads a TOML config file
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            let config_str = read_to_string(path)
                .with_context(|| format!("Unable to read config file {}", path.display()))?;

            let conf: Self = toml::from_str(&config_str)
                .with_context(|| "Failed to parse config from TOML")?;

            conf.validate()
                .with_context(|| format!("Invalid config file {}", path.display()))?;

            Ok(Some(conf))
        } else {
            Ok(None)
        }
    }

    /// Check that every timer name can be used to name its hook
    pub fn validate(&self) -> Result<()> {
        for timer in self.timers.iter() {
            hooks::validate_name(&timer.name)?;
        }

        Ok(())
    }

    /// Write this config file to the filesystem
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string(&self)
            .with_context(|| "Unable to format config as TOML")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create config directory {}", parent.display()))?;
        }

        std::fs::write(path, toml)
            .with_context(|| format!("Unable to write config TOML to path {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut warmup = TimerConfig::new("warmup", 5000);
        warmup.mode = Mode::Once;

        Self {
            hooks_directory: default_hooks_directory(),
            tick: default_tick(),
            timers: vec![TimerConfig::new("heartbeat", 1000), warmup],
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "polltimer", "polltimer")
        .with_context(|| "Unable to determine XDG directories")
}

/// Get the default location of the config file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

fn default_hooks_directory() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("hooks"))
        .unwrap_or_else(|_| PathBuf::from("hooks"))
}

fn default_tick() -> u32 {
    10
}

fn default_enabled() -> bool {
    true
}
