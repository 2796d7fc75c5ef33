use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::{info, warn};

/// Control loop events that can run a hook executable
///
/// Hooks live in the configured hooks directory and are named after the
/// event. A missing hook is not an error.
pub enum Hook {
    LoopStart,
    LoopEnd,
    /// A timer fired; the hook is `fired-<name>` and gets the name as its argument
    Fired(String),
}

/// Check that a timer name can be used as part of a hook file name
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Timer name is empty");
    }

    if name.contains(['/', '\\']) || name.contains("..") {
        bail!("Timer name {:?} must not contain path separators or \"..\"", name);
    }

    Ok(())
}

impl Hook {
    fn file_name(&self) -> String {
        match self {
            Self::LoopStart => "loop-start".to_string(),
            Self::LoopEnd => "loop-end".to_string(),
            Self::Fired(name) => format!("fired-{}", name),
        }
    }

    /// Path the hook executable would have inside `hooks_directory`
    pub fn path(&self, hooks_directory: &Path) -> Result<PathBuf> {
        if let Self::Fired(name) = self {
            validate_name(name)?;
        }

        Ok(hooks_directory.join(self.file_name()))
    }

    pub fn run(&self, hooks_directory: &Path) -> Result<()> {
        let hook_path = self.path(hooks_directory)?;

        if hook_path.exists() {
            info!(
                "Executing hook at {}",
                hook_path.display().to_string().cyan()
            );

            let mut command = std::process::Command::new(&hook_path);

            if let Self::Fired(name) = self {
                command.arg(name);
            }

            command
                .output()
                .with_context(|| format!("Failed to execute hook {}", hook_path.display()))?;
        }

        Ok(())
    }

    /// Run the hook, logging a failure instead of returning it
    ///
    /// Returns whether the hook ran without error.
    pub fn run_or_warn(&self, hooks_directory: &Path) -> bool {
        match self.run(hooks_directory) {
            Ok(()) => true,
            Err(err) => {
                warn!("{:#}", err);
                false
            }
        }
    }
}
