//! Editing preferences.
//!
//! Stored as JSON in the platform config directory
//! (`<config_dir>/codeview/editing.json`). Missing fields fall back to their
//! defaults, so a config file only needs the keys it overrides:
//!
//! ```json
//! { "tab_space_count": 2 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

/// Largest accepted indent width.
const MAX_TAB_SPACE_COUNT: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingConfig {
    /// Number of spaces inserted for a tab; also the auto-indent unit.
    pub tab_space_count: usize,
    /// Repeat the previous line's indentation after a line break.
    pub auto_indent: bool,
    /// A line ending with this opens one extra indentation level on the next.
    pub indent_start: String,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            tab_space_count: 4,
            auto_indent: true,
            indent_start: "{".to_owned(),
        }
    }
}

impl EditingConfig {
    /// The text inserted for one indentation level.
    pub fn tab_replacement(&self) -> String {
        " ".repeat(self.tab_space_count)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the config with out-of-range values pulled into range.
    ///
    /// Used for configs built in code, which never pass through
    /// [`EditingConfig::validate`].
    pub fn clamped(mut self) -> Self {
        let width = self.tab_space_count.clamp(1, MAX_TAB_SPACE_COUNT);
        if width != self.tab_space_count {
            warn!(
                requested = self.tab_space_count,
                used = width,
                "tab_space_count out of range"
            );
            self.tab_space_count = width;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=MAX_TAB_SPACE_COUNT).contains(&self.tab_space_count) {
            return Err(ConfigError::Invalid(format!(
                "tab_space_count must be between 1 and {}, got {}",
                MAX_TAB_SPACE_COUNT, self.tab_space_count
            )));
        }
        Ok(())
    }

    /// Reads and validates the config at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Reads the config at `path`, falling back to defaults when the file is
    /// missing or unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "using default editing config");
                Self::default()
            }
        }
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json_string()?).map_err(io_err)
    }

    /// `<config_dir>/codeview/editing.json`, or `None` if the platform has no
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("codeview").join("editing.json"))
    }
}
