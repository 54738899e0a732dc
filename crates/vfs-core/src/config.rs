//! Session configuration
//!
//! Loaded from the `[session]` table of a TOML file:
//!
//! ```toml
//! [session]
//! validate = true
//! repair_on_build = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Defaults applied when a hierarchy is (re)built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reject listings with missing parents
    pub validate: bool,
    /// Delete orphaned folders instead of failing validation.
    /// Ignored when `validate` is off.
    pub repair_on_build: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validate: true,
            repair_on_build: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    session: SessionConfig,
}

impl SessionConfig {
    /// Parse configuration from TOML content.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.session)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::ConfigParse`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(file.session)
    }

    /// Whether a build with these defaults repairs orphans.
    pub fn repairs_on_build(&self) -> bool {
        self.validate && self.repair_on_build
    }
}
