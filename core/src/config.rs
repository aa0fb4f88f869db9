//! file: core/src/config.rs
//! description: lowering options.
//!
//! `LowerConfig` names the entry function the driver opens for top-level
//! statements and describes the external print routine that `print(...)`
//! lowers to. Configs are plain JSON; every field is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DragoncErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerConfig {
    /// Function that receives the top-level statements.
    pub entry_function: String,
    /// Name of the pre-declared variadic print routine.
    pub print_routine: String,
    /// Format string passed ahead of the printed value. `None` passes the
    /// value alone.
    pub print_format: Option<String>,
}

impl Default for LowerConfig {
    fn default() -> Self {
        LowerConfig {
            entry_function: "main".to_string(),
            print_routine: "printf".to_string(),
            print_format: Some("%d\n".to_string()),
        }
    }
}

impl LowerConfig {
    pub fn from_json_str(raw: &str) -> Result<LowerConfig, ConfigError> {
        let config: LowerConfig = serde_json::from_str(raw)
            .map_err(|e| ConfigError::new(format!("parse config: {}", e), None))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LowerConfig, ConfigError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("read config: {}", e), Some(Location::new(file.clone(), 0, 0))))?;
        let config: LowerConfig = serde_json::from_str(&raw).map_err(|e| {
            ConfigError::new(format!("parse config: {}", e), Some(Location::new(file, e.line(), e.column())))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_function.trim().is_empty() {
            return Err(ConfigError::new("entry function name is empty".to_string(), None));
        }
        if self.print_routine.trim().is_empty() {
            return Err(ConfigError::new("print routine name is empty".to_string(), None));
        }
        if self.entry_function == self.print_routine {
            return Err(ConfigError::new(
                format!("entry function and print routine share the name '{}'", self.entry_function),
                None,
            ));
        }
        if self.print_format.is_none() {
            log::warn!("no print format configured; '{}' will receive the bare value", self.print_routine);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    message: String,
    location: Option<Location>,
}

impl ConfigError {
    pub fn new(message: String, location: Option<Location>) -> Self {
        ConfigError { message, location }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl DragoncErrorExt for ConfigError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "dragonc.config".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
