use crate::expression::DEFAULT_VARIABLE;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Function grapher configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GraphSettings {
    /// Evenly spaced sample points per curve
    pub samples: usize,

    /// Left edge of the default x range
    pub x_min: f64,

    /// Right edge of the default x range
    pub x_max: f64,

    /// Letter replaced by the sample value
    pub variable: char,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            samples: 500,
            x_min: -10.0,
            x_max: 10.0,
            variable: DEFAULT_VARIABLE,
        }
    }
}

/// Labels used when rendering results.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Shown by the calculator and diagram for an error result
    pub error_label: String,

    /// Appended to notepad lines whose expression errors
    pub notepad_error_label: String,

    /// Shown for a block whose operands do not resolve
    pub unresolved_label: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            error_label: "Error".to_string(),
            notepad_error_label: "[Error]".to_string(),
            unresolved_label: "?".to_string(),
        }
    }
}

/// Application settings, read from a JSON file.
///
/// Every field is optional in the file; missing ones take their defaults.
///
/// ```json
/// { "graph": { "samples": 200 }, "display": { "error_label": "ERR" } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Reads settings from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Location of the settings file
    ///
    /// # Returns
    /// * `Result<Settings, String>` - The settings, or an error message
    ///
    /// # Errors
    /// * Returns an error if the file cannot be opened, read, or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, String> {
        let mut file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(_) => return Err("Failed to open settings file".to_string()),
        };

        let mut contents = String::new();
        if file.read_to_string(&mut contents).is_err() {
            return Err("Failed to read settings file".to_string());
        }

        let settings: Settings = match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => return Err(format!("Failed to parse settings: {}", e)),
        };

        if settings.graph.samples < 2 {
            return Err("graph.samples must be at least 2".to_string());
        }

        Ok(settings)
    }

    /// Like [`Settings::load`], but logs the problem and falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Settings {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{} ({}); using defaults", e, path.as_ref().display());
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "graph": {{ "samples": 200 }}, "display": {{ "error_label": "ERR" }} }}"#)
            .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.graph.samples, 200);
        assert_eq!(settings.graph.variable, 'x');
        assert_eq!(settings.display.error_label, "ERR");
        assert_eq!(settings.display.unresolved_label, "?");
    }

    #[test]
    fn too_few_samples_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "graph": {{ "samples": 1 }} }}"#).unwrap();
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/blockcalc.json");
        assert_eq!(settings, Settings::default());
    }
}
