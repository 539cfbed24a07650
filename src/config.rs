use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub locator: LocatorConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Heading classifier limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Headings longer than this many characters are rejected (default: 50)
    #[serde(default = "default_max_heading_chars")]
    pub max_heading_chars: usize,

    /// Run font size in points above which a paragraph counts as emphasized
    /// (default: 12.5, just above small-four body text)
    #[serde(default = "default_emphasis_font_size")]
    pub emphasis_font_size: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_heading_chars: default_max_heading_chars(),
            emphasis_font_size: default_emphasis_font_size(),
        }
    }
}

fn default_max_heading_chars() -> usize {
    50
}

fn default_emphasis_font_size() -> f32 {
    12.5
}

/// Page locator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Only headings longer than this are retried with a prefix (default: 10)
    #[serde(default = "default_fallback_min_chars")]
    pub fallback_min_chars: usize,

    /// Length of the prefix used for the retry (default: 15)
    #[serde(default = "default_fallback_prefix_chars")]
    pub fallback_prefix_chars: usize,

    /// Ignore whitespace when matching against extracted PDF or text-dump
    /// pages (default: true). JSON page arrays are always matched exactly.
    #[serde(default = "default_ignore_whitespace")]
    pub ignore_whitespace: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            fallback_min_chars: default_fallback_min_chars(),
            fallback_prefix_chars: default_fallback_prefix_chars(),
            ignore_whitespace: default_ignore_whitespace(),
        }
    }
}

fn default_fallback_min_chars() -> usize {
    10
}

fn default_fallback_prefix_chars() -> usize {
    15
}

fn default_ignore_whitespace() -> bool {
    true
}

/// Output rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "plain" (default) or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "plain".to_string()
}

impl Config {
    /// Get the XDG-style config file path (~/.config/docstruct/config.toml)
    /// This is preferred on macOS for CLI tools and cross-platform dotfiles
    #[cfg(target_os = "macos")]
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("docstruct").join("config.toml"))
    }

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/docstruct/config.toml
    /// - Linux: ~/.config/docstruct/config.toml
    /// - Windows: %APPDATA%/docstruct/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docstruct").join("config.toml"))
    }

    /// Load config from file, or return default if file doesn't exist
    /// On macOS, checks ~/.config/docstruct first, then falls back to ~/Library/Application Support
    pub fn load() -> Self {
        #[cfg(target_os = "macos")]
        {
            if let Some(xdg_path) = Self::xdg_config_path() {
                if xdg_path.exists() {
                    return Self::load_from(&xdg_path);
                }
            }
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load config from an explicit path, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| toml::from_str(&contents).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Check if JSON output is configured
    pub fn is_json_output(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.classifier.max_heading_chars, 50);
        assert_eq!(config.classifier.emphasis_font_size, 12.5);
        assert_eq!(config.locator.fallback_min_chars, 10);
        assert_eq!(config.locator.fallback_prefix_chars, 15);
        assert!(config.locator.ignore_whitespace);
        assert!(!config.is_json_output());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[locator]
fallback_prefix_chars = 8

[output]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.locator.fallback_prefix_chars, 8);
        assert_eq!(config.locator.fallback_min_chars, 10);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert!(config.is_json_output());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.classifier.max_heading_chars = 40;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.classifier.max_heading_chars, 40);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "classifier = 3").unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.classifier, ClassifierConfig::default());
    }
}
