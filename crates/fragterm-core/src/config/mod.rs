use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::defaults;
use crate::context::ContextOptions;
use crate::error::{FragError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub eval: EvalSettings,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub tab_width: usize,
    pub scroll_speed: usize,
    pub format_on_run: bool,
    pub highlight: bool,
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    /// Interpreter fragments are run with (`<shell> -c <source>`)
    pub shell: String,
    /// External formatter as `[program, args...]`; whitespace cleanup when unset
    pub format_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// File extension used to pick the syntax
    pub syntax: String,
    pub theme: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: defaults::TAB_WIDTH,
            scroll_speed: defaults::SCROLL_SPEED,
            format_on_run: defaults::FORMAT_ON_RUN,
            highlight: defaults::HIGHLIGHT,
            theme: defaults::THEME.to_string(),
        }
    }
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            shell: defaults::SHELL.to_string(),
            format_command: None,
        }
    }
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            syntax: defaults::SYNTAX.to_string(),
            theme: defaults::HIGHLIGHT_THEME.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fragterm")
            .join("config.toml")
    }

    /// Settings from the default location, or defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("ignoring {}: {e}", config_path.display()),
            }
        }
        Self::default()
    }

    /// Settings from an explicit path. Errors are reported, not defaulted.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FragError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Options every new context starts with.
    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            format: self.editor.format_on_run,
            highlight: self.editor.highlight,
            scroll_speed: self.editor.scroll_speed.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nscroll_speed = 3\n").unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.editor.scroll_speed, 3);
        assert_eq!(settings.editor.tab_width, 4);
        assert_eq!(settings.eval.shell, "bash");
        assert_eq!(settings.context_options().scroll_speed, 3);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = Settings::default();
        settings.eval.format_command = Some(vec!["shfmt".into(), "-i".into(), "2".into()]);
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "editor = 3").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(FragError::Config(_))
        ));
    }
}
