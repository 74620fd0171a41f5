use blockpad_engine::editing::schedule::{DEFAULT_AUTOSAVE_INTERVAL, DEFAULT_DEBOUNCE};
use blockpad_engine::render::{ExportOptions, ParagraphTag, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings for the `blockpad` shell. Every field has a default, so an
/// empty file (or a partial one) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before an edit burst is committed to history.
    pub debounce_ms: u64,
    pub autosave_interval_ms: u64,
    /// Where the editor autosaves; defaults to the file being edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosave_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL.as_millis() as u64,
            autosave_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub paragraph_tag: ParagraphTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub title: String,
    /// Empty string disables the stylesheet link.
    pub stylesheet_href: String,
    /// Empty string disables the highlighter script.
    pub script_src: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: ExportOptions::DEFAULT_TITLE.to_string(),
            stylesheet_href: ExportOptions::HIGHLIGHT_STYLESHEET.to_string(),
            script_src: ExportOptions::HIGHLIGHT_SCRIPT.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the autosave path
        if let Some(path) = config.editor.autosave_path.take() {
            config.editor.autosave_path = Some(Self::expand_path(&path).unwrap_or(path));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blockpad");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            paragraph_tag: self.render.paragraph_tag,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ExportOptions {
            title: self.export.title.clone(),
            stylesheet_href: non_empty(&self.export.stylesheet_href),
            script_src: non_empty(&self.export.script_src),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.editor.debounce_ms)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.editor.autosave_interval_ms)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/blockpad/config.toml"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.debounce(), Duration::from_millis(800));
        assert_eq!(config.autosave_interval(), Duration::from_millis(2000));
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.export_options(), ExportOptions::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
[render]
paragraph_tag = "div"

[export]
title = "Notes"
script_src = ""
"#,
        )
        .unwrap();

        assert_eq!(config.render_options().paragraph_tag, ParagraphTag::Div);
        let export = config.export_options();
        assert_eq!(export.title, "Notes");
        assert_eq!(
            export.stylesheet_href.as_deref(),
            Some(ExportOptions::HIGHLIGHT_STYLESHEET)
        );
        assert_eq!(export.script_src, None);
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_unknown_paragraph_tag_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[render]\nparagraph_tag = \"section\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_autosave_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("BLOCKPAD_TEST_ROOT", "/custom/drafts");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[editor]\nautosave_path = \"$BLOCKPAD_TEST_ROOT/autosave.json\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(
            config.editor.autosave_path,
            Some(PathBuf::from("/custom/drafts/autosave.json"))
        );

        unsafe {
            env::remove_var("BLOCKPAD_TEST_ROOT");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut test_config = Config::default();
        test_config.editor.debounce_ms = 250;
        test_config.editor.autosave_path = Some(PathBuf::from("/tmp/blockpad-autosave.json"));
        test_config.render.paragraph_tag = ParagraphTag::Div;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
