use autogloss_engine::PopoverMode;
use autogloss_engine::parsing::sanitize_tag_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tags excluded when the settings file does not say otherwise. Script and
/// style bodies are code, and a marker inside them would break the page.
pub const DEFAULT_EXCLUDED_TAGS: [&str; 9] = [
    "a", "h1", "h2", "h3", "h4", "h5", "h6", "script", "style",
];

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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glossary page URL used for "Read more" links.
    pub glossary_page_url: Option<String>,
    pub excluded_tags: Vec<String>,
    pub excluded_post_types: Vec<String>,
    pub show_synonyms: bool,
    pub popover_mode: PopoverMode,
    pub helper_text: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            glossary_page_url: None,
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect(),
            excluded_post_types: Vec::new(),
            show_synonyms: false,
            popover_mode: PopoverMode::Auto,
            helper_text: None,
            catalog_path: None,
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

        config.excluded_tags = sanitize_tags(&config.excluded_tags);

        // Expand shell variables and tilde in the catalog path
        config.catalog_path = config
            .catalog_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

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
        let config_dir = shellexpand::tilde("~/.config/autogloss");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Sanitise each tag name, keeping the first of any duplicates and dropping
/// names that end up empty.
pub fn sanitize_tags(tags: &[String]) -> Vec<String> {
    let mut sanitized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = sanitize_tag_name(tag);
        if !tag.is_empty() && !sanitized.contains(&tag) {
            sanitized.push(tag);
        }
    }
    sanitized
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

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/autogloss/config.toml"));
    }

    #[test]
    fn test_default_excludes_anchors_and_headings() {
        let config = Config::default();

        assert_eq!(config.excluded_tags, DEFAULT_EXCLUDED_TAGS);
        assert_eq!(config.popover_mode, PopoverMode::Auto);
        assert!(!config.show_synonyms);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            glossary_page_url: Some("https://example.com/glossary/".into()),
            excluded_post_types: vec!["product".into()],
            popover_mode: PopoverMode::Manual,
            ..Config::default()
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str(r#"glossary_page_url = "/glossary/""#).unwrap();

        assert_eq!(config.glossary_page_url.as_deref(), Some("/glossary/"));
        assert_eq!(config.excluded_tags, DEFAULT_EXCLUDED_TAGS);
    }

    #[test]
    fn test_default_excludes_script_and_style() {
        let config = Config::default();

        assert!(config.excluded_tags.iter().any(|t| t == "script"));
        assert!(config.excluded_tags.iter().any(|t| t == "style"));
    }

    #[test]
    fn test_popover_mode_is_lowercase() {
        let config: Config = toml::from_str(r#"popover_mode = "manual""#).unwrap();

        assert_eq!(config.popover_mode, PopoverMode::Manual);
    }

    #[test]
    fn test_sanitize_tags() {
        let tags = vec![
            " A ".to_string(),
            "<H2>".to_string(),
            "".to_string(),
            "a".to_string(),
            "code!".to_string(),
        ];

        assert_eq!(sanitize_tags(&tags), vec!["a", "h2", "code"]);
    }

    #[test]
    fn test_tags_sanitized_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, r#"excluded_tags = ["A", " pre ", "<b>"]"#).unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.excluded_tags, vec!["a", "pre", "b"]);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_catalog_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("AUTOGLOSS_TEST_ROOT", "/custom/glossary");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            r#"catalog_path = "$AUTOGLOSS_TEST_ROOT/terms.toml""#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/custom/glossary/terms.toml"))
        );

        unsafe {
            env::remove_var("AUTOGLOSS_TEST_ROOT");
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
    fn test_load_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "show_synonyms = maybe").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            show_synonyms: true,
            helper_text: Some("Focus a term to read its definition.".into()),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
