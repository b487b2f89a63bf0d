//! RON configuration file and its merge with command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use mirror_core::DEFAULT_PAGE_LIMIT;
use mirror_engine::{FetchSettings, PipelineSettings, RendererSettings, StylesheetPolicy};
use serde::Deserialize;

/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    pub output_dir: PathBuf,
    pub page_limit: usize,
    pub navigation_timeout_secs: u64,
    pub chrome_executable: Option<PathBuf>,
    pub stylesheet_policy: StylesheetPolicy,
    pub fetch: FetchConfig,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            page_limit: DEFAULT_PAGE_LIMIT,
            navigation_timeout_secs: 30,
            chrome_executable: None,
            stylesheet_policy: StylesheetPolicy::AbortPage,
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types stylesheets, assets and remote sitemaps may have. Empty accepts anything.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
            allowed_content_types: defaults.allowed_content_types,
        }
    }
}

/// Values given on the command line. `None` keeps whatever the file says.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub page_limit: Option<usize>,
    pub navigation_timeout_secs: Option<u64>,
    pub chrome_executable: Option<PathBuf>,
    pub tolerate_stylesheet_errors: bool,
}

impl MirrorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(limit) = overrides.page_limit {
            self.page_limit = limit;
        }
        if let Some(secs) = overrides.navigation_timeout_secs {
            self.navigation_timeout_secs = secs;
        }
        if overrides.chrome_executable.is_some() {
            self.chrome_executable = overrides.chrome_executable;
        }
        if overrides.tolerate_stylesheet_errors {
            self.stylesheet_policy = StylesheetPolicy::Tolerate;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.navigation_timeout_secs > 0,
            "navigation_timeout_secs must be at least 1"
        );
        ensure!(
            self.fetch.request_timeout_secs > 0,
            "fetch.request_timeout_secs must be at least 1"
        );
        ensure!(self.fetch.max_bytes > 0, "fetch.max_bytes must be positive");
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            output_root: self.output_dir.clone(),
            stylesheet_policy: self.stylesheet_policy,
        }
    }

    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            chrome_executable: self.chrome_executable.clone(),
            navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            allowed_content_types: self.fetch.allowed_content_types.clone(),
            ..FetchSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = MirrorConfig::parse("()").unwrap();
        assert_eq!(config, MirrorConfig::default());
        assert_eq!(config.page_limit, 3);
        assert_eq!(config.stylesheet_policy, StylesheetPolicy::AbortPage);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = MirrorConfig::parse(
            r#"(
                output_dir: "mirror",
                chrome_executable: Some("/opt/chrome/chrome"),
                stylesheet_policy: Tolerate,
                fetch: (max_bytes: 1024),
            )"#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("mirror"));
        assert_eq!(config.chrome_executable, Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(config.stylesheet_policy, StylesheetPolicy::Tolerate);
        assert_eq!(config.fetch.max_bytes, 1024);
        assert_eq!(config.fetch.redirect_limit, 5);
        assert_eq!(config.navigation_timeout_secs, 30);
    }

    #[test]
    fn content_type_allow_list_reaches_the_fetcher() {
        let config = MirrorConfig::parse(
            r#"(fetch: (allowed_content_types: ["text/css", "image/png"]))"#,
        )
        .unwrap();

        assert_eq!(
            config.fetch_settings().allowed_content_types,
            vec!["text/css".to_string(), "image/png".to_string()]
        );
        assert!(MirrorConfig::default()
            .fetch_settings()
            .allowed_content_types
            .is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(MirrorConfig::parse("(page_limt: 4)").is_err());
    }

    #[test]
    fn zero_navigation_timeout_is_rejected() {
        let err = MirrorConfig::parse("(navigation_timeout_secs: 0)").unwrap_err();
        assert!(err.to_string().contains("navigation_timeout_secs"));
    }

    #[test]
    fn flags_override_file_values() {
        let mut config = MirrorConfig::parse(r#"(output_dir: "from-file", page_limit: 7)"#).unwrap();
        config
            .apply(Overrides {
                output_dir: Some("from-flag".into()),
                tolerate_stylesheet_errors: true,
                ..Overrides::default()
            })
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("from-flag"));
        assert_eq!(config.page_limit, 7);
        assert_eq!(config.stylesheet_policy, StylesheetPolicy::Tolerate);
    }

    #[test]
    fn settings_carry_resolved_values() {
        let mut config = MirrorConfig::default();
        config
            .apply(Overrides {
                navigation_timeout_secs: Some(12),
                chrome_executable: Some("chromium".into()),
                ..Overrides::default()
            })
            .unwrap();

        assert_eq!(config.renderer_settings().navigation_timeout, Duration::from_secs(12));
        assert_eq!(
            config.renderer_settings().chrome_executable,
            Some(PathBuf::from("chromium"))
        );
        assert_eq!(config.pipeline_settings().output_root, PathBuf::from("."));
        let fetch = config.fetch_settings();
        assert_eq!(fetch.connect_timeout, Duration::from_secs(10));
        assert!(fetch.allowed_content_types.is_empty());
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.ron");
        let err = MirrorConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.ron"));
    }
}
