//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tocsmith/tocsmith.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `TOCSMITH_*` prefix, `__` between sections
//!    (e.g. `TOCSMITH_TEMPLATE__PLACEHOLDER=###`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::grammar::{
    Dialect, MAX_DEPTH_LIMIT, TEMPLATE_MAX_DEPTH, TEXT_MAX_DEPTH,
};
use crate::application::template::DEFAULT_PLACEHOLDER;
use crate::application::ApplicationError;
use crate::domain::{IdStrategy, MarketNameExtractor, DEFAULT_QUALIFIERS};
use crate::util::path::expand_env_vars;

/// Template import settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Token replaced by the market name
    pub placeholder: String,
    /// Custom template file; the built-in template when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Tiers accepted by the template grammar
    pub max_depth: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            path: None,
            max_depth: TEMPLATE_MAX_DEPTH,
        }
    }
}

/// Editor text settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TextConfig {
    /// Tiers accepted by the editor text grammar
    pub max_depth: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_depth: TEXT_MAX_DEPTH,
        }
    }
}

/// Market name extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarketConfig {
    /// Words that end the market name in a report title
    pub qualifiers: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            qualifiers: DEFAULT_QUALIFIERS.iter().map(|q| q.to_string()).collect(),
        }
    }
}

/// Node id settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdConfig {
    pub strategy: IdStrategy,
    /// Prefix for sequential ids
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::Uuid,
            prefix: "node".to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub template: RawTemplateConfig,
    pub text: RawTextConfig,
    pub market: RawMarketConfig,
    pub ids: RawIdConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTemplateConfig {
    pub placeholder: Option<String>,
    pub path: Option<PathBuf>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTextConfig {
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMarketConfig {
    pub qualifiers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawIdConfig {
    pub strategy: Option<IdStrategy>,
    pub prefix: Option<String>,
}

/// Unified configuration for tocsmith.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub template: TemplateConfig,
    pub text: TextConfig,
    pub market: MarketConfig,
    pub ids: IdConfig,
}

/// Get the XDG config directory for tocsmith.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tocsmith").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tocsmith.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/tocsmith/tocsmith.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `TOCSMITH_*`
    ///
    /// Later layers replace earlier values field by field; lists are replaced whole.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file (missing file is an error)
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Merge overlay config onto self (base); specified fields win.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            template: TemplateConfig {
                placeholder: overlay
                    .template
                    .placeholder
                    .clone()
                    .unwrap_or_else(|| self.template.placeholder.clone()),
                path: overlay
                    .template
                    .path
                    .clone()
                    .or_else(|| self.template.path.clone()),
                max_depth: overlay
                    .template
                    .max_depth
                    .unwrap_or(self.template.max_depth),
            },
            text: TextConfig {
                max_depth: overlay.text.max_depth.unwrap_or(self.text.max_depth),
            },
            market: MarketConfig {
                qualifiers: overlay
                    .market
                    .qualifiers
                    .clone()
                    .unwrap_or_else(|| self.market.qualifiers.clone()),
            },
            ids: IdConfig {
                strategy: overlay.ids.strategy.unwrap_or(self.ids.strategy),
                prefix: overlay
                    .ids
                    .prefix
                    .clone()
                    .unwrap_or_else(|| self.ids.prefix.clone()),
            },
        }
    }

    /// Apply TOCSMITH_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("TOCSMITH")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("market.qualifiers")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("template.placeholder") {
            settings.template.placeholder = val;
        }
        if let Ok(val) = config.get_string("template.path") {
            settings.template.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<usize>("template.max_depth") {
            settings.template.max_depth = val;
        }
        if let Ok(val) = config.get::<usize>("text.max_depth") {
            settings.text.max_depth = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("market.qualifiers") {
            settings.market.qualifiers = val;
        }
        if let Ok(val) = config.get::<IdStrategy>("ids.strategy") {
            settings.ids.strategy = val;
        }
        if let Ok(val) = config.get_string("ids.prefix") {
            settings.ids.prefix = val;
        }

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.template.path {
            let expanded = expand_env_vars(path.to_string_lossy().as_ref());
            self.template.path = Some(PathBuf::from(expanded));
        }
    }

    /// Reject settings no grammar can work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        for (key, depth) in [
            ("text.max_depth", self.text.max_depth),
            ("template.max_depth", self.template.max_depth),
        ] {
            if !(1..=MAX_DEPTH_LIMIT).contains(&depth) {
                return Err(ApplicationError::Config {
                    message: format!(
                        "{} must be between 1 and {}, got {}",
                        key, MAX_DEPTH_LIMIT, depth
                    ),
                });
            }
        }
        if self.template.placeholder.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "template.placeholder must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Grammar for editor text under these settings.
    pub fn text_dialect(&self) -> Dialect {
        Dialect::text_editor().with_max_depth(self.text.max_depth)
    }

    /// Grammar for template text under these settings.
    pub fn template_dialect(&self) -> Dialect {
        Dialect::template().with_max_depth(self.template.max_depth)
    }

    pub fn market_extractor(&self) -> Result<MarketNameExtractor, ApplicationError> {
        Ok(MarketNameExtractor::new(&self.market.qualifiers)?)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tocsmith configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/tocsmith/tocsmith.toml
#   Explicit: tocsmith --config <file>
#   Env:      TOCSMITH_* environment variables, e.g. TOCSMITH_TEMPLATE__PLACEHOLDER

[template]
# Token replaced by the market name
# placeholder = "XXX"

# Custom template file instead of the built-in one (~ and $VAR are expanded)
# path = "~/templates/report_toc.txt"

# Tiers accepted in template text (chapter, section, subsection, subsubsection)
# max_depth = 4

[text]
# Tiers accepted in editor text
# max_depth = 3

[market]
# Words that end the market name in a report title
# qualifiers = ["Market"]

[ids]
# "uuid" or "sequential"
# strategy = "uuid"
# prefix = "node"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
