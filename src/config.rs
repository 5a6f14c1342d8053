use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnnotationError;

pub const CONFIG_FILE_NAME: &str = "kira-as.json";

pub const DEFAULT_HIERARCHY_URL: &str = "https://rest.kegg.jp/get/br:br08901";
pub const DEFAULT_LINKS_URL: &str = "https://rest.kegg.jp/link/pathway/ko";
pub const DEFAULT_OBO_URL: &str = "http://purl.obolibrary.org/obo/go/go-basic.obo";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub entity_column: Option<String>,
    #[serde(default)]
    pub absent_sentinel: Option<String>,
    #[serde(default)]
    pub kegg: Option<KeggSection>,
    #[serde(default)]
    pub cog: Option<CogSection>,
    #[serde(default)]
    pub go: Option<GoSection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeggSection {
    #[serde(default)]
    pub annotation_column: Option<String>,
    #[serde(default)]
    pub token_pattern: Option<String>,
    #[serde(default)]
    pub strip_prefixes: Option<Vec<String>>,
    #[serde(default)]
    pub separators: Option<Vec<String>>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub hierarchy_url: Option<String>,
    #[serde(default)]
    pub links_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CogSection {
    #[serde(default)]
    pub column: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GoSection {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub obo_url: Option<String>,
}

/// Cell cleaning rules shared by the tokenizer and the other cell parsers.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub pattern: Regex,
    pub strip_prefixes: Vec<String>,
    pub separators: Vec<String>,
    pub absent_sentinel: String,
}

impl TokenizerConfig {
    pub fn new(
        pattern: &str,
        strip_prefixes: Vec<String>,
        separators: Vec<String>,
        absent_sentinel: impl Into<String>,
    ) -> Result<Self, AnnotationError> {
        let pattern = Regex::new(pattern).map_err(|err| AnnotationError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        if separators.iter().any(|sep| sep.is_empty()) {
            return Err(AnnotationError::InvalidConfig(
                "separators must not be empty strings".to_string(),
            ));
        }
        Ok(Self {
            pattern,
            strip_prefixes,
            separators,
            absent_sentinel: absent_sentinel.into(),
        })
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern compiles"),
            strip_prefixes: default_strip_prefixes(),
            separators: default_separators(),
            absent_sentinel: DEFAULT_ABSENT_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeggConfig {
    pub annotation_column: String,
    pub tokenizer: TokenizerConfig,
    pub top_n: usize,
    pub hierarchy_url: String,
    pub links_url: String,
}

#[derive(Debug, Clone)]
pub struct CogConfig {
    pub column: String,
}

#[derive(Debug, Clone)]
pub struct GoConfig {
    pub column: String,
    pub top_n: usize,
    pub obo_url: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub timeout: Duration,
    /// Gene identifier column; the first column is used when it is missing.
    pub entity_column: String,
    /// Cell value meaning "no annotation", shared by every summary.
    pub absent_sentinel: String,
    pub kegg: KeggConfig,
    pub cog: CogConfig,
    pub go: GoConfig,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            entity_column: "query".to_string(),
            absent_sentinel: DEFAULT_ABSENT_SENTINEL.to_string(),
            kegg: KeggConfig {
                annotation_column: "KEGG_ko".to_string(),
                tokenizer: TokenizerConfig::default(),
                top_n: DEFAULT_KEGG_TOP_N,
                hierarchy_url: DEFAULT_HIERARCHY_URL.to_string(),
                links_url: DEFAULT_LINKS_URL.to_string(),
            },
            cog: CogConfig {
                column: "COG_category".to_string(),
            },
            go: GoConfig {
                column: "GOs".to_string(),
                top_n: DEFAULT_GO_TOP_N,
                obo_url: DEFAULT_OBO_URL.to_string(),
            },
        }
    }
}

const DEFAULT_TOKEN_PATTERN: &str = r"^K\d{5}$";
const DEFAULT_ABSENT_SENTINEL: &str = "-";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_KEGG_TOP_N: usize = 15;
const DEFAULT_GO_TOP_N: usize = 6;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the config file if one exists.
    ///
    /// An explicit path must exist. Without one, `kira-as.json` is looked up in
    /// the current directory and then in the user config directory; if neither
    /// exists the defaults apply.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, AnnotationError> {
        let config_path = match path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::discover(),
        };

        let Some(config_path) = config_path else {
            tracing::debug!("no config file found, using defaults");
            return Ok(ResolvedConfig::default());
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|_| AnnotationError::ConfigRead(config_path.display().to_string()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| AnnotationError::ConfigParse(err.to_string()))?;
        tracing::debug!(path = %config_path.display(), "loaded config");

        Self::resolve_config(config)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("", "", "kira-annotation-summary")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, AnnotationError> {
        let defaults = ResolvedConfig::default();
        let schema_version = config.schema_version.unwrap_or(1);
        let timeout = config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(AnnotationError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let absent_sentinel = config
            .absent_sentinel
            .unwrap_or(defaults.absent_sentinel);
        let kegg = config.kegg.unwrap_or_default();
        let tokenizer = TokenizerConfig::new(
            kegg.token_pattern.as_deref().unwrap_or(DEFAULT_TOKEN_PATTERN),
            kegg.strip_prefixes.unwrap_or_else(default_strip_prefixes),
            kegg.separators.unwrap_or_else(default_separators),
            absent_sentinel.clone(),
        )?;
        let kegg = KeggConfig {
            annotation_column: kegg
                .annotation_column
                .unwrap_or(defaults.kegg.annotation_column),
            tokenizer,
            top_n: validate_top_n(kegg.top_n.unwrap_or(defaults.kegg.top_n))?,
            hierarchy_url: kegg.hierarchy_url.unwrap_or(defaults.kegg.hierarchy_url),
            links_url: kegg.links_url.unwrap_or(defaults.kegg.links_url),
        };

        let cog = CogConfig {
            column: config
                .cog
                .and_then(|section| section.column)
                .unwrap_or(defaults.cog.column),
        };

        let go = config.go.unwrap_or_default();
        let go = GoConfig {
            column: go.column.unwrap_or(defaults.go.column),
            top_n: validate_top_n(go.top_n.unwrap_or(defaults.go.top_n))?,
            obo_url: go.obo_url.unwrap_or(defaults.go.obo_url),
        };

        Ok(ResolvedConfig {
            schema_version,
            timeout,
            entity_column: config.entity_column.unwrap_or(defaults.entity_column),
            absent_sentinel,
            kegg,
            cog,
            go,
        })
    }
}

pub fn validate_top_n(top_n: usize) -> Result<usize, AnnotationError> {
    if top_n == 0 {
        return Err(AnnotationError::InvalidConfig(
            "top_n must be at least 1".to_string(),
        ));
    }
    Ok(top_n)
}

pub fn default_strip_prefixes() -> Vec<String> {
    vec!["ko:".to_string()]
}

pub fn default_separators() -> Vec<String> {
    vec![",".to_string(), ";".to_string(), " ".to_string()]
}
