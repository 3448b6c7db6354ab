//! Service configuration: YAML file plus environment overrides.
//!
//! `TEXTFLOW_CONFIG` points at an optional YAML file; `TEXTFLOW_ADDR`
//! overrides the bind address. Everything else falls back to defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use textflow_core::{ErrorPolicy, Params, PipelineDefinition, PipelineError};
use textflow_stages::{KeywordExtractor, SentimentScorer, TextTransformer, DEFAULT_ORDER};
use thiserror::Error;

pub const CONFIG_ENV: &str = "TEXTFLOW_CONFIG";
pub const ADDR_ENV: &str = "TEXTFLOW_ADDR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("port {0} is outside 1024-65535")]
    InvalidPort(u16),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextProcessorConfig {
    pub enabled: bool,
    pub to_upper: bool,
    pub to_lower: bool,
    pub title_case: bool,
    pub reverse: bool,
    pub strip: bool,
}

impl Default for TextProcessorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            to_upper: true,
            to_lower: true,
            title_case: true,
            reverse: false,
            strip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentAnalyzerConfig {
    pub enabled: bool,
    pub analyze_sentences: bool,
    pub legacy_intensifier_sign: bool,
}

impl Default for SentimentAnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            analyze_sentences: false,
            legacy_intensifier_sign: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordExtractorConfig {
    pub enabled: bool,
    pub top_n: u32,
    pub min_word_length: u32,
    pub extract_named_entities: bool,
}

impl Default for KeywordExtractorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: 5,
            min_word_length: 2,
            extract_named_entities: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub allowed_origins: Vec<String>,
    pub error_policy: ErrorPolicy,
    pub stage_order: Vec<String>,
    pub text_processor: TextProcessorConfig,
    pub sentiment_analyzer: SentimentAnalyzerConfig,
    pub keyword_extractor: KeywordExtractorConfig,
    #[serde(skip)]
    pub addr_override: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            log_level: LogLevel::default(),
            allowed_origins: vec!["*".to_string()],
            error_policy: ErrorPolicy::default(),
            stage_order: DEFAULT_ORDER.iter().map(|s| s.to_string()).collect(),
            text_processor: TextProcessorConfig::default(),
            sentiment_analyzer: SentimentAnalyzerConfig::default(),
            keyword_extractor: KeywordExtractorConfig::default(),
            addr_override: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Defaults, then the `TEXTFLOW_CONFIG` file, then `TEXTFLOW_ADDR`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.addr_override = std::env::var(ADDR_ENV).ok();
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port < 1024 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        textflow_stages::build_runner(&self.pipeline_definition()?)?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        self.addr_override
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.host, self.port))
    }

    pub fn is_enabled(&self, stage: &str) -> bool {
        match stage {
            TextTransformer::NAME => self.text_processor.enabled,
            SentimentScorer::NAME => self.sentiment_analyzer.enabled,
            KeywordExtractor::NAME => self.keyword_extractor.enabled,
            _ => true,
        }
    }

    /// Static parameters of a known stage section, without `enabled`
    pub fn stage_params(&self, stage: &str) -> Option<Params> {
        let section = match stage {
            TextTransformer::NAME => serde_json::to_value(&self.text_processor),
            SentimentScorer::NAME => serde_json::to_value(&self.sentiment_analyzer),
            KeywordExtractor::NAME => serde_json::to_value(&self.keyword_extractor),
            _ => return None,
        };
        let mut params = section.ok()?.as_object()?.clone();
        params.remove("enabled");
        Some(params)
    }

    /// Enabled stages in `stage_order`, each with its static parameters
    pub fn pipeline_definition(&self) -> Result<PipelineDefinition, PipelineError> {
        let stages: Vec<String> = self
            .stage_order
            .iter()
            .filter(|name| self.is_enabled(name))
            .cloned()
            .collect();

        let stage_config: HashMap<String, Params> = stages
            .iter()
            .filter_map(|name| Some((name.clone(), self.stage_params(name)?)))
            .collect();

        PipelineDefinition::new(stages, stage_config)
    }
}
