// src/config.rs
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::requisitions::codes::{DEFAULT_ALPHABET, DEFAULT_CODE_LENGTH};
use crate::requisitions::{ApproverDirectory, CodeAlphabet, CodeAlphabetError, RequisitionConfig};

const DEFAULT_CONFIG_FILE: &str = "klader.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error(transparent)]
    CodeAlphabet(#[from] CodeAlphabetError),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub max_workers: usize,
    /// Base for the approve/reject links sent to managers.
    pub public_base_url: Url,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub sender: String,
    pub default_approver_email: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_path: String,
    pub mail: MailConfig,
    pub upload_token: Option<String>,
    pub logging: LoggingConfig,
    pub approvers: BTreeMap<String, String>,
    pub code_alphabet: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1:5001".to_string(),
                max_workers: 8,
                public_base_url: Url::parse("http://127.0.0.1:5001/")
                    .expect("default base url is valid"),
            },
            database_path: "klader.sqlite3".to_string(),
            mail: MailConfig {
                api_key: None,
                sender: "Klädsystem <onboarding@resend.dev>".to_string(),
                default_approver_email: "chef@example.com".to_string(),
            },
            upload_token: None,
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Compact,
            },
            approvers: BTreeMap::new(),
            code_alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

// Partial file layout; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilePatch {
    server: Option<ServerPatch>,
    database: Option<DatabasePatch>,
    mail: Option<MailPatch>,
    upload: Option<UploadPatch>,
    logging: Option<LoggingPatch>,
    approvers: Option<BTreeMap<String, String>>,
    codes: Option<CodesPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerPatch {
    bind_address: Option<String>,
    max_workers: Option<usize>,
    public_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabasePatch {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MailPatch {
    api_key: Option<String>,
    sender: Option<String>,
    default_approver_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UploadPatch {
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CodesPatch {
    alphabet: Option<String>,
}

impl AppConfig {
    /// Defaults, then the config file (if any), then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("KLADER_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                p.exists().then_some(p)
            });

        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(&path)?;
        }
        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let patch: FilePatch = toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_patch(patch)
    }

    fn apply_patch(&mut self, patch: FilePatch) -> Result<(), ConfigError> {
        if let Some(server) = patch.server {
            if let Some(v) = server.bind_address {
                self.server.bind_address = v;
            }
            if let Some(v) = server.max_workers {
                self.server.max_workers = v;
            }
            if let Some(v) = server.public_base_url {
                self.server.public_base_url = parse_base_url(&v)?;
            }
        }
        if let Some(v) = patch.database.and_then(|d| d.path) {
            self.database_path = v;
        }
        if let Some(mail) = patch.mail {
            if mail.api_key.is_some() {
                self.mail.api_key = mail.api_key;
            }
            if let Some(v) = mail.sender {
                self.mail.sender = v;
            }
            if let Some(v) = mail.default_approver_email {
                self.mail.default_approver_email = v;
            }
        }
        if let Some(v) = patch.upload.and_then(|u| u.token) {
            self.upload_token = Some(v);
        }
        if let Some(logging) = patch.logging {
            if let Some(v) = logging.level {
                self.logging.level = v;
            }
            if let Some(v) = logging.format {
                self.logging.format = v;
            }
        }
        if let Some(approvers) = patch.approvers {
            self.approvers = approvers;
        }
        if let Some(codes) = patch.codes {
            if let Some(v) = codes.alphabet {
                self.code_alphabet = v;
            }
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("BIND_ADDRESS") {
            self.server.bind_address = v;
        }
        if let Some(v) = get("MAX_WORKERS") {
            self.server.max_workers = v.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "MAX_WORKERS".into(),
                value: v.clone(),
            })?;
        }
        if let Some(v) = get("PUBLIC_BASE_URL") {
            self.server.public_base_url = parse_base_url(&v)?;
        }
        if let Some(v) = get("DATABASE_PATH") {
            self.database_path = v;
        }
        if let Some(v) = get("RESEND_API_KEY") {
            self.mail.api_key = Some(v);
        }
        if let Some(v) = get("MAIL_SENDER") {
            self.mail.sender = v;
        }
        if let Some(v) = get("CHEF_EMAIL") {
            self.mail.default_approver_email = v;
        }
        if let Some(v) = get("UPLOAD_TOKEN") {
            self.upload_token = Some(v);
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = get("LOG_FORMAT") {
            self.logging.format = v.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_workers == 0 {
            return Err(ConfigError::Validation("server.max_workers must be at least 1".into()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::Validation("database.path must not be empty".into()));
        }
        CodeAlphabet::new(&self.code_alphabet, DEFAULT_CODE_LENGTH)?;
        Ok(())
    }

    /// Fixed lookup tables handed to the requisition lifecycle.
    pub fn requisition_config(&self) -> Result<RequisitionConfig, ConfigError> {
        // Codes are always eight characters; only the glyph set is configurable.
        let alphabet = CodeAlphabet::new(&self.code_alphabet, DEFAULT_CODE_LENGTH)?;
        debug!(
            glyphs = alphabet.glyphs().len(),
            length = alphabet.length(),
            approvers = self.approvers.len(),
            "requisition settings loaded"
        );
        Ok(RequisitionConfig {
            alphabet,
            approvers: ApproverDirectory::new(
                self.approvers.iter(),
                self.mail.default_approver_email.clone(),
            ),
        })
    }
}

/// Parses a base URL and makes sure it ends with `/` so relative joins keep the path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut s = raw.trim().to_string();
    if !s.ends_with('/') {
        s.push('/');
    }
    Url::parse(&s).map_err(|e| ConfigError::Validation(format!("invalid public_base_url `{raw}`: {e}")))
}
