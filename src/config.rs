use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/app_config.toml";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_ILLUSTRATION_PATH: &str = "../images/illustration.png";
const DEFAULT_OBJECT_PATH: &str = "../images/object.png";
const DEFAULT_OUTPUT_PATH: &str = "nanobanana_mockup.png";

/// Environment variables consulted for the credential, in priority order.
pub const CREDENTIAL_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
}

#[derive(Clone, Debug)]
pub struct MockupConfig {
    pub illustration_path: PathBuf,
    pub object_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for MockupConfig {
    fn default() -> Self {
        Self {
            illustration_path: PathBuf::from(DEFAULT_ILLUSTRATION_PATH),
            object_path: PathBuf::from(DEFAULT_OBJECT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` when no credential could be resolved.
    pub gemini: Option<GeminiConfig>,
    pub server: ServerConfig,
    pub mockup: MockupConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            env::var("APP_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config_path = Path::new(&config_path);

        let file_config = if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .with_context(|| format!("failed to read config file {:?}", config_path))?;
            toml::from_str::<FileConfig>(&contents)
                .with_context(|| format!("failed to parse config file {:?}", config_path))?
        } else {
            FileConfig::default()
        };

        Self::resolve(file_config, |name| env::var(name).ok())
    }

    /// Merges the file sections with environment overrides. `lookup` returns
    /// the value of an environment variable, if set.
    pub fn resolve(
        file_config: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let gemini = file_config.gemini.unwrap_or_default().into_domain(&lookup);
        let server = file_config
            .server
            .unwrap_or_default()
            .into_domain(&lookup)?;
        let mockup = file_config.mockup.unwrap_or_default().into_domain();

        Ok(Self {
            gemini,
            server,
            mockup,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    gemini: Option<FileGeminiConfig>,
    #[serde(default)]
    server: Option<FileServerConfig>,
    #[serde(default)]
    mockup: Option<FileMockupConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct FileGeminiConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

impl FileGeminiConfig {
    fn into_domain(self, lookup: &impl Fn(&str) -> Option<String>) -> Option<GeminiConfig> {
        let api_key = CREDENTIAL_VARS
            .iter()
            .find_map(|name| lookup(name))
            .or_else(|| self.api_key.filter(|key| !key.trim().is_empty()))?;

        Some(GeminiConfig {
            api_key,
            model: lookup("GEMINI_MODEL")
                .or(self.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileServerConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    cors_origin: Option<String>,
}

impl FileServerConfig {
    fn into_domain(self, lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<ServerConfig> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("failed to parse PORT: {raw}"))?,
            None => self.port.unwrap_or(DEFAULT_PORT),
        };

        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("failed to parse server address {host}:{port}"))?;

        Ok(ServerConfig {
            bind_addr,
            cors_origin: lookup("CORS_ORIGIN")
                .or(self.cors_origin)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileMockupConfig {
    #[serde(default)]
    illustration_path: Option<PathBuf>,
    #[serde(default)]
    object_path: Option<PathBuf>,
    #[serde(default)]
    output_path: Option<PathBuf>,
}

impl FileMockupConfig {
    fn into_domain(self) -> MockupConfig {
        let defaults = MockupConfig::default();
        MockupConfig {
            illustration_path: self.illustration_path.unwrap_or(defaults.illustration_path),
            object_path: self.object_path.unwrap_or(defaults.object_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
        }
    }
}
