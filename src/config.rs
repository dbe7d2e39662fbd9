use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub transcription: TranscriptionConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding uploaded assets, extracted audio, chunk files and
    /// LLM debug dumps.
    pub upload_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Remote Whisper-compatible endpoints, tried in order.
    pub remotes: Vec<RemoteWhisperConfig>,

    /// Optional local whisper.cpp engine, appended as last resort when
    /// configured.
    pub local: Option<LocalWhisperConfig>,

    /// Language hint passed to every provider.
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteWhisperConfig {
    /// Provider label used in logs and session metadata.
    pub name: String,

    /// OpenAI-compatible base URL (e.g. "https://api.openai.com/v1").
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Transcription model id (e.g. "whisper-1").
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalWhisperConfig {
    /// Path to the whisper.cpp CLI binary.
    pub binary: String,

    /// Path to the GGML model file.
    pub model_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenRouter-compatible base URL.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Attribution headers OpenRouter expects.
    pub referer: String,
    pub title: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "reelcutter".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".to_string(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            remotes: vec![RemoteWhisperConfig {
                name: "openai-whisper".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "WHISPER_API_KEY".to_string(),
                model: "whisper-1".to_string(),
            }],
            local: None,
            language: "pl".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            referer: "http://localhost:5173".to_string(),
            title: "ReelCutter".to_string(),
        }
    }
}

impl Config {
    /// Load from a config file (extension resolved by the config crate).
    /// The file is optional; defaults cover a local setup.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
