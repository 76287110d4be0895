//! Assistant service configuration

/// Default base URL of the assistant service
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variables holding the assistant id, in priority order
const ASSISTANT_ID_VARS: [&str; 3] = ["OPENAI_ASSISTANT_ID", "ASSISTANT_ID", "YOUR_ASSISTANT_ID"];

/// Configuration for the assistant service
#[derive(Debug, Clone, Default)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub assistant_id: Option<String>,
    /// Base URL, e.g. a gateway or a local fake in tests
    pub base_url: Option<String>,
}

/// Credentials required before any outbound call is made
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub assistant_id: String,
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; the assistant id is taken from the
    /// first of its accepted names that is set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("OPENAI_API_KEY"),
            assistant_id: ASSISTANT_ID_VARS.iter().find_map(|name| lookup(name)),
            base_url: lookup("OPENAI_BASE_URL"),
        }
    }

    /// Both credentials, if present and non-empty
    pub fn credentials(&self) -> Option<Credentials> {
        let api_key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let assistant_id = self
            .assistant_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;

        Some(Credentials {
            api_key: api_key.to_string(),
            assistant_id: assistant_id.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}
