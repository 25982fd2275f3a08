use bridge_mcp::DEFAULT_CATALOG_URL;

pub const CATALOG_URL_ENV: &str = "MCP_SSE_URL";
pub const MODEL_ENV: &str = "BRIDGE_MODEL";
pub const FALLBACK_MODEL_ENV: &str = "BRIDGE_FALLBACK_MODEL";

const DEFAULT_MODEL: &str = "qwen/qwen3-32b";
const DEFAULT_FALLBACK_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_MAX_ROUNDS: usize = 3;

/// Bridge settings, environment-driven with deployment defaults.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// SSE endpoint of the tool catalog
    pub catalog_url: String,
    /// Model driving the tool-augmented agent
    pub model: String,
    /// Model for the tool-less direct fallback call
    pub fallback_model: String,
    /// Bound on model/tool exchange rounds within one query
    pub max_rounds: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_url: env_or(CATALOG_URL_ENV, defaults.catalog_url),
            model: env_or(MODEL_ENV, defaults.model),
            fallback_model: env_or(FALLBACK_MODEL_ENV, defaults.fallback_model),
            max_rounds: defaults.max_rounds,
        }
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}
