//! Runtime configuration
//!
//! Read once at startup from the process environment (after `.env` is
//! loaded) and handed to the generation client at construction.

/// Default generation endpoint (Gemini `generateContent`)
pub const DEFAULT_BASE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Primary environment variable holding the API key
pub const API_KEY_VAR: &str = "API_KEY";

/// Legacy name, consulted when `API_KEY` is unset
pub const LEGACY_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Overrides [`DEFAULT_BASE_URL`]
pub const BASE_URL_VAR: &str = "API_BASE_URL";

/// Configuration for the generation API
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// API key, sent as the `key` query parameter. May be empty.
    pub api_key: String,

    /// Full endpoint URL, without query string
    pub base_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

// Keep the key out of debug logs.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GenerationConfig {
    /// Build from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// A missing key is not an error here: requests go out without a usable
    /// credential and the remote side rejects them.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(API_KEY_VAR)
            .or_else(|| non_empty(LEGACY_API_KEY_VAR))
            .unwrap_or_default();

        let base_url = non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self { api_key, base_url }
    }

    /// Whether a key was found; without one the remote side rejects every call
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Load `.env` into the process environment
///
/// Checks the current directory first, then its parent (running from a
/// subdirectory of the project).
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}
