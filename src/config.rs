//! Process-wide configuration, built once at startup.

use std::env;

use tracing::warn;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Environment variable to override the default model.
const MODEL_ENV_VAR: &str = "SCRIBA_MODEL";

/// Environment variable to override the tool-invocation budget.
const MAX_TURNS_ENV_VAR: &str = "SCRIBA_MAX_TURNS";

/// Default model for review generation.
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Default upper bound on tool invocations per run.
const DEFAULT_MAX_TURNS: u32 = 10;

/// Runtime configuration for one agent run.
///
/// Constructed once in `main` and passed by reference to the components
/// that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential for the model service. An empty value is passed
    /// through unchanged; authentication failures are the service's to
    /// report, not ours.
    pub api_key: String,
    pub model: String,
    /// Upper bound on tool invocations before the interaction is ended.
    pub max_turns: u32,
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// Logs a warning and falls back to the default if `SCRIBA_MAX_TURNS`
    /// is set but not a positive integer.
    pub fn from_env() -> Self {
        let api_key = env::var(API_KEY_ENV_VAR).unwrap_or_default();

        let model = match env::var(MODEL_ENV_VAR) {
            Ok(v) if !v.is_empty() => v,
            _ => DEFAULT_MODEL.to_string(),
        };

        let max_turns = match env::var(MAX_TURNS_ENV_VAR) {
            Ok(v) if !v.is_empty() => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "Invalid {} value '{}', using default {}",
                        MAX_TURNS_ENV_VAR, v, DEFAULT_MAX_TURNS
                    );
                    DEFAULT_MAX_TURNS
                }
            },
            _ => DEFAULT_MAX_TURNS,
        };

        Config {
            api_key,
            model,
            max_turns,
        }
    }
}
