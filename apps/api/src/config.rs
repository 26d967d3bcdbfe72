use anyhow::{bail, Context, Result};

/// Default OpenAI-compatible chat-completions endpoint (Hugging Face router).
pub const DEFAULT_LLM_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";
/// Hugging Face user access tokens start with this marker.
pub const DEFAULT_CREDENTIAL_PREFIX: &str = "hf_";
pub const DEFAULT_QUIZ_DURATION_SECS: u32 = 300;
/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

/// Which generator backend serves quiz and career requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    /// Calls the external text-generation service.
    Llm,
    /// Deterministic rule table, no network.
    Rules,
}

impl std::str::FromStr for GeneratorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(GeneratorBackend::Llm),
            "rules" | "fallback" => Ok(GeneratorBackend::Rules),
            other => bail!("GENERATOR_BACKEND must be 'llm' or 'rules', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub generator_backend: GeneratorBackend,
    pub llm_api_url: String,
    pub llm_model: String,
    pub credential_prefix: String,
    pub quiz_duration_secs: u32,
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let quiz_duration_secs = env_or("QUIZ_DURATION_SECS", &DEFAULT_QUIZ_DURATION_SECS.to_string())
            .parse::<u32>()
            .context("QUIZ_DURATION_SECS must be a positive integer")?;
        let session_idle_secs = env_or("SESSION_IDLE_SECS", &DEFAULT_SESSION_IDLE_SECS.to_string())
            .parse::<u64>()
            .context("SESSION_IDLE_SECS must be a positive integer")?;

        let config = Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            generator_backend: env_or("GENERATOR_BACKEND", "llm").parse()?,
            llm_api_url: env_or("LLM_API_URL", DEFAULT_LLM_API_URL),
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            credential_prefix: env_or("CREDENTIAL_PREFIX", DEFAULT_CREDENTIAL_PREFIX),
            quiz_duration_secs,
            session_idle_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects timings that would break a run: a zero-length quiz, or an idle
    /// limit short enough to evict a student mid-quiz.
    pub fn validate(&self) -> Result<()> {
        if self.quiz_duration_secs == 0 {
            bail!("QUIZ_DURATION_SECS must be greater than zero");
        }
        if self.session_idle_secs <= u64::from(self.quiz_duration_secs) {
            bail!(
                "SESSION_IDLE_SECS ({}) must be longer than QUIZ_DURATION_SECS ({})",
                self.session_idle_secs,
                self.quiz_duration_secs
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            generator_backend: GeneratorBackend::Llm,
            llm_api_url: DEFAULT_LLM_API_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            credential_prefix: DEFAULT_CREDENTIAL_PREFIX.to_string(),
            quiz_duration_secs: DEFAULT_QUIZ_DURATION_SECS,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_known_values() {
        assert_eq!("llm".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::Llm);
        assert_eq!(" Rules ".parse::<GeneratorBackend>().unwrap(), GeneratorBackend::Rules);
        assert_eq!(
            "fallback".parse::<GeneratorBackend>().unwrap(),
            GeneratorBackend::Rules
        );
    }

    #[test]
    fn test_backend_rejects_unknown_value() {
        let err = "gpt".parse::<GeneratorBackend>().unwrap_err();
        assert!(err.to_string().contains("GENERATOR_BACKEND"));
    }

    #[test]
    fn test_default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.quiz_duration_secs, 300);
        assert_eq!(config.credential_prefix, "hf_");
    }

    #[test]
    fn test_validate_rejects_idle_limit_shorter_than_quiz() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            session_idle_secs: 300,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SESSION_IDLE_SECS"));

        let config = Config {
            quiz_duration_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
