use anyhow::Context;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub claude_api_key: String,
    pub claude_model: String,
    pub claude_api_url: String,

    pub chat_history_limit: u32,
    pub chat_rate_limit_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            claude_api_key: String::new(),
            claude_model: "claude-sonnet-4-20250514".into(),
            claude_api_url: "https://api.anthropic.com".into(),
            chat_history_limit: 20,
            chat_rate_limit_per_minute: 10,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number")),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_default(),
            claude_model: env::var("CLAUDE_MODEL").unwrap_or(defaults.claude_model),
            claude_api_url: env::var("CLAUDE_API_URL").unwrap_or(defaults.claude_api_url),

            chat_history_limit: parse_var("CHAT_HISTORY_LIMIT", defaults.chat_history_limit)?,
            chat_rate_limit_per_minute: parse_var(
                "CHAT_RATE_LIMIT_PER_MINUTE",
                defaults.chat_rate_limit_per_minute,
            )?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn chat_enabled(&self) -> bool {
        !self.claude_api_key.is_empty()
    }
}
