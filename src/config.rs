use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Symmetric key for encryption at rest: 64 hex chars for a raw 32-byte
    /// key, any other value is treated as a passphrase and hashed.
    pub encryption_key: Option<String>,
    /// AI service credential. Absent means every analysis takes the
    /// simulated fallback path.
    pub openai_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_model: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://finhealth.db?mode=rwc".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            encryption_key: std::env::var("ENCRYPTION_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            ai_base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            ai_model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
        };

        if config.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL cannot be empty");
        }
        if !config.database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must start with sqlite:");
        }
        if !config.ai_base_url.starts_with("http://") && !config.ai_base_url.starts_with("https://")
        {
            anyhow::bail!("AI_BASE_URL must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::debug!("Database URL: {}", config.database_url);
        tracing::debug!("AI Base URL: {}", config.ai_base_url);
        tracing::debug!("AI Model: {}", config.ai_model);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Resolve the 32-byte encryption-at-rest key.
    ///
    /// With a persistent database a missing `ENCRYPTION_KEY` is a startup
    /// error: records written under a regenerated key would be permanently
    /// undecryptable after restart. An ephemeral generated key is allowed
    /// only when the database itself is in-memory.
    pub fn resolve_cipher_key(&self) -> anyhow::Result<[u8; 32]> {
        match &self.encryption_key {
            Some(value) => Ok(crate::crypto::key_from_config(value)),
            None if self.database_url.contains(":memory:") => {
                tracing::warn!(
                    "ENCRYPTION_KEY not set; using an ephemeral key for the in-memory database"
                );
                Ok(crate::crypto::generate_key())
            }
            None => anyhow::bail!(
                "ENCRYPTION_KEY environment variable required: a key generated at startup \
                 cannot decrypt records stored under a previous key"
            ),
        }
    }
}
