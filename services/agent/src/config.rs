use ellie_core::providers::Credentials;
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Credentials for the real-time media room. All optional.
#[derive(Clone, Debug, Default)]
pub struct RoomCredentials {
    pub url: Option<String>,
    pub api_key: Option<SecretString>,
    pub api_secret: Option<SecretString>,
}

impl RoomCredentials {
    pub fn is_complete(&self) -> bool {
        self.url.is_some() && self.api_key.is_some() && self.api_secret.is_some()
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub room: RoomCredentials,
    pub log_level: Level,
    pub prompts_path: Option<PathBuf>,
}

/// Reads a variable, treating an empty value the same as an unset one.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn secret_var(name: &str) -> Option<SecretString> {
    non_empty_var(name).map(SecretString::from)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let groq_api_key = secret_var("GROQ_API_KEY").ok_or_else(|| {
            ConfigError::MissingVar(
                "GROQ_API_KEY must be set (get one at https://console.groq.com/keys)".to_string(),
            )
        })?;

        let credentials = Credentials {
            groq_api_key,
            deepgram_api_key: secret_var("DEEPGRAM_API_KEY"),
            cartesia_api_key: secret_var("CARTESIA_API_KEY"),
        };

        let room = RoomCredentials {
            url: non_empty_var("LIVEKIT_URL"),
            api_key: secret_var("LIVEKIT_API_KEY"),
            api_secret: secret_var("LIVEKIT_API_SECRET"),
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = non_empty_var("PROMPTS_PATH").map(PathBuf::from);

        Ok(Self {
            credentials,
            room,
            log_level,
            prompts_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("GROQ_API_KEY");
            env::remove_var("DEEPGRAM_API_KEY");
            env::remove_var("CARTESIA_API_KEY");
            env::remove_var("LIVEKIT_URL");
            env::remove_var("LIVEKIT_API_KEY");
            env::remove_var("LIVEKIT_API_SECRET");
            env::remove_var("RUST_LOG");
            env::remove_var("PROMPTS_PATH");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_minimal() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(
            config.credentials.groq_api_key.expose_secret(),
            "test-groq-key"
        );
        assert!(!config.credentials.has_deepgram());
        assert!(!config.credentials.has_cartesia());
        assert!(config.room.url.is_none());
        assert!(!config.room.is_complete());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_all_values() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
            env::set_var("DEEPGRAM_API_KEY", "test-deepgram-key");
            env::set_var("CARTESIA_API_KEY", "test-cartesia-key");
            env::set_var("LIVEKIT_URL", "wss://example.livekit.cloud");
            env::set_var("LIVEKIT_API_KEY", "lk-key");
            env::set_var("LIVEKIT_API_SECRET", "lk-secret");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert!(config.credentials.has_deepgram());
        assert!(config.credentials.has_cartesia());
        assert_eq!(
            config.room.url.as_deref(),
            Some("wss://example.livekit.cloud")
        );
        assert!(config.room.is_complete());
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, Some(PathBuf::from("/custom/prompts")));
    }

    #[test]
    #[serial]
    fn test_config_missing_groq_key() {
        clear_env_vars();
        unsafe {
            env::set_var("DEEPGRAM_API_KEY", "test-deepgram-key");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => assert!(msg.contains("GROQ_API_KEY")),
            _ => panic!("Expected MissingVar for GROQ_API_KEY"),
        }
    }

    #[test]
    #[serial]
    fn test_empty_values_count_as_absent() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
            env::set_var("DEEPGRAM_API_KEY", "");
            env::set_var("CARTESIA_API_KEY", "   ");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert!(!config.credentials.has_deepgram());
        assert!(!config.credentials.has_cartesia());

        unsafe {
            env::set_var("GROQ_API_KEY", "");
        }
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar(_))
        ));
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "test-groq-key");
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_debug_output_hides_secrets() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "super-secret-groq");
            env::set_var("LIVEKIT_API_SECRET", "super-secret-livekit");
        }

        let config = Config::from_env().expect("Config should load successfully");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-groq"));
        assert!(!rendered.contains("super-secret-livekit"));
    }
}
