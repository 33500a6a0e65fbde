use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

/// Errors raised while building the configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub invitation_policy: InvitationPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Externally visible base URL, used for links in outgoing email
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Provider API base URL, validated when loaded
    pub api_base: String,
    pub from: String,
}

/// Whether employee creation and the invitation email commit together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationPolicy {
    /// Keep the employee row even when the invitation fails; the failure is still reported
    Proceed,
    /// Roll back the employee row when the invitation fails
    Rollback,
}

impl std::str::FromStr for InvitationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proceed" => Ok(InvitationPolicy::Proceed),
            "rollback" => Ok(InvitationPolicy::Rollback),
            other => Err(format!("expected 'proceed' or 'rollback', got '{}'", other)),
        }
    }
}

pub const DEFAULT_COOKIE_NAME: &str = "auth_token";
pub const DEFAULT_MAIL_API_BASE: &str = "https://api.resend.com";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // The signing secret has no fallback; an unset or blank secret stops startup
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let preset = match environment {
            Environment::Production => Self::production(jwt_secret, database_url),
            Environment::Staging => Self::staging(jwt_secret, database_url),
            Environment::Development => Self::development(jwt_secret, database_url),
        };

        preset.with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("TIMEY_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("PUBLIC_URL") {
            self.server.public_url = v.trim_end_matches('/').to_string();
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = parse_var("DATABASE_CONNECT_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("AUTH_COOKIE_NAME") {
            if v.trim().is_empty() || v.contains(['=', ';', ' ']) {
                return Err(ConfigError::Invalid {
                    var: "AUTH_COOKIE_NAME",
                    reason: format!("'{}' is not a valid cookie name", v),
                });
            }
            self.security.cookie_name = v;
        }
        if let Some(v) = lookup("COOKIE_SECURE") {
            self.security.cookie_secure = parse_var("COOKIE_SECURE", &v)?;
        }

        // Mail overrides
        self.mail.api_key = lookup("RESEND_API_KEY").filter(|s| !s.trim().is_empty());
        if let Some(v) = lookup("MAIL_API_BASE") {
            let parsed = Url::parse(&v).map_err(|e| ConfigError::Invalid {
                var: "MAIL_API_BASE",
                reason: e.to_string(),
            })?;
            self.mail.api_base = parsed.as_str().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("MAIL_FROM") {
            self.mail.from = v;
        }

        if let Some(v) = lookup("INVITATION_POLICY") {
            self.invitation_policy = v.parse().map_err(|reason| ConfigError::Invalid {
                var: "INVITATION_POLICY",
                reason,
            })?;
        }

        Ok(self)
    }

    fn development(jwt_secret: String, database_url: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                public_url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret,
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: false,
            },
            mail: Self::default_mail(),
            invitation_policy: InvitationPolicy::Proceed,
        }
    }

    fn staging(jwt_secret: String, database_url: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                public_url: "https://staging.timey.example.com".to_string(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 10,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret,
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: true,
            },
            mail: Self::default_mail(),
            invitation_policy: InvitationPolicy::Proceed,
        }
    }

    fn production(jwt_secret: String, database_url: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                public_url: "https://timey.example.com".to_string(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 20,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret,
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: true,
            },
            mail: Self::default_mail(),
            invitation_policy: InvitationPolicy::Proceed,
        }
    }

    fn default_mail() -> MailConfig {
        MailConfig {
            api_key: None,
            api_base: DEFAULT_MAIL_API_BASE.to_string(),
            from: "Timey <onboarding@timey.example.com>".to_string(),
        }
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

// Global config - initialized once at startup by the server binary
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Load configuration from the environment and install it as the process-wide config
pub fn init() -> Result<&'static AppConfig, ConfigError> {
    let config = AppConfig::from_env()?;
    CONFIG.set(config).map_err(|_| ConfigError::AlreadyInitialized)?;
    CONFIG.get().ok_or(ConfigError::AlreadyInitialized)
}
