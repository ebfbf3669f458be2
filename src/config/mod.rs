use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup and handed to the
/// components that need it. Nothing reads it through a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres URL. When unset the server falls back to the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub session_timeout_secs: u64,
    pub max_login_attempts: u32,
    pub login_lockout_secs: u64,
    pub password_min_length: usize,
    pub bcrypt_cost: u32,
    pub require_https: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5MB
            allowed_extensions: ["jpg", "jpeg", "png", "pdf", "doc", "docx"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(v) = env::var("COLLEGE_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        override_from_env("API_ENABLE_REQUEST_LOGGING", &mut self.api.enable_request_logging);
        override_from_env("API_MAX_REQUEST_SIZE_BYTES", &mut self.api.max_request_size_bytes);

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        override_from_env("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_from_env("DATABASE_CONNECTION_TIMEOUT", &mut self.database.connection_timeout);

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        let security = &mut self.security;
        override_from_env("SECURITY_SESSION_TIMEOUT_SECS", &mut security.session_timeout_secs);
        override_from_env("SECURITY_MAX_LOGIN_ATTEMPTS", &mut security.max_login_attempts);
        override_from_env("SECURITY_LOGIN_LOCKOUT_SECS", &mut security.login_lockout_secs);
        override_from_env("SECURITY_PASSWORD_MIN_LENGTH", &mut security.password_min_length);
        override_from_env("SECURITY_BCRYPT_COST", &mut security.bcrypt_cost);
        override_from_env("SECURITY_REQUIRE_HTTPS", &mut security.require_https);
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            security.cors_origins = split_list(&v).collect();
        }

        // Upload overrides
        override_from_env("UPLOAD_MAX_FILE_SIZE_BYTES", &mut self.upload.max_file_size_bytes);
        if let Ok(v) = env::var("UPLOAD_ALLOWED_EXTENSIONS") {
            self.upload.allowed_extensions = split_list(&v)
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                session_timeout_secs: 3600,
                max_login_attempts: 5,
                login_lockout_secs: 300,
                password_min_length: 8,
                bcrypt_cost: 10,
                require_https: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            upload: UploadConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 6 * 1024 * 1024, // 6MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET; token issuance fails while empty
                jwt_secret: String::new(),
                session_timeout_secs: 3600,
                max_login_attempts: 5,
                login_lockout_secs: 300,
                password_min_length: 8,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                require_https: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            upload: UploadConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 6 * 1024 * 1024, // 6MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_timeout_secs: 3600,
                max_login_attempts: 5,
                login_lockout_secs: 300,
                password_min_length: 8,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                require_https: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            upload: UploadConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

/// Replaces `target` when `name` is set and parses; bad values keep the preset.
fn override_from_env<T: FromStr>(name: &str, target: &mut T) {
    if let Some(value) = env::var(name).ok().and_then(|v| v.parse().ok()) {
        *target = value;
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}
