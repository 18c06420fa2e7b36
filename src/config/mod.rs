use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub deployment: DeploymentMode,
    pub backend: BackendConfig,
    pub gate: GateConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Where this process is running, which decides how the backend is addressed:
/// container-to-container via the internal service hostname, or a local
/// development address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentMode {
    Container,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend address when running container-to-container
    pub internal_url: String,
    /// Backend address for local development
    pub local_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Redirect target for unauthenticated requests
    pub login_path: String,
    /// Redirect target for authenticated-but-unauthorized requests
    pub default_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_request_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("CONSOLE_ENV").as_deref() {
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

    /// Resolve the backend base address for the current deployment mode.
    ///
    /// Pure function of the injected configuration; callers re-invoke it per
    /// request rather than caching the result.
    pub fn backend_base_url(&self) -> &str {
        match self.deployment {
            DeploymentMode::Container => &self.backend.internal_url,
            DeploymentMode::Local => &self.backend.local_url,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Deployment mode override
        match env::var("CONSOLE_DEPLOYMENT").as_deref() {
            Ok("container") | Ok("docker") => self.deployment = DeploymentMode::Container,
            Ok("local") => self.deployment = DeploymentMode::Local,
            _ => {}
        }

        // Backend address overrides
        if let Ok(v) = env::var("CONSOLE_BACKEND_INTERNAL_URL") {
            self.backend.internal_url = v;
        }
        if let Ok(v) = env::var("CONSOLE_BACKEND_LOCAL_URL") {
            self.backend.local_url = v;
        }

        // Gate overrides
        if let Ok(v) = env::var("CONSOLE_LOGIN_PATH") {
            self.gate.login_path = v;
        }
        if let Ok(v) = env::var("CONSOLE_DEFAULT_PATH") {
            self.gate.default_path = v;
        }

        // API overrides
        if let Ok(v) = env::var("CONSOLE_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }
        if let Ok(v) = env::var("CONSOLE_CORS_ORIGINS") {
            self.api.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("CONSOLE_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            deployment: DeploymentMode::Local,
            backend: BackendConfig {
                internal_url: "http://backend:8000".to_string(),
                local_url: "http://localhost:8000".to_string(),
            },
            gate: GateConfig {
                login_path: "/login".to_string(),
                default_path: "/".to_string(),
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enable_request_logging: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            deployment: DeploymentMode::Container,
            backend: BackendConfig {
                internal_url: "http://backend:8000".to_string(),
                local_url: "http://localhost:8000".to_string(),
            },
            gate: GateConfig {
                login_path: "/login".to_string(),
                default_path: "/".to_string(),
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec!["https://console.staging.example.com".to_string()],
                enable_request_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            deployment: DeploymentMode::Container,
            backend: BackendConfig {
                internal_url: "http://backend:8000".to_string(),
                local_url: "http://localhost:8000".to_string(),
            },
            gate: GateConfig {
                login_path: "/login".to_string(),
                default_path: "/".to_string(),
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec!["https://console.example.com".to_string()],
                enable_request_logging: false,
            },
        }
    }
}
