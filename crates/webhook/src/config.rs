use serde::Deserialize;

/// Webhook-ingress-specific configuration. Everything shared by the four
/// subsystems (failure thresholds, cache limits, emergency contacts, ...)
/// lives on `common::RuntimeConfig` instead.
#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub verify_token: String,
    pub api_version: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            verify_token: std::env::var("WEBHOOK_VERIFY_TOKEN").expect("WEBHOOK_VERIFY_TOKEN must be set"),
            api_version: std::env::var("WEBHOOK_API_VERSION").unwrap_or_else(|_| "v23.0".to_string()),
            host: std::env::var("WEBHOOK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("WEBHOOK_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("WEBHOOK_PORT must be a valid number"),
        }
    }

    pub fn listen_address(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port).parse().expect("invalid host or port")
    }
}
