use std::env;

/// Process-wide configuration, constructed once at startup and passed into
/// the components that need it. Nothing in the crate reads the environment
/// after this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Display name used in email subjects and sender headers.
    pub shop_name: String,
    /// Sender address handed to the mailer collaborator.
    pub from_email: String,
    /// Currency code stamped on orders and contributions.
    pub currency: String,
    /// Origins the transport layer should allow for CORS.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let cors_origins = env::var("BACKEND_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| Self::default().cors_origins);

        Self {
            shop_name: env::var("FROM_NAME").unwrap_or_else(|_| "Storefront".to_string()),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "orders@storefront.example".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "CHF".to_string()),
            cors_origins,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shop_name: "Storefront".to_string(),
            from_email: "orders@storefront.example".to_string(),
            currency: "CHF".to_string(),
            cors_origins: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.currency, "CHF");
        assert_eq!(config.shop_name, "Storefront");
        assert_eq!(config.cors_origins.len(), 3);
    }
}
