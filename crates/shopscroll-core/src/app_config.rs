use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Store host, e.g. `demo.myshopify.com`.
    pub store_domain: String,
    pub storefront_api_version: String,
    /// Public storefront access token. Never logged.
    pub storefront_token: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Items per page for product listings.
    pub page_size: u32,
    /// Items per page for the collections listing.
    pub collections_page_size: u32,
    /// Distance (px) below the viewport at which the sentinel counts as visible.
    pub look_ahead_px: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_domain", &self.store_domain)
            .field("storefront_api_version", &self.storefront_api_version)
            .field("storefront_token", &"[redacted]")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("page_size", &self.page_size)
            .field("collections_page_size", &self.collections_page_size)
            .field("look_ahead_px", &self.look_ahead_px)
            .finish()
    }
}
