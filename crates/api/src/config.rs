//! Environment-based configuration, read once at startup.

/// Runtime configuration.
///
/// Every field has a development default so `cargo run` works out of the box;
/// missing secrets are logged loudly.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Use the Postgres backend (requires the `postgres` feature and
    /// `DATABASE_URL`). Off by default; the in-memory store is the fallback.
    pub use_postgres: bool,
    pub database_url: Option<String>,
    /// When both are set, an admin identity account is seeded at startup so
    /// a fresh deployment has someone who can sign in.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("COFFEEDOCKET_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("COFFEEDOCKET_JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr = std::env::var("COFFEEDOCKET_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let use_postgres = std::env::var("USE_POSTGRES_STORE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            jwt_secret,
            bind_addr,
            use_postgres,
            database_url: std::env::var("DATABASE_URL").ok(),
            admin_email: std::env::var("COFFEEDOCKET_ADMIN_EMAIL").ok(),
            admin_password: std::env::var("COFFEEDOCKET_ADMIN_PASSWORD").ok(),
        }
    }

    /// In-memory configuration for tests and local tooling.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bind_addr: "127.0.0.1:0".to_string(),
            use_postgres: false,
            database_url: None,
            admin_email: None,
            admin_password: None,
        }
    }
}
