/// Settings of the concert admin server, read once at startup.
///
/// Defaults target a local grid frontend on the Vite dev port.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Origins of the grid frontend, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Upper bound on one request, including a whole action batch
    /// (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight batches before the pool closes
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Make field updates conditional on the row version read during
    /// reconciliation (default: `false`).
    pub conditional_writes: bool,
}

impl ServerConfig {
    /// Read the settings, panicking on a malformed value.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `CONDITIONAL_WRITES`   | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let conditional_writes: bool = std::env::var("CONDITIONAL_WRITES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("CONDITIONAL_WRITES must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            conditional_writes,
        }
    }
}
