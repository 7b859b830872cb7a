use std::path::PathBuf;

static DATABASE_PATH: &str = "DATABASE_PATH";
static BIND_ADDR: &str = "BIND_ADDR";

/// Process configuration, resolved once at startup and passed explicitly to
/// whatever needs it.
pub struct Config {
    /// Location of the SQLite database file. Parent directories are created
    /// on store open. Deployments with a read-only working directory (e.g.
    /// serverless) should point this somewhere writable like /tmp.
    pub database_path: PathBuf,

    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Config {
        let database_path = std::env::var(DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/portal-auth.db"));
        let bind_addr =
            std::env::var(BIND_ADDR).unwrap_or_else(|_| "localhost:8080".to_string());

        Config {
            database_path,
            bind_addr,
        }
    }
}
