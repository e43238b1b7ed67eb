use clap::Parser;

/// Runtime configuration, read from flags or the environment.
#[derive(Debug, Parser)]
#[command(
    name = "estate-server",
    about = "Read-only reporting API for property-management records",
    version
)]
pub struct Config {
    /// Postgres connection URL for the report store
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Address to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum store pool connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_given() {
        let config =
            Config::try_parse_from(["estate-server", "--database-url", "postgres://localhost/r"])
                .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "estate-server",
            "--database-url",
            "postgres://localhost/r",
            "--port",
            "9090",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
    }
}
