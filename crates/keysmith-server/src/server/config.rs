use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `keysmith-server` binary.
///
/// These settings control the listen address, the backing database, and
/// the behavior of the background provisioning engine. All values are
/// parsed from CLI arguments or environment variables, with reasonable
/// defaults suitable for local use.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "keysmith-server",
    version,
    about = "An HTTP service for asynchronous validator key provisioning"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// SQLite database URL the request and key records are persisted to.
    ///
    /// The database file and schema are created on startup if missing.
    ///
    /// Environment variable: `DATABASE_URL`
    #[arg(long, env = "DATABASE_URL", default_value_t = String::from("sqlite:validators.db"))]
    pub database_url: String,

    /// Maximum number of validator keys allowed per client request.
    ///
    /// This value is enforced server-side to prevent a single submission
    /// from monopolizing the generator backend or exhausting storage.
    /// Clients may request fewer keys.
    ///
    /// Environment variable: `MAX_KEYS_PER_REQUEST`
    #[arg(long, env = "MAX_KEYS_PER_REQUEST", default_value_t = 10_000)]
    pub max_keys_per_request: u32,

    /// Simulated latency of a single key generation, in milliseconds.
    ///
    /// Stands in for the cost of a real cryptographic or external signing
    /// backend. Applies per key; a request for `n` keys takes at least
    /// `n * latency` to complete.
    ///
    /// Environment variable: `KEYGEN_LATENCY_MS`
    #[arg(long, env = "KEYGEN_LATENCY_MS", default_value_t = 20)]
    pub keygen_latency_ms: u64,

    /// How long to wait for in-flight provisioning jobs to finish during
    /// graceful shutdown, in seconds.
    ///
    /// Jobs still running after this window are cancelled at their next
    /// generation suspension point and leave their request in the
    /// `started` state.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT_SECS`
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub database_url: String,
    pub max_keys_per_request: u32,
    pub keygen_latency: Duration,
    pub shutdown_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_keys_per_request == 0 {
            bail!("MAX_KEYS_PER_REQUEST must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            database_url: args.database_url,
            max_keys_per_request: args.max_keys_per_request,
            keygen_latency: Duration::from_millis(args.keygen_latency_ms),
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout_secs),
        })
    }
}
