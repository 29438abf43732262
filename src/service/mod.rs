//! Bootstraps [`InMemoryLedger`] behind an HTTP interface. Not part of the
//! ledger core; kept in the library so integration tests can drive it.

use std::{
    fs::File,
    io::Read,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::ledger::{Ledger, in_memory_ledger::InMemoryLedger};
use seed_parser::{CsvSeedParser, DEFAULT_SEED};

pub mod routes;
pub mod seed_parser;
pub mod telemetry;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    /// CSV file replacing the built-in seed accounts.
    pub seed_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Seed file from the first argument, bind address from `LEDGER_ADDR`.
    pub fn from_env() -> Result<Self> {
        let seed_path = std::env::args().nth(1).map(PathBuf::from);
        let addr = std::env::var("LEDGER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("Invalid bind address `{addr}`"))?;
        Ok(Self { addr, seed_path })
    }
}

/// Seeds `ledger` from CSV, failing on the first bad row or duplicate name.
pub fn load_seed<L, R>(ledger: &L, source: R) -> Result<usize>
where
    L: Ledger + ?Sized,
    R: Read,
{
    let mut count = 0;
    for (line, row) in CsvSeedParser::new(source) {
        let record = row.with_context(|| format!("Malformed seed record after line {line}"))?;
        ledger
            .seed(&record.name, &record.pin, record.balance)
            .with_context(|| format!("Cannot seed account after line {line}"))?;
        tracing::info!(account = %record.name, balance = %record.balance, "account seeded");
        count += 1;
    }
    Ok(count)
}

pub struct Service {
    pub config: ServiceConfig,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn build_ledger(&self) -> Result<InMemoryLedger> {
        let ledger = InMemoryLedger::new();
        let count = match &self.config.seed_path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open `{}`", path.display()))?;
                load_seed(&ledger, file)?
            }
            None => load_seed(&ledger, DEFAULT_SEED.as_bytes())?,
        };
        tracing::info!(accounts = count, "ledger ready");
        Ok(ledger)
    }

    pub async fn run(self) -> Result<()> {
        let ledger = Arc::new(self.build_ledger()?);
        let app = routes::router(ledger);

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.addr))?;
        tracing::info!(addr = %listener.local_addr()?, "listening");

        axum::serve(listener, app)
            .await
            .context("Server terminated unexpectedly")
    }
}
