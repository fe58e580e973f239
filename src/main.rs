//! Account Ledger - HTTP entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────┐
//! │ Gateway  │───▶│ Accounts Svc │───▶│ Transfer Eng │───▶│  Store   │
//! │  (axum)  │    │ (+ notifier) │    │ (key locks)  │    │ (DashMap)│
//! └──────────┘    └──────────────┘    └──────────────┘    └──────────┘
//! ```

use std::sync::Arc;

use clap::Parser;

use account_ledger::config::AppConfig;
use account_ledger::gateway::{self, state::AppState};
use account_ledger::{AccountsService, LoggingNotificationService};

#[derive(Parser, Debug)]
#[command(version, about = "In-memory account ledger with atomic transfers")]
struct Cli {
    /// Config environment, reads config/<env>.yaml
    #[arg(short, long, default_value = "dev")]
    env: String,

    /// Override the gateway port from the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load(&cli.env)?;
    let _log_guard = account_ledger::logging::init_logging(&app_config);

    tracing::info!(
        build = env!("LEDGER_BUILD_REV"),
        "Starting account ledger in {} mode",
        cli.env
    );

    let policy = app_config.transfer.lock_policy;
    tracing::info!(lock_policy = ?policy, "Transfer engine configured");

    let service = Arc::new(AccountsService::in_memory(
        policy,
        Arc::new(LoggingNotificationService),
    ));
    let state = Arc::new(AppState::new(service));

    let port = cli.port.unwrap_or(app_config.gateway.port);
    gateway::run_server(&app_config.gateway.host, port, state).await
}
