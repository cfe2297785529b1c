//! Helix console — interactive session front-end.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Build the provider chain and run the console loop
//!
//! The console is presentation only: it reads lines, hands them to the
//! session controller, and renders the reply plus the DNA panel. All
//! routing and merging decisions live in the library.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use helix_bot::config;
use helix_bot::error::AppError;
use helix_bot::inference::providers;
use helix_bot::logger;
use helix_bot::profile::{FIELDS, ProfileState};
use helix_bot::session::{SessionController, SubmitOutcome};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        bot_name = %config.bot_name,
        primary_configured = config.router.primary_endpoint.is_some(),
        "config loaded"
    );

    let chain = providers::build_chain(&config.router)
        .map_err(|e| AppError::Config(format!("provider chain: {e}")))?;
    let mut session = SessionController::new(chain);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    println!("──────────────────────────────────────────");
    println!(" {} console  (Ctrl-C to quit)", config.bot_name);
    println!(" session: {}", session.profile().session_id);
    println!("──────────────────────────────────────────");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!("\nsession closed");
                info!("shutdown signal received");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("stdin read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        if input.trim().is_empty() {
                            continue;
                        }
                        println!("analyzing...");
                        if session.submit(&input).await == SubmitOutcome::Replied {
                            if let Some(last) = session.transcript().last() {
                                println!("{}", last.text);
                            }
                            print!("{}", render_panel(session.profile()));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// "Business DNA" panel: integrity score plus the five slots, unset ones
/// shown as awaiting data.
fn render_panel(profile: &ProfileState) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  BUSINESS DNA  [integrity {}%]\n",
        profile.completeness()
    ));
    for name in FIELDS {
        let label = name.replace('_', " ");
        let value = profile.field(name).unwrap_or("Awaiting data...");
        out.push_str(&format!("  {label:<22} {value}\n"));
    }
    out
}
