use crate::app;
use crate::app::state::Upstreams;
use crate::healthcheck::{DEFAULT_HTTP_PORT, healthcheck_with_port};
use crate::queue::{POLL_INTERVAL, QueueMonitor, QueueSnapshot};
use crate::refresh::{RefreshCoordinator, RefreshOutcome};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Probe /v1/health on localhost; exits non-zero when unhealthy.
    Healthcheck {
        #[arg(long, env = "HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
        port: u16,
    },
    /// Force-refresh both sitemaps once and print the report.
    Refresh,
    /// Print the indexing queue status.
    Queue {
        /// Keep polling every 5 seconds until interrupted.
        #[arg(long)]
        watch: bool,
    },
}

impl Cli {
    /// # Errors
    /// Startup failures, a failed health probe, or an unreadable queue
    /// without `--watch`. A failed refresh is reported, not returned.
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => app::run().await.context("server failed"),
            Command::Healthcheck { port } => {
                healthcheck_with_port(port).await?;
                Ok(())
            }
            Command::Refresh => {
                app::tracing::init_tracing();
                let settings = app::load_settings()?;
                let upstreams = Upstreams::from_settings(&settings)?;
                refresh_once(&RefreshCoordinator::new(upstreams.site, &settings.refresh_url)).await
            }
            Command::Queue { watch } => {
                app::tracing::init_tracing();
                let settings = app::load_settings()?;
                let upstreams = Upstreams::from_settings(&settings)?;
                let monitor = QueueMonitor::new(upstreams.queue);
                if watch {
                    let token = CancellationToken::new();
                    app::server::cancel_on_signal(token.clone());
                    watch_queue(&monitor, token).await;
                    Ok(())
                } else {
                    let snapshot = monitor
                        .snapshot()
                        .await
                        .context("failed to read indexing queue")?;
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                    Ok(())
                }
            }
        }
    }
}

async fn refresh_once(coordinator: &RefreshCoordinator) -> anyhow::Result<()> {
    let report = coordinator.force_refresh_sitemaps().await;
    let refresh = match &report.refresh {
        RefreshOutcome::Refreshed => json!({ "status": "refreshed" }),
        RefreshOutcome::RecoveredViaFallback { primary_error } => json!({
            "status": "recovered_via_fallback",
            "primaryError": primary_error,
        }),
        RefreshOutcome::Failed {
            primary_error,
            fallback_error,
        } => json!({
            "status": "failed",
            "primaryError": primary_error,
            "fallbackError": fallback_error,
        }),
    };
    let summary = json!({
        "success": report.is_success(),
        "refresh": refresh,
        "articleSitemapUpdated": report.article_sitemap_updated,
        "valid": report.valid,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn watch_queue(monitor: &QueueMonitor, token: CancellationToken) {
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    let mut last: Option<QueueSnapshot> = None;

    loop {
        tokio::select! {
            () = token.cancelled() => {
                info!("queue watch stopped");
                return;
            }
            _ = interval.tick() => {
                match monitor.snapshot().await {
                    Ok(snapshot) => {
                        if last.as_ref().map(|s| s.summary) != Some(snapshot.summary) {
                            println!(
                                "total={} pending={} processing={} completed={} failed={}",
                                snapshot.summary.total,
                                snapshot.summary.pending,
                                snapshot.summary.processing,
                                snapshot.summary.completed,
                                snapshot.summary.failed,
                            );
                        }
                        last = Some(snapshot);
                    }
                    Err(e) => warn!(error = %e, "queue poll failed, retrying next tick"),
                }
            }
        }
    }
}
