//! Nengo Viz Daemon - live plot backend for a running simulator
//!
//! Connects to a simulator feed and keeps, per widget, a rolling window of
//! filtered samples:
//! - Ingests newline-delimited JSON feed messages
//! - Trims every store and rebuilds its view on each redraw tick
//! - Periodically logs a summary of what is recorded
//!
//! Config file locations:
//! - Linux: ~/.config/nengo_viz/config.json
//! - Windows: %APPDATA%\nengo_viz\config.json
//! - MacOS: ~/Library/Application Support/nengo_viz/config.json

use std::fs;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{error, info, warn};

mod config;
mod paths;
mod session;

use config::VizConfig;
use paths::AppPaths;
use session::{ClientError, Frame, Session};

/// Write `frame` as JSON next to `path`, then move it into place.
fn write_frame(path: &Path, frame: &Frame) -> Result<(), ClientError> {
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_vec_pretty(frame)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

async fn run(cfg: VizConfig, paths: Option<AppPaths>) -> Result<(), ClientError> {
    let stream = TcpStream::connect(&cfg.addr).await?;
    info!("Connected to simulator at {}", cfg.addr);
    let mut lines = BufReader::new(stream).lines();

    let mut session = Session::new(cfg.kept_time, cfg.shown_time);
    let mut render = time::interval(Duration::from_millis(cfg.frame_period_ms()));
    render.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

    let status_period = cfg.status_period();
    let status_enabled = status_period.is_some();
    let mut status = time::interval(status_period.unwrap_or(Duration::from_secs(1)));
    status.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    let dump_path = match (&paths, cfg.dump_views) {
        (Some(paths), true) => {
            paths.ensure_data_dir()?;
            info!("Data directory: {:?}", paths.data_dir());
            info!("Writing views to {:?}", paths.views_file());
            Some(paths.views_file())
        }
        (None, true) => {
            warn!("No data directory available; --dump ignored");
            None
        }
        _ => None,
    };

    let mut last_frame: Option<Frame> = None;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Simulator closed the feed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(e) = session.handle_line(&line) {
                    warn!("Skipping feed message: {}", e);
                }
            }
            _ = render.tick() => {
                last_frame = Some(session.render());
            }
            _ = status.tick(), if status_enabled => {
                let snap = session.snapshot();
                let t = session.clock().borrow().last_time;
                info!(
                    t,
                    widgets = snap.components.len(),
                    samples = snap.total_samples,
                    items = session.items().len(),
                    frames = session.frames(),
                    "status"
                );
                if let (Some(path), Some(frame)) = (&dump_path, &last_frame) {
                    if let Err(e) = write_frame(path, frame) {
                        error!("Failed to write views to {:?}: {}", path, e);
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Ctrl-C: shutting down");
                break;
            }
        }
    }

    if let (Some(path), Some(frame)) = (&dump_path, &last_frame) {
        write_frame(path, frame)?;
        info!("Final views saved to {:?}", path);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let paths = match AppPaths::new() {
        Ok(paths) => {
            info!("Config file: {:?}", paths.config_file());
            Some(paths)
        }
        Err(e) => {
            warn!("Could not determine app directories: {}", e);
            None
        }
    };

    let cfg = VizConfig::load(paths.as_ref().map(AppPaths::config_file))
        .map_err(ClientError::from)?;
    info!(
        "Feed {} at {} fps (kept {}s, shown {}s)",
        cfg.addr, cfg.fps, cfg.kept_time, cfg.shown_time
    );

    if let Err(e) = run(cfg, paths).await {
        error!("Client error: {}", e);
        return Err(e.into());
    }
    Ok(())
}
