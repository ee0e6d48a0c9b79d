//! # Radius Locator Application Entry Point
//!
//! This binary wires the location controller to a terminal event loop. It reads
//! button presses and radius edits from stdin, applies location outcomes as they
//! arrive, and presents the widget as ASCII and optionally as a PBM frame.

// Test modules
#[cfg(test)]
mod tests;

mod command;

use anyhow::{Context, Result};
use command::{CliArgs, Command, USAGE};
use radius_locator_lib::{
    config::Config,
    controller::{Acquisition, LocationController},
    framebuffer::FrameBuffer,
    location::PlatformLocator,
    renderer::{draw_ascii, draw_frame, timestamp_label},
    view::WidgetView,
};
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Present the current view on every configured output.
fn present(view: &WidgetView, args: &CliArgs, config: &Config) -> Result<()> {
    if args.print_ascii() {
        draw_ascii(view);
        println!();
    }

    if let Some(path) = &args.pbm {
        let mut frame = FrameBuffer::new(config.display.width, config.display.height);
        let updated = timestamp_label(&chrono::Local::now());
        draw_frame(view, &mut frame, Some(&updated))?;
        frame
            .write_pbm(path)
            .with_context(|| format!("writing frame to {}", path.display()))?;
        debug!(path = %path.display(), "frame written");
    }

    Ok(())
}

async fn run(args: CliArgs, config: Config) -> Result<()> {
    let capability =
        PlatformLocator::from_config(&config.location).context("setting up location source")?;
    if capability.is_none() {
        info!("location source disabled, widget will report unsupported");
    }

    let controller = LocationController::new(capability, config.request.clone());
    let mut view = WidgetView::from_config(&config);
    controller.initialize(&mut view);

    if args.once {
        controller.click(&mut view).await;
        return present(&view, &args, &config);
    }

    present(&view, &args, &config)?;
    println!("{}\n", USAGE);

    // Outcomes come back over this channel so the loop stays the only writer
    // of the view, even with several requests in flight.
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Acquisition>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    debug!("stdin closed");
                    break;
                };

                match Command::parse(&line) {
                    Ok(None) => continue,
                    Ok(Some(Command::Locate)) => {
                        if let Some(acquisition) = controller.press_button(&mut view) {
                            let outcome_tx = outcome_tx.clone();
                            tokio::spawn(async move {
                                let _ = outcome_tx.send(acquisition.await);
                            });
                        }
                    }
                    Ok(Some(Command::Radius(raw))) => controller.edit_radius(&mut view, &raw),
                    Ok(Some(Command::Show)) => {}
                    Ok(Some(Command::Help)) => {
                        println!("{}\n", USAGE);
                        continue;
                    }
                    Ok(Some(Command::Quit)) => break,
                    Err(e) => {
                        warn!(error = %e, "ignoring input");
                        continue;
                    }
                }
                present(&view, &args, &config)?;
            }
            Some(outcome) = outcome_rx.recv() => {
                controller.complete_request(&mut view, outcome);
                present(&view, &args, &config)?;
            }
        }
    }

    Ok(())
}

/// Main application entry point.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    // Single-threaded: every view update happens on this thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(run(args, config))
}
