use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{ControllerEvent, HttpClassifier, PredictionController, SubmitOutcome};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
    task::JoinHandle,
};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

const QUIT_COMMAND: &str = ":quit";

/// Detect the emotion of a sentence with a remote classifier.
#[derive(Parser, Debug)]
struct Args {
    /// Classifier URL, e.g. http://127.0.0.1:5000/predict
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Let a new submission start while one is still in flight.
    #[arg(long)]
    allow_overlap: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read one sentence per line from stdin.
    #[arg(long, short)]
    interactive: bool,
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    settings.apply_cli(args.endpoint, args.timeout_secs, args.allow_overlap);
    let endpoint = settings.endpoint_url()?;
    let classifier = HttpClassifier::new(endpoint.clone(), settings.timeout()?)
        .context("failed to set up classifier client")?;
    let controller = PredictionController::new(Arc::new(classifier), settings.overlap_policy);
    tracing::debug!(
        %endpoint,
        policy = controller.policy().as_str(),
        "classifier ready"
    );

    if args.interactive {
        run_interactive(controller).await?;
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(run_once(&controller, &args.text.join(" ")).await)
    }
}

async fn run_once(controller: &Arc<PredictionController>, text: &str) -> ExitCode {
    controller.set_text(text);
    let view = controller.submit_and_wait().await;
    println!("{}", render::summary(&view));
    if view.error_message.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_interactive(controller: Arc<PredictionController>) -> Result<()> {
    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut renderer = render::StatusRenderer::default();
        loop {
            match events.recv().await {
                Ok(ControllerEvent::StateChanged(view)) => {
                    if let Some(line) = renderer.render(&view) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "status printer lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("Type a sentence to detect emotion ({QUIT_COMMAND} to exit).");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim() == QUIT_COMMAND {
            break;
        }
        controller.set_text(line);
        match controller.submit() {
            SubmitOutcome::Dispatched(handle) => in_flight.push(handle),
            SubmitOutcome::Ignored => println!("{}", render::LOADING_LABEL),
            SubmitOutcome::Rejected => {}
        }
        in_flight.retain(|handle| !handle.is_finished());
    }

    for handle in in_flight {
        if let Err(err) = handle.await {
            tracing::warn!(%err, "prediction task ended without settling");
        }
    }
    // Dropping the last controller handle closes the event channel.
    drop(controller);
    let _ = printer.await;
    Ok(())
}
