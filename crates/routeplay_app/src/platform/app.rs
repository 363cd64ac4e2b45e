use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use routeplay_core::{update, AppState, JobRequest, Msg, UploadedFile};
use routeplay_engine::{ChannelEventSink, EngineEvent, JobController, ReqwestBackend};
use routeplay_logging::{rp_info, rp_warn};
use tokio::sync::mpsc;

use super::cli::Cli;
use super::config::{load_config, AppConfig};
use super::effects::{map_event, EffectRunner, Flow};
use super::ui::render::{render, TerminalRenderer};

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    routeplay_logging::initialize(cli.log.into(), cli.log_level());

    let config = load_config(&cli.config).apply_cli(&cli);
    if cli.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let upload = cli.file.as_deref().map(read_upload).transpose()?;
    let request = JobRequest::from_inputs(upload, config.sample.clone());
    if request.is_blank() {
        rp_warn!("No --file or --sample given; the server will reject an empty sample id");
    }

    // One thread: network reads and playback ticks interleave cooperatively.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(run_session(config, request))
}

fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.geojson".to_string());
    Ok(UploadedFile { file_name, bytes })
}

async fn run_session(config: AppConfig, request: JobRequest) -> anyhow::Result<()> {
    let backend_settings = config.backend_settings()?;
    let base_url = backend_settings.base_url.clone();
    let backend = Arc::new(ReqwestBackend::new(backend_settings)?);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<EngineEvent>();
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();
    install_interrupt_handler(msg_tx.clone())?;

    let controller = JobController::new(
        backend,
        Arc::new(ChannelEventSink::new(event_tx)),
        config.controller_settings(),
    );
    let mut runner = EffectRunner::new(controller);
    let mut renderer = TerminalRenderer::new();
    let mut state = AppState::new();

    let _ = msg_tx.send(Msg::StartRequested(request));

    loop {
        let msg = tokio::select! {
            Some(msg) = msg_rx.recv() => msg,
            Some(event) = event_rx.recv() => map_event(event),
            else => break,
        };

        let (next, effects) = update(state, msg);
        state = next;
        let flow = runner.run(effects);

        if state.consume_dirty() {
            renderer.present(render(&state.view(), &base_url));
        }
        if flow == Flow::Quit {
            break;
        }
        if state.phase().is_terminal() {
            runner.settle().await;
            // Late events such as saved downloads still reach the screen.
            while let Ok(event) = event_rx.try_recv() {
                let (next, _) = update(state, map_event(event));
                state = next;
            }
            if state.consume_dirty() {
                renderer.present(render(&state.view(), &base_url));
            }
            break;
        }
    }

    rp_info!("Session ended in phase {:?}", state.phase());
    Ok(())
}

/// Ctrl-C cancels a streaming job; when nothing is left to cancel it quits.
fn install_interrupt_handler(msg_tx: mpsc::UnboundedSender<Msg>) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        let _ = msg_tx.send(Msg::InterruptRequested);
    })
    .context("installing Ctrl-C handler")
}
