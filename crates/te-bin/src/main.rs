//! te entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::dispatch_key;
use core_actions::io_ops::{OpenOutcome, open_file};
use core_config::{ConfigContext, load_from};
use core_input::{CrosstermKeySource, KeySource};
use core_render::Renderer;
use core_state::{BlockClipboard, ClipboardService, EditorState, RenderRequest, ViewState};
use core_terminal::{CrosstermBackend, CrosstermSink, ScreenGeometry, TerminalBackend};
use core_text::GapBuffer;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "te.log";

#[derive(Parser, Debug)]
#[command(name = "te", version, about = "Gap-buffer text editor")]
struct Args {
    /// File to edit. Created on first save if it does not exist.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `te.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct EditorBootstrap {
    state: EditorState,
    clipboard: BlockClipboard,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                core_terminal::emergency_restore();
                default_panic(info);
            }));
        });
    }

    fn load_editor_state(args: &Args) -> Result<EditorBootstrap> {
        let mut config = load_from(args.config.clone())?;
        let geometry = ScreenGeometry::detect();
        let tab_width = config.apply_context(ConfigContext::new(geometry.cols, geometry.rows));

        // Without text storage there is nothing to edit.
        let buffer = GapBuffer::with_capacity(config.buffer_capacity())?;
        let mut view = ViewState::new(geometry.cols as usize, geometry.rows as usize, tab_width);
        view.double_spacing = config.file.editor.double_spacing;
        let mut state = EditorState::new(buffer, view, config.undo_depth());
        state.enter_terminator = config.enter_terminator();

        let clipboard = if config.file.clipboard.enabled {
            match BlockClipboard::acquire(config.file.clipboard.capacity) {
                Ok(clip) => {
                    state.set_status(format!(
                        "{}K clipboard initialized",
                        clip.capacity() / 1024
                    ));
                    clip
                }
                Err(e) => {
                    error!(target: "runtime", ?e, "clipboard_unavailable");
                    state.set_status("Warning: No clipboard (no memory available)");
                    BlockClipboard::disabled()
                }
            }
        } else {
            state.set_status("Warning: No clipboard (disabled in config)");
            BlockClipboard::disabled()
        };

        if let Some(path) = args.path.as_ref() {
            let outcome = open_file(&mut state, path);
            if outcome == OpenOutcome::Failed {
                // Keep the name so a save writes where the user asked.
                state.file_name = path.clone();
            }
        }

        info!(
            target: "runtime.startup",
            cols = geometry.cols,
            rows = geometry.rows,
            tab_width,
            capacity = state.buffer.capacity(),
            bytes = state.len(),
            clipboard = clipboard.is_available(),
            config_override = args.config.is_some(),
            "bootstrap_complete"
        );
        Ok(EditorBootstrap { state, clipboard })
    }
}

struct EditorRuntime {
    state: EditorState,
    clipboard: BlockClipboard,
    renderer: Renderer,
    keys: CrosstermKeySource,
}

impl EditorRuntime {
    fn new(bootstrap: EditorBootstrap) -> Self {
        let EditorBootstrap { state, clipboard } = bootstrap;
        Self {
            state,
            clipboard,
            renderer: Renderer::new(),
            keys: CrosstermKeySource::default(),
        }
    }

    fn render(&mut self, sink: &mut CrosstermSink<std::io::Stdout>) {
        if let Err(e) = self.renderer.render_pending(&mut self.state, sink) {
            error!(target: "render.engine", ?e, "render_error");
        }
    }

    /// Poll, dispatch, render until a confirmed quit.
    fn run(&mut self) -> Result<()> {
        let mut sink = CrosstermSink::stdout();
        self.state.request(RenderRequest::Full);
        self.state.render.mark_title();
        self.render(&mut sink);

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();
        loop {
            let Some(key) = self.keys.poll()? else {
                continue;
            };
            let result = dispatch_key(key, &mut self.state, &mut self.clipboard);
            if result.quit {
                break;
            }
            self.render(&mut sink);
        }
        Ok(())
    }

    fn shutdown(mut self) {
        info!(target: "runtime.shutdown", dirty = self.state.dirty, "shutdown_stage");
        self.clipboard.release();
        let snapshot = self.renderer.engine.metrics_snapshot();
        tracing::debug!(target: "runtime.shutdown", ?snapshot, "render_metrics");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let bootstrap = AppStartup::load_editor_state(&args)?;
    let mut runtime = EditorRuntime::new(bootstrap);

    startup.backend.set_title("te")?;
    let result = {
        let _guard = startup.backend.enter_guard()?;
        runtime.run()
    };
    runtime.shutdown();
    if let Err(e) = &result {
        error!(target: "runtime", ?e, "runtime_error");
    }
    info!(target: "runtime", "exit");
    result
}
