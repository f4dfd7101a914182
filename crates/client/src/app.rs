use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use botshell_core::capture::StreamCapture;
use botshell_core::config::ShellConfig;
use botshell_core::error::{ShellError, WindowError};
use botshell_core::severity::Rgb;
use botshell_core::sink::{ConsoleSink, LineFormat, SinkHandle};
use botshell_core::streams::{SharedWriter, StdStreams};
use botshell_core::surface::ConsoleSurface;

use crate::bot::{Bot, BotContext, ShutdownHandle, UiHandle, UiRequest};
use crate::dialog::Dialog;
use crate::event::Event;
use crate::status::{AppState, StatusIndicator};
use crate::theme::{STATUS_ERROR_COLOR, STATUS_RUNNING_COLOR};
use crate::view::ShellView;
use crate::window::Window;

/// Initialization parameters for App.
pub struct AppInit<W> {
    pub config: ShellConfig,
    pub window: W,
    /// Attach point of the console layer in the global subscriber.
    pub sink: SinkHandle,
    pub streams: StdStreams,
    /// Receives a copy of everything written to the redirected streams.
    pub mirror: Box<dyn Write + Send>,
    pub shutdown: ShutdownHandle,
}

/// Window shell that supervises one bot task.
pub struct App<W: Window> {
    title: String,
    window: W,
    state: AppState,
    running: bool,
    status: StatusIndicator,
    dialog: Option<Dialog>,
    poll_interval: Duration,
    surface: ConsoleSurface,
    sink: ConsoleSink,
    sink_handle: SinkHandle,
    capture: Arc<Mutex<StreamCapture>>,
    streams: StdStreams,
    shutdown: ShutdownHandle,
    ui: UiHandle,
    ui_rx: mpsc::UnboundedReceiver<UiRequest>,
}

impl<W: Window> App<W> {
    pub fn new(init: AppInit<W>) -> Result<Self, ShellError> {
        let AppInit {
            config,
            mut window,
            sink: sink_handle,
            streams,
            mirror,
            shutdown,
        } = init;

        let console = &config.console;
        if console.log_capacity == 0 || console.stream_capacity == 0 {
            return Err(ShellError::Config(
                "console capacities must be at least one line".into(),
            ));
        }

        window.set_title(&config.window.title)?;

        let surface = ConsoleSurface::new(console.log_capacity.max(console.stream_capacity));
        let sink = ConsoleSink::new(surface.clone(), console.log_capacity)
            .with_min_severity(console.min_severity)
            .with_format(LineFormat {
                show_time: console.show_time,
                show_target: console.show_target,
            });
        let capture = Arc::new(Mutex::new(StreamCapture::new(
            surface.clone(),
            mirror,
            console.stream_capacity,
        )));
        let (ui, ui_rx) = UiHandle::channel();

        Ok(Self {
            title: config.window.title.clone(),
            window,
            state: AppState::NotStarted,
            running: false,
            status: StatusIndicator::default(),
            dialog: None,
            poll_interval: config.poll_interval(),
            surface,
            sink,
            sink_handle,
            capture,
            streams,
            shutdown,
            ui,
            ui_rx,
        })
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    /// The capture adapter as the streams see it while redirected.
    pub fn capture_writer(&self) -> SharedWriter {
        self.capture.clone()
    }

    /// Everything the bot printed during this shell's lifetime.
    pub fn captured_output(&self) -> String {
        self.capture
            .lock()
            .map(|c| c.captured().to_string())
            .unwrap_or_default()
    }

    pub fn bot_context(&self) -> BotContext {
        BotContext {
            stdout: self.streams.stdout.clone(),
            stderr: self.streams.stderr.clone(),
            shutdown: self.shutdown.subscribe(),
            ui: self.ui.clone(),
        }
    }

    /// Route log records and both output streams into the console.
    pub fn add_logging_handler(&mut self) {
        self.sink_handle.attach(self.sink.clone());
        self.streams.redirect_all(self.capture_writer());
        debug!("Console logging handler added");
    }

    pub fn remove_logging_handler(&mut self) {
        self.streams.restore_all();
        self.sink_handle.detach();
        debug!("Console logging handler removed");
    }

    /// Set the status label and redraw right away.
    pub fn update_status(&mut self, text: &str, color: Rgb) {
        self.status = StatusIndicator {
            text: text.to_string(),
            color,
        };
        debug!(%color, "Status: {}", text);
        if let Err(e) = self.redraw() {
            debug!("Status redraw skipped: {}", e);
        }
    }

    pub async fn show_info(&mut self, title: &str, message: &str) {
        self.run_modal(Dialog::info(title, message)).await;
    }

    pub async fn show_error(&mut self, title: &str, message: &str) {
        self.run_modal(Dialog::error(title, message)).await;
    }

    /// Pump until the dialog is dismissed, the shell is asked to close, or the
    /// window goes away.
    async fn run_modal(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        while self.dialog.is_some() {
            if self.shutdown.is_triggered() {
                debug!("Dialog closed by shutdown");
                self.dialog = None;
                break;
            }
            if let Err(e) = self.pump() {
                debug!("Dialog abandoned: {}", e);
                self.dialog = None;
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn request_close(&mut self) {
        info!("Shutdown signal received from window");
        self.running = false;
        self.shutdown.trigger();
    }

    fn redraw(&mut self) -> Result<(), WindowError> {
        let view = ShellView {
            title: &self.title,
            state: self.state,
            status: &self.status,
            console: self.surface.snapshot().ok(),
            dialog: self.dialog.as_ref(),
        };
        self.window.draw(&view)
    }

    /// Service the window once: redraw, then handle queued input.
    fn pump(&mut self) -> Result<(), WindowError> {
        self.redraw()?;
        for event in self.window.poll_events()? {
            self.handle_event(event);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            // Picked up by the next draw.
            Event::Resize(_, _) => {}
            Event::CloseRequested => self.request_close(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dialog = None;
            }
            return;
        }
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.request_close();
        }
    }

    async fn drain_ui_requests(&mut self) {
        while let Ok(request) = self.ui_rx.try_recv() {
            match request {
                UiRequest::Status { text, color } => self.update_status(&text, color),
                UiRequest::Info { title, message } => self.show_info(&title, &message).await,
                UiRequest::Error { title, message } => self.show_error(&title, &message).await,
            }
        }
    }

    /// Run `bot` as a background task and drive the window until either ends.
    ///
    /// Never fails: bot errors land in the status bar and the log, and the
    /// window is torn down on every exit path.
    pub async fn run_with_bot<F>(&mut self, bot: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let session = Uuid::new_v4();
        self.running = true;
        self.state = AppState::Running;
        self.add_logging_handler();
        info!(%session, "Shell loop starting");

        self.update_status("Bot running...", STATUS_RUNNING_COLOR);
        let mut task = tokio::spawn(bot);
        let mut settled = false;

        while self.running {
            if self.shutdown.is_triggered() {
                info!("External shutdown requested");
                break;
            }

            if let Err(e) = self.pump() {
                debug!("Window closed: {}", e);
                break;
            }
            self.drain_ui_requests().await;

            if task.is_finished() {
                self.settle(&mut task).await;
                settled = true;
                break;
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        self.state = AppState::ShuttingDown;
        if !settled {
            self.shutdown.trigger();
            task.abort();
            self.settle(&mut task).await;
        }

        self.finish();
        info!(%session, "Shell loop finished");
    }

    async fn settle(&mut self, task: &mut JoinHandle<anyhow::Result<()>>) {
        match task.await {
            Ok(Ok(())) => info!("Bot task finished"),
            Ok(Err(err)) => {
                error!("Error in bot task: {:#}", err);
                self.update_status(&format!("Error: {}", err), STATUS_ERROR_COLOR);
            }
            Err(join) if join.is_cancelled() => debug!("Bot task cancelled"),
            Err(join) => {
                error!("Bot task panicked: {}", join);
                self.update_status("Error: bot task panicked", STATUS_ERROR_COLOR);
            }
        }
    }

    fn finish(&mut self) {
        self.running = false;
        self.remove_logging_handler();
        if let Err(e) = self.window.destroy() {
            debug!("Window teardown: {}", e);
        }
        self.surface.destroy();
        self.state = AppState::Terminated;
    }
}

/// Build a shell titled after `bot` and run it to completion.
pub async fn run_app_with_bot<W: Window>(
    mut bot: Box<dyn Bot>,
    mut init: AppInit<W>,
) -> anyhow::Result<()> {
    init.config.window.title = format!("{} - ver. {}", bot.name(), bot.version());

    let mut app = App::new(init).map_err(|e| {
        error!("Error running shell with bot: {}", e);
        e
    })?;

    let ctx = app.bot_context();
    app.run_with_bot(async move { bot.start(ctx).await }).await;
    debug!(
        state = app.state().label(),
        running = app.is_running(),
        captured_bytes = app.captured_output().len(),
        "Shell finished"
    );
    Ok(())
}
