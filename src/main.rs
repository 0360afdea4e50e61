// Relay Chat GUI - Main Entry Point
// Native chat client talking to the relay backend's /api/chat proxy

mod api_client;
mod auth;
mod config;
mod state;
mod ui;

use std::future::Future;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use chrono::Utc;
use eframe::egui;
use tracing::{info, warn};

use api_client::ChatClient;
use auth::{initialize_session, IdentityProvider, StaticTokenProvider};
use config::ClientConfig;
use state::{Action, AppState, Command};
use ui::render_app_layout;

/// Delay before the greeting is added to an empty transcript
const GREETING_DELAY: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env();
    info!("Configuration loaded: {:?}", config);

    // Network work runs here; the GUI thread only drains results
    let runtime = tokio::runtime::Runtime::new()?;

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Relay Chat")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Relay Chat",
        options,
        Box::new(move |cc| Box::new(ChatApp::new(cc.egui_ctx.clone(), runtime, config))),
    )
    .map_err(|e| anyhow::anyhow!("GUI exited with error: {}", e))
}

/// Main application struct
/// Owns the state, executes the reducer's commands and feeds results back
struct ChatApp {
    /// Transcript, session and UI state
    state: AppState,
    /// Runtime for network and timer tasks
    runtime: tokio::runtime::Runtime,
    /// Proxy client shared by all chat requests
    chat_client: ChatClient,
    /// Identity provider for session lookup and sign-out
    identity: Arc<dyn IdentityProvider>,
    /// Background tasks report back through this channel
    actions_tx: mpsc::Sender<Action>,
    actions_rx: mpsc::Receiver<Action>,
    /// Used to wake the GUI when a task reports
    ctx: egui::Context,
}

impl ChatApp {
    /// Create the application and start session lookup and the greeting timer
    fn new(ctx: egui::Context, runtime: tokio::runtime::Runtime, config: ClientConfig) -> Self {
        let (actions_tx, actions_rx) = mpsc::channel();
        let app = Self {
            state: AppState::new(),
            runtime,
            chat_client: ChatClient::new(config.proxy_base_url),
            identity: Arc::new(StaticTokenProvider::new(config.id_token)),
            actions_tx,
            actions_rx,
            ctx,
        };
        app.start_session();
        app.schedule_greeting();
        app
    }

    /// Run `task` on the runtime and dispatch the action it produces
    fn spawn_reporting<F>(&self, task: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.actions_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let action = task.await;
            // The receiver is gone only when the app is shutting down
            if tx.send(action).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn start_session(&self) {
        let identity = Arc::clone(&self.identity);
        self.spawn_reporting(async move {
            Action::SessionResolved(initialize_session(identity.as_ref(), Utc::now()).await)
        });
    }

    fn schedule_greeting(&self) {
        self.spawn_reporting(async {
            tokio::time::sleep(GREETING_DELAY).await;
            Action::Greet { at: Utc::now() }
        });
    }

    /// Apply an action and execute whatever it asks for
    fn dispatch(&mut self, action: Action) {
        for command in self.state.dispatch(action) {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        match command {
            Command::SendChat {
                request_id,
                token,
                request,
            } => {
                let client = self.chat_client.clone();
                self.spawn_reporting(async move {
                    let result = client.send(token.as_deref(), &request).await;
                    Action::ReplyReceived {
                        request_id,
                        result,
                        at: Utc::now(),
                    }
                });
            }
            Command::SignOut => {
                let identity = Arc::clone(&self.identity);
                self.runtime.spawn(async move {
                    match identity.sign_out().await {
                        Ok(()) => info!("Signed out"),
                        Err(e) => warn!(error = %e, "Sign-out failed"),
                    }
                });
            }
        }
    }

    /// Dispatch everything background tasks have reported so far
    fn drain_reported_actions(&mut self) {
        while let Ok(action) = self.actions_rx.try_recv() {
            self.dispatch(action);
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_reported_actions();

        // Render the main application layout
        for action in render_app_layout(ctx, &self.state) {
            self.dispatch(action);
        }
    }
}
