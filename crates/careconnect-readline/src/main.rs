use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::{info, warn};

use careconnect_core::backend::{BackendApi, UploadFile, UploadKind};
use careconnect_core::preferences::{PreferenceRepository, Preferences};
use careconnect_core::session::{
    AuthForm, ControllerSettings, Identity, MemorySessionStore, PersistenceScope,
    SessionController, SessionError, View,
};
use careconnect_infrastructure::{
    CareConnectPaths, ConfigService, FileSessionStore, TomlPreferenceRepository,
};
use careconnect_interaction::{DemoBackend, HttpBackend};

mod commands;
mod helper;
mod logging;
mod ui;

use commands::{COMMANDS, Command, QuickTopic};
use strum::IntoEnumIterator;
use helper::CliHelper;
use ui::Palette;

const DEMO_LATENCY: Duration = Duration::from_millis(600);

type LineEditor = Editor<CliHelper, DefaultHistory>;

#[derive(Parser, Debug)]
#[command(name = "careconnect")]
#[command(version, about = "CareConnect - health information chatbot client", long_about = None)]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:5000
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Answer offline from the built-in demo responder
    #[arg(long)]
    demo: bool,

    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", env = "CARECONNECT_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// REPL state around one session controller.
struct App {
    controller: SessionController,
    preferences: TomlPreferenceRepository,
    prefs: Preferences,
    /// Transcript entries already printed.
    printed: usize,
}

impl App {
    fn palette(&self) -> Palette {
        Palette::for_theme(self.prefs.theme)
    }

    fn prompt(&self) -> String {
        match (self.controller.view(), self.controller.current_user()) {
            (View::Main, Some(user)) => format!("{}> ", user.name),
            (View::Auth(AuthForm::Register), _) => "register> ".to_string(),
            _ => "login> ".to_string(),
        }
    }

    /// Prints transcript entries added since the last call.
    fn flush_transcript(&mut self) {
        let entries = self.controller.transcript();
        if entries.len() < self.printed {
            self.printed = 0;
        }
        let palette = self.palette();
        for entry in &entries[self.printed..] {
            ui::print_entry(entry, &palette);
        }
        self.printed = entries.len();
    }

    /// Opens the main view with the localized greeting.
    fn welcome(&mut self) {
        self.controller
            .append_bot_message(ui::texts(self.prefs.language).welcome);
        self.flush_transcript();
    }

    fn list_topics(&self) {
        let palette = self.palette();
        for topic in QuickTopic::iter() {
            let question = ui::quick_question(self.prefs.language, topic);
            ui::print_muted(&format!("  {:<14}{question}", topic.as_ref()), &palette);
        }
    }

    fn report(&self, err: &SessionError) {
        warn!(error = %err, "operation failed");
        ui::print_error(&err.user_message(), &self.palette());
    }

    fn describe_identity(&self) {
        let palette = self.palette();
        match self.controller.identity() {
            Identity::Authenticated { user, .. } => {
                let scope = match self.controller.persistence_scope() {
                    PersistenceScope::Durable => "remembered on this device",
                    PersistenceScope::Volatile => "until you quit",
                };
                ui::print_notice(
                    &format!("Logged in as {} <{}> ({scope})", user.name, user.email),
                    &palette,
                );
            }
            Identity::Guest { user } => {
                ui::print_notice(&format!("Browsing as {} ({})", user.name, user.id), &palette)
            }
            Identity::Anonymous => ui::print_muted("Not logged in.", &palette),
        }
        ui::print_muted(&format!("Session: {}", self.controller.session_id()), &palette);
    }

    fn print_help(&self) {
        let palette = self.palette();
        for (_, usage) in COMMANDS {
            ui::print_muted(&format!("  {usage}"), &palette);
        }
        ui::print_muted("  quit | exit", &palette);
        ui::print_muted("Anything else is sent to the assistant once you are in.", &palette);
    }

    fn read_password(&self, rl: &mut LineEditor) -> Option<String> {
        match rl.readline("Password: ") {
            Ok(password) => Some(password),
            Err(_) => {
                ui::print_muted("Cancelled.", &self.palette());
                None
            }
        }
    }

    async fn upload(&mut self, kind: UploadKind, path: &Path) {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(err) => {
                ui::print_error(&format!("Cannot read {}: {err}", path.display()), &self.palette());
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let result = self
            .controller
            .upload_file(UploadFile::new(file_name, data), kind)
            .await;
        self.flush_transcript();
        if let Err(err @ SessionError::UploadRejected(_)) = result {
            self.report(&err);
        }
    }

    /// Runs one command. Returns `false` to leave the REPL.
    async fn handle(&mut self, command: Command, rl: &mut LineEditor) -> bool {
        let palette = self.palette();
        let in_main = self.controller.view() == View::Main;

        match command {
            Command::Quit => return false,
            Command::Help => self.print_help(),
            Command::Chat(text) if text.is_empty() => {}
            Command::Chat(_) | Command::Upload { .. } | Command::Ask(Some(_)) if !in_main => {
                ui::print_muted(ui::texts(self.prefs.language).auth_hint, &palette)
            }
            Command::Chat(text) => {
                self.controller.send_chat_message(&text).await;
                self.flush_transcript();
            }
            Command::Upload { kind, path } => self.upload(kind, &path).await,
            Command::Ask(None) => self.list_topics(),
            Command::Ask(Some(topic)) => {
                let question = ui::quick_question(self.prefs.language, topic);
                self.controller.send_chat_message(question).await;
                self.flush_transcript();
            }
            Command::Emergency => {
                self.controller
                    .append_bot_message(ui::texts(self.prefs.language).emergency);
                self.flush_transcript();
            }
            Command::Login { email, remember } => {
                self.controller.switch_form(AuthForm::Login);
                let Some(password) = self.read_password(rl) else {
                    return true;
                };
                match self.controller.login(&email, &password, remember).await {
                    Ok(notice) => {
                        self.flush_transcript();
                        ui::print_notice(&notice.message, &palette);
                        self.welcome();
                    }
                    Err(err) => self.report(&err),
                }
            }
            Command::Register { name, email } => {
                self.controller.switch_form(AuthForm::Register);
                let Some(password) = self.read_password(rl) else {
                    return true;
                };
                match self.controller.register(&name, &email, &password).await {
                    Ok(notice) => ui::print_notice(&notice.message, &palette),
                    Err(err) => self.report(&err),
                }
            }
            Command::Guest => match self.controller.guest_access() {
                Ok(notice) => {
                    ui::print_notice(&notice.message, &palette);
                    self.welcome();
                }
                Err(err) => self.report(&err),
            },
            Command::Logout => {
                let result = self.controller.logout();
                self.flush_transcript();
                match result {
                    Ok(notice) => ui::print_notice(&notice.message, &palette),
                    Err(err) => self.report(&err),
                }
            }
            Command::Language => match self.preferences.toggle_language() {
                Ok(language) => {
                    self.prefs.language = language;
                    ui::print_banner(&self.prefs);
                    if in_main {
                        self.welcome();
                    }
                }
                Err(err) => ui::print_error(&format!("Could not save preference: {err}"), &palette),
            },
            Command::Theme => match self.preferences.toggle_theme() {
                Ok(theme) => {
                    self.prefs.theme = theme;
                    ui::print_notice(&format!("Theme: {theme}"), &self.palette());
                }
                Err(err) => ui::print_error(&format!("Could not save preference: {err}"), &palette),
            },
            Command::WhoAmI => self.describe_identity(),
            Command::Status => match self.controller.check_backend().await {
                Ok(health) => {
                    let detail = health.message.or(health.version).unwrap_or_default();
                    ui::print_notice(&format!("Backend: {} {}", health.status, detail), &palette);
                }
                Err(err) => self.report(&err),
            },
        }
        true
    }

    async fn run(&mut self) -> Result<()> {
        let mut rl = LineEditor::new()?;
        rl.set_helper(Some(CliHelper));

        ui::print_banner(&self.prefs);
        let identity = self.controller.initialize();
        if identity.is_anonymous() {
            ui::print_muted(ui::texts(self.prefs.language).auth_hint, &self.palette());
        } else {
            self.describe_identity();
            self.welcome();
            ui::print_muted(ui::texts(self.prefs.language).chat_hint, &self.palette());
        }

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());

                    let keep_going = match Command::parse(&line) {
                        Ok(command) => self.handle(command, &mut rl).await,
                        Err(err) => {
                            ui::print_error(&err.to_string(), &self.palette());
                            true
                        }
                    };
                    if !keep_going {
                        ui::print_notice(ui::texts(self.prefs.language).goodbye, &self.palette());
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    ui::print_muted("CTRL-C detected. Type 'quit' to exit.", &self.palette());
                }
                Err(ReadlineError::Eof) => {
                    ui::print_notice(ui::texts(self.prefs.language).goodbye, &self.palette());
                    break;
                }
                Err(err) => {
                    ui::print_error(&format!("Error: {err:?}"), &self.palette());
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Prints a typing indicator whenever the controller starts waiting on the backend.
fn spawn_busy_indicator(controller: &SessionController, palette: Palette) {
    let mut busy = controller.subscribe_busy();
    tokio::spawn(async move {
        let mut was_busy = false;
        while busy.changed().await.is_ok() {
            let is_busy = *busy.borrow_and_update() > 0;
            if is_busy && !was_busy {
                ui::print_muted("⏳ CareConnect is typing...", &palette);
            }
            was_busy = is_busy;
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let paths = CareConnectPaths::from_system().context("cannot locate the configuration directory")?;
    if let Err(err) = logging::init(&paths.logs_dir(), &args.log_level) {
        eprintln!("Logging disabled: {err:#}");
    }

    let config_path = args.config.clone().unwrap_or_else(|| paths.config_file());
    let mut config = ConfigService::new(config_path).get_config();
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    config.demo_mode |= args.demo;

    let backend: Arc<dyn BackendApi> = if config.demo_mode {
        Arc::new(DemoBackend::new().with_latency(DEMO_LATENCY))
    } else {
        Arc::new(HttpBackend::from_config(&config).context("cannot create HTTP client")?)
    };
    info!(api = config.normalized_base_url(), demo = config.demo_mode, "starting CareConnect");

    let controller = SessionController::new(
        backend,
        Arc::new(FileSessionStore::new(paths.session_file())),
        Arc::new(MemorySessionStore::new()),
        ControllerSettings::from(&config),
    );

    let preferences = TomlPreferenceRepository::new(paths.preferences_file());
    let prefs = preferences.load().unwrap_or_default();
    spawn_busy_indicator(&controller, Palette::for_theme(prefs.theme));

    let mut app = App {
        controller,
        preferences,
        prefs,
        printed: 0,
    };
    app.run().await
}
