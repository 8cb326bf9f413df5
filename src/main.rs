use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use ross::cli;
use ross::core::config::{self, ResolvedConfig, expand_home};
use ross::core::controller;
use ross::core::credentials::{ACCESS_TOKEN_KEY, CredentialStore, FileCredentialStore};
use ross::core::state::App;
use ross::generation::{Attachment, HttpGenerationClient, Submission};

#[derive(Parser)]
#[command(name = "ross", about = "Ross AI: ask questions about a file")]
struct Args {
    /// Generation endpoint URL (overrides config and ROSS_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Pre-fill the prompt
    #[arg(long)]
    prompt: Option<String>,

    /// Pre-attach a file
    #[arg(long)]
    file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Submit once without the TUI and print the formatted response
    Generate {
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long)]
        file: Option<String>,
        /// Print the HTML rendering instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a bearer token
    Set { token: String },
    /// Remove the stored token
    Clear,
    /// Print whether a token is stored
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to ross.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("ross.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.endpoint.as_deref());
    log::info!("Ross starting up with endpoint: {}", resolved.endpoint);

    let credentials = FileCredentialStore::new(resolved.storage_path.clone());

    match args.command {
        Some(Command::Token { action }) => token_command(&credentials, action),
        Some(Command::Generate { prompt, file, html }) => {
            generate_command(&resolved, &credentials, prompt, file, html).await
        }
        None => run_tui(resolved, credentials, args.prompt, args.file).await,
    }
}

fn build_client(resolved: &ResolvedConfig) -> Option<HttpGenerationClient> {
    match HttpGenerationClient::new(resolved.endpoint.clone(), resolved.timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

async fn read_attachment(raw_path: &str) -> Result<Attachment, String> {
    Attachment::from_path(&expand_home(raw_path))
        .await
        .map_err(|e| format!("Could not read {raw_path}: {e}"))
}

fn token_command(store: &FileCredentialStore, action: TokenAction) -> ExitCode {
    let result = match action {
        TokenAction::Set { token } => store.set(ACCESS_TOKEN_KEY, token.trim()).map(|()| {
            println!("Token saved to {}", store.path().display());
        }),
        TokenAction::Clear => store.remove(ACCESS_TOKEN_KEY).map(|()| {
            println!("Token cleared");
        }),
        TokenAction::Show => store.get(ACCESS_TOKEN_KEY).map(|token| match token {
            Some(t) if !t.is_empty() => println!("Token is set ({} chars)", t.chars().count()),
            _ => println!("No token stored"),
        }),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn generate_command(
    resolved: &ResolvedConfig,
    credentials: &FileCredentialStore,
    prompt: String,
    file: Option<String>,
    html: bool,
) -> ExitCode {
    let Some(raw_path) = file else {
        eprintln!("{}", ross::core::action::MISSING_FILE_MESSAGE);
        return ExitCode::FAILURE;
    };
    let attachment = match read_attachment(&raw_path).await {
        Ok(a) => a,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let Some(client) = build_client(resolved) else {
        return ExitCode::FAILURE;
    };

    let submission = Submission {
        prompt,
        file: attachment,
    };
    let outcome = controller::execute(&submission, credentials, &client).await;
    let code = cli::report_outcome(
        &outcome,
        html,
        &resolved.login_path,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .unwrap_or_else(|e| {
        log::error!("Failed to write output: {}", e);
        cli::EXIT_FAILURE
    });
    ExitCode::from(code)
}

async fn run_tui(
    resolved: ResolvedConfig,
    credentials: FileCredentialStore,
    prompt: Option<String>,
    file: Option<String>,
) -> ExitCode {
    let Some(client) = build_client(&resolved) else {
        return ExitCode::FAILURE;
    };
    let mut app = App::new(
        Arc::new(client),
        Arc::new(credentials),
        resolved.login_path.clone(),
    );
    if let Some(prompt) = prompt {
        app.prompt = prompt;
    }
    if let Some(raw_path) = &file {
        match read_attachment(raw_path).await {
            Ok(attachment) => {
                app.status_message = format!("Attached {}", attachment.file_name);
                app.file = Some(attachment);
            }
            Err(message) => app.error = Some(message),
        }
    }

    match ross::tui::run(app, file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("TUI error: {}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
