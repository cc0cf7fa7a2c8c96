use std::{io::Write, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vk_client::{
    adapters::{
        controllers::{
            auth_controller::AuthController, file_controller::FileController,
            health_controller::HealthController, instance_controller::InstanceController,
            session_controller::SessionController, upload_controller::UploadController,
        },
        state::AppState,
    },
    application::{
        dto::instance_dto::InstanceUpdateDTO, error::ApplicationError,
    },
    domain::{
        config::client::ClientConfig,
        models::{instance::Provider, upload::ProgressCallback},
    },
};

#[derive(Parser)]
#[command(name = "vk", version, about = "Vault-Krate command line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Anonymous session key
    Session {
        #[command(subcommand)]
        action: Option<SessionCommands>,
    },
    /// Upload a file, as the signed-in user or anonymously
    Upload {
        /// Path to the file to upload
        path: PathBuf,
        #[arg(long, short)]
        description: Option<String>,
        /// Overrides the type guessed from the file extension
        #[arg(long)]
        mime_type: Option<String>,
    },
    /// Your files
    Files {
        #[command(subcommand)]
        action: FileCommands,
    },
    /// Sign up, sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Backend instances (needs VK_SECRET)
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    Show,
    /// Replace the key with a new one
    Renew,
    Clear,
}

#[derive(Subcommand)]
enum FileCommands {
    /// Storage usage and file list of the signed-in user
    List,
    Info {
        file_id: String,
    },
    Rename {
        file_id: String,
        name: String,
    },
    Describe {
        file_id: String,
        description: String,
    },
    Delete {
        file_id: String,
    },
    Download {
        file_id: String,
        /// Destination path, defaults to the stored file name
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    Signup {
        email: String,
        password: String,
    },
    Signin {
        email: String,
        password: String,
    },
    /// Print the Google sign-in URL
    Google,
    /// Finish Google sign-in with the URL the browser was redirected to
    Callback {
        url: String,
    },
    Signout,
    Whoami,
}

#[derive(Subcommand)]
enum AdminCommands {
    Instances,
    Instance {
        server_id: String,
    },
    Health,
    Update {
        server_id: String,
        #[arg(long, value_parser = parse_provider)]
        provider: Option<Provider>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },
}

fn parse_provider(value: &str) -> Result<Provider, String> {
    match value.to_ascii_lowercase().as_str() {
        "gdrive" => Ok(Provider::GDrive),
        "supabase" => Ok(Provider::Supabase),
        other => Err(format!("unknown provider '{}', expected gdrive or supabase", other)),
    }
}

fn progress_printer() -> ProgressCallback {
    Arc::new(|percent: f64| {
        eprint!("\rUploading... {:>3.0}%", percent);
        if percent >= 100.0 {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    })
}

async fn run(state: &AppState, command: Commands) -> Result<String, ApplicationError> {
    match command {
        Commands::Session { action } => match action.unwrap_or(SessionCommands::Show) {
            SessionCommands::Show => SessionController::show(state),
            SessionCommands::Renew => SessionController::renew(state),
            SessionCommands::Clear => SessionController::clear(state),
        },
        Commands::Upload {
            path,
            description,
            mime_type,
        } => {
            UploadController::upload(state, &path, description, mime_type, Some(progress_printer()))
                .await
        }
        Commands::Files { action } => match action {
            FileCommands::List => FileController::list(state).await,
            FileCommands::Info { file_id } => FileController::info(state, &file_id).await,
            FileCommands::Rename { file_id, name } => {
                FileController::rename(state, &file_id, name).await
            }
            FileCommands::Describe {
                file_id,
                description,
            } => FileController::describe(state, &file_id, description).await,
            FileCommands::Delete { file_id } => FileController::delete(state, &file_id).await,
            FileCommands::Download { file_id, output } => {
                FileController::download(state, &file_id, output).await
            }
        },
        Commands::Auth { action } => match action {
            AuthCommands::Signup { email, password } => {
                AuthController::sign_up(state, &email, &password).await
            }
            AuthCommands::Signin { email, password } => {
                AuthController::sign_in(state, &email, &password).await
            }
            AuthCommands::Google => AuthController::google(state).await,
            AuthCommands::Callback { url } => AuthController::callback(state, &url).await,
            AuthCommands::Signout => AuthController::sign_out(state).await,
            AuthCommands::Whoami => AuthController::whoami(state).await,
        },
        Commands::Admin { action } => match action {
            AdminCommands::Instances => InstanceController::get_all_instances(state).await,
            AdminCommands::Instance { server_id } => {
                InstanceController::get_instance(state, &server_id).await
            }
            AdminCommands::Health => HealthController::health_check(state).await,
            AdminCommands::Update {
                server_id,
                provider,
                name,
                url,
            } => {
                let updates = InstanceUpdateDTO {
                    provider,
                    server_name: name,
                    server_url: url,
                };
                InstanceController::update_instance(state, &server_id, updates).await
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let missing = config.validate();
    if !missing.is_empty() {
        warn!("Missing configuration: {}", missing.join(", "));
    }
    info!(
        "Using API {} and cookie jar {}",
        config.api_base_url,
        config.cookie_jar.display()
    );

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = state.anonymous_session.ensure_key() {
        warn!("Could not set up anonymous session: {}", e);
    }

    match run(&state, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
