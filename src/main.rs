use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use retake::auth::hash_password;
use retake::config::{ServerConfig, load_config_file};
use retake::error::Error;
use retake::media::AudioStore;
use retake::server::{AppState, create_router, ensure_system_folders};
use retake::store::{SqliteStore, Store};
use retake::types::NewUser;

#[derive(Parser)]
#[command(name = "retake")]
#[command(about = "A voice-practice recording server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init {
        /// Data directory for database and audio uploads
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Create a user account
    AddUser {
        /// Data directory for database and audio uploads
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        login: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        password: String,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for database and audio uploads
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// TOML config file; CLI flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn open_store(data_dir: &std::path::Path) -> anyhow::Result<SqliteStore> {
    let db_path = data_dir.join("retake.db");
    if !db_path.exists() {
        bail!("Server not initialized. Run 'retake init' first to create the database.");
    }
    Ok(SqliteStore::new(&db_path)?)
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    fs::create_dir_all(&data_dir)?;

    let db_path = data_dir.join("retake.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Initialized database at {}", db_path.display());

    Ok(())
}

fn run_add_user(
    data_dir: PathBuf,
    login: String,
    first_name: String,
    last_name: String,
    password: String,
) -> anyhow::Result<()> {
    let login = login.trim();
    if login.is_empty() || login.contains(char::is_whitespace) {
        bail!("Login cannot be empty or contain whitespace");
    }
    if password.trim().is_empty() {
        bail!("Password cannot be empty");
    }

    let store = open_store(&data_dir)?;

    let password_hash = hash_password(&password)?;
    let user = match store.create_user(&NewUser {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        login: login.to_string(),
        password_hash,
    }) {
        Ok(user) => user,
        Err(Error::Conflict(_)) => bail!("User '{login}' already exists"),
        Err(e) => return Err(e.into()),
    };

    ensure_system_folders(&store, user.id)?;

    println!("Created user '{login}' (id {})", user.id);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("retake=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir } => {
            run_init(data_dir)?;
        }
        Commands::AddUser {
            data_dir,
            login,
            first_name,
            last_name,
            password,
        } => {
            run_add_user(data_dir, login, first_name, last_name, password)?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            config,
        } => {
            let file = match config {
                Some(path) => Some(load_config_file(&path)?),
                None => None,
            };
            let config = ServerConfig::resolve(file, host, port, data_dir);

            let store = open_store(&config.data_dir)?;

            let state = Arc::new(AppState {
                store: Arc::new(store),
                media: AudioStore::new(&config.data_dir),
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
