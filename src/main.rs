use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::sync::Arc;
use stay_booking::{
    api::{self, AppState},
    config::{database, settings},
    core::{role, user},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stay-booking", about = "Property booking backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Create an administrative account
    CreateSuperuser {
        /// Login email
        #[arg(long)]
        email: String,
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Initial password
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Connect and ensure the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(db).await,
        Commands::CreateSuperuser {
            email,
            first_name,
            last_name,
            password,
        } => {
            let admin =
                user::create_superuser(&db, &email, &first_name, &last_name, &password).await?;
            info!(user_id = admin.id, email = %admin.email, "Superuser created successfully.");
            Ok(())
        }
    }
}

async fn serve(db: sea_orm::DatabaseConnection) -> Result<()> {
    let app_config = settings::load_app_configuration()?;

    role::seed_roles(&db, &app_config.roles)
        .await
        .inspect_err(|e| error!("Failed to seed roles: {}", e))?;

    let app = api::router(AppState { db: Arc::new(db) });
    let addr = app_config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Graceful shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
