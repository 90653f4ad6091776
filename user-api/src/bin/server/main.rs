use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use user_api::config::Config;
use user_api::domain::user::service::UserService;
use user_api::inbound::http::router::create_router;
use user_api::outbound::database;
use user_api::outbound::repositories::PostgresUserRepository;
use user_api::telemetry;

/// User registration and login API.
#[derive(Parser, Debug)]
#[command(name = "user-api", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve the HTTP API (default).
    Run,
    /// Apply database migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    telemetry::init(&config.logging);

    tracing::info!(
        service = "user-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        log_format = ?config.logging.format,
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        token_lifetime_minutes = config.jwt.lifetime_minutes,
        "Configuration loaded"
    );

    match cli.command.unwrap_or(Command::Run) {
        Command::Migrate => {
            let pg_pool = database::connect(&config.database).await?;
            database::migrate(&pg_pool).await?;
            Ok(())
        }
        Command::Run => run(config).await,
    }
}

async fn run(config: Config) -> Result<(), anyhow::Error> {
    // A signing algorithm outside the accepted set is fatal before anything binds.
    let authenticator = Arc::new(
        config
            .authenticator()
            .context("invalid token signing configuration")?,
    );

    let pg_pool = database::connect(&config.database).await?;
    if config.database.auto_migrate {
        database::migrate(&pg_pool).await?;
    }

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
        config.auth.policy(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
