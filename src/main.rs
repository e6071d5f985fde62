use std::sync::Arc;
use std::time::Duration;

use hazel::config::{init_db, run_migrations, Config};
use hazel::modules::auth::{IdentityService, UserCrud};
use hazel::modules::project::{ProjectCrud, ProjectService};
use hazel::modules::task::{TaskCrud, TaskService};
use hazel::modules::workspace::{WorkspaceCrud, WorkspaceService};
use hazel::services::jwt::TokenIssuer;
use hazel::services::mailer::{EmailQueue, HttpMailer, LogMailer, Mailer};
use hazel::services::metrics::MetricsRegistry;
use hazel::services::sweeper::spawn_credential_sweeper;
use hazel::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hazel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = init_db(&config).await?;
    run_migrations(&db).await?;
    tracing::info!("Connected to MySQL, migrations applied");

    let metrics = MetricsRegistry::new()?;

    let mailer: Arc<dyn Mailer> = if config.mail.is_enabled() {
        Arc::new(HttpMailer::new(config.mail.clone())?)
    } else {
        tracing::warn!("MAIL_HOST not set, outgoing mail will only be logged");
        Arc::new(LogMailer)
    };
    let (email_queue, email_worker) =
        EmailQueue::start(mailer, config.email_queue_capacity, metrics.clone());

    let tokens = Arc::new(
        TokenIssuer::new(&config.token_secret)?
            .with_ttls(config.access_token_ttl, config.refresh_token_ttl),
    );

    let users = Arc::new(UserCrud::new(db.clone()));
    let sweeper = spawn_credential_sweeper(users.clone(), config.token_sweep_interval_minutes);

    let workspaces = Arc::new(WorkspaceService::new(Arc::new(WorkspaceCrud::new(db.clone()))));
    let projects = Arc::new(ProjectService::new(
        Arc::new(ProjectCrud::new(db.clone())),
        workspaces.clone(),
    ));
    let state = AppState {
        identity: IdentityService::new(
            users.clone(),
            users,
            tokens.clone(),
            email_queue,
            metrics.clone(),
            config.verification_code_ttl,
        ),
        tasks: TaskService::new(
            Arc::new(TaskCrud::new(db.clone())),
            projects.clone(),
            workspaces.clone(),
        ),
        projects,
        workspaces,
        tokens,
        metrics,
    };

    let app = hazel::create_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last queue handle, so the worker drains and exits.
    match tokio::time::timeout(Duration::from_secs(10), email_worker).await {
        Ok(Err(e)) => tracing::error!(error = %e, "email worker panicked"),
        Err(_) => tracing::warn!("email queue not drained before shutdown"),
        Ok(Ok(())) => {}
    }
    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    db.close().await;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
