use std::{error::Error as _, future::IntoFuture, iter, process, sync::Arc, time::Duration};

use noticeboard::{
    application::{
        board::{BoardReader, BoardWriter},
        error::AppError,
        repos::MessagesRepo,
    },
    cache::{CacheConfig, LruPageCache, PageCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        memory::InMemoryMessages,
        telemetry,
    },
};
use tokio::sync::Notify;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let chain: Vec<String> = iter::successors(error.source(), |&err| err.source())
        .map(ToString::to_string)
        .collect();

    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?chain, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?chain, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Clear(_) => run_clear(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let backends = Backends::open(&settings).await?;

    let reader = BoardReader::new(backends.messages.clone())
        .with_cache_opt(backends.cache.clone())
        .with_max_per_page(settings.pagination.max_per_page.get());
    let writer = BoardWriter::new(backends.messages.clone()).with_cache_opt(backends.cache.clone());
    let state = ApiState {
        reader: Arc::new(reader),
        writer: Arc::new(writer),
        messages: backends.messages.clone(),
    };

    let result = serve_http(&settings, state).await;
    backends.close().await;
    result
}

async fn run_clear(settings: config::Settings) -> Result<(), AppError> {
    if settings.database.url.is_none() {
        return Err(InfraError::configuration("clear requires a configured database url").into());
    }

    let backends = Backends::open(&settings).await?;
    let writer = BoardWriter::new(backends.messages.clone()).with_cache_opt(backends.cache.clone());

    let result = writer.clear_all().await;
    backends.close().await;

    let deleted = result?;
    info!(target = "noticeboard::clear", deleted, "clear completed");
    println!("deleted {deleted} messages");
    Ok(())
}

struct Backends {
    messages: Arc<dyn MessagesRepo>,
    cache: Option<Arc<dyn PageCache>>,
}

impl Backends {
    async fn open(settings: &config::Settings) -> Result<Self, AppError> {
        let messages: Arc<dyn MessagesRepo> = match settings.database.url.as_ref() {
            Some(database_url) => {
                let pool = PostgresRepositories::connect(
                    database_url,
                    settings.database.max_connections.get(),
                )
                .await
                .map_err(InfraError::from)?;

                PostgresRepositories::run_migrations(&pool)
                    .await
                    .map_err(InfraError::from)?;

                Arc::new(PostgresRepositories::new(pool))
            }
            None => {
                warn!(
                    target = "noticeboard::startup",
                    "database url is not configured; messages are kept in memory only"
                );
                Arc::new(InMemoryMessages::new())
            }
        };

        let cache_config = CacheConfig::from(&settings.cache);
        let cache: Option<Arc<dyn PageCache>> = if cache_config.is_enabled() {
            Some(Arc::new(LruPageCache::new(&cache_config)))
        } else {
            info!(target = "noticeboard::startup", "page cache disabled");
            None
        };

        Ok(Self { messages, cache })
    }

    async fn close(&self) {
        self.messages.close().await;
        if let Some(cache) = self.cache.as_ref() {
            cache.close().await;
        }
    }
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "noticeboard::startup",
        addr = %settings.server.addr,
        "listening"
    );

    let stopping = Arc::new(Notify::new());
    let trigger = stopping.clone();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            trigger.notify_waiters();
        },
    )
    .into_future();
    let deadline = drain_deadline(stopping, settings.server.graceful_shutdown);

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = deadline => {
            warn!(
                target = "noticeboard::shutdown",
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "noticeboard::shutdown", "server stopped");
    Ok(())
}

async fn drain_deadline(stopping: Arc<Notify>, grace: Duration) {
    stopping.notified().await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "noticeboard::shutdown", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "noticeboard::shutdown", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "noticeboard::shutdown", "shutdown signal received");
}
