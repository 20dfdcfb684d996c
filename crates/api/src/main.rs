use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fourtoon_cloud::{CloudFrontSigner, DiaryImageStorage, DiaryQueuePublisher, S3ObjectStore};
use fourtoon_midjourney::discord::{init_bot, start_bot, SerenityGateway};
use fourtoon_midjourney::MidjourneyManager;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fourtoon_api::background::panel_ingest::{self, PanelIngest};
use fourtoon_api::config::ServerConfig;
use fourtoon_api::router::build_app_router;
use fourtoon_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fourtoon_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fourtoon_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    fourtoon_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    fourtoon_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- AWS ---
    let sdk_config = fourtoon_cloud::load_sdk_config(&config.storage.region).await;

    let store = S3ObjectStore::from_sdk_config(&sdk_config, &config.storage.diary_image_bucket);
    tracing::info!(bucket = store.bucket(), "S3 diary image storage ready");
    let images = DiaryImageStorage::new(Arc::new(store), config.storage.presign_minutes);

    let cloudfront = config.cloudfront.as_ref().map(|cf| {
        let signer = CloudFrontSigner::from_pem_file(
            &cf.domain,
            &cf.key_pair_id,
            &cf.private_key_path,
        )
        .expect("Failed to load CloudFront private key");
        tracing::info!(domain = %cf.domain, "CloudFront signer ready");
        Arc::new(signer)
    });

    let diary_queue = config.sqs.as_ref().map(|sqs| {
        tracing::info!(queue_url = %sqs.diary_queue_url, "SQS diary queue publisher ready");
        Arc::new(DiaryQueuePublisher::from_sdk_config(
            &sdk_config,
            &sqs.diary_queue_url,
        ))
    });

    // --- Midjourney ---
    let ingest_cancel = CancellationToken::new();
    let mut ingest_handle = None;
    let mut bot_handle = None;

    let midjourney = match &config.discord {
        Some(discord) => {
            let gateway = Arc::new(SerenityGateway::from_token(&discord.bot_token));
            let manager = MidjourneyManager::new(gateway, discord.midjourney_config());
            manager.start().await;

            let ingest = PanelIngest::new(pool.clone(), images.clone(), cloudfront.clone())
                .expect("Failed to build panel download client");
            ingest_handle = Some(tokio::spawn(panel_ingest::run(
                ingest,
                manager.subscribe(),
                ingest_cancel.clone(),
            )));

            let client = init_bot(&discord.bot_token, Arc::clone(&manager))
                .await
                .expect("Failed to build Discord client");
            bot_handle = Some(tokio::spawn(async move {
                if let Err(e) = start_bot(client).await {
                    tracing::error!(error = %e, "Discord bot stopped");
                }
            }));

            Some(manager)
        }
        None => {
            tracing::warn!("DISCORD_BOT_TOKEN not set, panel generation disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images,
        cloudfront,
        diary_queue,
        midjourney: midjourney.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let cleanup_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    if let Some(manager) = midjourney {
        manager.shutdown().await;
        tracing::info!("Midjourney manager shut down");
    }

    ingest_cancel.cancel();
    if let Some(handle) = ingest_handle {
        let _ = tokio::time::timeout(cleanup_timeout, handle).await;
        tracing::info!("Panel ingest stopped");
    }

    if let Some(handle) = bot_handle {
        handle.abort();
        tracing::info!("Discord bot stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
