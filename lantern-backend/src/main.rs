mod discord_commands;
use lantern_backend::config::Config;
use lantern_backend::discord::{StatusMessage, run_status_message};
use lantern_backend::exaroton::ExarotonClient;
use lantern_backend::{HttpLimits, RateLimitConfig, create_app};
use lantern_core::{Monitor, ReferenceZone, SessionTracker, StatusBoard, SystemClock};
use poise::{Framework, FrameworkOptions, serenity_prelude as serenity};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

type Context<'a> = poise::Context<'a, crate::Data, crate::discord_commands::Error>;

pub(crate) struct Data {
    pub(crate) board: StatusBoard,
    pub(crate) zone: ReferenceZone,
    pub(crate) refresh: Duration,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for structured logging
    #[cfg(debug_assertions)]
    let log_level = tracing::Level::DEBUG;
    #[cfg(not(debug_assertions))]
    let log_level = tracing::Level::INFO;

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();
    tracing::info!("Starting Lantern status bot...");
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration: port={}, server_id={}, channel_id={}, poll_interval={}s, timezone={}",
        config.port,
        config.server_id,
        config.channel_id,
        config.poll_interval.as_secs(),
        config.timezone
    );
    tracing::info!(
        "HTTP: body_limit={}KB, timeout={}s, rate limit {}/sec (burst {})",
        config.request_body_limit / 1024,
        config.request_timeout.as_secs(),
        config.rate_limit_general_per_sec,
        config.rate_limit_general_burst
    );

    let zone = ReferenceZone::new(config.timezone);
    let board = StatusBoard::new();
    let source = ExarotonClient::new(
        &config.exaroton_base_url,
        &config.server_id,
        &config.exaroton_api_key,
        config.poll_timeout,
    );
    let monitor = Monitor::new(
        SessionTracker::new(zone),
        Arc::new(source),
        Arc::new(SystemClock),
        board.clone(),
    );

    let app = create_app(
        board.clone(),
        zone,
        HttpLimits {
            request_body_limit: config.request_body_limit,
            request_timeout: config.request_timeout,
        },
        Some(RateLimitConfig {
            per_sec: config.rate_limit_general_per_sec,
            burst: config.rate_limit_general_burst,
        }),
    );
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on {}", addr);

    let intents = serenity::GatewayIntents::non_privileged();
    let channel = serenity::ChannelId::new(config.channel_id);
    let history_limit = config.message_history_limit;
    let refresh = config.poll_interval;
    let setup_board = board.clone();

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![discord_commands::status(), discord_commands::player()],
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!(
                        "Executing command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Logged in to Discord as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // Only the first ready event starts the publisher.
                let message = StatusMessage::new(
                    ctx.http.clone(),
                    channel,
                    ready.user.id,
                    history_limit,
                    zone,
                    refresh,
                );
                tokio::spawn(run_status_message(message, setup_board.clone()));

                Ok(Data {
                    board: setup_board,
                    zone,
                    refresh,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    tokio::select! {
        _ = monitor.run(config.poll_interval, shutdown_signal()) => {
            tracing::info!("Shutting down");
        }
        result = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()) => {
            if let Err(e) = result {
                tracing::error!("Axum server error: {}", e);
            }
        }
        result = client.start() => {
            if let Err(e) = result {
                tracing::error!("Discord client error: {:?}", e);
            }
        }
    }

    Ok(())
}
