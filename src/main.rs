use std::sync::Arc;
use std::time::Duration;

use music_fleet::credentials::{self, MAX_IDENTITIES};
use music_fleet::fleet::Fleet;
use music_fleet::{bot, config, status};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(3600);

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("starting {MAX_IDENTITIES}-bot music system");

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            for identity in 1..=MAX_IDENTITIES {
                error!("  expected {}", credentials::var_name(identity));
            }
            std::process::exit(1);
        }
    };

    let fleet = Arc::new(Fleet::new());

    let listener = match status::bind(config.port).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port = config.port, "status server bind failed: {e}");
            std::process::exit(1);
        }
    };
    let status_state = status::StatusState {
        identities: Arc::new(config.identities()),
        fleet: Arc::clone(&fleet),
    };
    tokio::spawn(async move {
        if let Err(e) = status::serve(listener, status_state).await {
            error!("status server stopped: {e}");
        }
    });

    info!(
        "found {}/{MAX_IDENTITIES} valid bot tokens, starting bots",
        config.credentials.len()
    );

    let mut runners = JoinSet::new();
    for credential in config.credentials {
        let identity = credential.identity;
        let fleet = Arc::clone(&fleet);
        runners.spawn(async move { (identity, bot::run(credential, fleet).await) });
    }

    let status_fleet = Arc::clone(&fleet);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STATUS_LOG_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let online = status_fleet.online().await;
            info!(online = online.len(), "system status: {:?} running", online);
        }
    });

    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = terminate() => "SIGTERM",
        }
    };
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            joined = runners.join_next() => match joined {
                Some(Ok((identity, Ok(())))) => {
                    warn!(identity, "bot session ended");
                }
                Some(Ok((identity, Err(e)))) => {
                    error!(identity, "failed to start bot: {e}");
                }
                Some(Err(e)) => {
                    error!("bot task crashed: {e}");
                    std::process::exit(1);
                }
                None => {
                    error!("no bots are running, exiting");
                    std::process::exit(1);
                }
            },
            signal = &mut shutdown => {
                info!("received {signal}, shutting down");
                std::process::exit(0);
            }
        }
    }
}
