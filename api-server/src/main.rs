use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tokio::sync::RwLock;

mod auth;
mod config;
mod handlers;
mod ledger;
mod response;
mod sessions;
mod store;
mod types;

use config::{AppState, ServerConfig, ValidationPolicy};
use ledger::LedgerClient;
use sessions::spawn_session_sweep;
use store::PayoutStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let policy = ValidationPolicy::from_env();

    let payouts = PayoutStore::open(&config.data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    match payouts.unsettled() {
        Ok(owed) if !owed.is_empty() => {
            tracing::warn!(
                count = owed.len(),
                "unsettled payouts on disk await manual reconciliation"
            );
            for record in &owed {
                tracing::warn!(
                    payout_id = %record.payout_id,
                    user = %record.user_id,
                    amount = record.amount,
                    created_at = record.created_at_unix_s,
                    error = record.last_error.as_deref().unwrap_or("none"),
                    "payout owed"
                );
            }
        }
        Ok(_) => {}
        Err(e) => tracing::error!("failed to read unsettled payouts: {e}"),
    }

    let ledger = LedgerClient::new(&config.ledger_url, config.ledger_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    tracing::info!(
        "starting wavebreak api: bind_addr={} entry_cost={} payout_unit={} ledger_url={} rate_limit={}per{}s session_idle={}s",
        config.bind_addr,
        config.entry_cost,
        policy.payout_unit,
        config.ledger_url,
        config.rate_limit_max,
        config.rate_limit_window.as_secs(),
        config.session_idle_secs
    );

    let state = AppState {
        sessions: Arc::new(RwLock::new(HashMap::new())),
        paid: Arc::new(RwLock::new(HashSet::new())),
        payouts: Arc::new(payouts),
        ledger: Arc::new(ledger),
        policy,
        entry_cost: config.entry_cost,
        house_account: config.house_account.clone(),
        house_pin: config.house_pin.clone(),
        session_idle_secs: config.session_idle_secs,
        rate_limit_max: config.rate_limit_max,
        rate_limit_window: config.rate_limit_window,
    };
    spawn_session_sweep(state.clone(), config.session_sweep_secs);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(handlers::health))
            .route(
                "/checkGameAccess",
                web::post().to(handlers::check_game_access),
            )
            .route("/payIn", web::post().to(handlers::pay_in))
            .route(
                "/startGameSession",
                web::post().to(handlers::start_game_session),
            )
            .route(
                "/recordGameEvent",
                web::post().to(handlers::record_game_event),
            )
            .route("/endGame", web::post().to(handlers::end_game))
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
