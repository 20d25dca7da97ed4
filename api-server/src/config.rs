use std::{
    collections::{HashMap, HashSet},
    env,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use tokio::sync::{Mutex, RwLock};
use wavebreak_core::constants::{MAX_PLAUSIBLE_WAVE_SCORE, PAYOUT_UNIT};

use crate::ledger::LedgerClient;
use crate::sessions::GameSession;
use crate::store::PayoutStore;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_ENTRY_COST: u32 = 25;
pub(crate) const DEFAULT_HOUSE_ACCOUNT: &str = "1";
pub(crate) const DEFAULT_LEDGER_URL: &str = "http://localhost:4200";
pub(crate) const DEFAULT_LEDGER_TIMEOUT_SECS: u64 = 10;
// Idle sessions are garbage, not gameplay: sweep after five quiet minutes.
pub(crate) const DEFAULT_SESSION_IDLE_SECS: u64 = 5 * 60;
pub(crate) const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;
pub(crate) const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub(crate) const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub(crate) const DEFAULT_MAX_WAVE_TIME_MS: i64 = 30 * 60 * 1000;
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";

/// Bounds the validator applies to client-reported wave completions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidationPolicy {
    pub(crate) max_wave_time_ms: i64,
    pub(crate) wave_score_ceiling: u32,
    pub(crate) payout_unit: u32,
    pub(crate) payout_wave_stride: u32,
}

impl ValidationPolicy {
    pub(crate) fn from_env() -> Self {
        Self {
            max_wave_time_ms: read_env_i64("MAX_WAVE_TIME_MS", DEFAULT_MAX_WAVE_TIME_MS),
            wave_score_ceiling: read_env_u32("WAVE_SCORE_CEILING", MAX_PLAUSIBLE_WAVE_SCORE),
            payout_unit: read_env_u32("PAYOUT_UNIT", PAYOUT_UNIT),
            payout_wave_stride: read_env_u32("PAYOUT_WAVE_STRIDE", 5),
        }
    }
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) entry_cost: u32,
    pub(crate) house_account: String,
    pub(crate) house_pin: String,
    pub(crate) ledger_url: String,
    pub(crate) ledger_timeout: Duration,
    pub(crate) session_idle_secs: u64,
    pub(crate) session_sweep_secs: u64,
    pub(crate) rate_limit_max: u32,
    pub(crate) rate_limit_window: Duration,
    pub(crate) data_dir: PathBuf,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            entry_cost: read_env_u32("ENTRY_COST", DEFAULT_ENTRY_COST),
            house_account: env::var("HOUSE_ACCOUNT")
                .unwrap_or_else(|_| DEFAULT_HOUSE_ACCOUNT.to_string()),
            house_pin: env::var("HOUSE_PIN").unwrap_or_default(),
            ledger_url: env::var("LEDGER_URL").unwrap_or_else(|_| DEFAULT_LEDGER_URL.to_string()),
            ledger_timeout: Duration::from_secs(read_env_u64(
                "LEDGER_TIMEOUT_SECS",
                DEFAULT_LEDGER_TIMEOUT_SECS,
            )),
            session_idle_secs: read_env_u64("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            session_sweep_secs: read_env_u64("SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS),
            rate_limit_max: read_env_u32("RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX),
            rate_limit_window: Duration::from_secs(read_env_u64(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )),
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| {
                DEFAULT_DATA_DIR.to_string()
            })),
        }
    }
}

/// Session handles sit behind their own mutex so two in-flight requests for
/// the same player serialize instead of interleaving partial updates.
pub(crate) type SessionMap = RwLock<HashMap<String, Arc<Mutex<GameSession>>>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sessions: Arc<SessionMap>,
    pub(crate) paid: Arc<RwLock<HashSet<String>>>,
    pub(crate) payouts: Arc<PayoutStore>,
    pub(crate) ledger: Arc<LedgerClient>,
    pub(crate) policy: ValidationPolicy,
    pub(crate) entry_cost: u32,
    pub(crate) house_account: String,
    pub(crate) house_pin: String,
    pub(crate) session_idle_secs: u64,
    pub(crate) rate_limit_max: u32,
    pub(crate) rate_limit_window: Duration,
}

pub(crate) fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
