use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PayInRequest {
    pub(crate) pin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordEventRequest {
    #[serde(rename = "eventType")]
    pub(crate) event_type: String,
    #[serde(default)]
    pub(crate) data: serde_json::Value,
}

/// Client-reported wave outcome. `timeTaken` stays signed so a hostile
/// negative value reaches the validator instead of failing to parse.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct WaveCompletePayload {
    #[serde(rename = "waveNumber")]
    pub(crate) wave_number: u32,
    #[serde(rename = "timeTaken")]
    pub(crate) time_taken_ms: i64,
    #[serde(rename = "scoreGained")]
    pub(crate) score_gained: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AccessResponse {
    pub(crate) ok: bool,
    #[serde(rename = "needsPayment")]
    pub(crate) needs_payment: bool,
    pub(crate) cost: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct PayInResponse {
    pub(crate) ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionStartedResponse {
    pub(crate) ok: bool,
    #[serde(rename = "sessionId")]
    pub(crate) session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub(crate) struct WaveAckResponse {
    pub(crate) ok: bool,
    #[serde(rename = "nextWave")]
    pub(crate) next_wave: u32,
    #[serde(rename = "serverScore")]
    pub(crate) server_score: u64,
    #[serde(rename = "totalPayout")]
    pub(crate) total_payout: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct EndGameResponse {
    pub(crate) ok: bool,
    pub(crate) payout: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) active_sessions: usize,
    pub(crate) entry_cost: u32,
    pub(crate) payout_unit: u32,
    pub(crate) wave_score_ceiling: u32,
    pub(crate) max_wave_time_ms: i64,
    pub(crate) rate_limit_max: u32,
    pub(crate) session_idle_secs: u64,
}
