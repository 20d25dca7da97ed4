use std::sync::Arc;
use std::time::Instant;

use actix_web::{
    http::StatusCode,
    web::{Data, Json},
    HttpRequest, HttpResponse, Responder,
};
use tokio::sync::Mutex;

use crate::auth::player_id;
use crate::config::AppState;
use crate::ledger::TransferRequest;
use crate::response::json_error_with_code;
use crate::sessions::{EventError, GameSession};
use crate::types::{
    AccessResponse, EndGameResponse, HealthResponse, PayInRequest, PayInResponse,
    RecordEventRequest, SessionStartedResponse, WaveAckResponse, WaveCompletePayload,
};

fn unauthorized() -> HttpResponse {
    json_error_with_code(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        Some("unauthorized"),
    )
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let active_sessions = state.sessions.read().await.len();
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "wavebreak-api",
        active_sessions,
        entry_cost: state.entry_cost,
        payout_unit: state.policy.payout_unit,
        wave_score_ceiling: state.policy.wave_score_ceiling,
        max_wave_time_ms: state.policy.max_wave_time_ms,
        rate_limit_max: state.rate_limit_max,
        session_idle_secs: state.session_idle_secs,
    })
}

pub(crate) async fn check_game_access(state: Data<AppState>, req: HttpRequest) -> impl Responder {
    let Some(player) = player_id(req.headers()) else {
        return unauthorized();
    };

    let paid = state.paid.read().await.contains(&player);
    HttpResponse::Ok().json(AccessResponse {
        ok: true,
        needs_payment: !paid,
        cost: state.entry_cost,
    })
}

/// Collect the entry fee through the external ledger. A successful transfer
/// records one unconsumed entry credit against the player.
pub(crate) async fn pay_in(
    state: Data<AppState>,
    req: HttpRequest,
    body: Json<PayInRequest>,
) -> impl Responder {
    let Some(player) = player_id(req.headers()) else {
        return unauthorized();
    };

    if state.paid.read().await.contains(&player) {
        return HttpResponse::Ok().json(PayInResponse {
            ok: true,
            message: Some("entry fee already settled".to_string()),
        });
    }

    let transfer = TransferRequest {
        from: player.clone(),
        to: state.house_account.clone(),
        amount: state.entry_cost,
        pin: body.pin.clone(),
        reason: "Game entry fee".to_string(),
    };

    match state.ledger.transfer(&transfer).await {
        Ok(reply) if reply.success => {
            state.paid.write().await.insert(player.clone());
            tracing::info!(player = %player, amount = state.entry_cost, "entry fee settled");
            HttpResponse::Ok().json(PayInResponse {
                ok: true,
                message: reply.message,
            })
        }
        Ok(reply) => json_error_with_code(
            StatusCode::PAYMENT_REQUIRED,
            reply
                .message
                .unwrap_or_else(|| "transfer declined".to_string()),
            Some("transfer_declined"),
        ),
        Err(err) => {
            tracing::warn!(player = %player, "entry transfer failed: {err}");
            json_error_with_code(
                StatusCode::BAD_GATEWAY,
                "transfer failed",
                Some("transfer_failed"),
            )
        }
    }
}

/// Start a session, consuming the player's entry credit. Payment first, play
/// second; the credit is spent even if the player never reports a wave.
pub(crate) async fn start_game_session(state: Data<AppState>, req: HttpRequest) -> impl Responder {
    let Some(player) = player_id(req.headers()) else {
        return unauthorized();
    };

    if !state.paid.write().await.remove(&player) {
        return json_error_with_code(
            StatusCode::PAYMENT_REQUIRED,
            "payment required before starting a session",
            Some("payment_required"),
        );
    }

    let session = GameSession::new(player.clone(), Instant::now());
    let session_id = session.session_id;
    let replaced = state
        .sessions
        .write()
        .await
        .insert(player.clone(), Arc::new(Mutex::new(session)))
        .is_some();
    if replaced {
        tracing::warn!(player = %player, "replaced a live session on new start");
    }
    tracing::info!(player = %player, session_id = %session_id, "game session started");

    HttpResponse::Ok().json(SessionStartedResponse {
        ok: true,
        session_id,
    })
}

pub(crate) async fn record_game_event(
    state: Data<AppState>,
    req: HttpRequest,
    body: Json<RecordEventRequest>,
) -> impl Responder {
    let Some(player) = player_id(req.headers()) else {
        return unauthorized();
    };

    let handle = { state.sessions.read().await.get(&player).cloned() };
    let Some(handle) = handle else {
        return json_error_with_code(
            StatusCode::NOT_FOUND,
            "no active game session",
            Some("no_session"),
        );
    };

    let now = Instant::now();
    let mut session = handle.lock().await;
    if !session.active {
        return json_error_with_code(
            StatusCode::NOT_FOUND,
            "no active game session",
            Some("no_session"),
        );
    }

    if !session.allow_request(now, state.rate_limit_max, state.rate_limit_window) {
        // Soft rejection: the offending request is dropped, the session lives.
        let err = EventError::RateLimited;
        tracing::debug!(player = %player, "{err}");
        return json_error_with_code(StatusCode::TOO_MANY_REQUESTS, err.to_string(), Some("rate_limited"));
    }
    session.touch(now);

    match body.event_type.as_str() {
        "WAVE_COMPLETE" => {
            let payload: WaveCompletePayload = match serde_json::from_value(body.data.clone()) {
                Ok(payload) => payload,
                Err(err) => {
                    return json_error_with_code(
                        StatusCode::BAD_REQUEST,
                        format!("malformed event data: {err}"),
                        Some("invalid_event_data"),
                    )
                }
            };

            match session.record_wave_complete(&payload, &state.policy) {
                Ok(ack) => HttpResponse::Ok().json(WaveAckResponse {
                    ok: true,
                    next_wave: ack.next_wave,
                    server_score: ack.total_score,
                    total_payout: ack.total_payout,
                }),
                Err(err) if err.is_terminal() => {
                    session.active = false;
                    let session_id = session.session_id;
                    drop(session);
                    state.sessions.write().await.remove(&player);
                    tracing::warn!(player = %player, session_id = %session_id, "session terminated: {err}");
                    // The client only ever sees the generic refusal.
                    json_error_with_code(
                        StatusCode::FORBIDDEN,
                        "wave validation failed",
                        Some("validation_failed"),
                    )
                }
                Err(err) => json_error_with_code(
                    StatusCode::BAD_REQUEST,
                    err.to_string(),
                    Some("invalid_event"),
                ),
            }
        }
        other => {
            let err = EventError::UnknownEvent {
                event_type: other.to_string(),
            };
            tracing::debug!(player = %player, "{err}");
            json_error_with_code(StatusCode::BAD_REQUEST, "unknown event", Some("unknown_event"))
        }
    }
}

/// Close the session and pay out whatever the server's own ledger accrued.
/// The amount is never taken from the client. Failed transfers stay on the
/// books as owed rows for manual reconciliation; there is no automatic retry.
pub(crate) async fn end_game(state: Data<AppState>, req: HttpRequest) -> impl Responder {
    let Some(player) = player_id(req.headers()) else {
        return unauthorized();
    };

    let handle = state.sessions.write().await.remove(&player);
    let Some(handle) = handle else {
        return json_error_with_code(
            StatusCode::NOT_FOUND,
            "no active game session",
            Some("no_session"),
        );
    };
    let session = handle.lock().await.clone();

    let payout = session.payout_earned;
    tracing::info!(
        player = %player,
        session_id = %session.session_id,
        waves = session.waves_completed,
        score = session.total_score,
        duration_s = session.started_at.elapsed().as_secs(),
        payout,
        "game session ended"
    );
    if payout == 0 {
        return HttpResponse::Ok().json(EndGameResponse {
            ok: true,
            payout: 0,
            error: None,
        });
    }

    let payout_id = match state.payouts.record_owed(&player, payout) {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(player = %player, amount = payout, "failed to record payout: {err}");
            return json_error_with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "payout store error",
                Some("internal_error"),
            );
        }
    };

    let transfer = TransferRequest {
        from: state.house_account.clone(),
        to: player.clone(),
        amount: payout,
        pin: state.house_pin.clone(),
        reason: format!("Survival payout, {} waves", session.waves_completed),
    };

    let failure = match state.ledger.transfer(&transfer).await {
        Ok(reply) if reply.success => {
            if let Err(err) = state.payouts.mark_settled(payout_id) {
                tracing::error!(payout_id = %payout_id, "failed to mark payout settled: {err}");
            }
            tracing::info!(player = %player, amount = payout, "payout transferred");
            return HttpResponse::Ok().json(EndGameResponse {
                ok: true,
                payout,
                error: None,
            });
        }
        Ok(reply) => reply
            .message
            .unwrap_or_else(|| "transfer declined".to_string()),
        Err(err) => err.to_string(),
    };

    if let Err(err) = state.payouts.mark_failed(payout_id, &failure) {
        tracing::error!(payout_id = %payout_id, "failed to record payout error: {err}");
    }
    tracing::error!(
        player = %player,
        amount = payout,
        payout_id = %payout_id,
        "payout transfer failed, held for manual reconciliation: {failure}"
    );

    HttpResponse::Ok().json(EndGameResponse {
        ok: true,
        payout: 0,
        error: Some("payout transfer failed; amount recorded for manual review".to_string()),
    })
}
