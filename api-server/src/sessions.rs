use std::fmt;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::{AppState, ValidationPolicy};
use crate::types::WaveCompletePayload;

/// Fixed-window request counter. The window restarts once it elapses; the
/// counter covers every event call on the session, accepted or not.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RateWindow {
    window_start: Instant,
    count: u32,
}

impl RateWindow {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    pub(crate) fn allow(&mut self, now: Instant, max: u32, window: Duration) -> bool {
        if now.duration_since(self.window_start) > window {
            self.window_start = now;
            self.count = 0;
        }
        self.count += 1;
        self.count <= max
    }
}

/// Authoritative per-player session state. The server's counters, never the
/// client's, decide score totals and payout.
#[derive(Debug, Clone)]
pub(crate) struct GameSession {
    pub(crate) session_id: Uuid,
    pub(crate) user_id: String,
    pub(crate) started_at: Instant,
    pub(crate) current_wave: u32,
    pub(crate) waves_completed: u32,
    pub(crate) total_score: u64,
    pub(crate) payout_earned: u32,
    pub(crate) active: bool,
    pub(crate) last_activity: Instant,
    rate: RateWindow,
}

/// Successful wave acknowledgement echoed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WaveAck {
    pub(crate) next_wave: u32,
    pub(crate) total_score: u64,
    pub(crate) total_payout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EventError {
    RateLimited,
    WaveMismatch { reported: u32, expected: u32 },
    SuspiciousTiming { time_taken_ms: i64 },
    ImpossibleScore { score_gained: u64, ceiling: u32 },
    UnknownEvent { event_type: String },
}

impl EventError {
    /// Cheat signals kill the session; soft rejections leave it running.
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::WaveMismatch { .. }
                | Self::SuspiciousTiming { .. }
                | Self::ImpossibleScore { .. }
        )
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limit exceeded"),
            Self::WaveMismatch { reported, expected } => {
                write!(f, "wave mismatch: reported {reported}, expected {expected}")
            }
            Self::SuspiciousTiming { time_taken_ms } => {
                write!(f, "suspicious wave timing: {time_taken_ms} ms")
            }
            Self::ImpossibleScore {
                score_gained,
                ceiling,
            } => write!(
                f,
                "impossible score: {score_gained} exceeds per-wave ceiling {ceiling}"
            ),
            Self::UnknownEvent { event_type } => write!(f, "unknown event type: {event_type}"),
        }
    }
}

impl GameSession {
    pub(crate) fn new(user_id: impl Into<String>, now: Instant) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user_id.into(),
            started_at: now,
            current_wave: 1,
            waves_completed: 0,
            total_score: 0,
            payout_earned: 0,
            active: true,
            last_activity: now,
            rate: RateWindow::new(now),
        }
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub(crate) fn allow_request(&mut self, now: Instant, max: u32, window: Duration) -> bool {
        self.rate.allow(now, max, window)
    }

    pub(crate) fn is_idle(&self, now: Instant, idle_after: Duration) -> bool {
        now.duration_since(self.last_activity) > idle_after
    }

    /// Validate a client wave report. Checks run in a fixed order: wave
    /// continuity, then timing bounds, then the score ceiling. A passing
    /// report advances the wave by exactly one and accrues payout on every
    /// fifth completed wave.
    pub(crate) fn record_wave_complete(
        &mut self,
        data: &WaveCompletePayload,
        policy: &ValidationPolicy,
    ) -> Result<WaveAck, EventError> {
        if data.wave_number != self.current_wave {
            return Err(EventError::WaveMismatch {
                reported: data.wave_number,
                expected: self.current_wave,
            });
        }

        if data.time_taken_ms < 0 || data.time_taken_ms > policy.max_wave_time_ms {
            return Err(EventError::SuspiciousTiming {
                time_taken_ms: data.time_taken_ms,
            });
        }

        if data.score_gained > u64::from(policy.wave_score_ceiling) {
            return Err(EventError::ImpossibleScore {
                score_gained: data.score_gained,
                ceiling: policy.wave_score_ceiling,
            });
        }

        self.current_wave = data.wave_number + 1;
        self.waves_completed += 1;
        self.total_score += data.score_gained;
        if data.wave_number % policy.payout_wave_stride == 0 {
            self.payout_earned += policy.payout_unit;
        }

        Ok(WaveAck {
            next_wave: self.current_wave,
            total_score: self.total_score,
            total_payout: self.payout_earned,
        })
    }
}

/// Periodic reaper for sessions that stopped reporting. A safety net, not a
/// gameplay path: any event refreshes `last_activity`.
pub(crate) fn spawn_session_sweep(state: AppState, sweep_secs: u64) {
    tokio::spawn(async move {
        let sweep = Duration::from_secs(sweep_secs);
        let idle_after = Duration::from_secs(state.session_idle_secs);
        loop {
            tokio::time::sleep(sweep).await;
            let now = Instant::now();

            let mut sessions = state.sessions.write().await;
            let mut expired = Vec::new();
            for (player, handle) in sessions.iter() {
                let session = handle.lock().await;
                if session.is_idle(now, idle_after) {
                    expired.push(player.clone());
                }
            }
            for player in expired {
                sessions.remove(&player);
                tracing::info!(player = %player, "purged idle game session");
            }
        }
    });
}
