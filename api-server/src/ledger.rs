use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wire shape of the external currency-transfer RPC. The protocol behind it
/// is opaque to us: one request, one `{success, message}` reply, bounded by
/// the client-side timeout.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransferRequest {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) amount: u32,
    pub(crate) pin: String,
    pub(crate) reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TransferReply {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug)]
pub(crate) enum LedgerError {
    /// The transfer did not complete within the deadline. Treated as failed,
    /// never retried automatically.
    Timeout,
    Transport(String),
    BadStatus(u16),
    Decode(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "transfer timed out"),
            Self::Transport(detail) => write!(f, "transfer transport error: {detail}"),
            Self::BadStatus(status) => write!(f, "ledger returned HTTP {status}"),
            Self::Decode(detail) => write!(f, "invalid ledger response: {detail}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Thin HTTP client for the payment/ledger collaborator. One in-flight
/// request per transfer; the timeout is the only cancellation mechanism.
pub(crate) struct LedgerClient {
    http: reqwest::Client,
    transfer_url: String,
}

impl LedgerClient {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LedgerError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            transfer_url: format!("{}/transfer", base_url.trim_end_matches('/')),
        })
    }

    pub(crate) async fn transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferReply, LedgerError> {
        let response = self
            .http
            .post(&self.transfer_url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LedgerError::Timeout
                } else {
                    LedgerError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::BadStatus(status.as_u16()));
        }

        response
            .json::<TransferReply>()
            .await
            .map_err(|err| LedgerError::Decode(err.to_string()))
    }
}
