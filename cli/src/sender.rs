//! Transaction sender module
//!
//! Sends transactions as raw JSON-RPC calls and polls for confirmation

use base64::{engine::general_purpose::STANDARD, Engine};
use solana_sdk::{signature::Signature, transaction::Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Delay between confirmation polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Re-send the transaction every this many unanswered polls
const RESEND_EVERY: u32 = 10;

/// Transaction sender
pub struct TxSender {
    client: reqwest::Client,
    rpc_url: String,
}

impl TxSender {
    pub fn new(rpc_url: String) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SendError::Network(e.to_string()))?;

        Ok(Self {
            client,
            rpc_url,
        })
    }

    async fn call(&self, body: serde_json::Value) -> Result<serde_json::Value, SendError> {
        let response = self.client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        let json: serde_json::Value = response.json().await
            .map_err(|e| SendError::Parse(e.to_string()))?;

        if let Some(error) = json.get("error") {
            return Err(SendError::RpcError(error.to_string()));
        }

        Ok(json)
    }

    /// Send a transaction via standard RPC (sendTransaction)
    pub async fn send_rpc(&self, tx: &Transaction) -> Result<Signature, SendError> {
        let tx_bytes = bincode::serialize(tx)
            .map_err(|e| SendError::Serialize(e.to_string()))?;
        let tx_base64 = STANDARD.encode(&tx_bytes);

        debug!("Sending tx: {} bytes (limit 1232)", tx_bytes.len());

        let json = self.call(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "sendTransaction",
            "params": [
                tx_base64,
                {
                    "encoding": "base64",
                    "preflightCommitment": "confirmed",
                    "maxRetries": 0
                }
            ]
        })).await?;

        let sig_str = json["result"].as_str()
            .ok_or(SendError::Parse("No result in response".to_string()))?;

        Signature::from_str(sig_str).map_err(|e| SendError::Parse(e.to_string()))
    }

    /// Check transaction signature status
    /// - None = not found yet
    /// - Some(true) = confirmed/finalized
    /// - Some(false) = failed with error
    pub async fn get_signature_status(&self, signature: &Signature) -> Result<Option<bool>, SendError> {
        let json = self.call(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getSignatureStatuses",
            "params": [
                [signature.to_string()],
                { "searchTransactionHistory": false }
            ]
        })).await?;

        let values = json["result"]["value"].as_array()
            .ok_or(SendError::Parse("Expected array in result.value".to_string()))?;

        Ok(values.first().and_then(parse_status))
    }

    /// Send and confirm a transaction via standard RPC
    pub async fn send_and_confirm_rpc(&self, tx: &Transaction, max_retries: u32) -> Result<Signature, SendError> {
        let signature = self.send_rpc(tx).await?;
        info!("Sent {}", signature);

        for i in 0..max_retries {
            tokio::time::sleep(POLL_INTERVAL).await;

            match self.get_signature_status(&signature).await {
                Ok(Some(true)) => {
                    return Ok(signature);
                }
                Ok(Some(false)) => {
                    return Err(SendError::TransactionFailed(signature.to_string()));
                }
                Ok(None) => {
                    if i > 0 && i % RESEND_EVERY == 0 {
                        let _ = self.send_rpc(tx).await;
                    }
                }
                Err(e) => {
                    // Network error, keep trying
                    if i == max_retries - 1 {
                        return Err(e);
                    }
                }
            }
        }

        Err(SendError::Timeout(signature.to_string()))
    }
}

/// Maps one entry of a getSignatureStatuses result.
fn parse_status(value: &serde_json::Value) -> Option<bool> {
    if value.is_null() {
        return None;
    }

    if let Some(err) = value.get("err") {
        if !err.is_null() {
            return Some(false);
        }
    }

    let status_str = value.get("confirmationStatus")?.as_str().unwrap_or("");
    if status_str == "confirmed" || status_str == "finalized" {
        Some(true)
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("RPC error: {0}")]
    RpcError(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Timeout waiting for confirmation: {0}")]
    Timeout(String),
}
