use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use codec::rpc::{BlockResponse, BlockResultsResponse, StatusResponse};
use derive_more::Debug;
use eyre::Result;
use primitives::samples::{BlockSample, ChainSnapshot};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::{error::NetworkError, http_retry::retry_op};

/// A block as seen by the estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeBlock {
    /// Block height
    pub height: i64,
    /// Block timestamp
    pub time: DateTime<Utc>,
    /// Raw transactions
    pub txs: Vec<Vec<u8>>,
    /// Serialized block size without the last commit
    pub payload_size: usize,
}

impl NodeBlock {
    /// Size summary of this block.
    pub fn sample(&self) -> BlockSample {
        BlockSample {
            height: self.height,
            time: self.time,
            raw_size: self.payload_size,
            tx_count: self.txs.len(),
        }
    }
}

/// Execution outcome of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    /// Result code, `0` on success
    pub code: u32,
}

impl TxOutcome {
    /// Whether the transaction executed successfully.
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Read access to a consensus node.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Chain ID and latest height.
    async fn status(&self) -> Result<ChainSnapshot>;

    /// Block at `height`.
    async fn block(&self, height: i64) -> Result<NodeBlock>;

    /// Execution results of the transactions in the block at `height`.
    async fn block_results(&self, height: i64) -> Result<Vec<TxOutcome>>;
}

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// JSON-RPC 2.0 client for a Tendermint/CometBFT node.
#[derive(Debug)]
pub struct HttpNodeClient {
    #[debug(skip)]
    http: Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpNodeClient {
    /// Create a new client for the node at `url`.
    pub fn new(url: Url) -> Self {
        Self { http: Client::new(), url, next_id: AtomicU64::new(1) }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, NetworkError> {
        retry_op(|| self.call_once(method, &params)).await
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &Value,
    ) -> Result<T, NetworkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let resp = self.http.post(self.url.clone()).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NetworkError::UnexpectedStatus { url: self.url.to_string(), status });
        }

        let text = resp.text().await?;
        let envelope: RpcEnvelope<T> = serde_json::from_str(&text)
            .map_err(|source| NetworkError::Json { target: method.to_owned(), source })?;

        if let Some(err) = envelope.error {
            let message = match err.data {
                Some(Value::String(data)) if !data.is_empty() => format!("{}: {}", err.message, data),
                _ => err.message,
            };
            return Err(NetworkError::Rpc { method, code: err.code, message });
        }
        envelope.result.ok_or(NetworkError::EmptyResponse { method })
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn status(&self) -> Result<ChainSnapshot> {
        let status: StatusResponse = self.call("status", json!({})).await?;
        Ok(ChainSnapshot {
            chain_id: status.node_info.network,
            latest_height: status.sync_info.latest_block_height,
        })
    }

    async fn block(&self, height: i64) -> Result<NodeBlock> {
        let resp: BlockResponse = self.call("block", json!({ "height": height.to_string() })).await?;
        let block = resp.block;
        let payload_size = codec::block_payload_size(&block).map_err(NetworkError::from)?;
        let txs = codec::decode_txs(&block).map_err(NetworkError::from)?;
        debug!(height, txs = txs.len(), size = payload_size, "fetched block");

        Ok(NodeBlock { height: block.header.height, time: block.header.time, txs, payload_size })
    }

    async fn block_results(&self, height: i64) -> Result<Vec<TxOutcome>> {
        let resp: BlockResultsResponse =
            self.call("block_results", json!({ "height": height.to_string() })).await?;
        Ok(resp.txs_results.unwrap_or_default().iter().map(|r| TxOutcome { code: r.code }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use mockito::{Matcher, Server};

    const HASH: &str = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";

    fn block_result(height: i64, txs: &[&[u8]]) -> Value {
        let block_id = json!({"hash": HASH, "parts": {"total": 1, "hash": HASH}});
        let txs: Vec<String> = txs.iter().map(|tx| STANDARD.encode(tx)).collect();
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "block_id": block_id,
                "block": {
                    "header": {
                        "version": {"block": "11"},
                        "chain_id": "test-1",
                        "height": height.to_string(),
                        "time": "2024-02-01T10:00:00Z",
                        "last_block_id": block_id,
                        "last_commit_hash": HASH,
                        "data_hash": HASH,
                        "validators_hash": HASH,
                        "next_validators_hash": HASH,
                        "consensus_hash": HASH,
                        "app_hash": HASH,
                        "last_results_hash": "",
                        "evidence_hash": "",
                        "proposer_address": "AABBCCDDEEFF00112233445566778899AABBCCDD"
                    },
                    "data": {"txs": txs},
                    "evidence": {"evidence": []},
                    "last_commit": {
                        "height": (height - 1).to_string(),
                        "round": 0,
                        "block_id": block_id,
                        "signatures": []
                    }
                }
            }
        })
    }

    async fn client(server: &Server) -> HttpNodeClient {
        HttpNodeClient::new(Url::parse(&server.url()).unwrap())
    }

    #[tokio::test]
    async fn status_returns_chain_snapshot() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"jsonrpc": "2.0", "method": "status"})))
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "node_info": {"network": "osmosis-1"},
                        "sync_info": {"latest_block_height": "987654"}
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let status = client(&server).await.status().await.unwrap();
        assert_eq!(
            status,
            ChainSnapshot { chain_id: "osmosis-1".to_owned(), latest_height: 987_654 }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn block_decodes_txs_and_size() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(
                json!({"method": "block", "params": {"height": "42"}}),
            ))
            .with_status(200)
            .with_body(block_result(42, &[b"first", b"second"]).to_string())
            .create_async()
            .await;

        let block = client(&server).await.block(42).await.unwrap();
        assert_eq!(block.height, 42);
        assert_eq!(block.txs, vec![b"first".to_vec(), b"second".to_vec()]);
        assert!(block.payload_size > 0);
        assert_eq!(block.sample().tx_count, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn block_results_maps_codes() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "block_results"})))
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {"height": "7", "txs_results": [{"code": 0}, {"code": 5}]}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let outcomes = client(&server).await.block_results(7).await.unwrap();
        assert_eq!(outcomes, vec![TxOutcome { code: 0 }, TxOutcome { code: 5 }]);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
    }

    #[tokio::test]
    async fn jsonrpc_error_is_surfaced() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": {
                        "code": -32603,
                        "message": "Internal error",
                        "data": "height 99 must be less than or equal to the current blockchain height 10"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let err = client(&server).await.block(99).await.unwrap_err();
        let err = err.downcast::<NetworkError>().unwrap();
        match err {
            NetworkError::Rpc { method, code, message } => {
                assert_eq!(method, "block");
                assert_eq!(code, -32603);
                assert!(message.contains("height 99"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_result_is_a_json_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{"node_info":{}}}"#)
            .create_async()
            .await;

        let err = client(&server).await.status().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<NetworkError>(), Some(NetworkError::Json { .. })));
    }
}
