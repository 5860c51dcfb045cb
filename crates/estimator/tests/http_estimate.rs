//! End-to-end estimation against mocked node and REST endpoints.
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::TimeDelta;
use codec::tx::{AuthInfo, BLOB_TX_TYPE_ID, BlobTx, Fee, ProtoCoin, Tx};
use estimator::{BlockRangeCostEstimator, EstimatorConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use network::{HttpNodeClient, MintClient};
use primitives::gas::GasParams;
use prost::Message;
use serde_json::{Value, json};
use url::Url;

const HASH: &str = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";

fn fee_tx(denom: &str, amount: &str) -> Vec<u8> {
    Tx {
        body: vec![0x0a, 0x00],
        auth_info: Some(AuthInfo {
            fee: Some(Fee {
                amount: vec![ProtoCoin { denom: denom.to_owned(), amount: amount.to_owned() }],
                gas_limit: 100_000,
                ..Default::default()
            }),
        }),
        signatures: vec![vec![7; 64]],
    }
    .encode_to_vec()
}

fn rpc_result(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

fn block_json(height: i64, time: &str, txs: &[Vec<u8>]) -> Value {
    let block_id = json!({"hash": HASH, "parts": {"total": 1, "hash": HASH}});
    let txs: Vec<String> = txs.iter().map(|tx| STANDARD.encode(tx)).collect();
    json!({
        "block_id": block_id,
        "block": {
            "header": {
                "version": {"block": "11"},
                "chain_id": "mocha-4",
                "height": height.to_string(),
                "time": time,
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
                "signatures": [{
                    "block_id_flag": 2,
                    "validator_address": "AABBCCDDEEFF00112233445566778899AABBCCDD",
                    "timestamp": time,
                    "signature": STANDARD.encode([1u8; 64])
                }]
            }
        }
    })
}

async fn mock_rpc(server: &mut ServerGuard, method: &str, height: Option<i64>, result: Value) -> Mock {
    let body = match height {
        Some(h) => json!({"method": method, "params": {"height": h.to_string()}}),
        None => json!({"method": method}),
    };
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(body))
        .with_status(200)
        .with_body(rpc_result(result))
        .create_async()
        .await
}

async fn mock_chain(server: &mut ServerGuard) -> Vec<Mock> {
    let blob_tx = BlobTx {
        tx: fee_tx("utia", "20"),
        blobs: vec![vec![0; 600]],
        type_id: BLOB_TX_TYPE_ID.to_owned(),
    }
    .encode_to_vec();

    vec![
        mock_rpc(
            server,
            "status",
            None,
            json!({
                "node_info": {"network": "mocha-4"},
                "sync_info": {"latest_block_height": "12"}
            }),
        )
        .await,
        mock_rpc(
            server,
            "block",
            Some(10),
            block_json(10, "2024-03-01T00:00:00.250Z", &[fee_tx("utia", "5"), blob_tx]),
        )
        .await,
        mock_rpc(server, "block", Some(11), block_json(11, "2024-03-01T00:00:06Z", &[])).await,
        mock_rpc(
            server,
            "block",
            Some(12),
            block_json(12, "2024-03-01T00:00:12.750Z", &[fee_tx("utia", "1000")]),
        )
        .await,
        mock_rpc(
            server,
            "block_results",
            Some(10),
            json!({"height": "10", "txs_results": [{"code": 0}, {"code": 0}]}),
        )
        .await,
        mock_rpc(
            server,
            "block_results",
            Some(12),
            json!({"height": "12", "txs_results": [{"code": 19}]}),
        )
        .await,
    ]
}

fn config() -> EstimatorConfig {
    EstimatorConfig { query_range: 3, delay: Duration::ZERO, gas: GasParams::default() }
}

#[tokio::test]
async fn estimates_cost_over_http() {
    let mut server = Server::new_async().await;
    let _mocks = mock_chain(&mut server).await;

    let node = HttpNodeClient::new(Url::parse(&server.url()).unwrap());
    let report = BlockRangeCostEstimator::new(node, config()).run().await.unwrap();

    assert_eq!(report.chain.chain_id, "mocha-4");
    assert_eq!(report.start_height, 10);
    assert_eq!(report.block_count, 3);
    assert_eq!(report.window, TimeDelta::milliseconds(12_500));
    assert_eq!(report.total_tx_fees, 25);
    assert_eq!(report.fee_denom.as_deref(), Some("utia"));
    assert!(report.total_block_size > 600);
    assert!(report.total_gas_estimate > 2 * 75_000);
    assert!(report.inflation.is_none());

    let summary = report.to_string();
    assert!(summary.starts_with("mocha-4 over the last 3 blocks ("));
    assert!(summary.contains(" KB & 13s) would cost "));
    assert_eq!(summary.lines().count(), 1);
}

#[tokio::test]
async fn estimates_inflation_over_http() {
    let mut server = Server::new_async().await;
    let _mocks = mock_chain(&mut server).await;
    let provisions = server
        .mock("GET", "/cosmos/mint/v1beta1/annual_provisions")
        .with_status(200)
        .with_body(r#"{"annual_provisions":"31536000000.000000000000000000"}"#)
        .create_async()
        .await;

    let url = Url::parse(&server.url()).unwrap();
    let report = BlockRangeCostEstimator::new(HttpNodeClient::new(url.clone()), config())
        .with_provisions(MintClient::new(url))
        .run()
        .await
        .unwrap();

    let inflation = report.inflation.unwrap();
    assert!((inflation.estimated_inflation - 12_500.0).abs() < 1e-6);
    assert_eq!(report.total_cost(), 12_525);

    let summary = report.to_string();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "duration 12.5s annualProvisions 31536000000 inflation 12500 txFees 25");
    assert_eq!(lines[2], "The same blocks cost 12525 utia");
    provisions.assert_async().await;
}

#[tokio::test]
async fn rpc_error_aborts_without_report() {
    let mut server = Server::new_async().await;
    let _status = mock_rpc(
        &mut server,
        "status",
        None,
        json!({
            "node_info": {"network": "mocha-4"},
            "sync_info": {"latest_block_height": "1"}
        }),
    )
    .await;
    let _block = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({"method": "block"})))
        .with_status(200)
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32603, "message": "Internal error", "data": "block pruned"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let node = HttpNodeClient::new(Url::parse(&server.url()).unwrap());
    let err = BlockRangeCostEstimator::new(node, config()).run().await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("failed to get block 1"));
    assert!(msg.contains("block pruned"));
}
