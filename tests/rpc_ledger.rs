//! JSON-RPC ledger client against a mock node.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use solana_dashboard::ledger::confirm::wait_for_confirmation;
use solana_dashboard::ledger::{
    Cluster, Commitment, Identity, Ledger, LedgerConfig, LedgerError, RpcLedger,
};

mod common;
use common::RpcReply;

const KEY: &str = "11111111111111111111111111111111";

fn config(primary: &str, failover: Vec<String>) -> LedgerConfig {
    LedgerConfig {
        cluster: Cluster::Devnet,
        rpc_url: Some(primary.to_string()),
        failover_urls: failover,
        rpc_timeout_secs: 1,
        commitment: Commitment::Confirmed,
    }
}

fn url(addr: std::net::SocketAddr) -> String {
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_account_and_signatures() {
    let addr = common::start_mock_rpc(|method, _params| async move {
        match method.as_str() {
            "getAccountInfo" => RpcReply::Result(common::account_value(2_500_000_000)),
            "getSignaturesForAddress" => {
                RpcReply::Result(common::signatures_value(&["sigA", "sigB", "sigC"]))
            }
            _ => RpcReply::Error(-32601, "Method not found".into()),
        }
    })
    .await;

    let ledger = RpcLedger::new(config(&url(addr), vec![])).unwrap();
    let identity = Identity::parse(KEY).unwrap();

    let account = ledger.get_account_info(&identity).await.unwrap();
    assert_eq!(account.lamports, 2_500_000_000);
    assert!(account.exists);

    let records = ledger.get_signatures_for_address(&identity, 10).await.unwrap();
    let sigs: Vec<_> = records.iter().map(|r| r.signature.as_str()).collect();
    assert_eq!(sigs, vec!["sigA", "sigB", "sigC"]);
    assert_eq!(records[2].ordinal, 2);
}

#[tokio::test]
async fn test_missing_account_is_not_an_error() {
    let addr = common::start_mock_rpc(|_, _| async move {
        RpcReply::Result(json!({ "context": { "slot": 1 }, "value": null }))
    })
    .await;

    let ledger = RpcLedger::new(config(&url(addr), vec![])).unwrap();
    let account = ledger
        .get_account_info(&Identity::parse(KEY).unwrap())
        .await
        .unwrap();
    assert!(!account.exists);
    assert_eq!(account.lamports, 0);
}

#[tokio::test]
async fn test_signature_request_params() {
    let addr = common::start_mock_rpc(|method, params: Value| async move {
        assert_eq!(method, "getSignaturesForAddress");
        assert_eq!(params[0], KEY);
        assert_eq!(params[1]["limit"], 10);
        RpcReply::Result(json!([]))
    })
    .await;

    let ledger = RpcLedger::new(config(&url(addr), vec![])).unwrap();
    let records = ledger
        .get_signatures_for_address(&Identity::parse(KEY).unwrap(), 10)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_failover_on_http_error() {
    let bad = common::start_mock_rpc(|_, _| async move { RpcReply::Status(503) }).await;
    let good = common::start_mock_rpc(|_, _| async move { RpcReply::Result(json!("ok")) }).await;

    let ledger = RpcLedger::new(config(&url(bad), vec![url(good)])).unwrap();
    assert!(ledger.is_healthy().await);
}

#[tokio::test]
async fn test_remote_error_is_not_failed_over() {
    let second_calls = Arc::new(AtomicU32::new(0));
    let first = common::start_mock_rpc(|_, _| async move {
        RpcReply::Error(429, "Too many requests for a specific RPC call".into())
    })
    .await;
    let counter = second_calls.clone();
    let second = common::start_mock_rpc(move |_, _| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            RpcReply::Result(json!("sig"))
        }
    })
    .await;

    let ledger = RpcLedger::new(config(&url(first), vec![url(second)])).unwrap();
    let err = ledger
        .request_airdrop(&Identity::parse(KEY).unwrap(), 1_000_000_000)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Remote { code: 429, .. }));
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout() {
    let addr = common::start_mock_rpc(|_, _| async move { RpcReply::Hang }).await;

    let ledger = RpcLedger::new(config(&url(addr), vec![])).unwrap();
    let err = ledger
        .get_account_info(&Identity::parse(KEY).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Timeout(1)));
}

#[tokio::test]
async fn test_airdrop_confirmation() {
    let status_calls = Arc::new(AtomicU32::new(0));
    let counter = status_calls.clone();
    let addr = common::start_mock_rpc(move |method, _| {
        let counter = counter.clone();
        async move {
            match method.as_str() {
                "requestAirdrop" => RpcReply::Result(json!("airdropSig")),
                "getSignatureStatuses" => {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    let status = if n == 0 {
                        Value::Null
                    } else {
                        json!({ "slot": 42, "confirmations": null, "err": null, "confirmationStatus": "confirmed" })
                    };
                    RpcReply::Result(json!({ "context": { "slot": 42 }, "value": [status] }))
                }
                _ => RpcReply::Error(-32601, "Method not found".into()),
            }
        }
    })
    .await;

    let ledger = RpcLedger::new(config(&url(addr), vec![])).unwrap();
    let sig = ledger
        .request_airdrop(&Identity::parse(KEY).unwrap(), 1_000_000_000)
        .await
        .unwrap();
    assert_eq!(sig, "airdropSig");

    let slot = wait_for_confirmation(
        &ledger,
        &sig,
        Commitment::Confirmed,
        10,
        Duration::from_millis(50),
    )
    .await
    .unwrap();
    assert_eq!(slot, 42);
    assert_eq!(status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_no_airdrop_on_mainnet() {
    let mut cfg = config("http://127.0.0.1:1", vec![]);
    cfg.cluster = Cluster::MainnetBeta;
    let ledger = RpcLedger::new(cfg).unwrap();
    let err = ledger
        .request_airdrop(&Identity::parse(KEY).unwrap(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AirdropUnsupported(Cluster::MainnetBeta)));
}
