//! Shared utilities for integration tests.

use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// What the mock node answers for one call.
#[allow(dead_code)]
pub enum RpcReply {
    Result(Value),
    Error(i64, String),
    /// Plain HTTP error status, no JSON-RPC body.
    Status(u16),
    /// Never answer (forces a client timeout).
    Hang,
}

/// Start a programmable JSON-RPC node on an ephemeral port.
///
/// `f` receives the method name and params of each request.
#[allow(dead_code)]
pub async fn start_mock_rpc<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcReply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let f = f.clone();
            tokio::spawn(async move {
                let (read, mut write) = socket.into_split();
                let mut reader = BufReader::new(read);

                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                        return;
                    }
                    let line = line.trim_end();
                    if line.is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                }

                let mut body = vec![0u8; content_length];
                if reader.read_exact(&mut body).await.is_err() {
                    return;
                }
                let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                let id = request["id"].clone();
                let method = request["method"].as_str().unwrap_or_default().to_string();
                let params = request["params"].clone();

                let (status, payload) = match f(method, params).await {
                    RpcReply::Result(result) => (
                        "200 OK".to_string(),
                        json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string(),
                    ),
                    RpcReply::Error(code, message) => (
                        "200 OK".to_string(),
                        json!({
                            "jsonrpc": "2.0",
                            "id": id,
                            "error": { "code": code, "message": message }
                        })
                        .to_string(),
                    ),
                    RpcReply::Status(code) => (format!("{} Error", code), String::new()),
                    RpcReply::Hang => {
                        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                        return;
                    }
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    payload.len(),
                    payload
                );
                let _ = write.write_all(response.as_bytes()).await;
                let _ = write.shutdown().await;
            });
        }
    });

    addr
}

/// Account payload as `getAccountInfo` returns it.
#[allow(dead_code)]
pub fn account_value(lamports: u64) -> Value {
    json!({
        "context": { "slot": 1 },
        "value": {
            "lamports": lamports,
            "owner": "11111111111111111111111111111111",
            "executable": false,
            "rentEpoch": 18446744073709551615u64,
            "space": 0,
            "data": ["", "base64"]
        }
    })
}

/// `getSignaturesForAddress` payload for the given signatures, newest first.
#[allow(dead_code)]
pub fn signatures_value(signatures: &[&str]) -> Value {
    Value::Array(
        signatures
            .iter()
            .enumerate()
            .map(|(i, sig)| {
                json!({
                    "signature": sig,
                    "slot": 100 - i as u64,
                    "err": null,
                    "memo": null,
                    "blockTime": 1_700_000_000 - i as i64,
                    "confirmationStatus": "finalized"
                })
            })
            .collect(),
    )
}
