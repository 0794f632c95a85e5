//! Solana JSON-RPC wire shapes.
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! node's response is ignored by serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::types::{AccountSnapshot, Commitment, ConfirmationStatus, TransactionRecord};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `{ context, value }` wrapper used by most account methods.
#[derive(Debug, Deserialize)]
pub struct WithContext<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAccount {
    pub lamports: u64,
    pub owner: String,
    #[serde(default)]
    pub executable: bool,
    // rentEpoch is u64::MAX for rent-exempt accounts, which overflows f64 in
    // some node versions; accept anything and keep it when it fits.
    #[serde(default)]
    pub rent_epoch: Option<Value>,
    #[serde(default)]
    pub space: Option<u64>,
}

impl From<Option<UiAccount>> for AccountSnapshot {
    fn from(account: Option<UiAccount>) -> Self {
        match account {
            None => AccountSnapshot::missing(),
            Some(acc) => AccountSnapshot {
                lamports: acc.lamports,
                owner: Some(acc.owner),
                executable: acc.executable,
                rent_epoch: acc.rent_epoch.as_ref().and_then(Value::as_u64),
                space: acc.space,
                exists: true,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

/// Convert the node's list into ordered records, keeping the node's order.
pub fn into_records(infos: Vec<SignatureInfo>) -> Vec<TransactionRecord> {
    infos
        .into_iter()
        .enumerate()
        .map(|(ordinal, info)| TransactionRecord {
            signature: info.signature,
            ordinal,
            slot: info.slot,
            block_time: info.block_time,
            failed: info.err.map(|e| !e.is_null()).unwrap_or(false),
            confirmation_status: info.confirmation_status,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

/// Interpret one `getSignatureStatuses` entry against the required commitment.
pub fn interpret_status(status: Option<SignatureStatus>, required: Commitment) -> ConfirmationStatus {
    let Some(status) = status else {
        return ConfirmationStatus::Pending;
    };

    if let Some(err) = status.err.filter(|e| !e.is_null()) {
        return ConfirmationStatus::Failed(err.to_string());
    }

    // Older nodes omit confirmationStatus; such entries are at least processed.
    let reached = status.confirmation_status.unwrap_or(Commitment::Processed);
    if reached >= required {
        ConfirmationStatus::Confirmed { slot: status.slot }
    } else {
        ConfirmationStatus::Confirming { reached, required }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_info_null_is_missing() {
        let resp: RpcResponse<WithContext<Option<UiAccount>>> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "context": { "slot": 10 }, "value": null }
        }))
        .unwrap();
        let snapshot = AccountSnapshot::from(resp.result.unwrap().value);
        assert!(!snapshot.exists);
        assert_eq!(snapshot.lamports, 0);
    }

    #[test]
    fn test_account_info_with_max_rent_epoch() {
        let resp: RpcResponse<WithContext<Option<UiAccount>>> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "context": { "slot": 10 },
                "value": {
                    "lamports": 2_500_000_000u64,
                    "owner": "11111111111111111111111111111111",
                    "executable": false,
                    "rentEpoch": 18446744073709551615u64,
                    "space": 0,
                    "data": ["", "base64"]
                }
            }
        }))
        .unwrap();
        let snapshot = AccountSnapshot::from(resp.result.unwrap().value);
        assert!(snapshot.exists);
        assert_eq!(snapshot.lamports, 2_500_000_000);
        assert_eq!(snapshot.rent_epoch, Some(u64::MAX));
    }

    #[test]
    fn test_records_keep_order_and_flag_errors() {
        let infos: Vec<SignatureInfo> = serde_json::from_value(json!([
            { "signature": "sigA", "slot": 30, "err": null, "blockTime": 1700000000, "confirmationStatus": "finalized" },
            { "signature": "sigB", "slot": 20, "err": { "InstructionError": [0, "Custom"] } },
            { "signature": "sigC", "slot": 10 }
        ]))
        .unwrap();
        let records = into_records(infos);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].signature, "sigA");
        assert_eq!(records[2].ordinal, 2);
        assert!(!records[0].failed);
        assert!(records[1].failed);
        assert_eq!(records[0].confirmation_status, Some(Commitment::Finalized));
    }

    #[test]
    fn test_interpret_status() {
        assert_eq!(interpret_status(None, Commitment::Confirmed), ConfirmationStatus::Pending);

        let processed: SignatureStatus = serde_json::from_value(json!({
            "slot": 5, "confirmations": 0, "err": null, "confirmationStatus": "processed"
        }))
        .unwrap();
        assert!(matches!(
            interpret_status(Some(processed), Commitment::Confirmed),
            ConfirmationStatus::Confirming { .. }
        ));

        let finalized: SignatureStatus = serde_json::from_value(json!({
            "slot": 7, "confirmations": null, "err": null, "confirmationStatus": "finalized"
        }))
        .unwrap();
        assert_eq!(
            interpret_status(Some(finalized), Commitment::Confirmed),
            ConfirmationStatus::Confirmed { slot: 7 }
        );

        let failed: SignatureStatus = serde_json::from_value(json!({
            "slot": 9, "err": { "InstructionError": [0, "Custom"] }, "confirmationStatus": "confirmed"
        }))
        .unwrap();
        assert!(matches!(
            interpret_status(Some(failed), Commitment::Confirmed),
            ConfirmationStatus::Failed(_)
        ));
    }
}
