//! The view model: everything the page shows, derived from current state.
//!
//! Building it involves no I/O. Account data is only carried over when it
//! belongs to the connected identity.

use serde::Serialize;

use crate::airdrop::notify::Notification;
use crate::ledger::types::TransactionRecord;
use crate::poller::store::{AccountView, PollStatus};
use crate::view::format::{format_balance, format_sol};
use crate::wallet::adapter::AdapterKind;
use crate::wallet::session::SessionState;

#[derive(Debug, Clone, Serialize)]
pub struct AdapterOption {
    pub kind: AdapterKind,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub ordinal: usize,
    pub signature: String,
    pub slot: u64,
    pub failed: bool,
}

impl From<&TransactionRecord> for TransactionRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            ordinal: record.ordinal,
            signature: record.signature.clone(),
            slot: record.slot,
            failed: record.failed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AirdropControl {
    pub label: String,
    /// Control is disabled while true.
    pub busy: bool,
}

/// Shown only while an identity is present.
#[derive(Debug, Clone, Serialize)]
pub struct WalletPanel {
    pub identity: String,
    pub adapter: AdapterKind,
    pub can_sign: bool,
    pub balance: String,
    pub lamports: Option<u64>,
    /// `None` until the first signature fetch; renders nothing.
    pub transactions: Option<Vec<TransactionRow>>,
    /// `None` when airdrops are unavailable on this cluster.
    pub airdrop: Option<AirdropControl>,
    pub poll_status: PollStatus,
}

/// Airdrop facts the view needs.
#[derive(Debug, Clone, Copy)]
pub struct AirdropFacts {
    pub enabled: bool,
    pub busy: bool,
    pub lamports: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub cluster: String,
    pub connecting: bool,
    pub adapters: Vec<AdapterOption>,
    pub wallet: Option<WalletPanel>,
    pub notifications: Vec<Notification>,
}

impl ViewModel {
    pub fn build(
        cluster: &str,
        session: &SessionState,
        adapters: &[AdapterKind],
        selected: Option<AdapterKind>,
        account: Option<&AccountView>,
        airdrop: AirdropFacts,
        notifications: Vec<Notification>,
    ) -> Self {
        let adapters = adapters
            .iter()
            .map(|&kind| AdapterOption {
                kind,
                label: kind.label(),
                selected: selected == Some(kind),
            })
            .collect();

        let wallet = match session {
            SessionState::Connected(conn) => {
                let account = account.filter(|view| view.identity == conn.identity);
                // A never-funded account has no balance to show yet.
                let lamports = account
                    .and_then(|v| v.snapshot.as_ref())
                    .filter(|s| s.exists)
                    .map(|s| s.lamports);
                Some(WalletPanel {
                    identity: conn.identity.to_string(),
                    adapter: conn.adapter,
                    can_sign: conn.can_sign(),
                    balance: format_balance(lamports),
                    lamports,
                    transactions: account
                        .and_then(|v| v.transactions.as_ref())
                        .map(|records| records.iter().map(TransactionRow::from).collect()),
                    airdrop: airdrop.enabled.then(|| AirdropControl {
                        label: format!("Get Airdrop of {}", format_sol(airdrop.lamports)),
                        busy: airdrop.busy,
                    }),
                    poll_status: account.map(|v| v.status.clone()).unwrap_or_default(),
                })
            }
            _ => None,
        };

        Self {
            cluster: cluster.to_string(),
            connecting: session.is_connecting(),
            adapters,
            wallet,
            notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{AccountSnapshot, Identity};
    use crate::wallet::adapter::WalletConnection;

    const FACTS: AirdropFacts = AirdropFacts {
        enabled: true,
        busy: false,
        lamports: 1_000_000_000,
    };

    fn connected(identity: &Identity) -> SessionState {
        SessionState::Connected(WalletConnection {
            adapter: AdapterKind::Solflare,
            identity: identity.clone(),
            signer: None,
        })
    }

    fn record(ordinal: usize, signature: &str) -> TransactionRecord {
        TransactionRecord {
            signature: signature.into(),
            ordinal,
            slot: 100 - ordinal as u64,
            block_time: None,
            failed: false,
            confirmation_status: None,
        }
    }

    fn view(identity: &Identity, lamports: Option<u64>, txs: Option<Vec<TransactionRecord>>) -> AccountView {
        AccountView {
            identity: identity.clone(),
            generation: 1,
            snapshot: lamports.map(AccountSnapshot::with_lamports),
            transactions: txs,
            status: PollStatus::Healthy,
            updated_at: None,
        }
    }

    #[test]
    fn test_no_identity_hides_wallet_panel() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let account = view(&identity, Some(5), Some(vec![record(0, "a")]));
        let model = ViewModel::build(
            "devnet",
            &SessionState::Disconnected,
            &AdapterKind::ALL,
            None,
            Some(&account),
            FACTS,
            Vec::new(),
        );
        assert!(model.wallet.is_none());
        assert_eq!(model.adapters.len(), 4);
    }

    #[test]
    fn test_balance_and_rows() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let account = view(
            &identity,
            Some(2_500_000_000),
            Some(vec![record(0, "sig1"), record(1, "sig2"), record(2, "sig3")]),
        );
        let model = ViewModel::build(
            "devnet",
            &connected(&identity),
            &AdapterKind::ALL,
            Some(AdapterKind::Solflare),
            Some(&account),
            FACTS,
            Vec::new(),
        );

        let panel = model.wallet.unwrap();
        assert_eq!(panel.balance, "2.5 SOL");
        let sigs: Vec<_> = panel
            .transactions
            .unwrap()
            .into_iter()
            .map(|r| r.signature)
            .collect();
        assert_eq!(sigs, vec!["sig1", "sig2", "sig3"]);
        assert_eq!(panel.airdrop.unwrap().label, "Get Airdrop of 1 SOL");
    }

    #[test]
    fn test_loading_before_first_fetch() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let account = view(&identity, None, None);
        let model = ViewModel::build(
            "devnet",
            &connected(&identity),
            &AdapterKind::ALL,
            None,
            Some(&account),
            FACTS,
            Vec::new(),
        );
        let panel = model.wallet.unwrap();
        assert_eq!(panel.balance, "Loading..");
        assert!(panel.transactions.is_none());
    }

    #[test]
    fn test_missing_account_stays_loading() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let mut account = view(&identity, None, Some(Vec::new()));
        account.snapshot = Some(AccountSnapshot::missing());
        let model = ViewModel::build(
            "devnet",
            &connected(&identity),
            &AdapterKind::ALL,
            None,
            Some(&account),
            FACTS,
            Vec::new(),
        );
        let panel = model.wallet.unwrap();
        assert_eq!(panel.balance, "Loading..");
        assert!(panel.lamports.is_none());
        assert_eq!(panel.transactions.unwrap().len(), 0);
    }

    #[test]
    fn test_other_identity_data_ignored() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let stale = view(&Identity::from_bytes(&[2u8; 32]), Some(9), None);
        let model = ViewModel::build(
            "devnet",
            &connected(&identity),
            &AdapterKind::ALL,
            None,
            Some(&stale),
            AirdropFacts { busy: true, ..FACTS },
            Vec::new(),
        );
        let panel = model.wallet.unwrap();
        assert_eq!(panel.balance, "Loading..");
        assert!(panel.airdrop.unwrap().busy);
    }

    #[test]
    fn test_airdrop_control_absent_when_disabled() {
        let identity = Identity::from_bytes(&[1u8; 32]);
        let model = ViewModel::build(
            "mainnet-beta",
            &connected(&identity),
            &AdapterKind::ALL,
            None,
            None,
            AirdropFacts { enabled: false, ..FACTS },
            Vec::new(),
        );
        assert!(model.wallet.unwrap().airdrop.is_none());
    }
}
