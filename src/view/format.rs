//! Display formatting.

use crate::ledger::types::LAMPORTS_PER_SOL;

/// Placeholder shown until the first account fetch lands.
pub const LOADING: &str = "Loading..";

/// Lamports as a SOL amount with trailing zeros trimmed: `2.5`, `1`, `0.000000001`.
pub fn lamports_to_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let frac = lamports % LAMPORTS_PER_SOL;
    if frac == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:0>9}", frac);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

/// `"2.5 SOL"`.
pub fn format_sol(lamports: u64) -> String {
    format!("{} SOL", lamports_to_sol(lamports))
}

/// Balance line: formatted amount, or the loading placeholder.
pub fn format_balance(lamports: Option<u64>) -> String {
    match lamports {
        Some(l) => format_sol(l),
        None => LOADING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(2_500_000_000), "2.5 SOL");
        assert_eq!(format_sol(1_000_000_000), "1 SOL");
        assert_eq!(format_sol(0), "0 SOL");
        assert_eq!(format_sol(1), "0.000000001 SOL");
        assert_eq!(format_sol(12_340_000_000), "12.34 SOL");
    }

    #[test]
    fn test_balance_placeholder() {
        assert_eq!(format_balance(None), "Loading..");
        assert_eq!(format_balance(Some(2_500_000_000)), "2.5 SOL");
    }
}
