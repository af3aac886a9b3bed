use proptest::prelude::*;

use chainscribe_types::{AccountCredential, DropAmount, LedgerRange, TxHandle};

proptest! {
    /// Alphanumeric, non-empty address/secret pairs always validate.
    #[test]
    fn alphanumeric_credentials_valid(
        address in "[a-zA-Z0-9]{1,40}",
        secret in "[a-zA-Z0-9]{1,40}",
    ) {
        let acc = AccountCredential::new(address, secret);
        prop_assert!(acc.is_valid());
    }

    /// A credential containing any non-alphanumeric character never validates.
    #[test]
    fn tainted_address_invalid(
        prefix in "[a-zA-Z0-9]{0,10}",
        taint in "[^a-zA-Z0-9]",
        suffix in "[a-zA-Z0-9]{0,10}",
    ) {
        let acc = AccountCredential::new(format!("{prefix}{taint}{suffix}"), "SEC1");
        prop_assert!(!acc.is_valid());
    }

    /// Debug output never leaks the secret.
    #[test]
    fn debug_never_leaks_secret(secret in "[a-zA-Z0-9]{8,40}") {
        let acc = AccountCredential::new("SRC1", secret.clone());
        let rendered = format!("{acc:?}");
        prop_assert!(!rendered.contains(&secret));
    }

    /// checked_add agrees with u128 checked arithmetic.
    #[test]
    fn drop_amount_checked_add(a in 0u128..u128::MAX, b in 0u128..u128::MAX) {
        let sum = DropAmount::new(a).checked_add(DropAmount::new(b));
        prop_assert_eq!(sum.map(|s| s.raw()), a.checked_add(b));
    }

    /// checked_sub agrees with u128 checked arithmetic.
    #[test]
    fn drop_amount_checked_sub(a in 0u128..u128::MAX, b in 0u128..u128::MAX) {
        let diff = DropAmount::new(a).checked_sub(DropAmount::new(b));
        prop_assert_eq!(diff.map(|d| d.raw()), a.checked_sub(b));
    }

    /// Scaling by a factor >= 1 never shrinks an amount.
    #[test]
    fn scaling_up_never_shrinks(raw in 0u128..1_000_000_000, factor in 1.0f64..1000.0) {
        let amount = DropAmount::new(raw);
        prop_assert!(amount.scaled_by(factor) >= amount);
    }

    /// LedgerRange::contains matches the inclusive definition.
    #[test]
    fn range_contains_inclusive(min in 0u32..1_000_000, len in 0u32..1_000_000, v in 0u32..3_000_000) {
        let range = LedgerRange::new(min, min + len);
        prop_assert_eq!(range.contains(v), v >= min && v <= min + len);
    }

    /// TxHandle is a faithful wrapper around its string.
    #[test]
    fn handle_roundtrip(raw in "[A-F0-9]{64}") {
        let handle = TxHandle::new(raw.clone());
        prop_assert_eq!(handle.as_str(), raw.as_str());
        prop_assert_eq!(handle.to_string(), raw);
    }
}
