use super::*;

#[test]
fn wallet_rejection_is_recognised() {
    assert_eq!(
        classify_ledger_error("MetaMask Tx Signature: User denied transaction signature."),
        LedgerErrorKind::UserRejected
    );
    assert_eq!(
        classify_ledger_error("user rejected transaction (action=\"sendTransaction\", code=ACTION_REJECTED)"),
        LedgerErrorKind::UserRejected
    );
}

#[test]
fn congestion_signatures_are_recognised() {
    for raw in [
        "replacement transaction underpriced",
        "max fee per gas less than block base fee",
        "Transaction was not mined within 50 blocks",
    ] {
        assert_eq!(classify_ledger_error(raw), LedgerErrorKind::NetworkCongestion, "{raw}");
    }
}

#[test]
fn contract_conflicts_are_recognised() {
    assert_eq!(
        classify_ledger_error("execution reverted: Candidate already registered"),
        LedgerErrorKind::AlreadyRegistered
    );
    assert_eq!(
        classify_ledger_error("execution reverted: Election already exists"),
        LedgerErrorKind::ElectionExists
    );
    assert_eq!(
        classify_ledger_error("execution reverted: Candidate already added to election"),
        LedgerErrorKind::AlreadyAttached
    );
    assert_eq!(
        classify_ledger_error("execution reverted: You have already voted"),
        LedgerErrorKind::AlreadyVoted
    );
    assert_eq!(
        classify_ledger_error("execution reverted: Status unchanged"),
        LedgerErrorKind::StatusUnchanged
    );
}

#[test]
fn not_registered_is_not_mistaken_for_a_conflict() {
    let kind = classify_ledger_error("execution reverted: Candidate not registered");
    assert_eq!(kind, LedgerErrorKind::NotFound);
    assert!(!kind.is_conflict());
}

#[test]
fn funds_beat_congestion_when_both_appear() {
    assert_eq!(
        classify_ledger_error("insufficient funds for gas * price + value; fee too low"),
        LedgerErrorKind::InsufficientFunds
    );
}

#[test]
fn unknown_messages_are_unclassified() {
    assert_eq!(classify_ledger_error("execution reverted"), LedgerErrorKind::Unclassified);
    assert_eq!(classify_ledger_error(""), LedgerErrorKind::Unclassified);
}
