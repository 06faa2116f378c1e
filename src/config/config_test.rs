use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_ballot_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("BALLOT__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = BallotSyncConfig::default();

    assert_eq!(config.ledger.account, "election-admin");
    assert_eq!(config.sync.max_advance_attempts, 2);
    assert_eq!(config.retry.vote.max_resubmissions, 1);
    assert_eq!(config.retry.vote.priority_bump_percent, 25);
    assert!(!config.storage.temporary);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_ballot_env_vars();
    with_vars(
        vec![
            ("BALLOT__LEDGER__ACCOUNT", Some("0xfeed")),
            ("BALLOT__RETRY__VOTE__PRIORITY_BUMP_PERCENT", Some("40")),
        ],
        || {
            let config = BallotSyncConfig::new().unwrap();

            assert_eq!(config.ledger.account, "0xfeed");
            assert_eq!(config.retry.vote.priority_bump_percent, 40);
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_ballot_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(
        &config_path,
        r#"
        [sync]
        max_advance_attempts = 1

        [storage]
        db_path = "/tmp/ballot/db"
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = BallotSyncConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .expect("override should apply");

        assert_eq!(config.sync.max_advance_attempts, 1);
        assert_eq!(config.storage.db_path.to_str(), Some("/tmp/ballot/db"));
        assert_eq!(config.ledger.account, "election-admin");
    });
}

#[test]
#[serial]
fn environment_variables_should_have_highest_priority() {
    cleanup_all_ballot_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("ballot.toml");
    std::fs::write(
        &config_path,
        r#"
        [ledger]
        account = "from-file"
        "#,
    )
    .unwrap();

    with_vars(
        vec![
            ("CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ("BALLOT__LEDGER__ACCOUNT", Some("from-env")),
        ],
        || {
            let config = BallotSyncConfig::new().unwrap();
            assert_eq!(config.ledger.account, "from-env");
        },
    );
}

#[test]
fn validation_should_reject_open_ended_resubmission() {
    let mut config = BallotSyncConfig::default();
    config.retry.vote.max_resubmissions = 3;

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_reject_resubmission_without_priority_bump() {
    let mut config = BallotSyncConfig::default();
    config.retry.vote.priority_bump_percent = 0;

    assert!(config.clone().validate().is_err());

    config.retry.vote.max_resubmissions = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn validation_should_bound_advance_attempts() {
    let mut config = BallotSyncConfig::default();
    config.sync.max_advance_attempts = 0;
    assert!(config.clone().validate().is_err());

    config.sync.max_advance_attempts = 5;
    assert!(config.validate().is_err());
}

#[test]
fn validation_should_reject_blank_account() {
    let mut config = BallotSyncConfig::default();
    config.ledger.account = "  ".into();

    assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
}

#[test]
fn escalated_priority_carries_configured_bump() {
    let policy = ResubmitPolicy {
        max_resubmissions: 1,
        priority_bump_percent: 30,
    };
    assert_eq!(policy.escalated_priority(), crate::TxPriority::Escalated { bump_percent: 30 });
}
