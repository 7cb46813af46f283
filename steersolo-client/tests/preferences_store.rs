// steersolo-client/tests/preferences_store.rs
// Preferences persisted to a redb file survive reopening

use steersolo_client::{ClientConfig, ClientError, open_preferences};
use tempfile::TempDir;

#[test]
fn test_preferences_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preferences.redb");

    {
        let prefs = open_preferences(&path).unwrap();
        prefs.dismiss_banner("subscription-reminder").unwrap();
        prefs.complete_tour("dashboard").unwrap();
    }

    let prefs = open_preferences(&path).unwrap();
    assert!(prefs.is_banner_dismissed("subscription-reminder").unwrap());
    assert!(prefs.has_completed_tour("dashboard").unwrap());
    assert!(!prefs.has_completed_tour("shop-setup").unwrap());

    assert!(prefs.restore_banner("subscription-reminder").unwrap());
    drop(prefs);

    let prefs = open_preferences(&path).unwrap();
    assert!(!prefs.is_banner_dismissed("subscription-reminder").unwrap());
}

#[test]
fn test_config_store_path_opens_preferences() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gate.redb");
    let config = ClientConfig::new("http://localhost:54321", "anon").with_store_path(&path);

    {
        let prefs = config.open_preferences().unwrap().unwrap();
        prefs.dismiss_banner("subscription-reminder").unwrap();
    }

    // Same file through the free function
    let prefs = open_preferences(&path).unwrap();
    assert!(prefs.is_banner_dismissed("subscription-reminder").unwrap());
}

#[test]
fn test_config_store_path_unusable_is_storage_error() {
    let temp_dir = TempDir::new().unwrap();
    // A directory is not a database file
    let config =
        ClientConfig::new("http://localhost:54321", "anon").with_store_path(temp_dir.path());

    let err = config.open_preferences().unwrap_err();
    assert!(matches!(err, ClientError::Storage(_)));
}
