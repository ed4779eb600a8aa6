//! Map contexts backed by an on-disk data directory

mod common;

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use common::{MockFactory, SurveyLog};
use extinction::dataset::FetchError;
use extinction::{EvaluationMode, ExtinctionConfig, ExtinctionError, MapContext};

fn context_in(config: &ExtinctionConfig) -> (MapContext, Arc<SurveyLog>) {
    common::init_logging();
    let log = Arc::new(SurveyLog::default());
    let factory = MockFactory {
        log: Arc::clone(&log),
    };
    (MapContext::from_config(config, factory), log)
}

#[test]
fn test_installed_dataset_opens() {
    let temp = TempDir::new().unwrap();
    let config = ExtinctionConfig::with_data_dir(temp.path());
    fs::create_dir_all(temp.path().join("gaia_tge")).unwrap();
    fs::write(temp.path().join("gaia_tge").join("TGE.fits"), b"grid").unwrap();

    let (context, log) = context_in(&config);
    let map = context.open("gaia_tge").unwrap();
    assert_eq!(map.name(), "dustmaps.gaia_tge");
    assert_eq!(log.construction_count(), 1);
}

#[test]
fn test_missing_dataset_without_source() {
    let temp = TempDir::new().unwrap();
    let config = ExtinctionConfig::with_data_dir(temp.path());

    let (context, log) = context_in(&config);
    let err = context.open("pg2010").unwrap_err();
    assert!(matches!(
        err,
        ExtinctionError::DataUnavailable {
            source: FetchError::NoSource { .. },
            ..
        }
    ));

    let message = err.to_string();
    assert!(message.contains("pg2010"));
    assert!(message.contains(&temp.path().join("pg2010").display().to_string()));
    assert_eq!(log.construction_count(), 0);
}

#[test]
fn test_missing_dataset_with_fetch_disabled() {
    let temp = TempDir::new().unwrap();
    let mut config = ExtinctionConfig::with_data_dir(temp.path());
    config.auto_fetch = false;
    config
        .sources
        .insert("sfd".to_string(), "http://127.0.0.1:9/sfd.fits".to_string());

    let (context, _log) = context_in(&config);
    let err = context.open("sfd").unwrap_err();
    assert!(matches!(
        err,
        ExtinctionError::DataUnavailable {
            source: FetchError::Disabled,
            ..
        }
    ));
}

#[test]
fn test_failed_download_reports_unavailable() {
    let temp = TempDir::new().unwrap();
    let mut config = ExtinctionConfig::with_data_dir(temp.path());
    config.fetch_timeout_secs = 5;
    // Nothing listens on the discard port, so the connection is refused
    config
        .sources
        .insert("bh".to_string(), "http://127.0.0.1:9/bh.tar".to_string());

    let (context, log) = context_in(&config);
    let err = context.open("bh").unwrap_err();
    assert!(matches!(
        err,
        ExtinctionError::DataUnavailable {
            source: FetchError::Http(_),
            ..
        }
    ));
    assert!(!temp.path().join("bh").exists());
    assert_eq!(log.construction_count(), 0);
    assert!(context.cache().is_empty());
}

#[test]
fn test_config_round_trip_drives_context() {
    let temp = TempDir::new().unwrap();
    let mut config = ExtinctionConfig::with_data_dir(temp.path().join("maps"));
    config.evaluation_mode = EvaluationMode::Immediate;
    let path = temp.path().join("extinction.json");
    config.save_to_file(&path).unwrap();

    let loaded = ExtinctionConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    fs::create_dir_all(loaded.data_dir.join("marshall")).unwrap();
    fs::write(loaded.data_dir.join("marshall").join("table1.dat"), b"rows").unwrap();

    let (context, _log) = context_in(&loaded);
    assert_eq!(context.default_mode(), EvaluationMode::Immediate);
    let mut map = context.open("marshall").unwrap();
    map.update_line_of_sight(5.0, 0.5).unwrap();
    map.update(3.0).unwrap();
    assert!(map.state().is_resolved());
}
