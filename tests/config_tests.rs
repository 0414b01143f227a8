// Integration tests for loading the properties config from disk

use std::fs;
use std::path::PathBuf;

use suffixing::{ConfigError, Mode, SuffixConfig};
use tempfile::TempDir;

fn load(text: &str) -> Result<SuffixConfig, ConfigError> {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.properties");
    fs::write(&path, text).unwrap();
    SuffixConfig::load(&path)
}

#[test]
fn test_load_valid_config() {
    let config = load("mode = copy\nsuffix = -copy\nfiles = docs/a.txt:\\\n    docs/b\n").unwrap();
    assert_eq!(config.mode, Mode::Copy);
    assert_eq!(config.suffix, "-copy");
    assert_eq!(
        config.files,
        vec![PathBuf::from("docs/a.txt"), PathBuf::from("docs/b")]
    );
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    let err = SuffixConfig::load(temp.path().join("absent.properties")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(!err.is_warning());
}

#[test]
fn test_parse_error_carries_path() {
    let err = load("mode=copy\nsuffix=\\uZZZZ\n").unwrap_err();
    match err {
        ConfigError::Parse { path, .. } => assert!(path.ends_with("config.properties")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_mode_or_suffix_blocks_run() {
    assert!(matches!(
        load("suffix=_x\nfiles=a.txt\n").unwrap_err(),
        ConfigError::MissingMode
    ));
    assert!(matches!(
        load("mode=copy\nfiles=a.txt\n").unwrap_err(),
        ConfigError::MissingSuffix
    ));
}

#[test]
fn test_unknown_mode_is_loaded() {
    let config = load("mode=Rename\nsuffix=_x\nfiles=a.txt\n").unwrap();
    assert_eq!(config.mode, Mode::Unrecognized("Rename".to_string()));
}

#[test]
fn test_latin1_config_is_accepted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.properties");
    fs::write(&path, b"mode=copy\nsuffix=_x\nfiles=caf\xE9.txt\n").unwrap();

    let config = SuffixConfig::load(&path).unwrap();

    assert_eq!(config.files, vec![PathBuf::from("caf\u{e9}.txt")]);
}
