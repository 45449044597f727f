use std::sync::Mutex;

use tempfile::NamedTempFile;

use framegrab::GrabberConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "FRAMEGRAB_CONFIG",
        "FRAMEGRAB_FILE",
        "FRAMEGRAB_WIDTH",
        "FRAMEGRAB_HEIGHT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "file": "clip.avi",
        "w": 800,
        "h": 600
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("FRAMEGRAB_CONFIG", file.path());
    std::env::set_var("FRAMEGRAB_WIDTH", "320");

    let cfg = GrabberConfig::load().expect("load config");
    assert_eq!(cfg.file.as_deref(), Some("clip.avi"));
    assert_eq!(cfg.width, Some(320));
    assert_eq!(cfg.height, Some(600));

    clear_env();
}

#[test]
fn defaults_to_camera_when_nothing_is_set() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = GrabberConfig::load().expect("load config");
    assert_eq!(cfg, GrabberConfig::default());
    assert!(cfg.file.is_none());
}

#[test]
fn rejects_malformed_dimension_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("FRAMEGRAB_HEIGHT", "tall");
    assert!(GrabberConfig::load().is_err());

    clear_env();
}

#[test]
fn rejects_invalid_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, b"not json").expect("write config");
    std::env::set_var("FRAMEGRAB_CONFIG", file.path());

    assert!(GrabberConfig::load().is_err());

    clear_env();
}
