use super::*;

use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn missing_file() -> PathBuf {
    PathBuf::from("definitely/not/here/investimate.toml")
}

#[test]
fn defaults_point_at_local_service() {
    let settings =
        resolve_settings(&missing_file(), no_env, SettingsOverrides::default()).expect("settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.service_url, "http://localhost:5000");
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(
        &path,
        "service_url = \"https://sim.example.test/\"\nrequest_timeout_secs = 30\nexport_dir = \"out\"\n",
    )
    .expect("write settings");

    let settings = resolve_settings(&path, no_env, SettingsOverrides::default()).expect("settings");

    assert_eq!(settings.service_url, "https://sim.example.test");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(settings.export_dir, PathBuf::from("out"));
}

#[test]
fn environment_overrides_file_and_cli_overrides_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "service_url = \"http://file.test\"\n").expect("write settings");

    let env: HashMap<&str, &str> = [
        ("INVESTIMATE_SERVICE_URL", "http://legacy.test"),
        ("APP__SERVICE_URL", "http://env.test"),
        ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ("APP__EXPORT_DIR", "/tmp/exports"),
    ]
    .into_iter()
    .collect();
    let lookup = |key: &str| env.get(key).map(|v| v.to_string());

    let from_env = resolve_settings(&path, lookup, SettingsOverrides::default()).expect("settings");
    assert_eq!(from_env.service_url, "http://env.test");
    assert_eq!(from_env.request_timeout_secs, Some(12));
    assert_eq!(from_env.export_dir, PathBuf::from("/tmp/exports"));

    let from_cli = resolve_settings(
        &path,
        lookup,
        SettingsOverrides {
            service_url: Some("http://cli.test:8080".to_string()),
            request_timeout_secs: Some(3),
            export_dir: None,
        },
    )
    .expect("settings");
    assert_eq!(from_cli.service_url, "http://cli.test:8080");
    assert_eq!(from_cli.request_timeout_secs, Some(3));
    assert_eq!(from_cli.export_dir, PathBuf::from("/tmp/exports"));
}

#[test]
fn non_numeric_timeout_in_environment_is_ignored() {
    let lookup = |key: &str| (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string());

    let settings =
        resolve_settings(&missing_file(), lookup, SettingsOverrides::default()).expect("settings");

    assert_eq!(settings.request_timeout_secs, None);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let settings = Settings {
        request_timeout_secs: Some(0),
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn rejects_unusable_service_urls() {
    assert!(normalize_service_url("localhost:5000/").is_err());
    assert!(normalize_service_url("ftp://files.test").is_err());
    assert!(normalize_service_url("not a url").is_err());
    assert_eq!(
        normalize_service_url(" http://127.0.0.1:5000/ ").expect("valid"),
        "http://127.0.0.1:5000"
    );
}

#[test]
fn malformed_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "service_url = 5\n").expect("write settings");

    let err = resolve_settings(&path, no_env, SettingsOverrides::default())
        .expect_err("wrong type");
    assert!(err.to_string().contains("invalid settings file"));
}
