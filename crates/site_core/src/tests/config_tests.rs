use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn temp_settings_file(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("site_core_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_point_at_local_services() {
    let settings = load_settings_with(Path::new("does/not/exist.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.content_base_url, "http://localhost:1337");
    assert_eq!(settings.content_api_token, None);
}

#[test]
fn file_values_are_overridden_by_env_and_app_prefix_wins() {
    let path = temp_settings_file(
        r#"
content_base_url = "http://file-cms:1337"
content_api_token = "file-token"
site_url = "http://file-site"
"#,
    );

    let from_file = load_settings_with(&path, no_env);
    assert_eq!(from_file.content_base_url, "http://file-cms:1337");
    assert_eq!(from_file.content_api_token.as_deref(), Some("file-token"));
    assert_eq!(from_file.site_url, "http://file-site");

    let layered = load_settings_with(
        &path,
        env_from(&[
            ("CONTENT_SERVICE_URL", "http://env-cms"),
            ("APP__CONTENT_SERVICE_URL", "http://app-cms"),
            ("CONTENT_SERVICE_TOKEN", "  "),
        ]),
    );
    assert_eq!(layered.content_base_url, "http://app-cms");
    assert_eq!(layered.content_api_token, None);
    assert_eq!(layered.site_url, "http://file-site");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn unparsable_file_is_ignored() {
    let path = temp_settings_file("content_base_url = [1, 2]");
    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings, Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn content_service_config_trims_and_keeps_token() {
    let settings = Settings {
        content_base_url: "https://cms.example.com/".into(),
        content_api_token: Some("abc".into()),
        ..Settings::default()
    };
    let config = settings.content_service_config().expect("valid");
    assert_eq!(config.base_url(), "https://cms.example.com");
    assert_eq!(config.api_token(), Some("abc"));
}

#[test]
fn rejects_invalid_or_non_http_base_urls() {
    let invalid = Settings {
        content_base_url: "not a url".into(),
        ..Settings::default()
    };
    assert!(matches!(
        invalid.content_service_config(),
        Err(ConfigError::InvalidUrl { .. })
    ));

    let ftp = Settings {
        site_url: "ftp://files.example.com".into(),
        ..Settings::default()
    };
    assert!(matches!(
        ftp.validated_site_url(),
        Err(ConfigError::UnsupportedScheme { .. })
    ));
}
