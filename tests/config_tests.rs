// tests/config_tests.rs

use std::collections::HashMap;

use community::config::Config;

fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn malformed_values_fall_back_and_are_reported() {
    let config = config_from(&[
        ("JWT_SECRET", "secret"),
        ("MAX_UPLOAD_BYTES", "abc"),
        ("JWT_EXPIRATION", "soon"),
        ("PUBLIC_BASE_URL", "not a url"),
    ]);

    assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    assert_eq!(config.jwt_expiration, 60 * 60 * 24);
    assert_eq!(config.public_base_url.as_str(), "http://localhost:8080/");

    assert_eq!(config.warnings.len(), 3);
    assert!(config.warnings.iter().any(|w| w.contains("MAX_UPLOAD_BYTES")));
    assert!(config.warnings.iter().any(|w| w.contains("JWT_EXPIRATION")));
    assert!(config.warnings.iter().any(|w| w.contains("PUBLIC_BASE_URL")));
}

#[test]
fn well_formed_values_produce_no_warnings() {
    let config = config_from(&[
        ("JWT_SECRET", "secret"),
        ("MAX_UPLOAD_BYTES", "1024"),
        ("BIND_ADDR", "127.0.0.1:9000"),
        ("PUBLIC_BASE_URL", "https://cdn.example.com/media"),
        ("CORS_ORIGINS", "http://a.test, http://b.test"),
    ]);

    assert!(config.warnings.is_empty());
    assert_eq!(config.max_upload_bytes, 1024);
    assert_eq!(config.bind_addr.port(), 9000);
    assert_eq!(config.public_base_url.as_str(), "https://cdn.example.com/media/");
    assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    assert!(config.database_url.is_none());
}
