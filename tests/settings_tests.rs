
use clipforge_backend::settings::AppEnvironment;
use test_utils::*;
use zeroize::Zeroizing;

#[test]
fn complete_config_validates() {
    assert!(test_config().validate().is_ok());
}

#[test]
fn validation_lists_every_missing_value() {
    let mut config = test_config();
    config.database_url = String::new();
    config.provider_api_secret = Zeroizing::new(String::new());
    config.max_upload_bytes = 0;

    let message = config.validate().unwrap_err().to_string();

    assert!(message.contains("DATABASE_URL"));
    assert!(message.contains("PROVIDER_API_SECRET"));
    assert!(message.contains("MAX_UPLOAD_BYTES"));
}

#[test]
fn delivery_base_must_be_a_url() {
    let mut config = test_config();
    config.delivery_base = "res.cloudinary.com".to_string();

    let message = config.validate().unwrap_err().to_string();

    assert!(message.contains("DELIVERY_BASE"));
}

#[test]
fn wildcard_cors_is_refused_in_production() {
    let mut config = test_config();
    config.env = AppEnvironment::Production;

    assert!(config.validate().is_err());

    config.cors_allowed_origins = vec!["https://clipforge.app, https://admin.clipforge.app".into()];
    assert!(config.validate().is_ok());
    assert_eq!(
        config.cors_origins(),
        vec!["https://clipforge.app".to_string(), "https://admin.clipforge.app".to_string()]
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let rendered = format!("{:?}", test_config());

    assert!(!rendered.contains("abcd"));
    assert!(!rendered.contains("clipforge:clipforge"));
    assert!(rendered.contains("[REDACTED]"));
}

#[test]
fn upload_limit_and_timeout_are_exposed_in_native_units() {
    let config = test_config();

    assert_eq!(config.max_upload_len(), TEST_MAX_UPLOAD as usize);
    assert_eq!(config.provider_timeout().as_secs(), 5);
}
