use whisper_relay::infrastructure::observability::TracingConfig;
use whisper_relay::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_logging_settings_when_building_config_then_copies_level_and_format() {
    let logging = LoggingSettings {
        level: "warn".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::new(Environment::Prod, &logging);

    assert_eq!(config.environment, Environment::Prod);
    assert!(config.json_format);
    assert_eq!(
        config.default_directive(),
        "warn,whisper_relay=debug,tower_http=debug"
    );
}
