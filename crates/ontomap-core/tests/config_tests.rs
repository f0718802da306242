use std::fs;

use ontomap_core::config::{ConfigError, DEFAULT_KEYWORD_RULES, DEFAULT_MAX_UPLOAD_SIZE};
use ontomap_core::mapping::RuleMatcher;
use ontomap_core::Config;
use tempfile::TempDir;

#[test]
fn test_default_config_roundtrips_through_toml() {
    let text = Config::default_config_string();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.mapping.rules.len(), DEFAULT_KEYWORD_RULES.len());
    assert_eq!(parsed.server.max_upload_size, DEFAULT_MAX_UPLOAD_SIZE);
    assert_eq!(parsed.graph, Config::default().graph);
}

#[test]
fn test_from_file_rejects_invalid_thresholds() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ontomap.toml");
    fs::write(&path, "[mapping]\nhigh_confidence = 0.3\nmedium_confidence = 0.5\n").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_from_file_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ontomap.toml");
    fs::write(&path, "[mapping\n").unwrap();

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_configured_rules_drive_matcher() {
    let config: Config = toml::from_str(
        r#"
[[mapping.rules]]
class = "Hydraulic_Press"
keywords = ["PRESS", "hydraulic"]
"#,
    )
    .unwrap();

    let matcher = RuleMatcher::new(config.mapping.rules);
    let (class, score) = matcher.match_text("hydraulic_press_7.csv").unwrap();
    assert_eq!(class, "Hydraulic_Press");
    assert_eq!(score, 0.9);
    assert!(matcher.match_text("pump_01.csv").is_none());
}
