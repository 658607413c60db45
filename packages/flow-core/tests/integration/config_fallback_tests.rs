//! Configuration loading and default-fallback behavior.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use flow_core::config::CollectorConfig;
use flow_core::error::EngineError;
use flow_core::rule::RuleParseMode;
use flow_core::Engine;

#[test]
fn test_unreadable_config_falls_back_to_no_op_defaults() {
    // The caller's fallback path: file missing → defaults → engine refuses
    // to decode anything, but nothing is fatal.
    let result = CollectorConfig::from_file(Path::new("/no/such/config.json"));
    let config = result.unwrap_or_default();
    assert_eq!(config.listen_udp_port, 2055);

    let (engine, issues) = Engine::from_config(&config).unwrap();
    assert!(issues.is_empty());
    let err = engine.process_datagram(&[0u8; 128]).unwrap_err();
    assert!(matches!(err, EngineError::RulesNotConfigured));
}

#[test]
fn test_lenient_rule_issues_surface_at_engine_build() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "tableName": "netflow",
            "netFlowMap": {{
                "good": "0:4:IP:1",
                "bad": "zz:4:IP:1"
            }},
            "tableData": {{ "good": 5 }},
            "columnOrder": {{ "0": "good" }}
        }}"#
    )
    .unwrap();

    let config = CollectorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rule_parse_mode, RuleParseMode::Lenient);

    let (_, issues) = Engine::from_config(&config).unwrap();
    assert_eq!(issues.len(), 1);
}

#[test]
fn test_strict_mode_fails_engine_build_on_bad_rule() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "ruleParseMode": "strict",
            "netFlowMap": {{ "bad": "zz:4:IP:1" }}
        }}"#
    )
    .unwrap();

    let config = CollectorConfig::from_file(file.path()).unwrap();
    assert!(Engine::from_config(&config).is_err());
}
