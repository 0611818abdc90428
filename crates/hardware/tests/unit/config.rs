//! Configuration Tests.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvrob_core::common::ConfigError;
use rvrob_core::config::{Config, RobConfig};

#[test]
fn test_empty_json_is_default() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
    assert!(config.validate().is_ok());
}

#[test]
fn test_round_trips_through_json() {
    let config: Config =
        serde_json::from_str(r#"{ "general": { "trace_cycles": true }, "rob": { "entries": 32, "writeback_ports": 6 } }"#)
            .unwrap();
    assert!(config.general.trace_cycles);
    assert_eq!(config.rob.entries, 32);
    assert_eq!(config.rob.writeback_ports, 6);

    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<Config>(&text).unwrap(), config);
}

#[rstest]
#[case(2, 1, None)]
#[case(64, 8, None)]
#[case(0, 4, Some(ConfigError::TooSmall(0)))]
#[case(1, 4, Some(ConfigError::TooSmall(1)))]
#[case(6, 4, Some(ConfigError::NotPowerOfTwo(6)))]
#[case(8, 0, Some(ConfigError::NoWritebackPorts))]
fn test_validation(
    #[case] entries: usize,
    #[case] writeback_ports: usize,
    #[case] expected: Option<ConfigError>,
) {
    let rob = RobConfig {
        entries,
        writeback_ports,
    };
    assert_eq!(rob.validate().err(), expected);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::NotPowerOfTwo(12).to_string(),
        "reorder buffer size 12 is not a power of two"
    );
    assert_eq!(
        ConfigError::TooSmall(1).to_string(),
        "reorder buffer size 1 is too small (minimum is 2)"
    );
    assert_eq!(
        ConfigError::NoWritebackPorts.to_string(),
        "reorder buffer needs at least one write-back port"
    );
}
