//! Integration tests for the AlphaZero network library public API

use alphazero_net::{
    AlphaZeroNetError, HavannahConfig, HavannahEnv, NetworkConfig, Result, DESCRIPTION, NAME,
    VERSION,
};
use assert_matches::assert_matches;

#[test]
fn test_library_metadata() {
    assert!(!VERSION.is_empty());
    assert_eq!(NAME, "alphazero_net");
    assert!(!DESCRIPTION.is_empty());
}

#[test]
fn test_error_types() {
    let config_error = AlphaZeroNetError::Config("test config error".to_string());
    assert_matches!(config_error, AlphaZeroNetError::Config(_));

    let game_error = AlphaZeroNetError::Game("test game error".to_string());
    assert_eq!(game_error.to_string(), "Game error: test game error");
}

#[test]
fn test_io_error_from_missing_config_file() {
    let result = NetworkConfig::from_json_file("/nonexistent/network.json");
    assert_matches!(result, Err(AlphaZeroNetError::Io(_)));
}

#[test]
fn test_json_error_from_malformed_config() {
    let result = NetworkConfig::from_json_str("{ not json");
    assert_matches!(result, Err(AlphaZeroNetError::Json(_)));
}

#[test]
fn test_game_error_from_bad_board_size() {
    let result = HavannahEnv::new(HavannahConfig {
        board_size: 8,
        use_swap_rule: false,
    });
    assert_matches!(result, Err(AlphaZeroNetError::Game(_)));
}

#[test]
fn test_result_type_alias() {
    let success: Result<i32> = Ok(42);
    assert!(success.is_ok());

    let failure: Result<i32> = Err(AlphaZeroNetError::Game("test".to_string()));
    assert!(failure.is_err());
}

#[test]
fn test_havannah_config_default() {
    let config = HavannahConfig::default();
    assert_eq!(config.board_size, 9);
    assert!(config.use_swap_rule);
}
