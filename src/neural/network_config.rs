//! Network shape configuration
//!
//! Every dimension the AlphaZero network needs is fixed here once, at
//! construction, and read back through accessors afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Immutable architecture metadata for [`AlphaZeroNetwork`](super::alphazero_network::AlphaZeroNetwork)
///
/// Values are stored verbatim. Nothing is checked here: a configuration with
/// a zero or inconsistent dimension is accepted and fails later inside the
/// tensor operations that consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    game_name: String,

    // ========== Input planes ==========
    num_input_channels: i64,
    input_channel_height: i64,
    input_channel_width: i64,

    // ========== Residual tower ==========
    num_hidden_channels: i64,
    hidden_channel_height: i64,
    hidden_channel_width: i64,
    num_blocks: i64,

    // ========== Action space ==========
    num_action_channels: i64,
    action_size: i64,
}

impl NetworkConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        game_name: impl Into<String>,
        num_input_channels: i64,
        input_channel_height: i64,
        input_channel_width: i64,
        num_hidden_channels: i64,
        hidden_channel_height: i64,
        hidden_channel_width: i64,
        num_blocks: i64,
        num_action_channels: i64,
        action_size: i64,
    ) -> Self {
        Self {
            game_name: game_name.into(),
            num_input_channels,
            input_channel_height,
            input_channel_width,
            num_hidden_channels,
            hidden_channel_height,
            hidden_channel_width,
            num_blocks,
            num_action_channels,
            action_size,
        }
    }

    /// Parse a configuration from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading network config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn num_input_channels(&self) -> i64 {
        self.num_input_channels
    }

    pub fn input_channel_height(&self) -> i64 {
        self.input_channel_height
    }

    pub fn input_channel_width(&self) -> i64 {
        self.input_channel_width
    }

    pub fn num_hidden_channels(&self) -> i64 {
        self.num_hidden_channels
    }

    pub fn hidden_channel_height(&self) -> i64 {
        self.hidden_channel_height
    }

    pub fn hidden_channel_width(&self) -> i64 {
        self.hidden_channel_width
    }

    pub fn num_blocks(&self) -> i64 {
        self.num_blocks
    }

    pub fn num_action_channels(&self) -> i64 {
        self.num_action_channels
    }

    pub fn action_size(&self) -> i64 {
        self.action_size
    }

    /// Expected input shape for a batch of `batch` positions
    pub fn input_shape(&self, batch: i64) -> [i64; 4] {
        [
            batch,
            self.num_input_channels,
            self.input_channel_height,
            self.input_channel_width,
        ]
    }

    /// Create a configuration string for logging
    pub fn to_config_string(&self) -> String {
        format!(
            "{}_in[{}x{}x{}]_hidden[{}x{}x{}]_blocks[{}]_action[{}/{}]",
            self.game_name,
            self.num_input_channels,
            self.input_channel_height,
            self.input_channel_width,
            self.num_hidden_channels,
            self.hidden_channel_height,
            self.hidden_channel_width,
            self.num_blocks,
            self.num_action_channels,
            self.action_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_config() -> NetworkConfig {
        NetworkConfig::new("go", 18, 19, 19, 128, 19, 19, 5, 2, 362)
    }

    #[test]
    fn test_accessors_return_constructor_values() {
        let config = go_config();
        assert_eq!(config.game_name(), "go");
        assert_eq!(config.num_input_channels(), 18);
        assert_eq!(config.input_channel_height(), 19);
        assert_eq!(config.input_channel_width(), 19);
        assert_eq!(config.num_hidden_channels(), 128);
        assert_eq!(config.hidden_channel_height(), 19);
        assert_eq!(config.hidden_channel_width(), 19);
        assert_eq!(config.num_blocks(), 5);
        assert_eq!(config.num_action_channels(), 2);
        assert_eq!(config.action_size(), 362);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = go_config();
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"game_name\": \"go\""));
        assert_eq!(NetworkConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = NetworkConfig::from_json_str(r#"{"game_name": "go"}"#);
        assert!(matches!(result, Err(crate::AlphaZeroNetError::Json(_))));
    }

    #[test]
    fn test_zero_dimensions_are_accepted() {
        let config = NetworkConfig::new("", 0, 0, 0, 0, 0, 0, 0, 0, 0);
        assert_eq!(config.num_blocks(), 0);
        assert_eq!(config.input_shape(3), [3, 0, 0, 0]);
    }

    #[test]
    fn test_config_string() {
        let s = go_config().to_config_string();
        assert_eq!(s, "go_in[18x19x19]_hidden[128x19x19]_blocks[5]_action[2/362]");
    }
}
