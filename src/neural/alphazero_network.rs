//! AlphaZero policy/value network
//!
//! Stem convolution, a tower of residual blocks, and two heads evaluated
//! independently on the tower output:
//!
//! ```text
//! input ─ conv3×3 ─ bn ─ relu ─ [block]×num_blocks ─┬─ policy head ─ (batch, action_size)
//!                                                  └─ value head  ─ (batch, 1)
//! ```

use tch::{nn, Tensor};

use crate::neural::network_config::NetworkConfig;
use crate::neural::policy_value_net::{FeatureTransform, Head, PolicyHead, ValueHead};
use crate::neural::res_net_block::ResidualBlock;

pub const TYPE_NAME: &str = "alphazero";

pub const POLICY_KEY: &str = "policy";
pub const VALUE_KEY: &str = "value";

/// Result of one forward pass
#[derive(Debug)]
pub struct NetworkOutput {
    /// Unnormalized logits, `(batch, action_size)`
    pub policy: Tensor,
    /// Position estimate, `(batch, 1)`
    pub value: Tensor,
}

impl NetworkOutput {
    /// Look an output up by its name (`"policy"` or `"value"`)
    pub fn get(&self, key: &str) -> Option<&Tensor> {
        match key {
            POLICY_KEY => Some(&self.policy),
            VALUE_KEY => Some(&self.value),
            _ => None,
        }
    }

    /// Softmax over the action dimension
    pub fn policy_probabilities(&self) -> Tensor {
        self.policy.softmax(-1, tch::Kind::Float)
    }
}

pub struct AlphaZeroNetwork {
    config: NetworkConfig,
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    residual_blocks: Vec<Box<dyn FeatureTransform>>,
    policy: Box<dyn Head>,
    value: Box<dyn Head>,
}

impl AlphaZeroNetwork {
    /// Build the standard network under `path`
    pub fn new(path: &nn::Path, config: NetworkConfig) -> Self {
        let channels = config.num_hidden_channels();
        let blocks_path = path / "residual_blocks";

        let residual_blocks = (0..config.num_blocks())
            .map(|idx| {
                Box::new(ResidualBlock::new(&(&blocks_path / idx), channels))
                    as Box<dyn FeatureTransform>
            })
            .collect();

        let policy = Box::new(PolicyHead::new(
            &(path / "policy"),
            channels,
            config.hidden_channel_height(),
            config.hidden_channel_width(),
            config.action_size(),
        ));
        let value = Box::new(ValueHead::new(
            &(path / "value"),
            channels,
            config.hidden_channel_height(),
            config.hidden_channel_width(),
        ));

        Self::with_components(path, config, residual_blocks, policy, value)
    }

    /// Build the stem under `path` and wire it to caller-supplied blocks and heads
    ///
    /// The blocks are applied in the order given. `config` is stored as
    /// metadata as-is, even if `residual_blocks.len()` disagrees with it.
    pub fn with_components(
        path: &nn::Path,
        config: NetworkConfig,
        residual_blocks: Vec<Box<dyn FeatureTransform>>,
        policy: Box<dyn Head>,
        value: Box<dyn Head>,
    ) -> Self {
        let conv = nn::conv2d(
            path / "conv",
            config.num_input_channels(),
            config.num_hidden_channels(),
            3,
            nn::ConvConfig {
                padding: 1,
                ..Default::default()
            },
        );
        let bn = nn::batch_norm2d(path / "bn", config.num_hidden_channels(), Default::default());

        log::debug!(
            "AlphaZeroNetwork built: {} ({} tower blocks)",
            config.to_config_string(),
            residual_blocks.len()
        );

        Self {
            config,
            conv,
            bn,
            residual_blocks,
            policy,
            value,
        }
    }

    pub fn forward_t(&self, state: &Tensor, train: bool) -> NetworkOutput {
        let mut x = state.apply(&self.conv).apply_t(&self.bn, train).relu();
        for block in &self.residual_blocks {
            x = block.forward_t(&x, train);
        }

        NetworkOutput {
            policy: self.policy.forward_t(&x, train),
            value: self.value.forward_t(&x, train),
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Number of transforms in the residual tower
    pub fn tower_len(&self) -> usize {
        self.residual_blocks.len()
    }

    pub fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    pub fn game_name(&self) -> &str {
        self.config.game_name()
    }

    pub fn num_input_channels(&self) -> i64 {
        self.config.num_input_channels()
    }

    pub fn input_channel_height(&self) -> i64 {
        self.config.input_channel_height()
    }

    pub fn input_channel_width(&self) -> i64 {
        self.config.input_channel_width()
    }

    pub fn num_hidden_channels(&self) -> i64 {
        self.config.num_hidden_channels()
    }

    pub fn hidden_channel_height(&self) -> i64 {
        self.config.hidden_channel_height()
    }

    pub fn hidden_channel_width(&self) -> i64 {
        self.config.hidden_channel_width()
    }

    pub fn num_blocks(&self) -> i64 {
        self.config.num_blocks()
    }

    pub fn num_action_channels(&self) -> i64 {
        self.config.num_action_channels()
    }

    pub fn action_size(&self) -> i64 {
        self.config.action_size()
    }
}

impl std::fmt::Debug for AlphaZeroNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaZeroNetwork")
            .field("config", &self.config)
            .field("tower_len", &self.residual_blocks.len())
            .finish()
    }
}
