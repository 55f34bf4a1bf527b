use tch::{nn, Tensor};

use crate::neural::policy_value_net::FeatureTransform;

/// Residual block: two 3×3 convolutions with batch norm and an identity skip
///
/// Channel count and spatial size are preserved, so blocks can be chained
/// freely inside the tower.
#[derive(Debug)]
pub struct ResidualBlock {
    pub(crate) conv1: nn::Conv2D,
    pub(crate) bn1: nn::BatchNorm,
    pub(crate) conv2: nn::Conv2D,
    pub(crate) bn2: nn::BatchNorm,
}

impl ResidualBlock {
    pub fn new(path: &nn::Path, num_channels: i64) -> Self {
        let conv_cfg = nn::ConvConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = nn::conv2d(path / "conv1", num_channels, num_channels, 3, conv_cfg);
        let bn1 = nn::batch_norm2d(path / "bn1", num_channels, Default::default());
        let conv2 = nn::conv2d(path / "conv2", num_channels, num_channels, 3, conv_cfg);
        let bn2 = nn::batch_norm2d(path / "bn2", num_channels, Default::default());

        Self {
            conv1,
            bn1,
            conv2,
            bn2,
        }
    }

    /// Number of trainable scalars one block registers for `num_channels`
    ///
    /// Two 3×3 convolutions with bias plus two affine batch norms.
    pub fn parameter_count(num_channels: i64) -> i64 {
        let conv = 9 * num_channels * num_channels + num_channels;
        let bn = 2 * num_channels;
        2 * (conv + bn)
    }
}

impl FeatureTransform for ResidualBlock {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let out = xs
            .apply(&self.conv1)
            .apply_t(&self.bn1, train)
            .relu()
            .apply(&self.conv2)
            .apply_t(&self.bn2, train);

        (out + xs).relu()
    }
}
