use tch::{nn, Tensor};

/// A unit of the residual tower: feature map in, feature map out
///
/// Implemented by [`ResidualBlock`](crate::neural::res_net_block::ResidualBlock);
/// alternative blocks (or mocks in tests) can be plugged into the network
/// through [`AlphaZeroNetwork::with_components`](crate::neural::alphazero_network::AlphaZeroNetwork::with_components).
///
/// Note: Not Sync due to PyTorch's raw pointer usage. Use Mutex for thread-safety.
pub trait FeatureTransform: Send {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor;
}

/// An output head: post-tower feature map in, task-specific tensor out
pub trait Head: Send {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor;
}

/// Policy head: 1×1 conv to two planes, then a linear layer over the board
///
/// Returns unnormalized logits of shape `(batch, action_size)`.
#[derive(Debug)]
pub struct PolicyHead {
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    fc: nn::Linear,
    flatten_size: i64,
}

const POLICY_CONV_CHANNELS: i64 = 2;

impl PolicyHead {
    pub fn new(
        path: &nn::Path,
        num_channels: i64,
        channel_height: i64,
        channel_width: i64,
        action_size: i64,
    ) -> Self {
        let flatten_size = POLICY_CONV_CHANNELS * channel_height * channel_width;

        let conv = nn::conv2d(
            path / "conv",
            num_channels,
            POLICY_CONV_CHANNELS,
            1,
            Default::default(),
        );
        let bn = nn::batch_norm2d(path / "bn", POLICY_CONV_CHANNELS, Default::default());
        let fc = nn::linear(path / "fc", flatten_size, action_size, Default::default());

        Self {
            conv,
            bn,
            fc,
            flatten_size,
        }
    }
}

impl Head for PolicyHead {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        xs.apply(&self.conv)
            .apply_t(&self.bn, train)
            .relu()
            .view([-1, self.flatten_size])
            .apply(&self.fc)
    }
}

/// Value head: 1×1 conv to a single plane, two linear layers, tanh
///
/// Returns a `(batch, 1)` estimate in `[-1, 1]`.
#[derive(Debug)]
pub struct ValueHead {
    conv: nn::Conv2D,
    bn: nn::BatchNorm,
    fc1: nn::Linear,
    fc2: nn::Linear,
    flatten_size: i64,
}

impl ValueHead {
    pub fn new(
        path: &nn::Path,
        num_channels: i64,
        channel_height: i64,
        channel_width: i64,
    ) -> Self {
        let flatten_size = channel_height * channel_width;

        let conv = nn::conv2d(path / "conv", num_channels, 1, 1, Default::default());
        let bn = nn::batch_norm2d(path / "bn", 1, Default::default());
        let fc1 = nn::linear(path / "fc1", flatten_size, num_channels, Default::default());
        let fc2 = nn::linear(path / "fc2", num_channels, 1, Default::default());

        Self {
            conv,
            bn,
            fc1,
            fc2,
            flatten_size,
        }
    }
}

impl Head for ValueHead {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        xs.apply(&self.conv)
            .apply_t(&self.bn, train)
            .relu()
            .view([-1, self.flatten_size])
            .apply(&self.fc1)
            .relu()
            .apply(&self.fc2)
            .tanh()
    }
}
