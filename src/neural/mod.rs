pub mod alphazero_network;
pub mod manager;
pub mod network_config;
pub mod policy_value_net;
pub mod res_net_block;
pub mod tensor_conversion;

// Re-export key components for convenience
pub use alphazero_network::{AlphaZeroNetwork, NetworkOutput};
pub use manager::AlphaZeroModel;
pub use network_config::NetworkConfig;
pub use policy_value_net::{FeatureTransform, Head, PolicyHead, ValueHead};
pub use res_net_block::ResidualBlock;
