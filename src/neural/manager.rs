//! AlphaZero Model Manager
//!
//! Owns the parameter store and the network built into it, and exposes the
//! inference entry points used by search and evaluation drivers.

use tch::{nn, Device, Tensor};

use crate::neural::alphazero_network::{AlphaZeroNetwork, NetworkOutput};
use crate::neural::network_config::NetworkConfig;
use crate::neural::tensor_conversion::features_to_tensor;
use crate::Result;

pub struct AlphaZeroModel {
    vs: nn::VarStore,
    network: AlphaZeroNetwork,
}

impl AlphaZeroModel {
    /// Allocate a fresh parameter store on `device` and build the network into it
    pub fn new(config: NetworkConfig, device: Device) -> Self {
        log::info!("🧠 Initializing AlphaZero network on {:?}...", device);
        log::debug!("Network config: {}", config.to_config_string());

        let vs = nn::VarStore::new(device);
        let network = AlphaZeroNetwork::new(&vs.root(), config);

        let model = Self { vs, network };
        log::info!(
            "✅ AlphaZero network ready ({} trainable parameters)",
            model.num_parameters()
        );
        model
    }

    pub fn config(&self) -> &NetworkConfig {
        self.network.config()
    }

    pub fn network(&self) -> &AlphaZeroNetwork {
        &self.network
    }

    pub fn varstore(&self) -> &nn::VarStore {
        &self.vs
    }

    /// Mutable store access for an external optimizer or loader
    pub fn varstore_mut(&mut self) -> &mut nn::VarStore {
        &mut self.vs
    }

    pub fn device(&self) -> Device {
        self.vs.device()
    }

    /// Inference pass: no autograd graph, normalization uses running statistics
    pub fn evaluate(&self, state: &Tensor) -> NetworkOutput {
        tch::no_grad(|| self.network.forward_t(state, false))
    }

    /// Raw forward pass for an external training driver
    pub fn forward_t(&self, state: &Tensor, train: bool) -> NetworkOutput {
        self.network.forward_t(state, train)
    }

    /// Evaluate `batch` positions given as flat channel-major feature planes
    pub fn evaluate_features(&self, features: &[f32], batch: i64) -> Result<NetworkOutput> {
        let state = features_to_tensor(features, batch, self.config(), self.device())?;
        Ok(self.evaluate(&state))
    }

    /// Total count of trainable scalars
    pub fn num_parameters(&self) -> i64 {
        self.vs
            .trainable_variables()
            .iter()
            .map(|t| t.numel() as i64)
            .sum()
    }

    /// Trainable scalar count per top-level layer (`conv`, `bn`, `residual_blocks`, ...)
    pub fn parameter_breakdown(&self) -> Vec<(String, i64)> {
        let mut counts: std::collections::BTreeMap<String, i64> = Default::default();
        for (name, tensor) in self.vs.variables() {
            if !tensor.requires_grad() {
                continue;
            }
            let layer = name.split('.').next().unwrap_or(&name).to_string();
            *counts.entry(layer).or_default() += tensor.numel() as i64;
        }
        counts.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::res_net_block::ResidualBlock;
    use tch::Kind;

    fn config(num_blocks: i64) -> NetworkConfig {
        NetworkConfig::new("connect4", 3, 6, 7, 16, 6, 7, num_blocks, 1, 7)
    }

    #[test]
    fn test_evaluate_shapes() {
        let model = AlphaZeroModel::new(config(2), Device::Cpu);
        let input = Tensor::rand([4, 3, 6, 7], (Kind::Float, Device::Cpu));
        let output = model.evaluate(&input);

        assert_eq!(output.policy.size(), vec![4, 7]);
        assert_eq!(output.value.size(), vec![4, 1]);
        assert!(!output.policy.requires_grad());
    }

    #[test]
    fn test_evaluate_features() {
        let model = AlphaZeroModel::new(config(1), Device::Cpu);
        let features = vec![0.5f32; 2 * 3 * 6 * 7];
        let output = model.evaluate_features(&features, 2).unwrap();
        assert_eq!(output.policy.size(), vec![2, 7]);

        assert!(model.evaluate_features(&features, 3).is_err());
    }

    #[test]
    fn test_parameter_breakdown_sums_to_total() {
        let model = AlphaZeroModel::new(config(3), Device::Cpu);
        let breakdown = model.parameter_breakdown();

        let layers: Vec<&str> = breakdown.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(layers, vec!["bn", "conv", "policy", "residual_blocks", "value"]);

        let total: i64 = breakdown.iter().map(|(_, c)| c).sum();
        assert_eq!(total, model.num_parameters());

        let tower = breakdown.iter().find(|(n, _)| n == "residual_blocks").unwrap().1;
        assert_eq!(tower, 3 * ResidualBlock::parameter_count(16));
    }
}
