use tch::{Device, Tensor};

use crate::neural::network_config::NetworkConfig;
use crate::{AlphaZeroNetError, Result};

/// Reshape flat, channel-major feature planes into a `(batch, C, H, W)` tensor
///
/// `features` must hold exactly `batch * C * H * W` values; anything else is
/// reported as a tensor error rather than a panic.
pub fn features_to_tensor(
    features: &[f32],
    batch: i64,
    config: &NetworkConfig,
    device: Device,
) -> Result<Tensor> {
    let tensor = Tensor::from_slice(features).f_reshape(config.input_shape(batch))?;
    Ok(tensor.to_device(device))
}

/// Stack the feature planes of several positions into one batch
///
/// Every position must hold exactly `C * H * W` values.
pub fn stack_features(
    states: &[Vec<f32>],
    config: &NetworkConfig,
    device: Device,
) -> Result<Tensor> {
    let per_position: i64 = config.input_shape(1).iter().product();
    if let Some((idx, state)) = states
        .iter()
        .enumerate()
        .find(|(_, state)| state.len() as i64 != per_position)
    {
        return Err(AlphaZeroNetError::Config(format!(
            "position {} has {} feature values, expected {}",
            idx,
            state.len(),
            per_position
        )));
    }

    let flat: Vec<f32> = states.iter().flatten().copied().collect();
    features_to_tensor(&flat, states.len() as i64, config, device)
}
