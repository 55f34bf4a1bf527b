use std::io::Write;

use alphazero_net::neural::res_net_block::ResidualBlock;
use alphazero_net::{AlphaZeroModel, NetworkConfig};
use tch::{Device, Kind, Tensor};

fn go_config(num_blocks: i64) -> NetworkConfig {
    NetworkConfig::new("go", 18, 19, 19, 128, 19, 19, num_blocks, 2, 362)
}

#[test]
fn go_network_scenario() {
    let model = AlphaZeroModel::new(go_config(5), Device::Cpu);
    assert_eq!(model.network().num_blocks(), 5);

    let input = Tensor::zeros([1, 18, 19, 19], (Kind::Float, Device::Cpu));
    let output = model.evaluate(&input);

    assert_eq!(output.policy.size(), vec![1, 362]);
    assert_eq!(output.value.size(), vec![1, 1]);
}

#[test]
fn accessors_return_constructor_values() {
    let config = NetworkConfig::new("othello", 4, 8, 8, 32, 8, 8, 3, 1, 65);
    let model = AlphaZeroModel::new(config, Device::Cpu);
    let net = model.network();

    assert_eq!(net.type_name(), "alphazero");
    assert_eq!(net.game_name(), "othello");
    assert_eq!(net.num_input_channels(), 4);
    assert_eq!(net.input_channel_height(), 8);
    assert_eq!(net.input_channel_width(), 8);
    assert_eq!(net.num_hidden_channels(), 32);
    assert_eq!(net.hidden_channel_height(), 8);
    assert_eq!(net.hidden_channel_width(), 8);
    assert_eq!(net.num_blocks(), 3);
    assert_eq!(net.num_action_channels(), 1);
    assert_eq!(net.action_size(), 65);
}

#[test]
fn batched_forward_shapes() {
    let config = NetworkConfig::new("othello", 4, 8, 8, 16, 8, 8, 2, 1, 65);
    let model = AlphaZeroModel::new(config, Device::Cpu);

    for batch in [1, 3, 8] {
        let input = Tensor::rand([batch, 4, 8, 8], (Kind::Float, Device::Cpu));
        let output = model.evaluate(&input);
        assert_eq!(output.policy.size(), vec![batch, 65]);
        assert_eq!(output.value.size(), vec![batch, 1]);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let config = NetworkConfig::new("gomoku", 2, 15, 15, 16, 15, 15, 2, 1, 225);
    let model = AlphaZeroModel::new(config, Device::Cpu);
    let input = Tensor::rand([2, 2, 15, 15], (Kind::Float, Device::Cpu));

    let first = model.evaluate(&input);
    let second = model.evaluate(&input);

    assert!(first.policy.equal(&second.policy));
    assert!(first.value.equal(&second.value));
}

#[test]
fn extra_block_adds_one_block_of_parameters() {
    let smaller = AlphaZeroModel::new(go_config(2), Device::Cpu);
    let larger = AlphaZeroModel::new(go_config(3), Device::Cpu);

    assert_eq!(
        larger.num_parameters() - smaller.num_parameters(),
        ResidualBlock::parameter_count(128)
    );
    assert_eq!(larger.network().tower_len(), smaller.network().tower_len() + 1);
}

#[test]
fn wrong_input_shape_fails_inside_tensor_ops() {
    let config = NetworkConfig::new("go", 18, 9, 9, 8, 9, 9, 1, 2, 82);
    let model = AlphaZeroModel::new(config, Device::Cpu);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let input = Tensor::zeros([1, 17, 9, 9], (Kind::Float, Device::Cpu));
        model.evaluate(&input)
    }));
    assert!(result.is_err());
}

#[test]
fn config_loaded_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", go_config(4).to_json_string().unwrap()).unwrap();

    let config = NetworkConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config, go_config(4));

    let model = AlphaZeroModel::new(config, Device::Cpu);
    assert_eq!(model.network().num_blocks(), 4);
}

fn small_config() -> NetworkConfig {
    NetworkConfig::new("gomoku", 2, 5, 5, 8, 5, 5, 1, 1, 25)
}

#[test]
fn training_pass_tracks_gradients_and_updates_running_stats() {
    let model = AlphaZeroModel::new(small_config(), Device::Cpu);
    let input = Tensor::rand([4, 2, 5, 5], (Kind::Float, Device::Cpu));

    let before = model.evaluate(&input);
    assert!(!before.policy.requires_grad());

    let output = model.forward_t(&input, true);
    assert!(output.policy.requires_grad());
    assert!(output.value.requires_grad());
    assert_eq!(output.policy.size(), vec![4, 25]);

    // batch norm moved its running mean towards the batch statistics
    let after = model.evaluate(&input);
    assert!(!before.policy.equal(&after.policy));
}

#[test]
fn varstore_round_trip_restores_outputs() {
    let model = AlphaZeroModel::new(small_config(), Device::Cpu);
    let input = Tensor::rand([2, 2, 5, 5], (Kind::Float, Device::Cpu));
    let _ = model.forward_t(&input, true);
    let expected = model.evaluate(&input);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gomoku.ot");
    model.varstore().save(&path).unwrap();

    let mut restored = AlphaZeroModel::new(small_config(), Device::Cpu);
    assert!(!restored.evaluate(&input).policy.equal(&expected.policy));
    restored.varstore_mut().load(&path).unwrap();

    let output = restored.evaluate(&input);
    assert!(output.policy.equal(&expected.policy));
    assert!(output.value.equal(&expected.value));
}
