use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::Rng;
use tch::{Device, Kind, Tensor};

use alphazero_net::game::havannah::action_id_to_coordinate;
use alphazero_net::logging::setup_logging;
use alphazero_net::{AlphaZeroModel, AlphaZeroNetError, HavannahConfig, HavannahEnv, NetworkConfig};

#[derive(Parser, Debug)]
#[command(name = "alphazero_net", version, about)]
struct Cli {
    /// JSON network configuration; overrides the shape flags below
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    shape: ShapeArgs,

    /// Run on CUDA when available
    #[arg(long, global = true, default_value_t = false)]
    cuda: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write rotating log files here instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Network shape; defaults describe a 19×19 Go network
#[derive(clap::Args, Debug)]
struct ShapeArgs {
    #[arg(long, global = true, default_value = "go")]
    game_name: String,

    #[arg(long, global = true, default_value_t = 18)]
    input_channels: i64,

    #[arg(long, global = true, default_value_t = 19)]
    input_height: i64,

    #[arg(long, global = true, default_value_t = 19)]
    input_width: i64,

    #[arg(long, global = true, default_value_t = 128)]
    hidden_channels: i64,

    #[arg(long, global = true, default_value_t = 19)]
    hidden_height: i64,

    #[arg(long, global = true, default_value_t = 19)]
    hidden_width: i64,

    #[arg(long, global = true, default_value_t = 5)]
    blocks: i64,

    #[arg(long, global = true, default_value_t = 2)]
    action_channels: i64,

    #[arg(long, global = true, default_value_t = 362)]
    action_size: i64,
}

impl From<&ShapeArgs> for NetworkConfig {
    fn from(args: &ShapeArgs) -> Self {
        NetworkConfig::new(
            args.game_name.clone(),
            args.input_channels,
            args.input_height,
            args.input_width,
            args.hidden_channels,
            args.hidden_height,
            args.hidden_width,
            args.blocks,
            args.action_channels,
            args.action_size,
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the configuration and parameter counts
    Summary,

    /// Run a zero tensor through the network and report output shapes
    Forward {
        #[arg(short = 'b', long, default_value_t = 1)]
        batch: i64,
    },

    /// Play random Havannah moves, evaluating every position with the network
    Havannah {
        #[arg(long, default_value_t = 9)]
        board_size: usize,

        #[arg(long, default_value_t = false)]
        swap_rule: bool,

        /// Stop after this many moves even if the game is not over
        #[arg(long, default_value_t = 200)]
        max_moves: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let device = if cli.cuda {
        Device::cuda_if_available()
    } else {
        Device::Cpu
    };

    match &cli.command {
        Command::Summary => summary(network_config(&cli)?, device),
        Command::Forward { batch } => forward(network_config(&cli)?, device, *batch)?,
        Command::Havannah {
            board_size,
            swap_rule,
            max_moves,
        } => {
            let havannah = HavannahConfig {
                board_size: *board_size,
                use_swap_rule: *swap_rule,
            };
            play_havannah(&cli, havannah, device, *max_moves)?
        }
    }

    Ok(())
}

fn network_config(cli: &Cli) -> alphazero_net::Result<NetworkConfig> {
    match &cli.config {
        Some(path) => NetworkConfig::from_json_file(path),
        None => Ok(NetworkConfig::from(&cli.shape)),
    }
}

fn summary(config: NetworkConfig, device: Device) {
    let model = AlphaZeroModel::new(config, device);
    let net = model.network();

    println!("type                 : {}", net.type_name());
    println!("game                 : {}", net.game_name());
    println!(
        "input                : {} × {} × {}",
        net.num_input_channels(),
        net.input_channel_height(),
        net.input_channel_width()
    );
    println!(
        "hidden               : {} × {} × {}",
        net.num_hidden_channels(),
        net.hidden_channel_height(),
        net.hidden_channel_width()
    );
    println!("residual blocks      : {}", net.num_blocks());
    println!("action channels      : {}", net.num_action_channels());
    println!("action size          : {}", net.action_size());
    println!();
    for (layer, count) in model.parameter_breakdown() {
        println!("{:<20} : {:>12}", layer, count);
    }
    println!("{:<20} : {:>12}", "total", model.num_parameters());
}

fn forward(config: NetworkConfig, device: Device, batch: i64) -> alphazero_net::Result<()> {
    if batch < 1 {
        return Err(AlphaZeroNetError::Config(format!(
            "batch must be at least 1, got {}",
            batch
        )));
    }

    let model = AlphaZeroModel::new(config, device);
    let input = Tensor::zeros(model.config().input_shape(batch), (Kind::Float, device));
    let output = model.evaluate(&input);

    println!("input  : {:?}", input.size());
    println!("policy : {:?}", output.policy.size());
    println!("value  : {:?}", output.value.size());
    Ok(())
}

fn play_havannah(
    cli: &Cli,
    havannah: HavannahConfig,
    device: Device,
    max_moves: usize,
) -> alphazero_net::Result<()> {
    let mut env = HavannahEnv::new(havannah)?;

    // a JSON config may still describe the tower; the board fixes the rest
    let config = match &cli.config {
        Some(path) => {
            let base = NetworkConfig::from_json_file(path)?;
            env.network_config(base.num_hidden_channels(), base.num_blocks())
        }
        None => env.network_config(cli.shape.hidden_channels, cli.shape.blocks),
    };
    let model = AlphaZeroModel::new(config, device);

    log::info!("🎲 Random Havannah game on {}", env.name());
    let mut rng = rand::thread_rng();

    for step in 0..max_moves {
        if env.is_terminal() {
            break;
        }

        let output = model.evaluate_features(&env.features(), 1)?;
        let probs = Vec::<f32>::try_from(output.policy_probabilities().view([-1]))?;
        let value = output.value.double_value(&[0, 0]);

        let legal = env.legal_actions();
        if legal.is_empty() {
            break;
        }
        let preferred = legal
            .iter()
            .max_by(|a, b| probs[a.action_id()].total_cmp(&probs[b.action_id()]));
        if let Some(best) = preferred {
            log::info!(
                "move {:>3} {} value {:+.3} prior best {} ({:.3})",
                step + 1,
                env.turn(),
                value,
                action_id_to_coordinate(best.action_id(), env.board_size()),
                probs[best.action_id()]
            );
        }

        let action = legal[rng.gen_range(0..legal.len())];
        env.act(action);
    }

    println!("{}", env);
    println!(
        "winner: {} after {} moves (score {:+.1})",
        env.winner(),
        env.actions().len(),
        env.eval_score(false)
    );
    Ok(())
}
