//! Mill-Rust: Nine Men's Morris engine.
//!
//! ## Usage
//!
//! - `mill-rust` - Show a demo
//! - `mill-rust protocol` - Serve the text protocol on stdin/stdout
//! - `mill-rust self-play` - Let two automated players play each other
//! - `mill-rust demo` - Run the demo

use std::cmp::max;
use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use mill_rust::board::Player;
use mill_rust::constants::DEFAULT_SEARCH_DEPTH;
use mill_rust::engine::{GameEngine, GameEvent};
use mill_rust::heuristic::{HeuristicKind, MillCount};
use mill_rust::player::{AutomatedPlayer, PlayerConfig, PlayersController, Strategy};
use mill_rust::protocol::{ProtocolEngine, describe_turn};
use mill_rust::search::{alpha_beta, minimax};

/// Mill-Rust: rules engine and minimax search for Nine Men's Morris
#[derive(Parser, Debug)]
#[command(name = "mill-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Args)]
struct GlobalOpts {
    /// Enable debug logging.
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    /// Minimum log level; `--debug` raises it to at least `Debug`.
    #[arg(global = true, long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the line-oriented text protocol on stdin/stdout
    Protocol {
        /// Seed for the random strategy
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Play a game between two automated players
    SelfPlay(SelfPlayArgs),
    /// Run a short demo of the engine
    Demo,
}

#[derive(Args, Debug)]
struct SelfPlayArgs {
    #[arg(long, value_enum, default_value_t = Strategy::AlphaBeta)]
    first_strategy: Strategy,
    #[arg(long, value_enum, default_value_t = HeuristicKind::Mills)]
    first_heuristic: HeuristicKind,
    /// Search depth for First, in full rounds
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    first_depth: usize,

    #[arg(long, value_enum, default_value_t = Strategy::AlphaBeta)]
    second_strategy: Strategy,
    #[arg(long, value_enum, default_value_t = HeuristicKind::Mills)]
    second_heuristic: HeuristicKind,
    /// Search depth for Second, in full rounds
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    second_depth: usize,

    /// Stop after this many turns without a result
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Seed for the random strategy
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn init_logger(opts: GlobalOpts) -> Result<()> {
    let log_level = if opts.debug {
        max(LevelFilter::Debug, opts.log_level)
    } else {
        opts.log_level
    };

    let mut config = ConfigBuilder::new();
    if opts.debug {
        config.set_time_level(LevelFilter::Error);
        config.set_target_level(LevelFilter::Error);
    } else {
        config.set_time_level(LevelFilter::Off);
        config.set_target_level(LevelFilter::Off);
    }
    config.set_thread_level(LevelFilter::Off);
    config.set_location_level(LevelFilter::Off);

    // Protocol responses own stdout.
    TermLogger::init(
        log_level,
        config.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.global_opts)?;
    log::debug!("Parsed arguments: {cli:?}");

    match cli.command {
        Some(Commands::Protocol { seed }) => {
            let mut engine = ProtocolEngine::new().with_seed(seed);
            engine.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Some(Commands::SelfPlay(args)) => run_self_play(&args)?,
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_self_play(args: &SelfPlayArgs) -> Result<()> {
    let player = |side: Player, strategy, heuristic, depth, seed| {
        AutomatedPlayer::new(PlayerConfig {
            strategy,
            heuristic,
            depth,
            player: side,
            seed,
        })
    };
    let mut controller = PlayersController::new(
        Some(player(
            Player::First,
            args.first_strategy,
            args.first_heuristic,
            args.first_depth,
            args.seed,
        )),
        Some(player(
            Player::Second,
            args.second_strategy,
            args.second_heuristic,
            args.second_depth,
            args.seed.wrapping_add(1),
        )),
    );

    let mut engine = GameEngine::new();
    engine.subscribe(|event| {
        if let GameEvent::GameFinished(winner) = event {
            log::info!("game finished, {winner} wins");
        }
    });

    for ply in 1..=args.max_plies {
        let mover = engine.current_player();
        let before = *engine.board();
        if !controller.play_turn(&mut engine)? {
            break;
        }
        println!("{ply:3}. {mover}: {}", describe_turn(&before, engine.board(), mover));
    }

    println!("\n{}", engine.board());
    match engine.winner() {
        Some(winner) => println!("{winner} wins"),
        None => println!("No result after {} plies", args.max_plies),
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Mill-Rust: Nine Men's Morris engine\n");

    // Demo 1: interactive rules engine
    println!("=== Rules Engine Demo ===");
    let mut engine = GameEngine::new();
    for field in [0, 3, 1, 10, 2] {
        engine.handle_selection(field);
    }
    println!("{}", engine.board());
    println!(
        "{} closed a mill and may remove one of {:?}",
        engine.current_player(),
        engine.current_possible_move_indices()
    );
    engine.handle_selection(3);
    println!("{}", engine.board());

    // Demo 2: search
    println!("=== Search Demo ===");
    let state = engine.current_game_state();
    let heuristic = MillCount::default();
    let plain = minimax(&state, &heuristic, 2)?;
    let pruned = alpha_beta(&state, &heuristic, 2)?;
    println!(
        "Minimax: {} nodes, alpha-beta: {} nodes, evaluation {:.1}",
        plain.nodes, pruned.nodes, pruned.evaluation
    );

    // Demo 3: automated players
    println!("\n=== Self-Play Demo ===");
    let mut first = PlayerConfig::new(Player::First);
    first.depth = 1;
    let mut second = PlayerConfig::new(Player::Second);
    second.strategy = Strategy::Random;
    let mut controller = PlayersController::new(
        Some(AutomatedPlayer::new(first)),
        Some(AutomatedPlayer::new(second)),
    );
    let winner = controller.run(&mut engine, 100)?;
    println!("{}", engine.board());
    match winner {
        Some(winner) => println!("{winner} wins"),
        None => println!("No result"),
    }
    Ok(())
}
