use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use maze_types::{GridMaze, SMALL_LAYOUT};
use mcts::{
    config::DEFAULT_SEED, games::tictactoe::TicTacToe, Game, Outcome, Player, RolloutVoter,
    VoteConfig,
};
use pacai::{GreedyController, MazeGame, MctsPac, SearchConfig, Simulation, Tactic};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "pac-cli", about = "Monte Carlo search agents for maze chases and board games")]
struct Cli {
    /// Default tracing filter, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Let the tree search agent play the built-in maze game
    Run(RunArgs),
    /// Pit the rollout voter against a random tic-tac-toe player
    Vote(VoteArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// ASCII maze layout, the bundled small maze when omitted
    #[arg(long)]
    maze: Option<PathBuf>,
    /// Search parameters in RON
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 500)]
    ticks: u64,
    #[arg(long, default_value = "survival")]
    tactic: Tactic,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct VoteArgs {
    #[arg(long, default_value_t = 500)]
    rollouts: usize,
    #[arg(long, default_value_t = 10)]
    games: usize,
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Run(args) => run(&args),
        Command::Vote(args) => vote(&args),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let layout = match &args.maze {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading maze {}", path.display()))?,
        None => SMALL_LAYOUT.to_owned(),
    };
    let maze = GridMaze::parse(&layout).context("parsing maze")?;

    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("loading search config {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let seed = config.seed.unwrap_or(DEFAULT_SEED);
    info!(?config, tactic = %args.tactic, "starting maze run");

    let mut rng = config.rng();
    let mut game = MazeGame::new(Arc::new(maze), seed);
    let mut agent = MctsPac::new(config, args.tactic, GreedyController)?;

    while game.tick() < args.ticks && !game.is_over() && !game.is_cleared() {
        if let Some(dir) = agent.think(&game, &mut rng)? {
            debug!(tick = game.tick(), position = %game.agent(), %dir, "steering");
            game.steer(dir);
        }
        game.update();
    }

    info!(
        ticks = game.tick(),
        score = game.score(),
        pills_left = game.pills_remaining(),
        ghosts_eaten = game.ghosts_eaten(),
        survived = !game.is_over(),
        cleared = game.is_cleared(),
        "maze run finished"
    );
    Ok(())
}

fn vote(args: &VoteArgs) -> Result<()> {
    let config = VoteConfig {
        rollouts: args.rollouts,
        seed: args.seed,
        ..Default::default()
    };
    config.validate()?;
    let mut rng = config.rng();
    let voter = RolloutVoter::new(config);

    let (mut wins, mut draws, mut losses) = (0, 0, 0);
    for round in 0..args.games {
        // the voter alternates between moving first and second
        let voter_side = if round % 2 == 0 { Player::One } else { Player::Two };
        let outcome = play_tictactoe(&voter, voter_side, &mut rng)?;
        match outcome.winner() {
            Some(winner) if winner == voter_side => wins += 1,
            Some(_) => losses += 1,
            None => draws += 1,
        }
        info!(round, ?outcome, side = ?voter_side, "game finished");
    }

    info!(wins, draws, losses, "voting search tally");
    Ok(())
}

fn play_tictactoe<R: Rng>(voter: &RolloutVoter, voter_side: Player, rng: &mut R) -> Result<Outcome> {
    let mut game = TicTacToe::new();
    while !game.status().is_terminal() {
        let mv = if game.current_player() == voter_side {
            voter.choose(&game, rng)?
        } else {
            let moves = game.legal_moves();
            *moves.choose(rng).context("random player has no moves")?
        };
        debug!(player = game.player_tag(game.current_player()), mv, "move");
        game.make_move(&mv);
        debug!("\n{game}");
    }
    Ok(game.status())
}
