use std::process;
use std::time::Instant;

use brutal_chess::chess_boards::chess_board::INITIAL_POSITION;
use brutal_chess::chess_boards::perft::perft_divide;
use brutal_chess::config::{Difficulty, EngineConfig};
use brutal_chess::engines::{AlphaBetaEngine, ChessPlayer, RandomPlayer, SearchWorker};
use brutal_chess::error::{ChessError, ChessResult};
use brutal_chess::game::{ChessGame, GameState, GameStatus};

use clap::arg;
use clap::command;
use clap::ArgMatches;
use clap::Command;

use log::{error, info};

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

const BENCHMARK_POSITION: &str = "1rb2rk1/p4ppp/1p1qp1n1/3n2N1/2pP4/2P3P1/PPQ2PBP/R1B1R1K1 w - - 4 17";

fn main() {
    let matches = command!()
        .version("v0.1.0")
        .propagate_version(true)
        .arg(arg!(
            -d --debug "Turn debugging information on"
        ))
        .subcommand(
            Command::new("benchmark")
                .about("Runs a benchmark")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(BENCHMARK_POSITION),
                )
                .arg(
                    arg!(
                    -x --depth <d> "deepest search to run"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("play")
                .about("Play a game in the terminal")
                .arg(
                    arg!(
                    -w --white <player> "Player for white"
                            )
                    .default_value("brutal")
                    .value_parser(["brutal", "random"]),
                )
                .arg(
                    arg!(
                    -b --black <player> "Player for black"
                            )
                    .default_value("random")
                    .value_parser(["brutal", "random"]),
                )
                .arg(
                    arg!(
                    -l --difficulty <level> "easy, medium or hard"
                            )
                    .default_value("medium")
                    .value_parser(clap::value_parser!(Difficulty)),
                )
                .arg(
                    arg!(
                    -x --depth <d> "search depth, overrides the difficulty"
                            )
                    .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    arg!(
                    -s --seed <seed> "seed for the random player"
                            )
                    .default_value("0")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                    -m --"max-moves" <n> "stop after this many half moves"
                            )
                    .default_value("200")
                    .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("perft")
                .about("Run Perft test")
                .arg(
                    arg!(
                    -f --fen <FEN> "Board position"
                            )
                    .default_value(INITIAL_POSITION),
                )
                .arg(
                    arg!(
                    -x --depth <d> "depth"
                            )
                    .default_value("3")
                    .value_parser(clap::value_parser!(u8)),
                )
                .arg(
                    arg!(
                    -m --moves <moves> "List of moves"
                            )
                    .num_args(1..)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = match matches.subcommand() {
        Some(("benchmark", arg_matches)) => benchmark(arg_matches),
        Some(("play", arg_matches)) => play(arg_matches),
        Some(("perft", arg_matches)) => perft(arg_matches),
        None => play(&ArgMatches::default()),
        _ => unreachable!("Exhausted list of subcommands"),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn create_player(kind: &str, config: EngineConfig) -> Box<dyn ChessPlayer> {
    match kind {
        "random" => Box::new(RandomPlayer::new(config.seed)),
        _ => Box::new(AlphaBetaEngine::new(config)),
    }
}

fn play(arg_matches: &ArgMatches) -> ChessResult<()> {
    let difficulty = arg_matches
        .try_get_one::<Difficulty>("difficulty")
        .ok()
        .flatten()
        .copied()
        .unwrap_or_default();
    let mut config = EngineConfig::from_difficulty(difficulty);
    if let Some(depth) = arg_matches.try_get_one::<u32>("depth").ok().flatten() {
        config = config.with_depth(*depth);
    }
    if let Some(seed) = arg_matches.try_get_one::<u64>("seed").ok().flatten() {
        config = config.with_seed(*seed);
    }
    let max_moves = arg_matches
        .try_get_one::<u32>("max-moves")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(200);
    let kind = |name: &str, default: &'static str| {
        arg_matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let mut players = [
        Some(create_player(&kind("white", "brutal"), config)),
        Some(create_player(&kind("black", "random"), config)),
    ];
    let mut game = ChessGame::new();
    println!("{}", game.state().board());

    for _ in 0..max_moves {
        if game.state().status().is_over() {
            break;
        }
        let turn = game.state().turn();
        let player = players[turn.index()].take().ok_or_else(|| ChessError::SearchWorker {
            message: format!("no player for {}", turn),
        })?;
        let trusted = player.is_trustworthy();

        let outcome = SearchWorker::spawn(player, game.state().clone())?.wait()?;
        players[turn.index()] = Some(outcome.player);
        let Some(mv) = outcome.best_move else {
            break;
        };

        let number = game.state().turn_number();
        game.try_move(&mv, trusted)?;
        if let Some(opponent) = players[turn.opposite().index()].as_mut() {
            opponent.opponent_move(&mv, game.state());
        }
        println!("{}. {} {}", number, turn, mv);
        println!("{}", game.state().board());
    }

    report(game.state());
    Ok(())
}

fn report(state: &GameState) {
    match state.status() {
        GameStatus::Checkmate { winner } => println!("Checkmate, {} wins", winner),
        GameStatus::Stalemate => println!("Stalemate"),
        GameStatus::Draw(reason) => println!("Draw by {}", reason),
        GameStatus::Fresh | GameStatus::InProgress => println!("Game stopped at {}", state.to_fen()),
    }
    info!("final position {}", state.to_fen());
}

#[derive(Tabled)]
struct BenchmarkRow {
    depth: u32,
    score: i32,
    node_count: u64,
    elapsed_time: f32,
    knodes_per_sec: f32,
    best_move: String,
}

fn benchmark(arg_matches: &ArgMatches) -> ChessResult<()> {
    let fen = arg_matches
        .get_one::<String>("fen")
        .map(String::as_str)
        .unwrap_or(BENCHMARK_POSITION);
    let max_depth = arg_matches.get_one::<u32>("depth").copied().unwrap_or(3);
    let state = GameState::from_fen(fen)?;

    let mut table_rows = Vec::new();
    for depth in 0..=max_depth {
        let start_time = Instant::now();
        let mut engine = AlphaBetaEngine::with_depth(depth);
        if let Some(result) = engine.search(state.board(), state.turn()) {
            let elapsed = start_time.elapsed();
            table_rows.push(BenchmarkRow {
                depth,
                score: result.score,
                node_count: result.nodes,
                elapsed_time: elapsed.as_secs_f32(),
                knodes_per_sec: result.nodes as f32 / elapsed.as_secs_f32().max(f32::EPSILON) / 1000f32,
                best_move: result.best_move.as_algebraic(),
            });
            if elapsed.as_secs() > 10 {
                break;
            }
        } else {
            println!("No best move found!");
            break;
        }
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
    Ok(())
}

fn perft(arg_matches: &ArgMatches) -> ChessResult<()> {
    let fen = arg_matches
        .get_one::<String>("fen")
        .map(String::as_str)
        .unwrap_or(INITIAL_POSITION);
    let depth = arg_matches.get_one::<u8>("depth").copied().unwrap_or(3);
    let moves = arg_matches
        .get_many::<String>("moves")
        .unwrap_or_default()
        .filter(|&v| !v.is_empty())
        .collect::<Vec<_>>();
    println!("Perft test for {} moves {:?} with depth {}", fen, moves, depth);

    let mut state = GameState::from_fen(fen)?;
    for m in moves {
        let mv = state.board().parse_move(m)?;
        state.try_move(&mv, false)?;
    }

    let mut result_moves = perft_divide(state.board(), state.turn(), depth)
        .into_iter()
        .map(|(mv, count)| (mv.as_algebraic(), count))
        .collect::<Vec<_>>();
    result_moves.sort();

    let mut num_nodes = 0;
    for (m, c) in result_moves {
        println!("{}: {}", m, c);
        num_nodes += c;
    }
    println!("\nNodes searched: {}", num_nodes);
    Ok(())
}
