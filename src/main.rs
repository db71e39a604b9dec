use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use minesweeper::{logging, tui, Difficulty, Game, GameState, Hud, Pos};

#[derive(Parser, Debug)]
#[command(name = "minesweeper", about = "Rust CLI/TUI Minesweeper", version)]
struct Args {
    /// Launch TUI mode
    #[arg(long)]
    tui: bool,
    /// Board preset
    #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,
    /// Seed (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity,
}

fn print_help() {
    println!("Commands:");
    println!("  r row col   - reveal cell (1-based)");
    println!("  f row col   - toggle flag (1-based)");
    println!("  d level     - new game at easy, medium or hard");
    println!("  n           - new game");
    println!("  q           - quit");
    println!("  h/help      - show this help");
}

fn parse_pos(parts: &[&str], rows: usize, cols: usize) -> Result<Pos, String> {
    let [_, row, col, ..] = parts else { return Err("Usage: <cmd> row col".into()) };
    let row = row.parse::<usize>().map_err(|_| "Invalid row".to_string())?;
    let col = col.parse::<usize>().map_err(|_| "Invalid col".to_string())?;
    if row == 0 || col == 0 { return Err("Use 1-based coordinates".into()); }
    if row > rows || col > cols { return Err(format!("Board is {}x{}", rows, cols)); }
    Ok(Pos::new(row - 1, col - 1))
}

fn print_status(game: &Game<Hud>) {
    let hud = game.presenter();
    println!(
        "{}  Mines {}  Time {}  Progress {}",
        hud.face.glyph(),
        hud.mine_counter(),
        hud.clock(Instant::now()),
        hud.progress()
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logging::init_file(path, args.verbose.log_level_filter())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    if args.tui {
        return tui::run_tui(args.difficulty, args.seed).context("TUI error");
    }

    let mut game = Game::new(args.difficulty, args.seed, Hud::new());
    println!("Minesweeper ({}){}", args.difficulty, if args.seed != 0 { format!(" seed {}", args.seed) } else { String::new() });
    println!("Coordinates are 1-based, row first. Type 'h' for help.");
    print_help();

    let mut input = String::new();
    let mut redraw = true;
    loop {
        if game.presenter_mut().take_dirty() > 0 || redraw {
            println!("\n{}", game.board());
            redraw = false;
        }
        print_status(&game);
        match game.board().state() {
            GameState::Lost => println!("Boom! You hit a mine. 'n' for a new game, 'q' to quit."),
            GameState::Won => {
                if game.presenter().show_win_modal {
                    println!("Congratulations! You cleared the board in {}s!", game.presenter().clock(Instant::now()));
                    game.presenter_mut().dismiss_modal();
                }
            }
            GameState::Playing => {}
        }

        print!("> ");
        io::stdout().flush()?;
        input.clear();
        if io::stdin().read_line(&mut input)? == 0 { break; }
        let line = input.trim();
        if line.is_empty() { continue; }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let (rows, cols) = (game.board().rows(), game.board().cols());
        match parts[0].to_lowercase().as_str() {
            "q" | "quit" | "exit" => break,
            "h" | "help" => print_help(),
            "n" | "new" => {
                game.restart(game.difficulty());
                redraw = true;
            }
            "d" | "difficulty" => match parts.get(1).map(|s| s.parse::<Difficulty>()) {
                Some(Ok(d)) => {
                    game.restart(d);
                    redraw = true;
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Usage: d easy|medium|hard"),
            },
            "r" | "reveal" => match parse_pos(&parts, rows, cols) {
                Ok(pos) => { game.primary_action(pos)?; }
                Err(msg) => println!("{}", msg),
            },
            "f" | "flag" => match parse_pos(&parts, rows, cols) {
                Ok(pos) => {
                    if game.secondary_action(pos)? == minesweeper::FlagOutcome::NoOp {
                        println!("Cannot flag a revealed cell or a finished game");
                    }
                }
                Err(msg) => println!("{}", msg),
            },
            other => println!("Unknown command '{}'. Type 'h' for help.", other),
        }
    }
    Ok(())
}
