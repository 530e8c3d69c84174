//! Goose Platformer headless runner
//!
//! Lists levels, plays a level with scripted jumps and manages the coin shop
//! against the JSON save file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use log::LevelFilter;

use goose_platformer::level::LevelCatalog;
use goose_platformer::persistence::JsonFileBackend;
use goose_platformer::progression::PurchaseResult;
use goose_platformer::session::SessionStatus;
use goose_platformer::sim::{GameEvent, SpriteCatalog};
use goose_platformer::{Error, InputEvent, ProgressionStore, Session, Settings};

/// A side-scrolling tile platformer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List levels with their best records
    Levels,
    /// Play a level headless
    Play {
        /// Level id (file name in the levels directory) or path
        level: String,
        /// Press jump before this tick (repeatable)
        #[arg(long = "jump-at")]
        jump_at: Vec<u64>,
        /// Give up after this many ticks
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,
        /// Attempt seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Fill every empty cell with a coin
        #[arg(long)]
        coin_rain: bool,
    },
    /// Show the coin balance and cosmetic sets
    Balance,
    /// Buy a cosmetic set
    Buy {
        /// Set name, e.g. Farmer
        set: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn open_store(settings: &Settings) -> Result<ProgressionStore<JsonFileBackend>, Error> {
    let backend = JsonFileBackend::open(&settings.save_path)?;
    Ok(ProgressionStore::load(backend)?)
}

fn resolve_level(settings: &Settings, level: &str) -> PathBuf {
    let direct = Path::new(level);
    if direct.is_file() {
        direct.to_path_buf()
    } else {
        settings.levels_dir.join(level)
    }
}

fn list_levels(settings: &Settings) -> Result<(), Error> {
    let catalog = LevelCatalog::discover(&settings.levels_dir)?;
    let store = open_store(settings)?;
    for entry in catalog.entries() {
        match store.level_record(&entry.id)? {
            Some(record) => println!(
                "{:<16} best {:>6} points  {:>3} coins",
                entry.id, record.points, record.max_coins
            ),
            None => println!("{:<16} not played", entry.id),
        }
    }
    Ok(())
}

fn play(
    settings: &Settings,
    level: &str,
    jump_at: &[u64],
    max_ticks: u64,
    seed: u64,
) -> Result<(), Error> {
    let mut store = open_store(settings)?;
    let path = resolve_level(settings, level);
    let sprites = SpriteCatalog::default();
    let mut session = Session::load(&path, settings, &sprites, seed, &mut store)?;

    for tick in 0..max_ticks {
        if jump_at.contains(&tick) {
            session.push_input(InputEvent::Jump);
        }
        let frame = session.advance(&mut store);
        if let Some(err) = frame.save_error {
            eprintln!("warning: progress not saved: {err}");
        }
        for event in &frame.events {
            match event {
                GameEvent::LevelStarted { music_track, .. } => {
                    log::debug!("Music track {music_track}");
                }
                GameEvent::CoinCollected { total, .. } => println!("coin! ({total})"),
                GameEvent::LevelWon {
                    score,
                    currency_collected,
                    ..
                } => println!("WON  score {score}, coins {currency_collected}"),
                GameEvent::LevelLost {
                    score,
                    currency_collected,
                    cause,
                    ..
                } => println!("LOST ({cause:?}) score {score}, coins {currency_collected}"),
                GameEvent::Paused | GameEvent::Resumed => {}
            }
        }
        if session.status() != SessionStatus::Running {
            break;
        }
    }

    if session.is_running() {
        println!("Gave up after {max_ticks} ticks");
    }
    println!("Balance: {} coins", store.balance());
    Ok(())
}

fn show_balance(settings: &Settings) -> Result<(), Error> {
    let store = open_store(settings)?;
    println!("Balance: {} coins", store.balance());
    for status in store.sets()? {
        let owned = if status.owned { "owned" } else { "" };
        println!("  {:<10} {:>4}  {}", status.set.id, status.cost, owned);
    }
    Ok(())
}

fn buy(settings: &Settings, set: &str) -> Result<(), Error> {
    let mut store = open_store(settings)?;
    match store.purchase_set(set)? {
        PurchaseResult::Ok => println!("Bought {set}. Balance: {} coins", store.balance()),
        PurchaseResult::InsufficientFunds => println!("Not enough coins for {set}"),
        PurchaseResult::AlreadyOwned => println!("{set} is already owned"),
        PurchaseResult::UnknownSet => println!("No set named {set}"),
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = Settings::load(&args.settings);
    let result = match args.command {
        Command::Levels => list_levels(&settings),
        Command::Play {
            level,
            jump_at,
            max_ticks,
            seed,
            coin_rain,
        } => {
            settings.coin_rain |= coin_rain;
            play(&settings, &level, &jump_at, max_ticks, seed.unwrap_or_else(clock_seed))
        }
        Command::Balance => show_balance(&settings),
        Command::Buy { set } => buy(&settings, &set),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
