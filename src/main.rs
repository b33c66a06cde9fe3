use anyhow::Result;
use ardenvale::entities::class::PlayerClass;
use ardenvale::entities::player::Player;
use ardenvale::input;
use ardenvale::save::SaveManager;
use ardenvale::session::Session;
use ardenvale::world::content;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ardenvale", about = "A terminal souls-like RPG", version)]
struct Args {
    /// Directory for save files (defaults to the platform data directory).
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Ignore any existing save and start fresh.
    #[arg(long)]
    new_game: bool,

    /// Verbose logging to stderr.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    let save = match &args.save_dir {
        Some(dir) => SaveManager::with_dir(dir),
        None => SaveManager::new()?,
    };

    let (player, world) = if args.new_game {
        match new_game()? {
            Some(fresh) => fresh,
            None => return Ok(()),
        }
    } else {
        match save.load()? {
            Some(loaded) => {
                println!("Welcome back, {}.", loaded.0.name);
                loaded
            }
            None => match new_game()? {
                Some(fresh) => fresh,
                None => return Ok(()),
            },
        }
    };

    Session::new(player, world, save).run()
}

/// Character creation. Returns None if stdin closes before it finishes.
fn new_game() -> Result<Option<(Player, ardenvale::world::World)>> {
    println!("You wake in the ash with no memory of your name.");
    let name = loop {
        let Some(line) = input::read_line("What are you called? ")? else {
            return Ok(None);
        };
        if !line.is_empty() {
            break line;
        }
    };

    println!("And what were you, before?");
    for class in PlayerClass::ALL {
        let (s, d, i, f, v, e) = class.starting_stats();
        println!("  {:<10} str {s}  dex {d}  int {i}  fth {f}  vit {v}  end {e}", class.name());
    }
    let class = loop {
        let Some(line) = input::read_line("Choose a class: ")? else {
            return Ok(None);
        };
        if let Some(class) = PlayerClass::parse(&line) {
            break class;
        }
        println!("warrior, knight, pyromancer, or thief.");
    };

    let world = content::ardenvale();
    let player = Player::new(&name, class, content::STARTING_LOCATION);
    println!("So it begins, {} the {}.", player.name, class.name());
    Ok(Some((player, world)))
}
