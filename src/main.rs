//! Binary entrypoint for the Veilspire CLI.
//!
//! Commands:
//! - `play [--quiet]` - run the game (default when no subcommand is given)
//! - `init` - create a starter `veilspire.toml`
//! - `status` - print save-file location and a brief summary
//! - `reset` - delete the save file
//!
//! See the library crate docs for module-level details: `veilspire::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use veilspire::animation::ConsoleAnimator;
use veilspire::config::Config;
use veilspire::game::{SaveStore, Session};

#[derive(Parser)]
#[command(name = "veilspire")]
#[command(about = "Veilspire: Shattered Legacy - a terminal text adventure")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "veilspire.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the game
    Play {
        /// Skip animations (text only)
        #[arg(short, long)]
        quiet: bool,
    },
    /// Initialize a starter configuration file
    Init,
    /// Show save-file status
    Status,
    /// Delete the save file
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config is optional for every command; defaults apply when the file is
    // absent or unreadable.
    let config = if matches!(&cli.command, Some(Commands::Init)) {
        None
    } else {
        Config::load(&cli.config).await.ok()
    };
    init_logging(&config, cli.verbose);

    match cli.command.unwrap_or(Commands::Play { quiet: false }) {
        Commands::Play { quiet } => {
            let config = config.unwrap_or_default();
            info!("Starting Veilspire v{}", env!("CARGO_PKG_VERSION"));
            let animator = ConsoleAnimator::new(
                config.animation.enabled && !quiet,
                config.animation.speed,
            );
            let mut session = Session::new(config, animator);
            session.run().await?;
        }
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            println!("Created {}", cli.config);
        }
        Commands::Status => {
            let config = config.unwrap_or_default();
            let store = SaveStore::new(config.save.dir.map(Into::into));
            println!("Save file: {}", store.path().display());
            if !store.exists() {
                println!("No saved adventure found.");
                return Ok(());
            }
            match store.load() {
                Ok(player) => {
                    println!("Room: {}", player.current_room);
                    println!("Health: {}/{}", player.health, player.max_health);
                    println!("Enemies defeated: {}", player.enemies_defeated);
                    println!(
                        "Score: {}",
                        player.score.as_ref().map(|s| s.total).unwrap_or(0)
                    );
                    println!(
                        "Status: {}",
                        if player.has_won {
                            "victorious"
                        } else if player.is_dead {
                            "fallen"
                        } else {
                            "adventuring"
                        }
                    );
                }
                Err(e) => println!("Save file unreadable: {}", e),
            }
        }
        Commands::Reset => {
            let config = config.unwrap_or_default();
            let store = SaveStore::new(config.save.dir.map(Into::into));
            if store.delete()? {
                info!("save file removed: {}", store.path().display());
                println!("Save file deleted.");
            } else {
                println!("No save file to delete.");
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level.parse().unwrap_or(log::LevelFilter::Warn))
            .unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));

            // When stdout is a terminal, keep log lines on the console too;
            // otherwise the file is the only sink so game text stays clean.
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
