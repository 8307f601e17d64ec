use clap::Parser;
use colored::Colorize;
use failure::Error;
use log::{error, info};
use ride_queue::config::{self, ParkConfig};
use ride_queue::demo::{menu, Demo, Routine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "ride_config.json";

#[derive(Parser)]
#[command(name = "ride_queue")]
#[command(about = "Theme park ride queue and history management")]
struct Cli {
    /// JSON scenario file, the built in scenario is used when it does not exist
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// File the export and import routines share
    #[arg(long)]
    export_path: Option<String>,

    /// Run a single routine (1-7) instead of the interactive menu
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=7))]
    demo: Option<u32>,

    /// Plain output without terminal colors
    #[arg(long)]
    no_color: bool,
}

fn get_config(cli: &Cli) -> Result<ParkConfig, Error> {
    let mut config = if cli.config.exists() {
        info!("loading scenario from {}", cli.config.display());
        config::load_config(&cli.config)?
    } else {
        info!("{} not found, using the built in scenario", cli.config.display());
        ParkConfig::default()
    };

    if let Some(path) = &cli.export_path {
        config.export_path = path.clone();
    }

    config::validate_config(&config)?;

    Ok(config)
}

fn run_menu(demo: &Demo) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", menu());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match line.trim().parse::<u32>() {
            Ok(0) => break,
            Ok(choice) => match Routine::from_choice(choice) {
                Some(routine) => demo.run(routine),
                None => println!("{}", "Invalid choice, please try again!".yellow()),
            },
            Err(_) => println!("{}", "Invalid choice, please try again!".yellow()),
        }
    }

    println!("Leaving the system, thank you!");

    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let demo = Demo::new(get_config(&cli)?);

    match cli.demo {
        Some(0) => Ok(()),
        Some(choice) => {
            if let Some(routine) = Routine::from_choice(choice) {
                demo.run(routine);
            }
            Ok(())
        }
        None => run_menu(&demo),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        for cause in e.iter_causes() {
            error!("caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
