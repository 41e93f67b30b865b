/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;
use unitdb::{Catalogue, Measurement, UnitError};

#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
/// Unit Converter
///
/// Evaluates a unit expression against a Frink-style unit database and
/// optionally converts the result to another unit.
struct Args {
    /// Increase verbosity. Log messages are sent to stderr.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbosity: u8,
    /// Output the result as JSON.
    #[clap(long)]
    json: bool,
    /// The unit database to load.
    #[clap(short = 'd', long)]
    database: PathBuf,
    /// The expression to evaluate, e.g. "8 yd^2".
    expr: String,
    /// The unit expression to convert to, e.g. "m^2".
    #[clap(short = 't', long)]
    to: Option<String>,
}

impl Args {
    fn init_logger(&self) {
        if let Err(e) = simplelog::TermLogger::init(
            match self.verbosity {
                0 => simplelog::LevelFilter::Warn,
                1 => simplelog::LevelFilter::Info,
                2 => simplelog::LevelFilter::Debug,
                3.. => simplelog::LevelFilter::Trace,
            },
            simplelog::Config::default(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        ) {
            eprintln!("Error: failed to initialize logging: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();
    args.init_logger();

    let text = match fs::read_to_string(&args.database) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}: {}", args.database.display(), e);
            process::exit(1)
        }
    };

    let catalogue = match Catalogue::try_parse(&text) {
        Some(catalogue) => catalogue,
        None => {
            eprintln!(
                "Error: {}: no usable unit definitions",
                args.database.display()
            );
            process::exit(1)
        }
    };

    match convert(&catalogue, &args.expr, args.to.as_deref()) {
        Ok(result) if args.json => match serde_json::to_string(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                process::exit(1)
            }
        },
        Ok(result) => match result.value().is_decimal() {
            true => println!("{}", result),
            false => println!("{} (≈ {})", result, result.value().to_f64()),
        },
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1)
        }
    }
}

fn convert(
    catalogue: &Catalogue,
    expr: &str,
    to: Option<&str>,
) -> Result<Measurement, UnitError> {
    let value = catalogue.evaluate(expr)?;
    match to {
        Some(to) => value.convert_to(&catalogue.unit(to)?),
        None => Ok(value),
    }
}
