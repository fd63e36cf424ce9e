use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use svgplot::{convert, OrderingStrategy};
use svgplot_config::{lk5_pro, load, to_yaml, ConfigError};

/// The segment-ordering strategy, as named on the command line. `TwoOpt`
/// is spelled `2opt` to match the plotter community's usual shorthand.
#[derive(Copy, Clone, Debug, ValueEnum)]
enum OrderingArg {
    #[value(name = "2opt")]
    TwoOpt,
    Greedy,
    Reverse,
    None,
}

impl From<OrderingArg> for OrderingStrategy {
    fn from(arg: OrderingArg) -> OrderingStrategy {
        match arg {
            OrderingArg::TwoOpt => OrderingStrategy::TwoOpt,
            OrderingArg::Greedy => OrderingStrategy::Greedy,
            OrderingArg::Reverse => OrderingStrategy::Reverse,
            OrderingArg::None => OrderingStrategy::Identity,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "svgplot",
    version,
    about = "Converts SVG shape and path documents into G-code motion programs for pen plotters."
)]
struct Cli {
    /// Log verbosity: 0=fatal-only 1=error 2=warn 3=info 4=debug
    #[arg(short = 'v', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=4))]
    verbosity: u8,

    /// Input SVG file; reads stdin when omitted
    #[arg(short = 's', long)]
    svg: Option<PathBuf>,

    /// Output G-code file; writes stdout when omitted
    #[arg(short = 'g', long)]
    gcode: Option<PathBuf>,

    /// YAML plotter profile; the built-in LK5 Pro profile is used when omitted
    #[arg(short = 'p', long = "plotter-config")]
    plotter_config: Option<PathBuf>,

    /// Print the built-in default plotter profile as YAML and exit
    #[arg(long)]
    plotter_config_template: bool,

    /// Segment-ordering strategy
    #[arg(short = 'o', long = "ordering-algoritm", value_enum, default_value = "2opt")]
    ordering_algoritm: OrderingArg,
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Off,
        1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn read_input(svg: Option<&PathBuf>) -> io::Result<String> {
    match svg {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_output(gcode: Option<&PathBuf>, text: &str) -> io::Result<()> {
    match gcode {
        Some(path) => fs::write(path, text),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}

fn load_profile(plotter_config: Option<&PathBuf>) -> Result<svgplot::PlotterConfig, String> {
    match plotter_config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("cannot read plotter profile '{}': {e}", path.display()))?;
            load(&text).map_err(|e: ConfigError| e.to_string())
        }
        None => {
            log::warn!("no --plotter-config supplied, using the built-in LK5 Pro default profile");
            Ok(lk5_pro())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbosity);

    if cli.plotter_config_template {
        match to_yaml(&lk5_pro()) {
            Ok(yaml) => {
                print!("{yaml}");
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("Fatal: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let profile = match load_profile(cli.plotter_config.as_ref()) {
        Ok(profile) => profile,
        Err(msg) => {
            eprintln!("Fatal: {msg}");
            return ExitCode::FAILURE;
        }
    };

    let svg_text = match read_input(cli.svg.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Fatal: cannot read input SVG: {e}");
            return ExitCode::FAILURE;
        }
    };

    let program = match convert(&svg_text, &profile, cli.ordering_algoritm.into()) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Fatal: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut text = program.code.join("\n");
    text.push('\n');

    if let Err(e) = write_output(cli.gcode.as_ref(), &text) {
        eprintln!("Fatal: cannot write output G-code: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
