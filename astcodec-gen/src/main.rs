use std::{io::Write, path::PathBuf, process::ExitCode};

use astcodec_gen::{GenConfig, Generator};
use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record, error};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Generate astcodec encode/decode implementations for a set of structs
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to $ASTCODEC_GEN_CONFIG or ./astcodec-gen.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input Rust files, added to those of the configuration
    #[arg(short, long)]
    pub input: Vec<PathBuf>,

    /// Root types, added to those of the configuration
    #[arg(short, long)]
    pub root: Vec<String>,

    /// Output file (overrides the configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field manifest (overrides the configuration)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Print the generated code instead of writing any file
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Skip rustfmt on the output
    #[arg(long, default_value_t = false)]
    pub no_fmt: bool,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let color = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Cyan,
            Level::Trace => Color::Magenta,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_intense(true);

        let stderr = StandardStream::stderr(ColorChoice::Auto);
        let mut stderr = stderr.lock();
        // Nowhere left to report a failing stderr
        let _ = stderr.set_color(&spec);
        let _ = write!(stderr, "{:>5}", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, " {}", record.args());
    }

    fn flush(&self) {}
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

fn load_config(args: &Args) -> astcodec_gen::GenResult<GenConfig> {
    let path = args.config.clone().unwrap_or_else(GenConfig::default_path);
    let mut config = if args.config.is_some() || path.exists() {
        GenConfig::load(&path)?
    } else {
        GenConfig::default()
    };

    config.inputs.extend(args.input.iter().cloned());
    config.roots.extend(args.root.iter().cloned());
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(manifest) = &args.manifest {
        config.manifest = manifest.clone();
    }
    if args.no_fmt {
        config.rustfmt = false;
    }
    Ok(config)
}

fn run(args: &Args) -> astcodec_gen::GenResult<()> {
    let generator = Generator::new(load_config(args)?);
    let generated = generator.run()?;

    if args.dry_run {
        print!("{}", generated.code);
        return Ok(());
    }
    generator.write(&generated)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
