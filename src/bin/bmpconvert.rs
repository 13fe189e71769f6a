//! bmpconvert - rotate, crop and invert BMP files
//!
//! Commands keep their traditional single-dash spelling (`-rotate`, `-cut`,
//! ...); the plain spelling works too.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};

use bmpxform::{Bitmap, Point};

/// Rotate, crop and invert BMP images without leaving their pixel format.
#[derive(Parser, Debug)]
#[command(name = "bmpconvert")]
#[command(version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    bmpconvert -info photo.bmp
    bmpconvert -rotate -90 photo.bmp rotated.bmp
    bmpconvert -inverse photo.bmp negative.bmp
    bmpconvert -cut 10 10 99 59 photo.bmp cropped.bmp")]
struct Args {
    /// Log every decode, encode and transform step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print file size, dimensions and bit depth
    Info {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Rotate clockwise by a multiple of 90 degrees
    #[command(allow_negative_numbers = true)]
    Rotate {
        /// Degrees; negative values rotate counter-clockwise
        degrees: i32,
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// Complement every color
    Inverse {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// Keep the inclusive rectangle (x0, y0)-(x1, y1), y counted from the top
    #[command(allow_negative_numbers = true)]
    Cut {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

const COMMANDS: &[&str] = &["info", "rotate", "inverse", "cut", "help"];

/// Map `-rotate` to `rotate` etc. Only the command position (the first
/// argument that isn't the verbose flag) is touched.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    let command = args
        .iter_mut()
        .skip(1)
        .find(|a| a.as_os_str() != "-v" && a.as_os_str() != "--verbose");
    if let Some(command) = command {
        let name = command.to_str().and_then(|s| s.strip_prefix('-'));
        if let Some(name) = name.filter(|n| COMMANDS.contains(n)) {
            *command = OsString::from(name);
        }
    }
    args
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn run(command: Command) -> bmpxform::Result<()> {
    match command {
        Command::Info { input } => {
            let bmp = Bitmap::open(&input)?;
            println!("{}", bmp.info());
        }
        Command::Rotate {
            degrees,
            input,
            output,
        } => {
            let mut bmp = Bitmap::open(&input)?;
            bmp.rotate(degrees)?;
            bmp.save(&output)?;
        }
        Command::Inverse { input, output } => {
            let mut bmp = Bitmap::open(&input)?;
            bmp.invert_colors();
            bmp.save(&output)?;
        }
        Command::Cut {
            x0,
            y0,
            x1,
            y1,
            input,
            output,
        } => {
            let mut bmp = Bitmap::open(&input)?;
            bmp.crop(Point::new(x0, y0), Point::new(x1, y1))?;
            bmp.save(&output)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_args(std::env::args_os()));

    if args.verbose && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
