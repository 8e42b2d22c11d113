use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{error, LevelFilter};
use thiserror::Error;

use png2snes::{
    convert_image, import,
    persist::{get_destination, open_sink, to_json},
    BitplaneCount, CodecError, Config, DecodeError, OutputMode, TileSize,
};

/// Create SNES graphics from indexed PNG files
#[derive(Parser, Debug)]
#[command(name = "png2snes", version)]
struct Args {
    /// Indexed PNG image to convert
    #[arg(required_unless_present = "dump_config")]
    input_file: Option<PathBuf>,

    /// Output name, or "-" for standard output
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    output: String,

    /// Number of bitplanes to generate per tile (2, 4 or 8)
    #[arg(short, long, value_name = "PLANES", value_parser = parse_bitplanes)]
    bitplanes: Option<BitplaneCount>,

    /// Size of tiles to generate (8 or 16)
    #[arg(short, long = "tilesize", value_name = "SIZE", value_parser = parse_tile_size)]
    tile_size: Option<TileSize>,

    /// Pad the palette with black up to this many colors
    #[arg(short, long, value_name = "COLORS")]
    palette_size: Option<usize>,

    /// Write raw binary data instead of an assembler listing
    #[arg(long)]
    binary: bool,

    /// Also report colors that duplicate the backdrop color (index 0)
    #[arg(long)]
    check_index_zero: bool,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Produce more verbose output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_bitplanes(arg: &str) -> Result<BitplaneCount, String> {
    arg.parse::<u8>()
        .map_err(|_| format!("{} is not a number", arg))?
        .try_into()
}

fn parse_tile_size(arg: &str) -> Result<TileSize, String> {
    arg.parse::<u8>()
        .map_err(|_| format!("{} is not a number", arg))?
        .try_into()
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if self.binary {
            config.mode = OutputMode::Binary;
        }
        if let Some(bitplanes) = self.bitplanes {
            config.codec.bitplanes = Some(bitplanes);
        }
        if let Some(tile_size) = self.tile_size {
            config.codec.tile_size = tile_size;
        }
        if let Some(size) = self.palette_size {
            config.codec.palette_size = Some(size);
        }
        if self.check_index_zero {
            config.codec.check_index_zero = true;
        }
    }

    fn log_level(&self) -> Option<LevelFilter> {
        match (self.quiet, self.verbose) {
            (true, _) => Some(LevelFilter::Error),
            (false, 0) => None,
            (false, 1) => Some(LevelFilter::Debug),
            (false, _) => Some(LevelFilter::Trace),
        }
    }
}

#[derive(Error, Debug)]
#[error("invalid configuration")]
struct ConfigError;

fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<DecodeError>().is_some() {
        return 3;
    }
    match err.downcast_ref::<CodecError>() {
        Some(CodecError::PaletteOverflow { .. }) => 4,
        Some(CodecError::OutOfBounds { .. } | CodecError::MatrixSize { .. }) => 5,
        None if err.downcast_ref::<ConfigError>().is_some() => 6,
        None => 1,
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref()).context(ConfigError)?;
    args.apply(&mut config);
    if args.dump_config {
        println!("{}", to_json(&config)?);
        return Ok(());
    }

    let destination = get_destination(&args.output, config.mode).context(ConfigError)?;
    let input = args
        .input_file
        .as_deref()
        .context("No input file given.")?;
    let image = import::import(input)?;
    let conversion = convert_image(&image, &config.codec)?;

    let mut sink = open_sink(&destination, config.mode)?;
    sink.emit_palette(&conversion.palette)
        .context("Unable to write CGRAM data")?;
    sink.emit_tiles(&conversion.vram)
        .context("Unable to write VRAM data")?;
    sink.flush()?;
    Ok(())
}

pub fn main() -> ExitCode {
    let args = Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = args.log_level() {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
