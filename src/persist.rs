use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::info;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::OutputMode,
    sink::{ByteSink, ListingSink, RawSink},
};

/// Output name meaning "standard output".
pub const STDOUT: &str = "-";

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Files { palette: PathBuf, tiles: PathBuf },
}

/// Works out where the two sections go: `NAME.cgr`/`NAME.vra` in binary mode,
/// `NAME_cgram.asm`/`NAME_vram.asm` for listings, or a single standard output
/// stream for listings named `-`.
pub fn get_destination(output: &str, mode: OutputMode) -> Result<Destination> {
    match (output, mode) {
        (STDOUT, OutputMode::Listing) => Ok(Destination::Stdout),
        (STDOUT, OutputMode::Binary) => {
            bail!("Binary output needs a file name; it cannot be written to standard output.")
        }
        (name, OutputMode::Binary) => Ok(Destination::Files {
            palette: PathBuf::from(format!("{}.cgr", name)),
            tiles: PathBuf::from(format!("{}.vra", name)),
        }),
        (name, OutputMode::Listing) => Ok(Destination::Files {
            palette: PathBuf::from(format!("{}_cgram.asm", name)),
            tiles: PathBuf::from(format!("{}_vram.asm", name)),
        }),
    }
}

fn create(path: &Path, what: &str) -> Result<BufWriter<File>> {
    info!("Writing {} data to {}", what, path.display());
    let file = File::create(path)
        .with_context(|| format!("Could not open {} to write {} data", path.display(), what))?;
    Ok(BufWriter::new(file))
}

pub fn open_sink(destination: &Destination, mode: OutputMode) -> Result<Box<dyn ByteSink>> {
    match destination {
        Destination::Stdout => Ok(Box::new(ListingSink::new(io::stdout(), io::stdout()))),
        Destination::Files { palette, tiles } => {
            let palette_out = create(palette, "CGRAM")?;
            let tiles_out = create(tiles, "VRAM")?;
            Ok(match mode {
                OutputMode::Binary => Box::new(RawSink::new(palette_out, tiles_out)),
                OutputMode::Listing => Box::new(ListingSink::new(palette_out, tiles_out)),
            })
        }
    }
}
