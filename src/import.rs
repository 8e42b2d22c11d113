use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use crate::common::{Color, ColorIdx, PixelIndexMatrix};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unable to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid PNG data: {0}")]
    Png(#[from] png::DecodingError),

    #[error("image is not palette-indexed (color type {0:?})")]
    NotIndexed(png::ColorType),

    #[error("image has no PLTE chunk")]
    MissingPalette,

    #[error("malformed pixel data: {0}")]
    Pixels(String),
}

/// A decoded palette-indexed image.
#[derive(Clone, Debug)]
pub struct IndexedImage {
    pub matrix: PixelIndexMatrix,
    pub colors: Vec<Color>,
    /// Bits per pixel in the source file (1, 2, 4 or 8).
    pub bit_depth: u8,
}

pub fn import(path: &Path) -> Result<IndexedImage, DecodeError> {
    info!("Importing from PNG at {}", path.display());
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_owned(),
        source,
    })?;
    decode_png(BufReader::new(file))
}

pub fn decode_png<R: Read>(r: R) -> Result<IndexedImage, DecodeError> {
    let mut decoder = png::Decoder::new(r);
    // Keep the raw indices; no palette expansion.
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let info = reader.info();
    if info.color_type != png::ColorType::Indexed {
        return Err(DecodeError::NotIndexed(info.color_type));
    }
    let plte = info.palette.as_ref().ok_or(DecodeError::MissingPalette)?;
    let colors: Vec<Color> = plte
        .chunks_exact(3)
        .map(|rgb| Color::new(rgb[0], rgb[1], rgb[2]))
        .collect();
    let bit_depth = info.bit_depth as u8;

    let mut data = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut data)?;
    let (width, height) = (frame.width as usize, frame.height as usize);
    debug!(
        "Decoded {}x{} frame, {} bytes per line",
        width, height, frame.line_size
    );

    let indices = unpack_rows(&data, width, height, frame.line_size, bit_depth)?;
    let matrix = PixelIndexMatrix::new(width, height, indices)
        .map_err(|e| DecodeError::Pixels(e.to_string()))?;
    Ok(IndexedImage {
        matrix,
        colors,
        bit_depth,
    })
}

// Expands packed rows of `bit_depth`-bit indices (leftmost pixel in the high bits)
// to one byte per pixel.
fn unpack_rows(
    data: &[u8],
    width: usize,
    height: usize,
    line_size: usize,
    bit_depth: u8,
) -> Result<Vec<ColorIdx>, DecodeError> {
    let depth = bit_depth as usize;
    if !matches!(depth, 1 | 2 | 4 | 8) {
        return Err(DecodeError::Pixels(format!(
            "unsupported bit depth {}",
            bit_depth
        )));
    }
    if data.len() < line_size * height || line_size * 8 < width * depth {
        return Err(DecodeError::Pixels(format!(
            "{} bytes is too short for {}x{} at {} bits per pixel",
            data.len(),
            width,
            height,
            bit_depth
        )));
    }

    let mask = ((1u16 << depth) - 1) as u8;
    let mut indices = Vec::with_capacity(width * height);
    for line in data.chunks(line_size).take(height) {
        for x in 0..width {
            let bit = x * depth;
            let shift = 8 - depth - bit % 8;
            indices.push((line[bit / 8] >> shift) & mask);
        }
    }
    Ok(indices)
}
