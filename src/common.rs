use serde::{Deserialize, Serialize};

use crate::error::CodecError;

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into the source palette (0-255)

pub const TILE_PIXELS: usize = 8;

// One base 8x8 tile of palette indices, stored row by row.
pub type Tile = [[ColorIdx; TILE_PIXELS]; TILE_PIXELS];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub red: ColorValue,
    pub green: ColorValue,
    pub blue: ColorValue,
}

impl Color {
    pub fn new(red: ColorValue, green: ColorValue, blue: ColorValue) -> Self {
        Self { red, green, blue }
    }
}

/// Number of bitplanes written per tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BitplaneCount {
    Two,
    Four,
    Eight,
}

impl BitplaneCount {
    pub fn planes(self) -> usize {
        match self {
            BitplaneCount::Two => 2,
            BitplaneCount::Four => 4,
            BitplaneCount::Eight => 8,
        }
    }

    /// Number of 16-byte plane-pair subtiles in one encoded tile.
    pub fn pairs(self) -> usize {
        self.planes() / 2
    }

    pub fn bytes_per_tile(self) -> usize {
        TILE_PIXELS * self.planes()
    }

    /// Default for a source image of the given bit depth: never fewer than 2 planes.
    pub fn for_bit_depth(bit_depth: u8) -> Option<Self> {
        match bit_depth {
            0..=2 => Some(BitplaneCount::Two),
            3 | 4 => Some(BitplaneCount::Four),
            5..=8 => Some(BitplaneCount::Eight),
            _ => None,
        }
    }
}

impl TryFrom<u8> for BitplaneCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(BitplaneCount::Two),
            4 => Ok(BitplaneCount::Four),
            8 => Ok(BitplaneCount::Eight),
            _ => Err(format!(
                "invalid bitplane count {} (possible values are 2, 4 and 8)",
                value
            )),
        }
    }
}

impl From<BitplaneCount> for u8 {
    fn from(value: BitplaneCount) -> Self {
        value.planes() as u8
    }
}

/// Granularity of the tiles handed to the hardware.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TileSize {
    #[default]
    Small,
    Large,
}

impl TileSize {
    pub fn pixels(self) -> usize {
        match self {
            TileSize::Small => 8,
            TileSize::Large => 16,
        }
    }
}

impl TryFrom<u8> for TileSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(TileSize::Small),
            16 => Ok(TileSize::Large),
            _ => Err(format!(
                "invalid tile size {} (possible values are 8 and 16)",
                value
            )),
        }
    }
}

impl From<TileSize> for u8 {
    fn from(value: TileSize) -> Self {
        value.pixels() as u8
    }
}

/// Decoded image as a row-major grid of palette indices, one byte per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelIndexMatrix {
    width: usize,
    height: usize,
    indices: Vec<ColorIdx>,
}

impl PixelIndexMatrix {
    pub fn new(width: usize, height: usize, indices: Vec<ColorIdx>) -> Result<Self, CodecError> {
        if width.checked_mul(height) != Some(indices.len()) {
            return Err(CodecError::MatrixSize {
                width,
                height,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> &[ColorIdx] {
        &self.indices[y * self.width..(y + 1) * self.width]
    }

    /// Slices out the 8x8 block whose top-left pixel is `(tile_x * 8, tile_y * 8)`.
    ///
    /// Partial blocks at the right or bottom edge are never clipped or padded;
    /// requesting one is an `OutOfBounds` error.
    pub fn tile(&self, tile_x: usize, tile_y: usize) -> Result<Tile, CodecError> {
        let out_of_bounds = CodecError::OutOfBounds {
            tile_x,
            tile_y,
            width: self.width,
            height: self.height,
        };
        let x = tile_x.checked_mul(TILE_PIXELS).ok_or(out_of_bounds.clone())?;
        let y = tile_y.checked_mul(TILE_PIXELS).ok_or(out_of_bounds.clone())?;
        let fits = |start: usize, limit: usize| {
            start
                .checked_add(TILE_PIXELS)
                .is_some_and(|end| end <= limit)
        };
        if !fits(x, self.width) || !fits(y, self.height) {
            return Err(out_of_bounds);
        }

        let mut tile: Tile = [[0; TILE_PIXELS]; TILE_PIXELS];
        for (k, tile_row) in tile.iter_mut().enumerate() {
            tile_row.copy_from_slice(&self.row(y + k)[x..x + TILE_PIXELS]);
        }
        Ok(tile)
    }
}
