//! Placement of encoded 8x8 tiles within VRAM data.
//!
//! In 8x8 mode tiles are stored in raster order. In 16x16 mode the hardware
//! addresses tile `n` of a large tile as `{n, n + 1, n + 16, n + 17}`, so each
//! VRAM row of 16 base tiles holds the top halves of eight 16x16 tiles and the
//! following row holds their bottom halves. Large tiles are numbered in raster
//! order over the image and packed eight to a pair of VRAM rows.

use crate::common::{BitplaneCount, TileSize};

/// Base tiles in one VRAM row (a 128 pixel wide sheet).
pub const TILES_PER_ROW: usize = 16;

/// 16x16 tiles that fit side by side in one VRAM row.
pub const LARGE_TILES_PER_ROW: usize = TILES_PER_ROW / 2;

/// Where one 8x8 block of the image ends up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Block position in the image, in units of 8 pixels.
    pub tile_x: usize,
    pub tile_y: usize,
    /// Tile number in VRAM.
    pub tile_number: usize,
    /// Byte offset in VRAM.
    pub offset: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileLayout {
    tile_size: TileSize,
    bitplanes: BitplaneCount,
    // Image size in units of `tile_size`, rounded up.
    columns: usize,
    rows: usize,
}

impl TileLayout {
    /// Trailing partial tiles are counted, so that extracting them reports the
    /// image as out of bounds instead of silently dropping pixels.
    pub fn new(width: usize, height: usize, tile_size: TileSize, bitplanes: BitplaneCount) -> Self {
        let px = tile_size.pixels();
        Self {
            tile_size,
            bitplanes,
            columns: width.div_ceil(px),
            rows: height.div_ceil(px),
        }
    }

    pub fn bytes_per_tile(&self) -> usize {
        self.bitplanes.bytes_per_tile()
    }

    /// Number of `tile_size` tiles in the image.
    pub fn tile_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Number of 8x8 blocks in the image.
    pub fn block_count(&self) -> usize {
        match self.tile_size {
            TileSize::Small => self.tile_count(),
            TileSize::Large => self.tile_count() * 4,
        }
    }

    /// VRAM tile slots, including the unused slots after the last 16x16 tile.
    pub fn vram_tile_count(&self) -> usize {
        match self.tile_size {
            TileSize::Small => self.tile_count(),
            TileSize::Large => {
                self.tile_count().div_ceil(LARGE_TILES_PER_ROW) * TILES_PER_ROW * 2
            }
        }
    }

    pub fn vram_size(&self) -> usize {
        self.vram_tile_count() * self.bytes_per_tile()
    }

    /// First tile number of the 16x16 tile with raster index `k`.
    pub fn large_tile_base(k: usize) -> usize {
        let column = k % LARGE_TILES_PER_ROW;
        let row = k / LARGE_TILES_PER_ROW;
        row * TILES_PER_ROW * 2 + column * 2
    }

    /// Placements for every 8x8 block of the image, in image raster order of
    /// `tile_size` tiles (and top-left, top-right, bottom-left, bottom-right
    /// within a 16x16 tile).
    pub fn placements(&self) -> Vec<Placement> {
        let bytes_per_tile = self.bytes_per_tile();
        let mut placements = Vec::with_capacity(self.block_count());
        for y in 0..self.rows {
            for x in 0..self.columns {
                let k = y * self.columns + x;
                match self.tile_size {
                    TileSize::Small => placements.push(Placement {
                        tile_x: x,
                        tile_y: y,
                        tile_number: k,
                        offset: k * bytes_per_tile,
                    }),
                    TileSize::Large => {
                        let base = Self::large_tile_base(k);
                        for (dx, dy, step) in [(0, 0, 0), (1, 0, 1), (0, 1, 16), (1, 1, 17)] {
                            let tile_number = base + step;
                            placements.push(Placement {
                                tile_x: x * 2 + dx,
                                tile_y: y * 2 + dy,
                                tile_number,
                                offset: tile_number * bytes_per_tile,
                            });
                        }
                    }
                }
            }
        }
        placements
    }
}
