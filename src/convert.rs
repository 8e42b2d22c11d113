use log::{info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::{
    common::{BitplaneCount, PixelIndexMatrix, TileSize},
    error::CodecError,
    import::IndexedImage,
    layout::TileLayout,
    palette::{convert_palette, DuplicateColor, Palette},
    tile::encode_tile_into,
};

/// Settings that shape the palette and tile data.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    /// Derived from the source bit depth when unset.
    pub bitplanes: Option<BitplaneCount>,
    pub tile_size: TileSize,
    /// Zero-extend the palette to this many colors.
    pub palette_size: Option<usize>,
    /// Include the backdrop color (index 0) in the duplicate color check.
    pub check_index_zero: bool,
}

pub struct Conversion {
    pub palette: Palette,
    pub duplicates: Vec<DuplicateColor>,
    pub bitplanes: BitplaneCount,
    pub vram: Vec<u8>,
}

pub fn convert_image(image: &IndexedImage, config: &CodecConfig) -> Result<Conversion, CodecError> {
    let tile_size = config.tile_size.pixels();
    info!("Using {0}x{0} tiles", tile_size);

    let bitplanes = match config.bitplanes {
        Some(bitplanes) => {
            info!("Using {} bitplanes", bitplanes.planes());
            bitplanes
        }
        None => {
            // Indexed PNGs never exceed 8 bits per pixel.
            let bitplanes =
                BitplaneCount::for_bit_depth(image.bit_depth).unwrap_or(BitplaneCount::Eight);
            info!("Assuming {} bitplanes", bitplanes.planes());
            bitplanes
        }
    };

    info!("Palette contains {} colors", image.colors.len());
    let converted = convert_palette(&image.colors, config.palette_size, config.check_index_zero)?;
    for dup in &converted.duplicates {
        warn!(
            "Found duplicate colors {} and {} (${:04X})",
            dup.index, dup.earlier_index, dup.value.0
        );
    }
    info!("CGRAM section is {} bytes long", converted.palette.len() * 2);

    let matrix = &image.matrix;
    info!(
        "Image size is {}x{}, bit depth is {}",
        matrix.width(),
        matrix.height(),
        image.bit_depth
    );
    let vram = encode_tiles(matrix, config.tile_size, bitplanes)?;
    info!("VRAM section is {} bytes long", vram.len());

    Ok(Conversion {
        palette: converted.palette,
        duplicates: converted.duplicates,
        bitplanes,
        vram,
    })
}

/// Encodes every 8x8 block of `matrix` and places it according to the tile layout.
/// Slots the layout leaves unused stay zero.
pub fn encode_tiles(
    matrix: &PixelIndexMatrix,
    tile_size: TileSize,
    bitplanes: BitplaneCount,
) -> Result<Vec<u8>, CodecError> {
    let layout = TileLayout::new(matrix.width(), matrix.height(), tile_size, bitplanes);
    info!("Tile count: {}", layout.tile_count());

    let bytes_per_tile = layout.bytes_per_tile();
    let mut vram = vec![0; layout.vram_size()];
    for placement in layout.placements() {
        let tile = matrix.tile(placement.tile_x, placement.tile_y)?;
        trace!(
            "Tile ({}, {}): number {}, offset {}",
            placement.tile_x,
            placement.tile_y,
            placement.tile_number,
            placement.offset
        );
        let out = &mut vram[placement.offset..placement.offset + bytes_per_tile];
        encode_tile_into(&tile, bitplanes, out);
    }
    Ok(vram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::Color, tile::decode_tile};
    use rstest::rstest;

    // Every 8x8 block is filled with its own block number (raster order).
    fn numbered_blocks(width: usize, height: usize) -> PixelIndexMatrix {
        let blocks_wide = width / 8;
        let indices = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                ((y / 8) * blocks_wide + x / 8) as u8
            })
            .collect();
        PixelIndexMatrix::new(width, height, indices).unwrap()
    }

    fn tile_at(vram: &[u8], number: usize, bitplanes: BitplaneCount) -> u8 {
        let size = bitplanes.bytes_per_tile();
        let tile = decode_tile(&vram[number * size..(number + 1) * size], bitplanes);
        assert!(tile.iter().flatten().all(|&c| c == tile[0][0]));
        tile[0][0]
    }

    #[test]
    fn small_tiles_follow_image_order() {
        let matrix = numbered_blocks(24, 16);
        let vram = encode_tiles(&matrix, TileSize::Small, BitplaneCount::Eight).unwrap();
        assert_eq!(vram.len(), 6 * 64);
        for n in 0..6 {
            assert_eq!(tile_at(&vram, n, BitplaneCount::Eight), n as u8);
        }
    }

    #[test]
    fn large_tile_quadrants_land_at_hardware_addresses() {
        // One 16x16 tile made of four distinct blocks, numbered 0..4.
        let matrix = numbered_blocks(16, 16);
        let vram = encode_tiles(&matrix, TileSize::Large, BitplaneCount::Four).unwrap();
        assert_eq!(vram.len(), 32 * 32);

        let n = TileLayout::large_tile_base(0);
        assert_eq!(n, 0);
        assert_eq!(tile_at(&vram, n, BitplaneCount::Four), 0);
        assert_eq!(tile_at(&vram, n + 1, BitplaneCount::Four), 1);
        assert_eq!(tile_at(&vram, n + 16, BitplaneCount::Four), 2);
        assert_eq!(tile_at(&vram, n + 17, BitplaneCount::Four), 3);
    }

    #[test]
    fn ninth_large_tile_starts_next_bank() {
        // 9 large tiles in a row: 18x2 blocks numbered up to 35.
        let matrix = numbered_blocks(144, 16);
        let vram = encode_tiles(&matrix, TileSize::Large, BitplaneCount::Eight).unwrap();
        assert_eq!(vram.len(), 64 * 64);

        // Large tile 8 covers blocks (16, 0), (17, 0), (16, 1), (17, 1).
        assert_eq!(tile_at(&vram, 32, BitplaneCount::Eight), 16);
        assert_eq!(tile_at(&vram, 33, BitplaneCount::Eight), 17);
        assert_eq!(tile_at(&vram, 48, BitplaneCount::Eight), 18 + 16);
        assert_eq!(tile_at(&vram, 49, BitplaneCount::Eight), 18 + 17);

        // Padding after the last large tile is zero.
        assert!(vram[34 * 64..48 * 64].iter().all(|&b| b == 0));
        assert!(vram[50 * 64..].iter().all(|&b| b == 0));
    }

    #[rstest]
    #[case::small_width(TileSize::Small, 20, 16)]
    #[case::small_height(TileSize::Small, 16, 12)]
    #[case::large_width(TileSize::Large, 24, 16)]
    #[case::large_height(TileSize::Large, 32, 8)]
    fn partial_tiles_are_rejected(
        #[case] tile_size: TileSize,
        #[case] width: usize,
        #[case] height: usize,
    ) {
        let matrix = PixelIndexMatrix::new(width, height, vec![0; width * height]).unwrap();
        assert!(matches!(
            encode_tiles(&matrix, tile_size, BitplaneCount::Two),
            Err(CodecError::OutOfBounds { .. })
        ));
    }

    fn image(bit_depth: u8, colors: usize) -> IndexedImage {
        IndexedImage {
            matrix: numbered_blocks(16, 8),
            colors: vec![Color::new(255, 255, 255); colors],
            bit_depth,
        }
    }

    #[rstest]
    #[case::one_bit(1, BitplaneCount::Two)]
    #[case::four_bit(4, BitplaneCount::Four)]
    #[case::eight_bit(8, BitplaneCount::Eight)]
    fn bitplanes_default_to_source_depth(#[case] depth: u8, #[case] expected: BitplaneCount) {
        let conversion = convert_image(&image(depth, 2), &CodecConfig::default()).unwrap();
        assert_eq!(conversion.bitplanes, expected);
        assert_eq!(conversion.vram.len(), 2 * expected.bytes_per_tile());
    }

    #[test]
    fn configured_values_are_used() {
        let config = CodecConfig {
            bitplanes: Some(BitplaneCount::Four),
            palette_size: Some(16),
            ..Default::default()
        };
        let conversion = convert_image(&image(8, 3), &config).unwrap();
        assert_eq!(conversion.bitplanes, BitplaneCount::Four);
        assert_eq!(conversion.palette.len(), 16);
        assert_eq!(conversion.duplicates.len(), 1);
        assert_eq!(conversion.vram.len(), 2 * 32);
    }

    #[test]
    fn palette_overflow_produces_nothing() {
        let config = CodecConfig {
            palette_size: Some(2),
            ..Default::default()
        };
        assert_eq!(
            convert_image(&image(2, 4), &config).err(),
            Some(CodecError::PaletteOverflow { colors: 4, size: 2 })
        );
    }
}
