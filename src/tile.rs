//! Planar bitplane encoding of 8x8 tiles.
//!
//! An encoded tile is a run of 16-byte subtiles, one per pair of bitplanes,
//! lowest pair first. Within a subtile, byte `2 * row` carries the even plane of
//! the pair and byte `2 * row + 1` the odd plane. Column 0 is the most
//! significant bit of each byte.

use crate::common::{BitplaneCount, Tile, TILE_PIXELS};

/// Bytes in one plane-pair subtile.
pub const SUBTILE_SIZE: usize = 16;

/// Packs `tile` into `bitplanes.bytes_per_tile()` bytes.
///
/// Index bits above the requested plane count are dropped.
pub fn encode_tile(tile: &Tile, bitplanes: BitplaneCount) -> Vec<u8> {
    let mut data = vec![0; bitplanes.bytes_per_tile()];
    encode_tile_into(tile, bitplanes, &mut data);
    data
}

/// Same as [`encode_tile`], writing into `out`, which must be exactly one encoded
/// tile long. Previous contents are overwritten.
///
/// # Panics
///
/// Panics if `out.len()` is not `bitplanes.bytes_per_tile()`.
pub fn encode_tile_into(tile: &Tile, bitplanes: BitplaneCount, out: &mut [u8]) {
    assert_eq!(out.len(), bitplanes.bytes_per_tile());
    out.fill(0);
    for (row, pixels) in tile.iter().enumerate() {
        for (col, &c) in pixels.iter().enumerate() {
            let bit = 7 - col;
            for pair in 0..bitplanes.pairs() {
                let offset = pair * SUBTILE_SIZE + row * 2;
                let shift = pair * 2;
                out[offset] |= ((c >> shift) & 1) << bit;
                out[offset + 1] |= ((c >> (shift + 1)) & 1) << bit;
            }
        }
    }
}

/// Unpacks planar tile data back into palette indices.
///
/// # Panics
///
/// Panics if `data.len()` is not `bitplanes.bytes_per_tile()`.
pub fn decode_tile(data: &[u8], bitplanes: BitplaneCount) -> Tile {
    assert_eq!(data.len(), bitplanes.bytes_per_tile());
    let mut tile: Tile = [[0; TILE_PIXELS]; TILE_PIXELS];
    for y in 0..TILE_PIXELS {
        for x in 0..TILE_PIXELS {
            let mut c = 0;
            for pair in 0..bitplanes.pairs() {
                let offset = pair * SUBTILE_SIZE + y * 2;
                let c0 = (data[offset] >> (7 - x)) & 1;
                let c1 = (data[offset + 1] >> (7 - x)) & 1;
                c |= (c0 | (c1 << 1)) << (pair * 2);
            }
            tile[y][x] = c;
        }
    }
    tile
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tile_from_fn(f: impl Fn(usize, usize) -> u8) -> Tile {
        let mut tile: Tile = [[0; 8]; 8];
        for (y, row) in tile.iter_mut().enumerate() {
            for (x, c) in row.iter_mut().enumerate() {
                *c = f(x, y);
            }
        }
        tile
    }

    #[test]
    fn blank_tile_is_all_zero() {
        let tile: Tile = [[0; 8]; 8];
        assert_eq!(encode_tile(&tile, BitplaneCount::Two), vec![0; 16]);
    }

    #[test]
    fn solid_first_row_sets_both_planes() {
        let tile = tile_from_fn(|_, y| if y == 0 { 3 } else { 0 });
        let mut expected = vec![0; 16];
        expected[0] = 0xFF;
        expected[1] = 0xFF;
        assert_eq!(encode_tile(&tile, BitplaneCount::Two), expected);
    }

    #[test]
    fn column_zero_is_most_significant_bit() {
        let tile = tile_from_fn(|x, y| if x == 0 && y == 2 { 1 } else { 0 });
        let data = encode_tile(&tile, BitplaneCount::Two);
        assert_eq!(data[4], 0x80);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 1);

        let tile = tile_from_fn(|x, y| if x == 7 && y == 2 { 2 } else { 0 });
        let data = encode_tile(&tile, BitplaneCount::Two);
        assert_eq!(data[5], 0x01);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[rstest]
    #[case::plane2(0x04, 16)]
    #[case::plane3(0x08, 17)]
    #[case::plane4(0x10, 32)]
    #[case::plane5(0x20, 33)]
    #[case::plane6(0x40, 48)]
    #[case::plane7(0x80, 49)]
    fn high_planes_land_in_later_subtiles(#[case] color: u8, #[case] byte: usize) {
        let tile = tile_from_fn(|x, y| if x == 0 && y == 0 { color } else { 0 });
        let data = encode_tile(&tile, BitplaneCount::Eight);
        assert_eq!(data.len(), 64);
        assert_eq!(data[byte], 0x80);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[rstest]
    #[case::four(BitplaneCount::Four)]
    #[case::eight(BitplaneCount::Eight)]
    fn two_bit_tiles_match_across_depths(#[case] bitplanes: BitplaneCount) {
        let tile = tile_from_fn(|x, y| ((x * 3 + y) % 4) as u8);
        let small = encode_tile(&tile, BitplaneCount::Two);
        let large = encode_tile(&tile, bitplanes);
        assert_eq!(large.len(), bitplanes.bytes_per_tile());
        assert_eq!(&large[..16], &small[..]);
        assert!(large[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn excess_bits_are_truncated() {
        let tile = tile_from_fn(|x, _| (x * 37) as u8);
        let masked = tile_from_fn(|x, _| (x * 37) as u8 & 0x0F);
        assert_eq!(
            encode_tile(&tile, BitplaneCount::Four),
            encode_tile(&masked, BitplaneCount::Four)
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let tile = tile_from_fn(|x, y| (x * 8 + y) as u8);
        let first = encode_tile(&tile, BitplaneCount::Eight);
        let mut second = vec![0xAA; 64];
        encode_tile_into(&tile, BitplaneCount::Eight, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn decode_inverts_encode() {
        let tile = tile_from_fn(|x, y| (x * 8 + y) as u8 * 3);
        let data = encode_tile(&tile, BitplaneCount::Eight);
        assert_eq!(decode_tile(&data, BitplaneCount::Eight), tile);
    }

    #[test]
    #[should_panic]
    fn encode_into_short_buffer_panics() {
        let mut out = vec![0; 16];
        encode_tile_into(&[[0; 8]; 8], BitplaneCount::Four, &mut out);
    }

    #[test]
    #[should_panic]
    fn decode_wrong_length_panics() {
        decode_tile(&[0; 32], BitplaneCount::Two);
    }
}
