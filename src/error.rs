use thiserror::Error;

/// Failures raised by the palette and tile codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("palette contains {colors} colors, which does not fit in a palette of {size}")]
    PaletteOverflow { colors: usize, size: usize },

    #[error("tile ({tile_x}, {tile_y}) extends past the edge of the {width}x{height} image")]
    OutOfBounds {
        tile_x: usize,
        tile_y: usize,
        width: usize,
        height: usize,
    },

    #[error("{width}x{height} pixel matrix built from {actual} indices")]
    MatrixSize {
        width: usize,
        height: usize,
        actual: usize,
    },
}
