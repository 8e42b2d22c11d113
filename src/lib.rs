//! Conversion of indexed PNG images to SNES CGRAM (palette) and VRAM (planar
//! tile) data.

pub mod common;
pub mod config;
pub mod convert;
pub mod error;
pub mod helpers;
pub mod import;
pub mod layout;
pub mod palette;
pub mod persist;
pub mod sink;
pub mod tile;

pub use common::{BitplaneCount, Color, PixelIndexMatrix, Tile, TileSize};
pub use config::{Config, OutputMode};
pub use convert::{convert_image, encode_tiles, CodecConfig, Conversion};
pub use error::CodecError;
pub use import::{DecodeError, IndexedImage};
