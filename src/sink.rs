//! Rendering of finished palette and tile data.

use std::io::{self, Write};

use crate::{helpers::write_listing, palette::Palette};

pub const PALETTE_DIRECTIVE: &str = ".dw";
pub const TILE_DIRECTIVE: &str = ".db";
pub const PALETTE_WORDS_PER_LINE: usize = 8;
pub const TILE_BYTES_PER_LINE: usize = 16;

pub trait ByteSink {
    fn emit_palette(&mut self, palette: &Palette) -> io::Result<()>;
    fn emit_tiles(&mut self, vram: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Raw CGRAM words (little-endian) and VRAM bytes.
pub struct RawSink<P: Write, T: Write> {
    palette_out: P,
    tiles_out: T,
}

impl<P: Write, T: Write> RawSink<P, T> {
    pub fn new(palette_out: P, tiles_out: T) -> Self {
        Self {
            palette_out,
            tiles_out,
        }
    }

    pub fn into_inner(self) -> (P, T) {
        (self.palette_out, self.tiles_out)
    }
}

impl<P: Write, T: Write> ByteSink for RawSink<P, T> {
    fn emit_palette(&mut self, palette: &Palette) -> io::Result<()> {
        self.palette_out.write_all(&palette.to_le_bytes())
    }

    fn emit_tiles(&mut self, vram: &[u8]) -> io::Result<()> {
        self.tiles_out.write_all(vram)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.palette_out.flush()?;
        self.tiles_out.flush()
    }
}

/// WLA-DX assembler listing: `.dw $XXXX, ...` for the palette and
/// `.db $XX, ...` for the tiles.
pub struct ListingSink<P: Write, T: Write> {
    palette_out: P,
    tiles_out: T,
}

impl<P: Write, T: Write> ListingSink<P, T> {
    pub fn new(palette_out: P, tiles_out: T) -> Self {
        Self {
            palette_out,
            tiles_out,
        }
    }

    pub fn into_inner(self) -> (P, T) {
        (self.palette_out, self.tiles_out)
    }
}

impl<P: Write, T: Write> ByteSink for ListingSink<P, T> {
    fn emit_palette(&mut self, palette: &Palette) -> io::Result<()> {
        write_listing(
            &mut self.palette_out,
            PALETTE_DIRECTIVE,
            &palette.words(),
            PALETTE_WORDS_PER_LINE,
            |w| format!("${:04X}", w),
        )
    }

    fn emit_tiles(&mut self, vram: &[u8]) -> io::Result<()> {
        write_listing(
            &mut self.tiles_out,
            TILE_DIRECTIVE,
            vram,
            TILE_BYTES_PER_LINE,
            |b| format!("${:02X}", b),
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.palette_out.flush()?;
        self.tiles_out.flush()
    }
}
