//! Conversion of 24-bit source colors to the 15-bit BGR format used by CGRAM.

use hashbrown::HashMap;

use crate::{
    common::{Color, ColorValue},
    error::CodecError,
    helpers::unscale_color,
};

/// Packed CGRAM color: `0bbbbbgg gggrrrrr`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HardwareColor(pub u16);

impl HardwareColor {
    pub fn red(self) -> ColorValue {
        (self.0 & 0x1F) as ColorValue
    }

    pub fn green(self) -> ColorValue {
        ((self.0 >> 5) & 0x1F) as ColorValue
    }

    pub fn blue(self) -> ColorValue {
        ((self.0 >> 10) & 0x1F) as ColorValue
    }

    /// Expands back to 8 bits per channel. Channels keep their top five bits only.
    pub fn to_color(self) -> Color {
        Color {
            red: unscale_color(self.red()),
            green: unscale_color(self.green()),
            blue: unscale_color(self.blue()),
        }
    }

    pub fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl From<Color> for HardwareColor {
    fn from(c: Color) -> Self {
        let (r, g, b) = (c.red as u16, c.green as u16, c.blue as u16);
        HardwareColor(((b & 0xF8) << 7) | ((g & 0xF8) << 2) | (r >> 3))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<HardwareColor>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn words(&self) -> Vec<u16> {
        self.colors.iter().map(|c| c.0).collect()
    }

    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_le_bytes()).collect()
    }
}

/// Two palette slots that quantize to the same hardware color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DuplicateColor {
    pub index: usize,
    pub earlier_index: usize,
    pub value: HardwareColor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertedPalette {
    pub palette: Palette,
    pub duplicates: Vec<DuplicateColor>,
}

/// Quantizes `colors` to hardware colors, keeping index order, and zero-extends the
/// result to `pad_to_size` entries when given.
///
/// Index 0 is the backdrop slot and is left out of the duplicate scan unless
/// `check_index_zero` is set.
pub fn convert_palette(
    colors: &[Color],
    pad_to_size: Option<usize>,
    check_index_zero: bool,
) -> Result<ConvertedPalette, CodecError> {
    let size = match pad_to_size {
        Some(size) if size < colors.len() => {
            return Err(CodecError::PaletteOverflow {
                colors: colors.len(),
                size,
            });
        }
        Some(size) => size,
        None => colors.len(),
    };

    let mut hw_colors: Vec<HardwareColor> = colors.iter().map(|&c| c.into()).collect();
    let duplicates = find_duplicates(&hw_colors, if check_index_zero { 0 } else { 1 });
    hw_colors.resize(size, HardwareColor::default());

    Ok(ConvertedPalette {
        palette: Palette { colors: hw_colors },
        duplicates,
    })
}

// Every pair i > j >= start with equal values, ordered by i then j.
fn find_duplicates(colors: &[HardwareColor], start: usize) -> Vec<DuplicateColor> {
    let mut seen: HashMap<HardwareColor, Vec<usize>> = HashMap::new();
    let mut duplicates = vec![];
    for (index, &value) in colors.iter().enumerate().skip(start) {
        let earlier = seen.entry(value).or_default();
        for &earlier_index in earlier.iter() {
            duplicates.push(DuplicateColor {
                index,
                earlier_index,
                value,
            });
        }
        earlier.push(index);
    }
    duplicates
}
