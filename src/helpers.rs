use std::io::{self, Write};

use itertools::Itertools;

// Reinserts a 5-bit hardware channel at its original 8-bit position (low bits zero).
pub fn unscale_color(c: u8) -> u8 {
    (c & 0x1F) << 3
}

// Writes `values` as assembler directives, `per_line` values to a line. Each line
// starts with a newline and a tab; the listing always ends with a newline.
pub fn write_listing<W, T, F>(
    out: &mut W,
    directive: &str,
    values: &[T],
    per_line: usize,
    fmt: F,
) -> io::Result<()>
where
    W: Write + ?Sized,
    F: Fn(&T) -> String,
{
    for line in values.chunks(per_line) {
        write!(out, "\n\t{} {}", directive, line.iter().map(&fmt).join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}
