use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;

use crate::error::{ContrastError, Result};

/// Sample layout of a binary PNM container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnmFormat {
    /// `P5`: one byte per pixel.
    Gray,
    /// `P6`: three interleaved bytes per pixel.
    Rgb,
}

impl PnmFormat {
    pub fn channels(self) -> usize {
        match self {
            PnmFormat::Gray => 1,
            PnmFormat::Rgb => 3,
        }
    }

    pub fn type_digit(self) -> u32 {
        match self {
            PnmFormat::Gray => 5,
            PnmFormat::Rgb => 6,
        }
    }

    fn from_type_digit(digit: u32) -> Result<Self> {
        match digit {
            5 => Ok(PnmFormat::Gray),
            6 => Ok(PnmFormat::Rgb),
            other => Err(ContrastError::UnsupportedType(other)),
        }
    }
}

/// A decoded binary PNM image.
///
/// `data` holds exactly `width * height * channels` raw samples;
/// `max_value` is the declared peak sample value, carried through unchanged.
#[derive(Clone, Debug)]
pub struct Picture {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
    pub data: Vec<u8>,
}

impl Picture {
    /// Read and decode a binary PNM file.
    ///
    /// The file is memory-mapped; the header is an ASCII magic (`P5`/`P6`)
    /// followed by whitespace-separated `width height max_value`, then
    /// exactly one whitespace byte, then the raw samples.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let map = unsafe { Mmap::map(&file)? };

        if map.len() < 2 || map[0] != b'P' || !map[1].is_ascii_digit() {
            return Err(ContrastError::BadMagic);
        }
        let format = PnmFormat::from_type_digit(u32::from(map[1] - b'0'))?;

        let mut header = HeaderCursor {
            bytes: &map,
            pos: 2,
        };
        let width = header.read_u32("width")?;
        let height = header.read_u32("height")?;
        let max_value = header.read_u32("max value")?;

        if width == 0 || height == 0 {
            return Err(ContrastError::InvalidDimensions { width, height });
        }

        // Exactly one whitespace byte separates the header from the samples.
        if header.pos >= map.len() || !map[header.pos].is_ascii_whitespace() {
            return Err(ContrastError::MalformedHeader(
                "missing sample separator".into(),
            ));
        }
        let data_start = header.pos + 1;

        let size = width as usize * height as usize * format.channels();
        let available = map.len().saturating_sub(data_start);
        if available < size {
            return Err(ContrastError::TruncatedData {
                expected: size,
                actual: available,
            });
        }

        Ok(Self {
            format,
            width,
            height,
            max_value,
            data: map[data_start..data_start + size].to_vec(),
        })
    }

    /// Serialize back to a binary PNM file.
    ///
    /// The output file is only created here, after processing succeeded.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write!(
            out,
            "P{}\n{} {}\n{}\n",
            self.format.type_digit(),
            self.width,
            self.height,
            self.max_value
        )?;
        out.write_all(&self.data)?;
        out.flush()?;
        Ok(())
    }

    /// Pixel count, which is also the per-channel sample count.
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

struct HeaderCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl HeaderCursor<'_> {
    /// Skip leading whitespace and parse one unsigned decimal field.
    fn read_u32(&mut self, field: &str) -> Result<u32> {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(ContrastError::MalformedHeader(format!("missing {field}")));
        }

        let mut value: u32 = 0;
        for &digit in &self.bytes[start..self.pos] {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(digit - b'0')))
                .ok_or_else(|| {
                    ContrastError::MalformedHeader(format!("{field} out of range"))
                })?;
        }
        Ok(value)
    }
}
