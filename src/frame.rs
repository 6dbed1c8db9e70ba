use serde::Deserialize;

use crate::constants::GRID_SIZE;

/// Response body of `GET <base>/generate/{digit}`. A missing `images`
/// key decodes as an empty list, which the fallback logic treats the
/// same as `{"images": []}`.
#[derive(Debug, Deserialize)]
pub struct GeneratePayload {
    #[serde(default)]
    pub images: Vec<Vec<Vec<u8>>>,
}

/// One generated digit image: a 28x28 luminance map, immutable once
/// built. Rendered as opaque greyscale RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitFrame {
    pixels: Vec<u8>, // row-major, GRID_SIZE * GRID_SIZE
}

impl DigitFrame {
    /// Builds a frame from the row-major 2-D array (`rows[y][x]`) the
    /// backend returns. Any shape other than 28 rows of 28 columns is
    /// rejected.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, String> {
        if rows.len() != GRID_SIZE {
            return Err(format!("expected {} rows, got {}", GRID_SIZE, rows.len()));
        }
        let mut pixels = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != GRID_SIZE {
                return Err(format!("row {} has {} columns, expected {}", y, row.len(), GRID_SIZE));
            }
            pixels.extend_from_slice(row);
        }
        Ok(Self { pixels })
    }

    pub fn luminance(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * GRID_SIZE + x]
    }
}
