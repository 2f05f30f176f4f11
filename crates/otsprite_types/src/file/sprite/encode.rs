//! Sprite pixel compression.
//!
//! ## Record Layout
//!
//! The tile is scanned pixel by pixel. Every record covers one run of
//! transparent pixels followed by one run of colored pixels:
//!
//! | Size          | Field                                          |
//! |---------------|------------------------------------------------|
//! | 2             | transparent pixel count (`u16`, little-endian) |
//! | 2             | colored pixel count (`u16`, little-endian)     |
//! | 3 or 4 × n    | `R, G, B` (+ `A` when alpha is kept) per pixel |
//!
//! A trailing transparent run is never written, so a fully transparent tile
//! compresses to an empty payload.

use crate::file::{FileType, OtFileError};

use super::constants::{BYTES_PER_PIXEL, PIXEL_COUNT, PIXELS_DATA_SIZE};

#[inline]
fn is_transparent(pixels: &[u8], index: usize) -> bool {
	pixels[index * BYTES_PER_PIXEL + 3] == 0
}

/// Compresses a `B, G, R, A` tile into the transparency-run encoding.
///
/// # Arguments
///
/// * `pixels` - Raw tile, exactly [`PIXELS_DATA_SIZE`] bytes
/// * `keep_alpha` - Whether colored pixels keep their alpha byte
///
/// # Errors
///
/// Returns [`OtFileError::InvalidPixelLength`] if `pixels` is not a full tile.
pub fn compress(pixels: &[u8], keep_alpha: bool) -> Result<Vec<u8>, OtFileError> {
	if pixels.len() != PIXELS_DATA_SIZE {
		return Err(OtFileError::InvalidPixelLength {
			file_type: FileType::Sprite,
			expected: PIXELS_DATA_SIZE,
			actual: pixels.len(),
		});
	}

	let mut output = Vec::new();
	let mut index = 0;

	while index < PIXEL_COUNT {
		let transparent_start = index;
		while index < PIXEL_COUNT && is_transparent(pixels, index) {
			index += 1;
		}

		if index == PIXEL_COUNT {
			break;
		}

		let transparent_count = (index - transparent_start) as u16;
		output.extend_from_slice(&transparent_count.to_le_bytes());

		// Colored count is patched once the run ends
		let colored_count_pos = output.len();
		output.extend_from_slice(&[0, 0]);

		let colored_start = index;
		while index < PIXEL_COUNT && !is_transparent(pixels, index) {
			let offset = index * BYTES_PER_PIXEL;
			output.push(pixels[offset + 2]); // red
			output.push(pixels[offset + 1]); // green
			output.push(pixels[offset]); // blue
			if keep_alpha {
				output.push(pixels[offset + 3]);
			}
			index += 1;
		}

		let colored_count = (index - colored_start) as u16;
		output[colored_count_pos..colored_count_pos + 2]
			.copy_from_slice(&colored_count.to_le_bytes());
	}

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_blank_tile_is_empty() {
		let pixels = vec![0u8; PIXELS_DATA_SIZE];
		assert!(compress(&pixels, false).unwrap().is_empty());
		assert!(compress(&pixels, true).unwrap().is_empty());
	}

	#[test]
	fn test_wrong_length_rejected() {
		let err = compress(&[0u8; 12], false).unwrap_err();
		assert!(matches!(
			err,
			OtFileError::InvalidPixelLength {
				expected: PIXELS_DATA_SIZE,
				actual: 12,
				..
			}
		));
	}

	#[test]
	fn test_single_run_layout() {
		let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
		// pixels 2 and 3 are opaque, stored as B, G, R, A
		pixels[8..12].copy_from_slice(&[0x30, 0x20, 0x10, 0xFF]);
		pixels[12..16].copy_from_slice(&[0x60, 0x50, 0x40, 0x80]);

		let opaque = compress(&pixels, false).unwrap();
		assert_eq!(opaque, vec![2, 0, 2, 0, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);

		let alpha = compress(&pixels, true).unwrap();
		assert_eq!(alpha, vec![2, 0, 2, 0, 0x10, 0x20, 0x30, 0xFF, 0x40, 0x50, 0x60, 0x80]);
	}

	#[test]
	fn test_colored_run_reaching_end() {
		let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
		let last = PIXELS_DATA_SIZE - BYTES_PER_PIXEL;
		pixels[last..].copy_from_slice(&[1, 2, 3, 0xFF]);

		let data = compress(&pixels, false).unwrap();
		assert_eq!(data.len(), 4 + 3);
		assert_eq!(u16::from_le_bytes([data[0], data[1]]) as usize, PIXEL_COUNT - 1);
		assert_eq!(u16::from_le_bytes([data[2], data[3]]), 1);
	}

	#[test]
	fn test_compress_is_deterministic() {
		let mut pixels: Vec<u8> = (0..PIXELS_DATA_SIZE).map(|i| (i % 251) as u8).collect();
		for (index, pixel) in pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
			pixel[3] = if index % 7 < 4 {
				0xFF
			} else {
				0
			};
		}

		assert_eq!(compress(&pixels, true).unwrap(), compress(&pixels, true).unwrap());
		assert_eq!(compress(&pixels, false).unwrap(), compress(&pixels, false).unwrap());
	}
}
