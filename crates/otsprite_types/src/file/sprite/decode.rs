//! Sprite pixel decompression.
//!
//! Decoding never fails. Payloads read from damaged containers are expanded as
//! far as their records allow and the remainder of the tile is left
//! transparent.

use super::constants::{BYTES_PER_PIXEL, PIXEL_COUNT, PIXELS_DATA_SIZE};

/// Size of a record header: transparent count + colored count
const RECORD_HEADER_SIZE: usize = 4;

#[inline]
fn read_u16(data: &[u8], offset: usize) -> usize {
	u16::from_le_bytes([data[offset], data[offset + 1]]) as usize
}

/// Expands a transparency-run payload into a `B, G, R, A` tile.
///
/// The result is always [`PIXELS_DATA_SIZE`] bytes. Without `keep_alpha`
/// every colored pixel is fully opaque.
pub fn decompress(data: &[u8], keep_alpha: bool) -> Vec<u8> {
	let stride = if keep_alpha {
		4
	} else {
		3
	};

	let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
	let mut read = 0;
	let mut written = 0;

	while read + RECORD_HEADER_SIZE <= data.len() && written < PIXEL_COUNT {
		let transparent = read_u16(data, read);
		let colored = read_u16(data, read + 2);
		read += RECORD_HEADER_SIZE;

		// Transparent pixels are already zero
		written = (written + transparent).min(PIXEL_COUNT);

		for _ in 0..colored {
			if written >= PIXEL_COUNT || read + stride > data.len() {
				return pixels;
			}

			let offset = written * BYTES_PER_PIXEL;
			pixels[offset] = data[read + 2];
			pixels[offset + 1] = data[read + 1];
			pixels[offset + 2] = data[read];
			pixels[offset + 3] = if keep_alpha {
				data[read + 3]
			} else {
				0xFF
			};

			read += stride;
			written += 1;
		}
	}

	pixels
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_payload_is_blank() {
		let pixels = decompress(&[], false);
		assert_eq!(pixels.len(), PIXELS_DATA_SIZE);
		assert!(pixels.iter().all(|&b| b == 0));
	}

	#[test]
	fn test_opaque_record() {
		let pixels = decompress(&[1, 0, 1, 0, 0x10, 0x20, 0x30], false);
		assert_eq!(&pixels[0..4], &[0, 0, 0, 0]);
		assert_eq!(&pixels[4..8], &[0x30, 0x20, 0x10, 0xFF]);
		assert!(pixels[8..].iter().all(|&b| b == 0));
	}

	#[test]
	fn test_alpha_record() {
		let pixels = decompress(&[0, 0, 1, 0, 0x10, 0x20, 0x30, 0x40], true);
		assert_eq!(&pixels[0..4], &[0x30, 0x20, 0x10, 0x40]);
	}

	#[test]
	fn test_truncated_payload() {
		// Claims two colored pixels but only carries one
		let pixels = decompress(&[0, 0, 2, 0, 1, 2, 3, 4, 5], false);
		assert_eq!(pixels.len(), PIXELS_DATA_SIZE);
		assert_eq!(&pixels[0..4], &[3, 2, 1, 0xFF]);
		assert!(pixels[4..].iter().all(|&b| b == 0));
	}

	#[test]
	fn test_counts_beyond_tile_are_clamped() {
		let pixels = decompress(&[0xFF, 0xFF, 0x01, 0x00, 9, 9, 9], false);
		assert!(pixels.iter().all(|&b| b == 0));
	}
}
