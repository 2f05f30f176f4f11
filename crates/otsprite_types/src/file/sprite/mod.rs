//! Sprite tiles and their pixel codec.
//!
//! A sprite is a 32×32 tile kept in memory as `B, G, R, A` bytes. On disk and
//! inside `.spr` containers only the compressed transparency-run form is
//! stored; see [`compress`] for the record layout.
//!
//! # Example
//!
//! ```no_run
//! use otsprite_types::file::sprite::{Sprite, constants::PIXELS_DATA_SIZE};
//!
//! let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
//! pixels[0..4].copy_from_slice(&[0x00, 0x00, 0xFF, 0xFF]); // red
//!
//! let sprite = Sprite::from_pixels(1, false, &pixels).unwrap();
//! assert_eq!(sprite.pixels(), pixels);
//! ```

mod decode;
mod encode;

pub use decode::decompress;
pub use encode::compress;

use crate::file::{FileType, OtFileError};

/// Tile geometry.
pub mod constants {
	/// Width and height of a tile in pixels
	pub const SPRITE_SIZE: usize = 32;

	/// Pixels per tile
	pub const PIXEL_COUNT: usize = SPRITE_SIZE * SPRITE_SIZE;

	/// Bytes per in-memory pixel
	pub const BYTES_PER_PIXEL: usize = 4;

	/// Size of an uncompressed tile in bytes
	pub const PIXELS_DATA_SIZE: usize = PIXEL_COUNT * BYTES_PER_PIXEL;
}

use constants::{BYTES_PER_PIXEL, PIXELS_DATA_SIZE};

/// A single 32×32 tile.
///
/// The tile only keeps its compressed payload. Pixels are expanded on demand
/// by [`Sprite::pixels`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sprite {
	id: u32,
	transparent: bool,
	compressed: Vec<u8>,
}

impl Sprite {
	/// Creates a blank sprite.
	pub fn new(id: u32, transparent: bool) -> Self {
		Self {
			id,
			transparent,
			compressed: Vec::new(),
		}
	}

	/// Creates a sprite from a `B, G, R, A` tile.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidPixelLength`] if `pixels` is not
	/// [`PIXELS_DATA_SIZE`] bytes long.
	pub fn from_pixels(id: u32, transparent: bool, pixels: &[u8]) -> Result<Self, OtFileError> {
		Ok(Self {
			id,
			transparent,
			compressed: compress(pixels, transparent)?,
		})
	}

	/// Creates a sprite from an already compressed payload.
	pub fn from_compressed(id: u32, transparent: bool, compressed: Vec<u8>) -> Self {
		Self {
			id,
			transparent,
			compressed,
		}
	}

	/// Sprite id, `0` when not yet placed in a store.
	#[inline]
	pub fn id(&self) -> u32 {
		self.id
	}

	/// Sets the sprite id.
	#[inline]
	pub fn set_id(&mut self, id: u32) {
		self.id = id;
	}

	/// Whether the payload carries an alpha byte per colored pixel.
	#[inline]
	pub fn is_transparent(&self) -> bool {
		self.transparent
	}

	/// Switches alpha mode, re-encoding the payload.
	///
	/// Leaving alpha mode makes every colored pixel opaque.
	pub fn set_transparent(&mut self, transparent: bool) {
		if self.transparent == transparent {
			return;
		}

		let pixels = decompress(&self.compressed, self.transparent);
		self.transparent = transparent;
		// A decoded tile always has the full size
		self.compressed = compress(&pixels, transparent).unwrap_or_default();
	}

	/// Compressed payload.
	#[inline]
	pub fn compressed_pixels(&self) -> &[u8] {
		&self.compressed
	}

	/// Size of the compressed payload in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.compressed.len()
	}

	/// Returns `true` if the sprite has no colored pixels.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.compressed.is_empty()
	}

	/// Expanded `B, G, R, A` tile.
	pub fn pixels(&self) -> Vec<u8> {
		decompress(&self.compressed, self.transparent)
	}

	/// Replaces the tile with `pixels`.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidPixelLength`] for a partial tile; the
	/// sprite is left unchanged.
	pub fn set_pixels(&mut self, pixels: &[u8]) -> Result<(), OtFileError> {
		self.compressed = compress(pixels, self.transparent)?;
		Ok(())
	}

	/// Expanded tile in `A, R, G, B` order, as stored in object bundles.
	pub fn argb_pixels(&self) -> Vec<u8> {
		to_argb(&self.pixels())
	}

	/// Replaces the tile with `A, R, G, B` pixels.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidPixelLength`] for a partial tile.
	pub fn set_argb_pixels(&mut self, pixels: &[u8]) -> Result<(), OtFileError> {
		if pixels.len() != PIXELS_DATA_SIZE {
			return Err(OtFileError::InvalidPixelLength {
				file_type: FileType::Sprite,
				expected: PIXELS_DATA_SIZE,
				actual: pixels.len(),
			});
		}
		self.set_pixels(&from_argb(pixels))
	}
}

/// Reorders `B, G, R, A` pixels to `A, R, G, B`.
pub fn to_argb(pixels: &[u8]) -> Vec<u8> {
	pixels.chunks_exact(BYTES_PER_PIXEL).flat_map(|p| [p[3], p[2], p[1], p[0]]).collect()
}

/// Reorders `A, R, G, B` pixels to `B, G, R, A`.
pub fn from_argb(pixels: &[u8]) -> Vec<u8> {
	pixels.chunks_exact(BYTES_PER_PIXEL).flat_map(|p| [p[3], p[2], p[1], p[0]]).collect()
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	/// Forces a tile into the canonical form the codec reproduces exactly:
	/// transparent pixels are all zero, and without alpha colored pixels are
	/// opaque.
	fn canonical(raw: &[u8], keep_alpha: bool) -> Vec<u8> {
		raw.chunks_exact(BYTES_PER_PIXEL)
			.flat_map(|p| {
				if p[3] == 0 {
					[0, 0, 0, 0]
				} else if keep_alpha {
					[p[0], p[1], p[2], p[3]]
				} else {
					[p[0], p[1], p[2], 0xFF]
				}
			})
			.collect()
	}

	#[test]
	fn test_blank_sprite() {
		let sprite = Sprite::new(7, false);
		assert_eq!(sprite.id(), 7);
		assert!(sprite.is_empty());
		assert_eq!(sprite.pixels(), vec![0u8; PIXELS_DATA_SIZE]);
	}

	#[test]
	fn test_toggle_transparency_drops_alpha() {
		let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
		pixels[0..4].copy_from_slice(&[10, 20, 30, 0x80]);

		let mut sprite = Sprite::from_pixels(1, true, &pixels).unwrap();
		assert_eq!(sprite.len(), 8);

		sprite.set_transparent(false);
		assert_eq!(sprite.len(), 7);
		assert_eq!(&sprite.pixels()[0..4], &[10, 20, 30, 0xFF]);
	}

	#[test]
	fn test_argb_order() {
		let mut pixels = vec![0u8; PIXELS_DATA_SIZE];
		pixels[0..4].copy_from_slice(&[1, 2, 3, 0xFF]);
		let sprite = Sprite::from_pixels(1, false, &pixels).unwrap();

		let argb = sprite.argb_pixels();
		assert_eq!(&argb[0..4], &[0xFF, 3, 2, 1]);

		let mut copy = Sprite::new(2, false);
		copy.set_argb_pixels(&argb).unwrap();
		assert_eq!(copy.compressed_pixels(), sprite.compressed_pixels());
	}

	#[test]
	fn test_set_pixels_rejects_partial_tile() {
		let mut sprite = Sprite::new(1, false);
		assert!(sprite.set_pixels(&[0u8; 100]).is_err());
		assert!(sprite.set_argb_pixels(&[0u8; 100]).is_err());
		assert!(sprite.is_empty());
	}

	mod proptests {
		use super::*;

		proptest! {
			#[test]
			fn round_trip_canonical_tiles(
				raw in prop::collection::vec(any::<u8>(), PIXELS_DATA_SIZE),
				keep_alpha in any::<bool>(),
			) {
				let pixels = canonical(&raw, keep_alpha);
				let data = compress(&pixels, keep_alpha).unwrap();
				prop_assert_eq!(decompress(&data, keep_alpha), pixels);
			}

			#[test]
			fn decompress_never_panics(data in prop::collection::vec(any::<u8>(), 0..512), keep_alpha in any::<bool>()) {
				prop_assert_eq!(decompress(&data, keep_alpha).len(), PIXELS_DATA_SIZE);
			}
		}
	}
}
