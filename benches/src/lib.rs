//! Benchmark helper utilities for otsprite-rs
//!
//! This module provides generators for synthetic sprite tiles and sprite
//! containers. Every helper is deterministic so runs stay comparable.

use otsprite_types::file::{
	sprite::constants::PIXELS_DATA_SIZE,
	spr::Store,
	version::{ClientFeatures, Version},
};

/// Kinds of synthetic tiles, from best to worst case for the run-length codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileShape {
	/// Fully transparent, compresses to nothing
	Blank,

	/// Fully opaque, a single colored run
	Solid,

	/// Opaque circle on a transparent background, one run pair per row
	Disc,

	/// Alternating transparent and opaque pixels, one run pair per pixel
	Checker,
}

impl TileShape {
	/// Every shape, in order.
	pub const ALL: [TileShape; 4] = [TileShape::Blank, TileShape::Solid, TileShape::Disc, TileShape::Checker];

	/// Short label for benchmark ids.
	pub fn label(&self) -> &'static str {
		match self {
			TileShape::Blank => "blank",
			TileShape::Solid => "solid",
			TileShape::Disc => "disc",
			TileShape::Checker => "checker",
		}
	}
}

/// Generates a `B, G, R, A` tile of the given shape
pub fn generate_tile(shape: TileShape, seed: u8) -> Vec<u8> {
	let mut pixels = vec![0u8; PIXELS_DATA_SIZE];

	for (index, pixel) in pixels.chunks_exact_mut(4).enumerate() {
		let (x, y) = ((index % 32) as i32, (index / 32) as i32);
		let opaque = match shape {
			TileShape::Blank => false,
			TileShape::Solid => true,
			TileShape::Disc => (x - 16).pow(2) + (y - 16).pow(2) < 14 * 14,
			TileShape::Checker => (x + y) % 2 == 0,
		};

		if opaque {
			pixel.copy_from_slice(&[seed, x as u8 * 8, y as u8 * 8, 0xFF]);
		}
	}

	pixels
}

/// Client profile used by the store benchmarks (10.98, extended, with alpha)
pub fn bench_version() -> (Version, ClientFeatures) {
	let features = ClientFeatures {
		extended: true,
		transparency: true,
	};
	(Version::new(1098, "Client 10.98", 0x42A3, 0x57BBD603), features)
}

/// Builds a temporary store holding `count` disc tiles
pub fn generate_store(count: usize) -> Store {
	let (version, features) = bench_version();
	let mut store = Store::temporary(version, features);

	for index in 0..count {
		let tile = generate_tile(TileShape::Disc, index as u8);
		if let Err(e) = store.add_pixels(&tile) {
			panic!("failed to add synthetic sprite {index}: {e}");
		}
	}

	store
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_tile() {
		for shape in TileShape::ALL {
			assert_eq!(generate_tile(shape, 1).len(), PIXELS_DATA_SIZE);
		}
		assert!(generate_tile(TileShape::Blank, 1).iter().all(|&b| b == 0));
		assert!(generate_tile(TileShape::Solid, 1).chunks_exact(4).all(|p| p[3] == 0xFF));
	}

	#[test]
	fn test_generate_store() {
		let store = generate_store(10);
		assert_eq!(store.count(), 11);
		assert!(store.is_changed());
	}
}
