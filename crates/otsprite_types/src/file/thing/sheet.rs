//! Sprite sheet layout of a frame group.
//!
//! The sheet is a grid of texture cells. Columns run over
//! `pattern_z × pattern_x × layers`, rows over `frames × pattern_y`; each cell
//! is `width × height` tiles. Inside a cell tile `(0, 0)` sits in the bottom
//! right corner, matching how the client draws large objects.

use std::collections::BTreeMap;

use crate::file::sprite::{
	Sprite,
	constants::{BYTES_PER_PIXEL, SPRITE_SIZE},
};

use super::FrameGroup;

/// Pixel rectangle inside a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
	/// Left edge
	pub x: u32,
	/// Top edge
	pub y: u32,
	/// Width
	pub width: u32,
	/// Height
	pub height: u32,
}

/// A composed `B, G, R, A` bitmap and its texture cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
	rects: BTreeMap<usize, Rect>,
}

impl SpriteSheet {
	/// Composes `sprites`, indexed like `group`'s sprite-ID list, into a sheet.
	///
	/// Sprites missing from the slice leave their tile transparent.
	pub fn compose(group: &FrameGroup, sprites: &[Sprite]) -> Self {
		let d = group.dimensions();
		let columns = d.pattern_z as usize * d.pattern_x as usize * d.layers as usize;
		let rows = d.frames as usize * d.pattern_y as usize;
		let cell_width = d.width as usize * SPRITE_SIZE;
		let cell_height = d.height as usize * SPRITE_SIZE;

		let width = columns * cell_width;
		let height = rows * cell_height;
		let stride = width * BYTES_PER_PIXEL;

		let mut pixels = vec![0u8; width * height * BYTES_PER_PIXEL];
		let mut rects = BTreeMap::new();

		for position in group.positions() {
			let texture = group.texture_index(&position);
			let cell_x = (texture % columns) * cell_width;
			let cell_y = (texture / columns) * cell_height;

			rects.entry(texture).or_insert(Rect {
				x: cell_x as u32,
				y: cell_y as u32,
				width: cell_width as u32,
				height: cell_height as u32,
			});

			let Some(sprite) = sprites.get(group.sprite_index(&position)) else {
				continue;
			};
			if sprite.is_empty() {
				continue;
			}

			let left = (d.width - position.x - 1) as usize * SPRITE_SIZE + cell_x;
			let top = (d.height - position.y - 1) as usize * SPRITE_SIZE + cell_y;
			let tile = sprite.pixels();
			let row_bytes = SPRITE_SIZE * BYTES_PER_PIXEL;

			for (row, source) in tile.chunks_exact(row_bytes).enumerate() {
				let offset = (top + row) * stride + left * BYTES_PER_PIXEL;
				pixels[offset..offset + row_bytes].copy_from_slice(source);
			}
		}

		Self {
			width: width as u32,
			height: height as u32,
			pixels,
			rects,
		}
	}

	/// Width in pixels.
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// `B, G, R, A` bitmap, row-major.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Bitmap converted to `R, G, B, A`, the order image encoders expect.
	pub fn rgba_pixels(&self) -> Vec<u8> {
		self.pixels.chunks_exact(BYTES_PER_PIXEL).flat_map(|p| [p[2], p[1], p[0], p[3]]).collect()
	}

	/// Cell rectangles keyed by texture index.
	#[inline]
	pub fn rects(&self) -> &BTreeMap<usize, Rect> {
		&self.rects
	}
}
