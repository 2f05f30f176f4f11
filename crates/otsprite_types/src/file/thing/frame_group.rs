//! Frame group geometry.
//!
//! A frame group lays out the sprites of one thing over seven axes:
//!
//! | Axis        | Dimension    | Meaning                               |
//! |-------------|--------------|---------------------------------------|
//! | `x`, `y`    | `width`, `height` | 32×32 tiles of a large object    |
//! | `layer`     | `layers`     | overlay layers (e.g. outfit masks)    |
//! | `pattern_x` | `pattern_x`  | directions or item variants           |
//! | `pattern_y` | `pattern_y`  | addons or stack variants              |
//! | `pattern_z` | `pattern_z`  | mounts or floor variants              |
//! | `frame`     | `frames`     | animation frames                      |
//!
//! The sprite-ID list is flattened with `x` varying fastest and `frame`
//! slowest; see [`FrameGroup::sprite_index`].

use std::fmt::Display;

use crate::file::{FileType, OtFileError};

use super::ThingCategory;

/// Default exact size of a frame group, in pixels
pub const DEFAULT_EXACT_SIZE: u8 = 32;

/// Kind of frame group owned by a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FrameGroupKind {
	/// Idle group, present on every thing
	Default = 0,

	/// Walking group, outfits only
	Walking = 1,
}

impl FrameGroupKind {
	/// Both kinds in storage order.
	pub const ALL: [FrameGroupKind; 2] = [FrameGroupKind::Default, FrameGroupKind::Walking];
}

impl Display for FrameGroupKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FrameGroupKind::Default => write!(f, "default"),
			FrameGroupKind::Walking => write!(f, "walking"),
		}
	}
}

/// How animation frames advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum AnimationMode {
	/// Every instance animates on its own clock
	#[default]
	Asynchronous = 0,

	/// All instances share one clock
	Synchronous = 1,
}

impl TryFrom<u8> for AnimationMode {
	type Error = OtFileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(AnimationMode::Asynchronous),
			1 => Ok(AnimationMode::Synchronous),
			_ => Err(OtFileError::invalid_value(FileType::Thing, format!("animation mode {value}"))),
		}
	}
}

/// Display time of one frame, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDuration {
	/// Shortest display time
	pub minimum: u32,

	/// Longest display time
	pub maximum: u32,
}

impl FrameDuration {
	/// Creates a duration range.
	pub fn new(minimum: u32, maximum: u32) -> Self {
		Self {
			minimum,
			maximum,
		}
	}

	/// Default frame duration for a category.
	pub fn for_category(category: ThingCategory) -> Self {
		let value = match category {
			ThingCategory::Item => 500,
			ThingCategory::Outfit => 300,
			ThingCategory::Effect | ThingCategory::Missile | ThingCategory::Invalid => 100,
		};
		Self::new(value, value)
	}
}

/// Animation metadata of a frame group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Animation {
	/// Clock mode
	pub mode: AnimationMode,

	/// Number of loops, `0` for infinite
	pub loop_count: i32,

	/// First frame, `-1` for random
	pub start_frame: i8,

	/// One entry per frame
	pub durations: Vec<FrameDuration>,
}

impl Animation {
	/// Creates an endless asynchronous animation with `frames` equal durations.
	pub fn new(frames: usize, duration: FrameDuration) -> Self {
		Self {
			mode: AnimationMode::Asynchronous,
			loop_count: 0,
			start_frame: 0,
			durations: vec![duration; frames],
		}
	}
}

/// The seven dimensions of a frame group plus its exact size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
	/// Width in tiles
	pub width: u8,
	/// Height in tiles
	pub height: u8,
	/// Rendered size in pixels
	pub exact_size: u8,
	/// Layer count
	pub layers: u8,
	/// First pattern axis
	pub pattern_x: u8,
	/// Second pattern axis
	pub pattern_y: u8,
	/// Third pattern axis
	pub pattern_z: u8,
	/// Animation frames
	pub frames: u8,
}

impl Default for Dimensions {
	fn default() -> Self {
		Self {
			width: 1,
			height: 1,
			exact_size: DEFAULT_EXACT_SIZE,
			layers: 1,
			pattern_x: 1,
			pattern_y: 1,
			pattern_z: 1,
			frames: 1,
		}
	}
}

impl Dimensions {
	/// Number of sprites addressed by these dimensions.
	#[inline]
	pub fn total_sprites(&self) -> usize {
		self.width as usize
			* self.height as usize
			* self.layers as usize
			* self.pattern_x as usize
			* self.pattern_y as usize
			* self.pattern_z as usize
			* self.frames as usize
	}

	/// Number of texture cells, one per (layer, pattern, frame).
	#[inline]
	pub fn total_textures(&self) -> usize {
		self.total_sprites() / (self.width as usize * self.height as usize)
	}

	/// Returns `true` if `position` lies inside these dimensions.
	pub fn contains(&self, position: &SpritePosition) -> bool {
		position.x < self.width
			&& position.y < self.height
			&& position.layer < self.layers
			&& position.pattern_x < self.pattern_x
			&& position.pattern_y < self.pattern_y
			&& position.pattern_z < self.pattern_z
			&& position.frame < self.frames
	}

	// Axis sizes of zero would make every index undefined
	fn normalized(mut self) -> Self {
		for axis in [
			&mut self.width,
			&mut self.height,
			&mut self.layers,
			&mut self.pattern_x,
			&mut self.pattern_y,
			&mut self.pattern_z,
			&mut self.frames,
		] {
			*axis = (*axis).max(1);
		}
		self
	}
}

/// Coordinates of one sprite inside a frame group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpritePosition {
	/// Tile column
	pub x: u8,
	/// Tile row
	pub y: u8,
	/// Layer
	pub layer: u8,
	/// First pattern axis
	pub pattern_x: u8,
	/// Second pattern axis
	pub pattern_y: u8,
	/// Third pattern axis
	pub pattern_z: u8,
	/// Animation frame
	pub frame: u8,
}

/// Geometry, animation and sprite IDs of one frame group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameGroup {
	dimensions: Dimensions,
	animation: Option<Animation>,
	sprite_ids: Vec<u32>,
}

impl Default for FrameGroup {
	fn default() -> Self {
		Self::new(Dimensions::default())
	}
}

impl FrameGroup {
	/// Creates a group with zeroed sprite IDs.
	///
	/// Axis sizes of zero are stored as one.
	pub fn new(dimensions: Dimensions) -> Self {
		let dimensions = dimensions.normalized();
		Self {
			dimensions,
			animation: None,
			sprite_ids: vec![0; dimensions.total_sprites()],
		}
	}

	/// Creates a group from decoded parts.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidValue`] if the sprite list or the
	/// animation durations do not match the dimensions.
	pub fn from_parts(
		dimensions: Dimensions,
		animation: Option<Animation>,
		sprite_ids: Vec<u32>,
	) -> Result<Self, OtFileError> {
		let dimensions = dimensions.normalized();
		if sprite_ids.len() != dimensions.total_sprites() {
			return Err(OtFileError::invalid_value(
				FileType::Thing,
				format!("{} sprite ids for {} slots", sprite_ids.len(), dimensions.total_sprites()),
			));
		}
		if let Some(animation) = &animation
			&& animation.durations.len() != dimensions.frames as usize
		{
			return Err(OtFileError::invalid_value(
				FileType::Thing,
				format!("{} frame durations for {} frames", animation.durations.len(), dimensions.frames),
			));
		}

		Ok(Self {
			dimensions,
			animation,
			sprite_ids,
		})
	}

	/// Current dimensions.
	#[inline]
	pub fn dimensions(&self) -> Dimensions {
		self.dimensions
	}

	/// Width in tiles.
	#[inline]
	pub fn width(&self) -> u8 {
		self.dimensions.width
	}

	/// Height in tiles.
	#[inline]
	pub fn height(&self) -> u8 {
		self.dimensions.height
	}

	/// Layer count.
	#[inline]
	pub fn layers(&self) -> u8 {
		self.dimensions.layers
	}

	/// Frame count.
	#[inline]
	pub fn frames(&self) -> u8 {
		self.dimensions.frames
	}

	/// Animation metadata, if the group is animated.
	#[inline]
	pub fn animation(&self) -> Option<&Animation> {
		self.animation.as_ref()
	}

	/// Returns `true` if the group carries animation metadata.
	#[inline]
	pub fn is_animation(&self) -> bool {
		self.animation.is_some()
	}

	/// Replaces the animation metadata.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidValue`] if the durations do not match the
	/// frame count.
	pub fn set_animation(&mut self, animation: Option<Animation>) -> Result<(), OtFileError> {
		if let Some(animation) = &animation
			&& animation.durations.len() != self.dimensions.frames as usize
		{
			return Err(OtFileError::invalid_value(
				FileType::Thing,
				format!("{} frame durations for {} frames", animation.durations.len(), self.dimensions.frames),
			));
		}
		self.animation = animation;
		Ok(())
	}

	/// Flattened sprite IDs.
	#[inline]
	pub fn sprite_ids(&self) -> &[u32] {
		&self.sprite_ids
	}

	/// Mutable sprite IDs. The length is fixed by the dimensions.
	#[inline]
	pub fn sprite_ids_mut(&mut self) -> &mut [u32] {
		&mut self.sprite_ids
	}

	/// Number of sprites addressed by the group.
	#[inline]
	pub fn total_sprites(&self) -> usize {
		self.dimensions.total_sprites()
	}

	/// Linear index of a sprite in [`FrameGroup::sprite_ids`].
	///
	/// The frame wraps modulo the frame count.
	pub fn sprite_index(&self, position: &SpritePosition) -> usize {
		let d = &self.dimensions;
		(self.texture_index(position) * d.height as usize + position.y as usize) * d.width as usize
			+ position.x as usize
	}

	/// Linear index of the texture cell holding `position`.
	///
	/// Tile coordinates are ignored; the frame wraps modulo the frame count.
	pub fn texture_index(&self, position: &SpritePosition) -> usize {
		let d = &self.dimensions;
		let frame = (position.frame % d.frames) as usize;
		(((frame * d.pattern_z as usize + position.pattern_z as usize) * d.pattern_y as usize
			+ position.pattern_y as usize)
			* d.pattern_x as usize
			+ position.pattern_x as usize)
			* d.layers as usize
			+ position.layer as usize
	}

	/// Inverse of [`FrameGroup::sprite_index`] for indices below
	/// [`FrameGroup::total_sprites`].
	pub fn position(&self, index: usize) -> SpritePosition {
		let d = &self.dimensions;
		let mut rest = index;
		let mut next = |size: u8| {
			let value = rest % size as usize;
			rest /= size as usize;
			value as u8
		};

		let x = next(d.width);
		let y = next(d.height);
		let layer = next(d.layers);
		let pattern_x = next(d.pattern_x);
		let pattern_y = next(d.pattern_y);
		let pattern_z = next(d.pattern_z);
		let frame = next(d.frames);

		SpritePosition {
			x,
			y,
			layer,
			pattern_x,
			pattern_y,
			pattern_z,
			frame,
		}
	}

	/// All positions in sprite-index order.
	pub fn positions(&self) -> impl Iterator<Item = SpritePosition> + '_ {
		(0..self.total_sprites()).map(|index| self.position(index))
	}

	/// Changes the dimensions, re-deriving the sprite-ID list.
	///
	/// IDs at positions present in both shapes are kept, new slots are zero.
	/// Animation durations follow the new frame count, repeating the last
	/// duration; a single-frame group drops its animation.
	pub fn reshape(&mut self, dimensions: Dimensions) {
		let dimensions = dimensions.normalized();
		let old = std::mem::replace(self, Self::new(dimensions));

		for index in 0..self.sprite_ids.len() {
			let position = self.position(index);
			if old.dimensions.contains(&position) {
				self.sprite_ids[index] = old.sprite_ids[old.sprite_index(&position)];
			}
		}

		let frames = dimensions.frames as usize;
		self.animation = old.animation.filter(|_| frames > 1).map(|mut animation| {
			let fill = animation.durations.last().copied().unwrap_or(FrameDuration::new(0, 0));
			animation.durations.resize(frames, fill);
			animation
		});
	}
}
