//! A thing bundled with its sprites.

use std::fmt::Display;

use crate::file::{FileType, OtFileError, sprite::Sprite};

use super::{FrameGroup, FrameGroupKind, SpriteSheet, ThingCategory, ThingType};

/// Sprites of each frame group, in sprite-ID order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpriteGroups {
	default: Vec<Sprite>,
	walking: Option<Vec<Sprite>>,
}

impl SpriteGroups {
	/// Creates groups holding only default sprites.
	pub fn new(default: Vec<Sprite>) -> Self {
		Self {
			default,
			walking: None,
		}
	}

	/// Sets the walking sprites.
	pub fn with_walking(mut self, walking: Vec<Sprite>) -> Self {
		self.walking = Some(walking);
		self
	}

	/// Sprites of the given group.
	pub fn get(&self, kind: FrameGroupKind) -> Option<&[Sprite]> {
		match kind {
			FrameGroupKind::Default => Some(&self.default),
			FrameGroupKind::Walking => self.walking.as_deref(),
		}
	}

	/// Sprite at `index` of the given group.
	pub fn sprite(&self, kind: FrameGroupKind, index: usize) -> Option<&Sprite> {
		self.get(kind).and_then(|sprites| sprites.get(index))
	}
}

/// A [`ThingType`] together with the sprites of its frame groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThingData {
	thing: ThingType,
	sprites: SpriteGroups,
}

impl ThingData {
	/// Bundles a thing with its sprites.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidValue`] if a frame group has no sprites or
	/// a sprite array does not match its group's total.
	pub fn new(thing: ThingType, sprites: SpriteGroups) -> Result<Self, OtFileError> {
		if thing.frame_groups.is_empty() {
			return Err(OtFileError::invalid_value(FileType::Thing, "thing has no frame groups"));
		}

		for (kind, group) in thing.frame_groups.iter() {
			let Some(list) = sprites.get(kind) else {
				return Err(OtFileError::invalid_value(FileType::Thing, format!("missing {kind} sprites")));
			};
			if list.len() != group.total_sprites() {
				return Err(OtFileError::invalid_value(
					FileType::Thing,
					format!("{kind} group expects {} sprites, got {}", group.total_sprites(), list.len()),
				));
			}
		}

		Ok(Self {
			thing,
			sprites,
		})
	}

	/// Thing metadata.
	#[inline]
	pub fn thing(&self) -> &ThingType {
		&self.thing
	}

	/// Sprites of every group.
	#[inline]
	pub fn sprites(&self) -> &SpriteGroups {
		&self.sprites
	}

	/// Thing id.
	#[inline]
	pub fn id(&self) -> u16 {
		self.thing.id
	}

	/// Thing category.
	#[inline]
	pub fn category(&self) -> ThingCategory {
		self.thing.category
	}

	/// Frame group of the given kind.
	pub fn frame_group(&self, kind: FrameGroupKind) -> Option<&FrameGroup> {
		self.thing.frame_groups.get(kind)
	}

	/// Splits into metadata and sprites.
	pub fn into_parts(self) -> (ThingType, SpriteGroups) {
		(self.thing, self.sprites)
	}

	/// Lays out a group's sprites as one bitmap.
	///
	/// Returns `None` if the thing has no group of that kind.
	pub fn sprite_sheet(&self, kind: FrameGroupKind) -> Option<SpriteSheet> {
		let group = self.frame_group(kind)?;
		let sprites = self.sprites.get(kind)?;
		Some(SpriteSheet::compose(group, sprites))
	}
}

impl Display for ThingData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "(ThingData id={}, category={})", self.id(), self.category())
	}
}
