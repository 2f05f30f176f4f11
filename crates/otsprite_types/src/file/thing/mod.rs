//! Thing types: the metadata and frame groups describing how one item,
//! outfit, effect or missile is rendered.
//!
//! A [`ThingType`] owns its frame groups through [`FrameGroups`], a two-slot
//! map keyed by [`FrameGroupKind`]. Outfits use both slots, every other
//! category only [`FrameGroupKind::Default`]. [`ThingData`] pairs a thing with
//! the sprites its groups reference.

mod data;
mod frame_group;
mod sheet;

use std::fmt::Display;

pub use data::{SpriteGroups, ThingData};
pub use frame_group::{
	Animation, AnimationMode, DEFAULT_EXACT_SIZE, Dimensions, FrameDuration, FrameGroup, FrameGroupKind,
	SpritePosition,
};
pub use sheet::{Rect, SpriteSheet};

use crate::file::{FileType, OtFileError};

/// Category of a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ThingCategory {
	/// Not a valid category
	#[default]
	Invalid = 0,

	/// Map items
	Item = 1,

	/// Creature outfits
	Outfit = 2,

	/// Magic effects
	Effect = 3,

	/// Distance missiles
	Missile = 4,
}

impl ThingCategory {
	/// Lowercase name used by `.obd` version 1.
	pub fn name(&self) -> &'static str {
		match self {
			ThingCategory::Invalid => "invalid",
			ThingCategory::Item => "item",
			ThingCategory::Outfit => "outfit",
			ThingCategory::Effect => "effect",
			ThingCategory::Missile => "missile",
		}
	}

	/// Parses a category name. `invalid` is not accepted.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"item" => Some(ThingCategory::Item),
			"outfit" => Some(ThingCategory::Outfit),
			"effect" => Some(ThingCategory::Effect),
			"missile" => Some(ThingCategory::Missile),
			_ => None,
		}
	}
}

impl Display for ThingCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl TryFrom<u8> for ThingCategory {
	type Error = OtFileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(ThingCategory::Item),
			2 => Ok(ThingCategory::Outfit),
			3 => Ok(ThingCategory::Effect),
			4 => Ok(ThingCategory::Missile),
			_ => Err(OtFileError::invalid_value(FileType::Thing, format!("category {value}"))),
		}
	}
}

/// Draw order of an item on its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StackOrder {
	/// Regular stacked item
	#[default]
	Common = 0,

	/// Ground tile
	Ground = 1,

	/// Ground border
	Border = 2,

	/// Drawn below common items
	Bottom = 3,

	/// Drawn above creatures
	Top = 4,
}

/// Action performed by a plain click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum DefaultAction {
	/// No action
	#[default]
	None = 0,

	/// Look at the item
	Look = 1,

	/// Use the item
	Use = 2,

	/// Open the container
	Open = 3,

	/// Highlight the autowalk path
	AutowalkHighlight = 4,
}

impl TryFrom<u16> for DefaultAction {
	type Error = OtFileError;

	fn try_from(value: u16) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(DefaultAction::None),
			1 => Ok(DefaultAction::Look),
			2 => Ok(DefaultAction::Use),
			3 => Ok(DefaultAction::Open),
			4 => Ok(DefaultAction::AutowalkHighlight),
			_ => Err(OtFileError::invalid_value(FileType::Thing, format!("default action {value}"))),
		}
	}
}

/// Light emitted by a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Light {
	/// Radius
	pub level: u16,
	/// 8-bit palette color
	pub color: u16,
}

/// Draw offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
	/// Horizontal offset
	pub x: u16,
	/// Vertical offset
	pub y: u16,
}

/// Market listing of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MarketInfo {
	/// Market category
	pub category: u16,
	/// Item id the entry trades as
	pub trade_as: u16,
	/// Item id the entry is shown as
	pub show_as: u16,
	/// Display name
	pub name: String,
	/// Vocation restriction bit set
	pub restrict_vocation: u16,
	/// Minimum level
	pub required_level: u16,
}

/// Frame groups of a thing, at most one per [`FrameGroupKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FrameGroups {
	default: Option<FrameGroup>,
	walking: Option<FrameGroup>,
}

impl FrameGroups {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	fn slot(&self, kind: FrameGroupKind) -> &Option<FrameGroup> {
		match kind {
			FrameGroupKind::Default => &self.default,
			FrameGroupKind::Walking => &self.walking,
		}
	}

	fn slot_mut(&mut self, kind: FrameGroupKind) -> &mut Option<FrameGroup> {
		match kind {
			FrameGroupKind::Default => &mut self.default,
			FrameGroupKind::Walking => &mut self.walking,
		}
	}

	/// Group of the given kind.
	pub fn get(&self, kind: FrameGroupKind) -> Option<&FrameGroup> {
		self.slot(kind).as_ref()
	}

	/// Mutable group of the given kind.
	pub fn get_mut(&mut self, kind: FrameGroupKind) -> Option<&mut FrameGroup> {
		self.slot_mut(kind).as_mut()
	}

	/// Returns `true` if a group of the given kind exists.
	pub fn contains(&self, kind: FrameGroupKind) -> bool {
		self.slot(kind).is_some()
	}

	/// Stores `group` under `kind`, returning the group it replaces.
	///
	/// Inserting a walking group while no default group exists also seeds the
	/// default slot with a copy of it, so every thing keeps a default group.
	pub fn insert(&mut self, kind: FrameGroupKind, group: FrameGroup) -> Option<FrameGroup> {
		if kind == FrameGroupKind::Walking && self.default.is_none() {
			self.default = Some(group.clone());
		}
		self.slot_mut(kind).replace(group)
	}

	/// Removes the group of the given kind.
	pub fn remove(&mut self, kind: FrameGroupKind) -> Option<FrameGroup> {
		self.slot_mut(kind).take()
	}

	/// Number of groups present.
	pub fn len(&self) -> usize {
		usize::from(self.default.is_some()) + usize::from(self.walking.is_some())
	}

	/// Returns `true` if no group is present.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Present groups in kind order.
	pub fn iter(&self) -> impl Iterator<Item = (FrameGroupKind, &FrameGroup)> {
		FrameGroupKind::ALL.into_iter().filter_map(|kind| self.get(kind).map(|group| (kind, group)))
	}
}

/// Metadata and frame groups of one thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ThingType {
	/// Client id
	pub id: u16,
	/// Category
	pub category: ThingCategory,

	/// Draw order
	pub stack_order: StackOrder,
	/// Walking speed on a ground tile
	pub ground_speed: u16,
	/// Container
	pub is_container: bool,
	/// Stackable
	pub stackable: bool,
	/// Used without a target
	pub force_use: bool,
	/// Used with a target
	pub multi_use: bool,
	/// Text can be written repeatedly
	pub writable: bool,
	/// Text can be written once
	pub writable_once: bool,
	/// Maximum text length for writable items
	pub max_text_length: u16,
	/// Fluid container
	pub fluid_container: bool,
	/// Fluid splash
	pub fluid: bool,
	/// Blocks creatures
	pub unpassable: bool,
	/// Cannot be moved
	pub unmovable: bool,
	/// Blocks missiles
	pub block_missiles: bool,
	/// Blocks path finding
	pub block_pathfinder: bool,
	/// Not animated while moving
	pub no_move_animation: bool,
	/// Can be picked up
	pub pickupable: bool,
	/// Can be hung on walls
	pub hangable: bool,
	/// Hooks on south walls
	pub hook_south: bool,
	/// Hooks on east walls
	pub hook_east: bool,
	/// Can be rotated
	pub rotatable: bool,
	/// Emitted light
	pub light: Option<Light>,
	/// Never hidden
	pub dont_hide: bool,
	/// Drawn translucent
	pub translucent: bool,
	/// Draw offset
	pub offset: Option<Offset>,
	/// Elevation in pixels
	pub elevation: Option<u16>,
	/// Lying corpse
	pub lying_object: bool,
	/// Animates even when idle
	pub animate_always: bool,
	/// Minimap color
	pub minimap_color: Option<u16>,
	/// Lens help id
	pub lens_help: Option<u16>,
	/// Fills the whole tile
	pub full_ground: bool,
	/// Skipped by look
	pub ignore_look: bool,
	/// Equipment slot
	pub cloth_slot: Option<u16>,
	/// Market listing
	pub market: Option<MarketInfo>,
	/// Plain click action
	pub default_action: Option<DefaultAction>,
	/// Shows charges
	pub has_charges: bool,
	/// Changes floor
	pub floor_change: bool,
	/// Usable
	pub usable: bool,

	/// Frame groups
	pub frame_groups: FrameGroups,
}

impl ThingType {
	/// Creates a thing with the default frame groups of its category.
	///
	/// Outfits get a default and a walking group with four directions and
	/// three animated frames. Missiles get a 3×3 pattern grid. Everything else
	/// gets a single 1×1 sprite.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidValue`] for [`ThingCategory::Invalid`].
	pub fn create(id: u16, category: ThingCategory) -> Result<Self, OtFileError> {
		let mut thing = Self {
			id,
			category,
			..Default::default()
		};

		match category {
			ThingCategory::Invalid => {
				return Err(OtFileError::invalid_value(FileType::Thing, "cannot create an invalid thing"));
			}
			ThingCategory::Outfit => {
				for kind in FrameGroupKind::ALL {
					let mut group = FrameGroup::new(Dimensions {
						pattern_x: 4,
						frames: 3,
						..Default::default()
					});
					group.set_animation(Some(Animation::new(3, FrameDuration::for_category(category))))?;
					thing.frame_groups.insert(kind, group);
				}
			}
			ThingCategory::Missile => {
				let group = FrameGroup::new(Dimensions {
					pattern_x: 3,
					pattern_y: 3,
					..Default::default()
				});
				thing.frame_groups.insert(FrameGroupKind::Default, group);
			}
			ThingCategory::Item | ThingCategory::Effect => {
				thing.frame_groups.insert(FrameGroupKind::Default, FrameGroup::default());
			}
		}

		Ok(thing)
	}

	/// Default frame group.
	#[inline]
	pub fn frame_group(&self) -> Option<&FrameGroup> {
		self.frame_groups.get(FrameGroupKind::Default)
	}

	/// Returns `true` if the thing has any animated group.
	pub fn is_animated(&self) -> bool {
		self.frame_groups.iter().any(|(_, group)| group.is_animation())
	}

	/// Merges an outfit's idle and walking groups into one default group.
	///
	/// The idle frame becomes frame 0 and walking frame `f` becomes frame
	/// `f + 1`. When walking is animated the merged group has one frame more
	/// than the walking group, with every frame reset to the outfit duration;
	/// otherwise the frame index wraps and the walking sprites win. Things
	/// without both groups are returned unchanged.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::InvalidValue`] if the walking group already has
	/// the maximum frame count.
	pub fn to_single_frame_group(&self) -> Result<Self, OtFileError> {
		let (Some(idle), Some(walking)) = (
			self.frame_groups.get(FrameGroupKind::Default),
			self.frame_groups.get(FrameGroupKind::Walking),
		) else {
			return Ok(self.clone());
		};
		if self.category != ThingCategory::Outfit {
			return Ok(self.clone());
		}

		let mut merged = walking.clone();
		if walking.frames() > 1 {
			let mut dimensions = walking.dimensions();
			dimensions.frames = dimensions.frames.checked_add(1).ok_or_else(|| {
				OtFileError::invalid_value(FileType::Thing, "walking group has too many frames")
			})?;
			merged.reshape(dimensions);

			// Every merged frame gets the outfit duration
			let frames = dimensions.frames as usize;
			let duration = FrameDuration::for_category(ThingCategory::Outfit);
			let mut animation = merged.animation().cloned().unwrap_or_else(|| Animation::new(frames, duration));
			animation.durations = vec![duration; frames];
			merged.set_animation(Some(animation))?;
		}
		merged.sprite_ids_mut().fill(0);

		let target = merged.dimensions();
		let mut ids = vec![0u32; merged.total_sprites()];
		let fits = |position: &SpritePosition| {
			target.contains(&SpritePosition {
				frame: 0,
				..*position
			})
		};

		for position in idle.positions().filter(|p| p.frame == 0 && fits(p)) {
			ids[merged.sprite_index(&position)] = idle.sprite_ids()[idle.sprite_index(&position)];
		}

		for position in walking.positions().filter(fits) {
			let shifted = SpritePosition {
				frame: position.frame.wrapping_add(1),
				..position
			};
			ids[merged.sprite_index(&shifted)] = walking.sprite_ids()[walking.sprite_index(&position)];
		}

		merged.sprite_ids_mut().copy_from_slice(&ids);

		let mut thing = self.clone();
		thing.frame_groups = FrameGroups::new();
		thing.frame_groups.insert(FrameGroupKind::Default, merged);
		Ok(thing)
	}
}

impl Display for ThingType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.market {
			Some(market) if !market.name.is_empty() => write!(f, "{} - {}", self.id, market.name),
			_ => write!(f, "{}", self.id),
		}
	}
}
