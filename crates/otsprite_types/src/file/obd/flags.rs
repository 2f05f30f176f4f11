//! Property stream shared by `.obd` versions 1 and 2.
//!
//! Each set property is written as its flag byte followed by fixed
//! arguments. The stream ends with [`LAST_FLAG`]. Values are little-endian
//! `u16` unless noted.

use crate::file::{
	FileType, OtFileError,
	thing::{DefaultAction, Light, MarketInfo, Offset, StackOrder, ThingType},
};

use super::decode::Reader;

/// Ground tile, `u16` speed
pub const GROUND: u8 = 0x00;
/// Ground border
pub const GROUND_BORDER: u8 = 0x01;
/// Drawn below common items
pub const ON_BOTTOM: u8 = 0x02;
/// Drawn above creatures
pub const ON_TOP: u8 = 0x03;
/// Container
pub const CONTAINER: u8 = 0x04;
/// Stackable
pub const STACKABLE: u8 = 0x05;
/// Force use
pub const FORCE_USE: u8 = 0x06;
/// Multi use
pub const MULTI_USE: u8 = 0x07;
/// Writable, `u16` max text length
pub const WRITABLE: u8 = 0x08;
/// Writable once, `u16` max text length
pub const WRITABLE_ONCE: u8 = 0x09;
/// Fluid container
pub const FLUID_CONTAINER: u8 = 0x0A;
/// Fluid
pub const FLUID: u8 = 0x0B;
/// Unpassable
pub const UNPASSABLE: u8 = 0x0C;
/// Unmovable
pub const UNMOVABLE: u8 = 0x0D;
/// Blocks missiles
pub const BLOCK_MISSILES: u8 = 0x0E;
/// Blocks path finding
pub const BLOCK_PATHFINDER: u8 = 0x0F;
/// No move animation
pub const NO_MOVE_ANIMATION: u8 = 0x10;
/// Pickupable
pub const PICKUPABLE: u8 = 0x11;
/// Hangable
pub const HANGABLE: u8 = 0x12;
/// Hooks south
pub const HOOK_SOUTH: u8 = 0x13;
/// Hooks east
pub const HOOK_EAST: u8 = 0x14;
/// Rotatable
pub const ROTATABLE: u8 = 0x15;
/// Light, `u16` level and `u16` color
pub const HAS_LIGHT: u8 = 0x16;
/// Never hidden
pub const DONT_HIDE: u8 = 0x17;
/// Translucent
pub const TRANSLUCENT: u8 = 0x18;
/// Offset, `u16` x and `u16` y
pub const HAS_OFFSET: u8 = 0x19;
/// Elevation, `u16`
pub const HAS_ELEVATION: u8 = 0x1A;
/// Lying object
pub const LYING_OBJECT: u8 = 0x1B;
/// Animate always
pub const ANIMATE_ALWAYS: u8 = 0x1C;
/// Minimap color, `u16`
pub const MINIMAP: u8 = 0x1D;
/// Lens help, `u16`
pub const LENS_HELP: u8 = 0x1E;
/// Full ground
pub const FULL_GROUND: u8 = 0x1F;
/// Ignore look
pub const IGNORE_LOOK: u8 = 0x20;
/// Cloth, `u16` slot
pub const CLOTH: u8 = 0x21;
/// Market data, see [`MarketInfo`]
pub const MARKET: u8 = 0x22;
/// Default action, `u16`
pub const DEFAULT_ACTION: u8 = 0x23;
/// Has charges
pub const HAS_CHARGES: u8 = 0xFC;
/// Floor change
pub const FLOOR_CHANGE: u8 = 0xFD;
/// Usable
pub const USABLE: u8 = 0xFE;
/// End of the property stream
pub const LAST_FLAG: u8 = 0xFF;

fn put_flag(output: &mut Vec<u8>, flag: u8, set: bool) {
	if set {
		output.push(flag);
	}
}

fn put_u16(output: &mut Vec<u8>, value: u16) {
	output.extend_from_slice(&value.to_le_bytes());
}

/// Appends the property stream of `thing`, terminator included.
///
/// # Errors
///
/// Returns [`OtFileError::PayloadTooLarge`] if the market name does not fit
/// a 16-bit length.
pub fn write_properties(thing: &ThingType, output: &mut Vec<u8>) -> Result<(), OtFileError> {
	match thing.stack_order {
		StackOrder::Ground => {
			output.push(GROUND);
			put_u16(output, thing.ground_speed);
		}
		StackOrder::Border => output.push(GROUND_BORDER),
		StackOrder::Bottom => output.push(ON_BOTTOM),
		StackOrder::Top => output.push(ON_TOP),
		StackOrder::Common => {}
	}

	put_flag(output, CONTAINER, thing.is_container);
	put_flag(output, STACKABLE, thing.stackable);
	put_flag(output, FORCE_USE, thing.force_use);
	put_flag(output, MULTI_USE, thing.multi_use);
	if thing.writable {
		output.push(WRITABLE);
		put_u16(output, thing.max_text_length);
	}
	if thing.writable_once {
		output.push(WRITABLE_ONCE);
		put_u16(output, thing.max_text_length);
	}
	put_flag(output, FLUID_CONTAINER, thing.fluid_container);
	put_flag(output, FLUID, thing.fluid);
	put_flag(output, UNPASSABLE, thing.unpassable);
	put_flag(output, UNMOVABLE, thing.unmovable);
	put_flag(output, BLOCK_MISSILES, thing.block_missiles);
	put_flag(output, BLOCK_PATHFINDER, thing.block_pathfinder);
	put_flag(output, NO_MOVE_ANIMATION, thing.no_move_animation);
	put_flag(output, PICKUPABLE, thing.pickupable);
	put_flag(output, HANGABLE, thing.hangable);
	put_flag(output, HOOK_SOUTH, thing.hook_south);
	put_flag(output, HOOK_EAST, thing.hook_east);
	put_flag(output, ROTATABLE, thing.rotatable);
	if let Some(light) = thing.light {
		output.push(HAS_LIGHT);
		put_u16(output, light.level);
		put_u16(output, light.color);
	}
	put_flag(output, DONT_HIDE, thing.dont_hide);
	put_flag(output, TRANSLUCENT, thing.translucent);
	if let Some(offset) = thing.offset {
		output.push(HAS_OFFSET);
		put_u16(output, offset.x);
		put_u16(output, offset.y);
	}
	if let Some(elevation) = thing.elevation {
		output.push(HAS_ELEVATION);
		put_u16(output, elevation);
	}
	put_flag(output, LYING_OBJECT, thing.lying_object);
	put_flag(output, ANIMATE_ALWAYS, thing.animate_always);
	if let Some(color) = thing.minimap_color {
		output.push(MINIMAP);
		put_u16(output, color);
	}
	if let Some(lens_help) = thing.lens_help {
		output.push(LENS_HELP);
		put_u16(output, lens_help);
	}
	put_flag(output, FULL_GROUND, thing.full_ground);
	put_flag(output, IGNORE_LOOK, thing.ignore_look);
	if let Some(slot) = thing.cloth_slot {
		output.push(CLOTH);
		put_u16(output, slot);
	}
	if let Some(market) = &thing.market {
		let name = market.name.as_bytes();
		let name_length = u16::try_from(name.len()).map_err(|_| OtFileError::PayloadTooLarge {
			file_type: FileType::Obd,
			size: name.len(),
			max: u16::MAX as usize,
		})?;

		output.push(MARKET);
		put_u16(output, market.category);
		put_u16(output, market.trade_as);
		put_u16(output, market.show_as);
		put_u16(output, name_length);
		output.extend_from_slice(name);
		put_u16(output, market.restrict_vocation);
		put_u16(output, market.required_level);
	}
	if let Some(action) = thing.default_action {
		output.push(DEFAULT_ACTION);
		put_u16(output, action as u16);
	}
	put_flag(output, HAS_CHARGES, thing.has_charges);
	put_flag(output, FLOOR_CHANGE, thing.floor_change);
	put_flag(output, USABLE, thing.usable);

	output.push(LAST_FLAG);
	Ok(())
}

/// Reads a property stream into `thing` up to and including the terminator.
///
/// # Errors
///
/// Returns [`OtFileError::UnknownFlag`] for a flag outside the table and
/// [`OtFileError::InsufficientData`] if the stream ends early.
pub(super) fn read_properties(reader: &mut Reader<'_>, thing: &mut ThingType) -> Result<(), OtFileError> {
	loop {
		let flag = reader.u8()?;
		match flag {
			GROUND => {
				thing.stack_order = StackOrder::Ground;
				thing.ground_speed = reader.u16()?;
			}
			GROUND_BORDER => thing.stack_order = StackOrder::Border,
			ON_BOTTOM => thing.stack_order = StackOrder::Bottom,
			ON_TOP => thing.stack_order = StackOrder::Top,
			CONTAINER => thing.is_container = true,
			STACKABLE => thing.stackable = true,
			FORCE_USE => thing.force_use = true,
			MULTI_USE => thing.multi_use = true,
			WRITABLE => {
				thing.writable = true;
				thing.max_text_length = reader.u16()?;
			}
			WRITABLE_ONCE => {
				thing.writable_once = true;
				thing.max_text_length = reader.u16()?;
			}
			FLUID_CONTAINER => thing.fluid_container = true,
			FLUID => thing.fluid = true,
			UNPASSABLE => thing.unpassable = true,
			UNMOVABLE => thing.unmovable = true,
			BLOCK_MISSILES => thing.block_missiles = true,
			BLOCK_PATHFINDER => thing.block_pathfinder = true,
			NO_MOVE_ANIMATION => thing.no_move_animation = true,
			PICKUPABLE => thing.pickupable = true,
			HANGABLE => thing.hangable = true,
			HOOK_SOUTH => thing.hook_south = true,
			HOOK_EAST => thing.hook_east = true,
			ROTATABLE => thing.rotatable = true,
			HAS_LIGHT => {
				let level = reader.u16()?;
				let color = reader.u16()?;
				thing.light = Some(Light {
					level,
					color,
				});
			}
			DONT_HIDE => thing.dont_hide = true,
			TRANSLUCENT => thing.translucent = true,
			HAS_OFFSET => {
				let x = reader.u16()?;
				let y = reader.u16()?;
				thing.offset = Some(Offset {
					x,
					y,
				});
			}
			HAS_ELEVATION => thing.elevation = Some(reader.u16()?),
			LYING_OBJECT => thing.lying_object = true,
			ANIMATE_ALWAYS => thing.animate_always = true,
			MINIMAP => thing.minimap_color = Some(reader.u16()?),
			LENS_HELP => thing.lens_help = Some(reader.u16()?),
			FULL_GROUND => thing.full_ground = true,
			IGNORE_LOOK => thing.ignore_look = true,
			CLOTH => thing.cloth_slot = Some(reader.u16()?),
			MARKET => {
				let category = reader.u16()?;
				let trade_as = reader.u16()?;
				let show_as = reader.u16()?;
				let name_length = reader.u16()? as usize;
				let name = String::from_utf8(reader.bytes(name_length)?.to_vec())
					.map_err(|_| OtFileError::invalid_value(FileType::Obd, "market name is not UTF-8"))?;
				let restrict_vocation = reader.u16()?;
				let required_level = reader.u16()?;

				thing.market = Some(MarketInfo {
					category,
					trade_as,
					show_as,
					name,
					restrict_vocation,
					required_level,
				});
			}
			DEFAULT_ACTION => thing.default_action = Some(DefaultAction::try_from(reader.u16()?)?),
			HAS_CHARGES => thing.has_charges = true,
			FLOOR_CHANGE => thing.floor_change = true,
			USABLE => thing.usable = true,
			LAST_FLAG => return Ok(()),
			_ => {
				return Err(OtFileError::UnknownFlag {
					file_type: FileType::Obd,
					flag,
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_stream_is_terminator() {
		let mut output = Vec::new();
		write_properties(&ThingType::default(), &mut output).unwrap();
		assert_eq!(output, vec![LAST_FLAG]);
	}

	#[test]
	fn test_argument_layout() {
		let thing = ThingType {
			stack_order: StackOrder::Ground,
			ground_speed: 150,
			light: Some(Light {
				level: 3,
				color: 215,
			}),
			usable: true,
			..Default::default()
		};

		let mut output = Vec::new();
		write_properties(&thing, &mut output).unwrap();
		assert_eq!(output, vec![GROUND, 150, 0, HAS_LIGHT, 3, 0, 215, 0, USABLE, LAST_FLAG]);
	}

	#[test]
	fn test_full_property_set() {
		let thing = ThingType {
			stack_order: StackOrder::Top,
			is_container: true,
			stackable: true,
			force_use: true,
			multi_use: true,
			writable: true,
			max_text_length: 512,
			fluid_container: true,
			fluid: true,
			unpassable: true,
			unmovable: true,
			block_missiles: true,
			block_pathfinder: true,
			no_move_animation: true,
			pickupable: true,
			hangable: true,
			hook_south: true,
			hook_east: true,
			rotatable: true,
			light: Some(Light {
				level: 7,
				color: 0xD7,
			}),
			dont_hide: true,
			translucent: true,
			offset: Some(Offset {
				x: 8,
				y: 8,
			}),
			elevation: Some(16),
			lying_object: true,
			animate_always: true,
			minimap_color: Some(0x81),
			lens_help: Some(1100),
			full_ground: true,
			ignore_look: true,
			cloth_slot: Some(4),
			market: Some(MarketInfo {
				category: 1,
				trade_as: 2148,
				show_as: 2148,
				name: "gold coin".into(),
				restrict_vocation: 0,
				required_level: 8,
			}),
			default_action: Some(DefaultAction::Use),
			has_charges: true,
			floor_change: true,
			usable: true,
			..Default::default()
		};

		let mut output = Vec::new();
		write_properties(&thing, &mut output).unwrap();

		let mut decoded = ThingType::default();
		read_properties(&mut Reader::new(&output), &mut decoded).unwrap();
		assert_eq!(decoded, thing);
	}

	#[test]
	fn test_unknown_flag() {
		let mut thing = ThingType::default();
		let err = read_properties(&mut Reader::new(&[CONTAINER, 0x40, LAST_FLAG]), &mut thing).unwrap_err();
		assert!(matches!(
			err,
			OtFileError::UnknownFlag {
				flag: 0x40,
				..
			}
		));
	}

	#[test]
	fn test_missing_terminator() {
		let mut thing = ThingType::default();
		let err = read_properties(&mut Reader::new(&[GROUND, 10]), &mut thing).unwrap_err();
		assert!(matches!(err, OtFileError::InsufficientData { .. }));
	}
}
