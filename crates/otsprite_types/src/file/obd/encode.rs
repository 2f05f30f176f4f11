//! `.obd` encoding.
//!
//! Only the default frame group and its sprites are written. Sprites are
//! stored as raw `A, R, G, B` tiles.

use log::debug;

use crate::file::{
	FileType, OtFileError,
	sprite::{Sprite, constants::PIXELS_DATA_SIZE},
	thing::{Dimensions, FrameGroup, FrameGroupKind, ThingCategory, ThingData},
	version::constants::{OBD_V1_CLIENT_VERSION, OBD_V2_CLIENT_VERSION},
};

use super::{ObdVersion, flags::write_properties};

fn default_group(data: &ThingData) -> Result<(&FrameGroup, &[Sprite]), OtFileError> {
	if data.category() == ThingCategory::Invalid {
		return Err(OtFileError::invalid_value(FileType::Obd, "cannot encode an invalid thing"));
	}

	let group = data
		.frame_group(FrameGroupKind::Default)
		.ok_or_else(|| OtFileError::invalid_value(FileType::Obd, "thing has no default frame group"))?;
	let sprites = data
		.sprites()
		.get(FrameGroupKind::Default)
		.ok_or_else(|| OtFileError::invalid_value(FileType::Obd, "thing has no default sprites"))?;
	Ok((group, sprites))
}

fn write_dimensions(dimensions: &Dimensions, output: &mut Vec<u8>) {
	output.push(dimensions.width);
	output.push(dimensions.height);
	if dimensions.width > 1 || dimensions.height > 1 {
		output.push(dimensions.exact_size);
	}
	output.push(dimensions.layers);
	output.push(dimensions.pattern_x);
	output.push(dimensions.pattern_y);
	output.push(dimensions.pattern_z);
	output.push(dimensions.frames);
}

/// Encodes version 1: category by name, sprites with an explicit length.
pub(super) fn encode_v1(data: &ThingData) -> Result<Vec<u8>, OtFileError> {
	let (group, sprites) = default_group(data)?;
	let mut output = Vec::with_capacity(64 + sprites.len() * (PIXELS_DATA_SIZE + 8));

	output.extend_from_slice(&OBD_V1_CLIENT_VERSION.to_le_bytes());

	let category = data.category().name();
	output.extend_from_slice(&(category.len() as u16).to_le_bytes());
	output.extend_from_slice(category.as_bytes());

	write_properties(data.thing(), &mut output)?;
	write_dimensions(&group.dimensions(), &mut output);

	for sprite in sprites {
		output.extend_from_slice(&sprite.id().to_le_bytes());
		output.extend_from_slice(&(PIXELS_DATA_SIZE as u32).to_le_bytes());
		output.extend_from_slice(&sprite.argb_pixels());
	}

	debug!("Encoded OBD v1 {} ({} sprites)", data.category(), sprites.len());
	Ok(output)
}

/// Encodes version 2: category by value, animation metadata, fixed-size sprites.
pub(super) fn encode_v2(data: &ThingData) -> Result<Vec<u8>, OtFileError> {
	let (group, sprites) = default_group(data)?;
	let mut output = Vec::with_capacity(64 + sprites.len() * (PIXELS_DATA_SIZE + 4));

	output.extend_from_slice(&ObdVersion::Version2.tag().to_le_bytes());
	output.extend_from_slice(&OBD_V2_CLIENT_VERSION.to_le_bytes());
	output.push(data.category() as u8);

	// Patched with the offset of the frame data once the properties are written
	let pointer = output.len();
	output.extend_from_slice(&[0u8; 4]);

	write_properties(data.thing(), &mut output)?;
	let frame_data = output.len() as u32;
	output[pointer..pointer + 4].copy_from_slice(&frame_data.to_le_bytes());

	write_dimensions(&group.dimensions(), &mut output);

	if let Some(animation) = group.animation() {
		output.push(animation.mode as u8);
		output.extend_from_slice(&animation.loop_count.to_le_bytes());
		output.extend_from_slice(&animation.start_frame.to_le_bytes());
		for duration in &animation.durations {
			output.extend_from_slice(&duration.minimum.to_le_bytes());
			output.extend_from_slice(&duration.maximum.to_le_bytes());
		}
	}

	for sprite in sprites {
		output.extend_from_slice(&sprite.id().to_le_bytes());
		output.extend_from_slice(&sprite.argb_pixels());
	}

	debug!("Encoded OBD v2 {} ({} sprites)", data.category(), sprites.len());
	Ok(output)
}
