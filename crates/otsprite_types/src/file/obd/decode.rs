//! `.obd` decoding.

use log::debug;

use crate::file::{
	FileType, OtFileError,
	sprite::{Sprite, constants::PIXELS_DATA_SIZE},
	thing::{
		Animation, DEFAULT_EXACT_SIZE, Dimensions, FrameDuration, FrameGroup, FrameGroupKind, SpriteGroups,
		ThingCategory, ThingData, ThingType,
	},
};

use super::{constants::MAX_SPRITES, flags::read_properties};

/// Bounds-checked little-endian reader over a decompressed buffer.
pub(super) struct Reader<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> Reader<'a> {
	pub(super) fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	pub(super) fn bytes(&mut self, length: usize) -> Result<&'a [u8], OtFileError> {
		let end = self.position + length;
		if end > self.data.len() {
			return Err(OtFileError::insufficient_data(FileType::Obd, end, self.data.len()));
		}

		let bytes = &self.data[self.position..end];
		self.position = end;
		Ok(bytes)
	}

	fn array<const N: usize>(&mut self) -> Result<[u8; N], OtFileError> {
		let mut buffer = [0u8; N];
		buffer.copy_from_slice(self.bytes(N)?);
		Ok(buffer)
	}

	pub(super) fn u8(&mut self) -> Result<u8, OtFileError> {
		Ok(self.array::<1>()?[0])
	}

	pub(super) fn u16(&mut self) -> Result<u16, OtFileError> {
		Ok(u16::from_le_bytes(self.array()?))
	}

	pub(super) fn u32(&mut self) -> Result<u32, OtFileError> {
		Ok(u32::from_le_bytes(self.array()?))
	}
}

/// Reads frame group dimensions; exact size is only stored for large objects.
fn read_dimensions(reader: &mut Reader<'_>) -> Result<Dimensions, OtFileError> {
	let width = reader.u8()?;
	let height = reader.u8()?;
	let exact_size = if width > 1 || height > 1 {
		reader.u8()?
	} else {
		DEFAULT_EXACT_SIZE
	};

	let dimensions = Dimensions {
		width,
		height,
		exact_size,
		layers: reader.u8()?,
		pattern_x: reader.u8()?,
		pattern_y: reader.u8()?,
		pattern_z: reader.u8()?,
		frames: reader.u8()?,
	};

	if dimensions.total_sprites() == 0 {
		return Err(OtFileError::invalid_value(FileType::Obd, "frame group has a zero dimension"));
	}
	Ok(dimensions)
}

/// Decodes a version 1 buffer, starting at its client version tag.
pub(super) fn decode_v1(data: &[u8]) -> Result<ThingData, OtFileError> {
	let mut reader = Reader::new(data);
	let client_version = reader.u16()?;

	let name_length = reader.u16()? as usize;
	let name = std::str::from_utf8(reader.bytes(name_length)?)
		.map_err(|_| OtFileError::invalid_value(FileType::Obd, "category name is not UTF-8"))?;
	let category = ThingCategory::from_name(name)
		.ok_or_else(|| OtFileError::invalid_value(FileType::Obd, format!("unknown category '{name}'")))?;

	let mut thing = ThingType {
		category,
		..Default::default()
	};
	read_properties(&mut reader, &mut thing)?;

	let dimensions = read_dimensions(&mut reader)?;
	let total = dimensions.total_sprites();
	if total > MAX_SPRITES {
		return Err(OtFileError::TooManySprites {
			file_type: FileType::Obd,
			count: total,
			max: MAX_SPRITES,
		});
	}

	let animation = (dimensions.frames > 1)
		.then(|| Animation::new(dimensions.frames as usize, FrameDuration::for_category(category)));

	let mut sprite_ids = Vec::with_capacity(total);
	let mut sprites = Vec::with_capacity(total);
	for _ in 0..total {
		let id = reader.u32()?;
		let length = reader.u32()? as usize;
		if length != PIXELS_DATA_SIZE {
			return Err(OtFileError::InvalidPixelLength {
				file_type: FileType::Obd,
				expected: PIXELS_DATA_SIZE,
				actual: length,
			});
		}

		let mut sprite = Sprite::new(id, true);
		sprite.set_argb_pixels(reader.bytes(length)?)?;
		sprite_ids.push(id);
		sprites.push(sprite);
	}

	let group = FrameGroup::from_parts(dimensions, animation, sprite_ids)?;
	thing.frame_groups.insert(FrameGroupKind::Default, group);

	debug!("Decoded OBD v1 {category} (client {client_version}, {total} sprites)");
	ThingData::new(thing, SpriteGroups::new(sprites))
}
