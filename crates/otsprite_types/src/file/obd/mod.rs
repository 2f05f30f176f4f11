//! `.obd` object bundle support.
//!
//! An `.obd` file carries one thing together with the pixels of every sprite
//! its default frame group references, so it can be moved between sprite
//! stores. The whole file is a single compressed blob; once decompressed the
//! layout depends on the version.
//!
//! # Version 1
//!
//! ```text
//! +----------------------------+
//! | client version (u16 >= 710)|
//! | category name (u16 + utf8) |
//! | properties ... 0xFF        |
//! | dimensions                 |
//! | sprites: id u32, len u32,  |
//! |          len bytes of ARGB |
//! +----------------------------+
//! ```
//!
//! # Version 2
//!
//! ```text
//! +----------------------------+
//! | tag (u16 = 200)            |
//! | client version (u16)       |
//! | category (u8)              |
//! | frame data offset (u32)    |
//! | properties ... 0xFF        |
//! | dimensions                 |
//! | animation (frames > 1)     |
//! | sprites: id u32, 4096 ARGB |
//! +----------------------------+
//! ```
//!
//! Dimensions are `width, height, [exact size], layers, pattern x, pattern y,
//! pattern z, frames`, one byte each; the exact size byte is only present when
//! the width or height is above one.
//!
//! Versions 1 and 2 can be encoded. Only version 1 can be decoded.

mod compressor;
mod decode;
mod encode;
pub mod flags;


use std::{fmt::Display, fs, path::Path};

use log::debug;

pub use compressor::{Compressor, ZlibCompressor};

use crate::file::{FileType, Operation, OtFileError, thing::ThingData, version::constants::OBD_V1_MIN_CLIENT_VERSION};

/// `.obd` limits.
pub mod constants {
	/// Upper bound on the sprites a decoded thing may reference
	pub const MAX_SPRITES: usize = 4096;
}

/// `.obd` format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum ObdVersion {
	/// Category by name, no animation metadata
	Version1 = 100,

	/// Category by value, animation metadata
	#[default]
	Version2 = 200,

	/// Reserved
	Version3 = 300,
}

impl ObdVersion {
	/// Numeric tag of the version.
	pub fn tag(&self) -> u16 {
		*self as u16
	}

	/// Whether data can be written in this version.
	pub fn can_encode(&self) -> bool {
		!matches!(self, ObdVersion::Version3)
	}

	/// Whether data in this version can be read back.
	pub fn can_decode(&self) -> bool {
		matches!(self, ObdVersion::Version1)
	}
}

impl TryFrom<u16> for ObdVersion {
	type Error = OtFileError;

	fn try_from(value: u16) -> Result<Self, Self::Error> {
		match value {
			100 => Ok(ObdVersion::Version1),
			200 => Ok(ObdVersion::Version2),
			300 => Ok(ObdVersion::Version3),
			other => Err(OtFileError::invalid_value(FileType::Obd, format!("unknown OBD version {other}"))),
		}
	}
}

impl Display for ObdVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ObdVersion::Version1 => write!(f, "OBD v1"),
			ObdVersion::Version2 => write!(f, "OBD v2"),
			ObdVersion::Version3 => write!(f, "OBD v3"),
		}
	}
}

/// Encodes `data` and compresses it with zlib.
///
/// # Errors
///
/// Returns [`OtFileError::UnsupportedVersion`] for [`ObdVersion::Version3`],
/// and [`OtFileError::InvalidValue`] when the thing has an invalid category or
/// no default frame group.
pub fn encode(data: &ThingData, version: ObdVersion) -> Result<Vec<u8>, OtFileError> {
	encode_with(data, version, &ZlibCompressor::default())
}

/// Encodes `data` and compresses it with `compressor`.
pub fn encode_with(
	data: &ThingData,
	version: ObdVersion,
	compressor: &dyn Compressor,
) -> Result<Vec<u8>, OtFileError> {
	let raw = match version {
		ObdVersion::Version1 => encode::encode_v1(data)?,
		ObdVersion::Version2 => encode::encode_v2(data)?,
		ObdVersion::Version3 => return Err(OtFileError::unsupported_version(version.tag(), Operation::Encode)),
	};

	let packed = compressor.compress(&raw)?;
	debug!("{version}: {} bytes, {} compressed", raw.len(), packed.len());
	Ok(packed)
}

/// Decompresses and decodes `bytes` with zlib.
///
/// # Errors
///
/// Returns [`OtFileError::UnsupportedVersion`] for version 2 and 3 data and
/// for client versions below 710.
pub fn decode(bytes: &[u8]) -> Result<ThingData, OtFileError> {
	decode_with(bytes, &ZlibCompressor::default())
}

/// Decompresses `bytes` with `compressor` and decodes the result.
pub fn decode_with(bytes: &[u8], compressor: &dyn Compressor) -> Result<ThingData, OtFileError> {
	let raw = compressor.decompress(bytes)?;
	if raw.len() < 2 {
		return Err(OtFileError::insufficient_data(FileType::Obd, 2, raw.len()));
	}

	// Version 1 has no tag and starts with the client version; the version 2
	// and 3 tags sit below every client version it accepts.
	let tag = u16::from_le_bytes([raw[0], raw[1]]);
	if tag < OBD_V1_MIN_CLIENT_VERSION {
		return Err(OtFileError::unsupported_version(tag, Operation::Decode));
	}
	decode::decode_v1(&raw)
}

/// Encodes `data` and writes it to `path`.
pub fn save(path: impl AsRef<Path>, data: &ThingData, version: ObdVersion) -> Result<(), OtFileError> {
	let bytes = encode(data, version)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Reads and decodes the file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<ThingData, OtFileError> {
	let bytes = fs::read(path)?;
	decode(&bytes)
}
