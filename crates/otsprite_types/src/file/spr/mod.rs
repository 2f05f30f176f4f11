//! `.spr` sprite container support.
//!
//! # File Structure
//!
//! ```text
//! +------------------------------+
//! | signature (u32)              |
//! | count (u16, or u32 extended) |
//! +------------------------------+
//! | address table                |  count × u32, 0 = blank sprite
//! +------------------------------+
//! | records                      |  per nonzero address:
//! |   colorkey FF 00 FF          |
//! |   payload length (u16)       |
//! |   compressed payload         |
//! +------------------------------+
//! ```
//!
//! All integers are little-endian. Sprite ids start at 1; id `n` lives in
//! table slot `n - 1`. The count field is 32 bits wide when the client
//! version is extended (see [`ClientFeatures::extended_for`]).
//!
//! [`Store`] keeps the file open and reads records lazily. Edits live in an
//! in-memory overlay until [`Store::save`] compiles a new file on a worker
//! thread.
//!
//! # Example
//!
//! ```no_run
//! use otsprite_types::file::{spr::Store, version::{ClientFeatures, Version}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let version = Version::new(1098, "Client 10.98", 0x42A3, 0x57BBD603);
//! let mut store = Store::open("Tibia.spr", version, ClientFeatures::NONE)?;
//!
//! if let Some(sprite) = store.get_sprite(1) {
//!     println!("sprite 1: {} bytes", sprite.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`ClientFeatures::extended_for`]: crate::file::version::ClientFeatures::extended_for

mod compile;
mod events;
mod store;


use std::io::{Read, Seek, SeekFrom, Write};

pub use compile::{CancellationToken, CompileHandle, CompileOutcome, SaveStatus};
pub use events::{ChangeKind, StoreEvent};
pub use store::{Store, StoreState};

use crate::file::{FileType, OtFileError};

/// Layout constants of `.spr` files.
pub mod constants {
	/// Header size with a 16-bit count
	pub const HEADER_SIZE_U16: u64 = 6;

	/// Header size with a 32-bit count
	pub const HEADER_SIZE_U32: u64 = 8;

	/// Size of one address table entry
	pub const ADDRESS_SIZE: u64 = 4;

	/// Bytes preceding every payload
	pub const COLORKEY: [u8; 3] = [0xFF, 0x00, 0xFF];

	/// Largest compressed payload a record can hold
	pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

	/// Records between two progress reports while compiling
	pub const PROGRESS_INTERVAL: u32 = 500;

	/// Largest count a 16-bit header may hold
	pub const MAX_U16_SPRITES: u32 = 0xFFFE;
}

use constants::{ADDRESS_SIZE, COLORKEY, HEADER_SIZE_U16, HEADER_SIZE_U32};

/// Header of a `.spr` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	/// File signature
	pub signature: u32,

	/// Sprite count
	pub count: u32,

	/// Whether the count field is 32 bits wide
	pub extended: bool,
}

impl Header {
	/// Header size for the given count width.
	#[inline]
	pub fn size_for(extended: bool) -> u64 {
		if extended {
			HEADER_SIZE_U32
		} else {
			HEADER_SIZE_U16
		}
	}

	/// Size of this header in bytes.
	#[inline]
	pub fn size(&self) -> u64 {
		Self::size_for(self.extended)
	}

	/// Reads a header.
	pub fn from_reader<R: Read>(reader: &mut R, extended: bool) -> Result<Self, OtFileError> {
		let mut buffer = [0u8; HEADER_SIZE_U32 as usize];
		let size = Self::size_for(extended) as usize;
		reader.read_exact(&mut buffer[..size])?;

		let signature = u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
		let count = if extended {
			u32::from_le_bytes([buffer[4], buffer[5], buffer[6], buffer[7]])
		} else {
			u16::from_le_bytes([buffer[4], buffer[5]]) as u32
		};

		Ok(Self {
			signature,
			count,
			extended,
		})
	}

	/// Writes the header.
	///
	/// # Errors
	///
	/// Returns [`OtFileError::TooManySprites`] if a 16-bit count cannot hold
	/// the sprite count.
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), OtFileError> {
		writer.write_all(&self.signature.to_le_bytes())?;
		if self.extended {
			writer.write_all(&self.count.to_le_bytes())?;
		} else {
			let count = u16::try_from(self.count)
				.ok()
				.filter(|&count| u32::from(count) <= constants::MAX_U16_SPRITES)
				.ok_or(OtFileError::TooManySprites {
					file_type: FileType::Spr,
					count: self.count as usize,
					max: constants::MAX_U16_SPRITES as usize,
				})?;
			writer.write_all(&count.to_le_bytes())?;
		}
		Ok(())
	}
}

/// Reads the full address table of `count` entries following the header.
pub(crate) fn read_address_table<R: Read + Seek>(
	reader: &mut R,
	header_size: u64,
	count: u32,
) -> Result<Vec<u32>, OtFileError> {
	reader.seek(SeekFrom::Start(header_size))?;

	let mut raw = vec![0u8; count as usize * ADDRESS_SIZE as usize];
	reader.read_exact(&mut raw)?;

	Ok(raw.chunks_exact(ADDRESS_SIZE as usize).map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]])).collect())
}

/// Reads the table entry of sprite `id`.
pub(crate) fn read_address<R: Read + Seek>(reader: &mut R, header_size: u64, id: u32) -> Result<u32, OtFileError> {
	reader.seek(SeekFrom::Start(header_size + (id as u64 - 1) * ADDRESS_SIZE))?;

	let mut buffer = [0u8; 4];
	reader.read_exact(&mut buffer)?;
	Ok(u32::from_le_bytes(buffer))
}

/// Reads the payload of the record at `address`, skipping its colorkey.
pub(crate) fn read_payload<R: Read + Seek>(reader: &mut R, address: u32) -> Result<Vec<u8>, OtFileError> {
	reader.seek(SeekFrom::Start(address as u64 + COLORKEY.len() as u64))?;

	let mut length = [0u8; 2];
	reader.read_exact(&mut length)?;

	let mut payload = vec![0u8; u16::from_le_bytes(length) as usize];
	reader.read_exact(&mut payload)?;
	Ok(payload)
}
