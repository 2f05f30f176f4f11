//! Error types for sprite, container and object bundle handling.

use std::fmt::Display;

use thiserror::Error;

/// File formats handled by this crate, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Single compressed sprite payload
	Sprite,

	/// `.spr` sprite container
	Spr,

	/// `.obd` object bundle
	Obd,

	/// Thing metadata and frame geometry
	Thing,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Sprite => write!(f, "Sprite"),
			FileType::Spr => write!(f, "SPR"),
			FileType::Obd => write!(f, "OBD"),
			FileType::Thing => write!(f, "Thing"),
		}
	}
}

/// Direction of a codec operation, used when reporting unsupported versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Serializing to bytes
	Encode,

	/// Parsing from bytes
	Decode,
}

impl Display for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Operation::Encode => write!(f, "encode"),
			Operation::Decode => write!(f, "decode"),
		}
	}
}

/// Broad classification of an [`OtFileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Malformed or unsupported data: bad signature, unknown version or flag
	Format,

	/// Input of the wrong size: pixel buffers, payloads, sprite counts
	Size,

	/// Underlying I/O failure
	Io,

	/// Operation not valid in the current store state
	State,
}

/// Unified error type for all formats in this crate.
#[derive(Debug, Error)]
pub enum OtFileError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// File signature does not match the version profile
	#[error("{file_type}: invalid signature, expected {expected:08X}, got {actual:08X}")]
	InvalidSignature {
		/// Format being parsed
		file_type: FileType,
		/// Signature mandated by the version profile
		expected: u32,
		/// Signature found in the file
		actual: u32,
	},

	/// Version tag is unknown or its codec is not implemented
	#[error("{file_type}: version {version} is not supported for {operation}")]
	UnsupportedVersion {
		/// Format being processed
		file_type: FileType,
		/// Offending version tag
		version: u16,
		/// Whether encoding or decoding was attempted
		operation: Operation,
	},

	/// Property stream contains a flag this crate does not know
	#[error("{file_type}: unknown property flag 0x{flag:02X}")]
	UnknownFlag {
		/// Format being parsed
		file_type: FileType,
		/// Offending flag byte
		flag: u8,
	},

	/// A field holds a value outside its domain
	#[error("{file_type}: invalid value: {message}")]
	InvalidValue {
		/// Format being processed
		file_type: FileType,
		/// Description of the problem
		message: String,
	},

	/// Pixel buffer does not have the fixed tile size
	#[error("{file_type}: invalid pixel buffer length, expected {expected} bytes, got {actual} bytes")]
	InvalidPixelLength {
		/// Format being processed
		file_type: FileType,
		/// Required length
		expected: usize,
		/// Supplied length
		actual: usize,
	},

	/// Payload exceeds what the format can address
	#[error("{file_type}: payload of {size} bytes exceeds the maximum of {max} bytes")]
	PayloadTooLarge {
		/// Format being processed
		file_type: FileType,
		/// Payload size
		size: usize,
		/// Maximum allowed size
		max: usize,
	},

	/// More sprites than the format can address
	#[error("{file_type}: {count} sprites exceed the maximum of {max}")]
	TooManySprites {
		/// Format being processed
		file_type: FileType,
		/// Requested sprite count
		count: usize,
		/// Maximum allowed count
		max: usize,
	},

	/// Sprite id outside `[1, count]`
	#[error("Sprite id {id} out of range (count: {count})")]
	SpriteOutOfRange {
		/// Requested id
		id: u32,
		/// Current sprite count
		count: u32,
	},

	/// The store has no loaded data
	#[error("Sprite store is not loaded")]
	NotLoaded,

	/// A compile is already running for this store
	#[error("Sprite store is compiling")]
	CompileInProgress,

	/// No compile is running for this store
	#[error("Sprite store has no compile in progress")]
	NoCompileInProgress,

	/// Whole-blob compression failed
	#[error("{file_type}: compression failed: {message}")]
	CompressionError {
		/// Format being processed
		file_type: FileType,
		/// Description of the failure
		message: String,
	},

	/// Whole-blob decompression failed
	#[error("{file_type}: decompression failed: {message}")]
	DecompressionError {
		/// Format being processed
		file_type: FileType,
		/// Description of the failure
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IoError(#[from] std::io::Error),
}

impl OtFileError {
	/// Creates an [`OtFileError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`OtFileError::UnsupportedVersion`] error for `.obd` data.
	pub fn unsupported_version(version: u16, operation: Operation) -> Self {
		Self::UnsupportedVersion {
			file_type: FileType::Obd,
			version,
			operation,
		}
	}

	/// Creates an [`OtFileError::InvalidValue`] error.
	pub fn invalid_value(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			file_type,
			message: message.into(),
		}
	}

	/// Returns the taxonomy class of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InsufficientData {
				..
			}
			| Self::InvalidSignature {
				..
			}
			| Self::UnsupportedVersion {
				..
			}
			| Self::UnknownFlag {
				..
			}
			| Self::InvalidValue {
				..
			}
			| Self::CompressionError {
				..
			}
			| Self::DecompressionError {
				..
			} => ErrorKind::Format,
			Self::InvalidPixelLength {
				..
			}
			| Self::PayloadTooLarge {
				..
			}
			| Self::TooManySprites {
				..
			} => ErrorKind::Size,
			Self::SpriteOutOfRange {
				..
			}
			| Self::NotLoaded
			| Self::CompileInProgress
			| Self::NoCompileInProgress => ErrorKind::State,
			Self::IoError(_) => ErrorKind::Io,
		}
	}

	/// Returns `true` if the error reports unimplemented codec support.
	pub fn is_unsupported(&self) -> bool {
		matches!(
			self,
			Self::UnsupportedVersion {
				..
			}
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_classification() {
		assert_eq!(OtFileError::insufficient_data(FileType::Spr, 6, 2).kind(), ErrorKind::Format);
		assert_eq!(
			OtFileError::InvalidPixelLength {
				file_type: FileType::Sprite,
				expected: 4096,
				actual: 12,
			}
			.kind(),
			ErrorKind::Size
		);
		assert_eq!(OtFileError::CompileInProgress.kind(), ErrorKind::State);
		assert_eq!(OtFileError::from(std::io::Error::other("disk")).kind(), ErrorKind::Io);
	}

	#[test]
	fn test_unsupported_message() {
		let err = OtFileError::unsupported_version(300, Operation::Encode);
		assert!(err.is_unsupported());
		assert_eq!(err.to_string(), "OBD: version 300 is not supported for encode");
	}
}
