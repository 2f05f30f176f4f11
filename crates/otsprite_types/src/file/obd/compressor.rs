//! Whole-blob compression of `.obd` files.

use std::io::{Read, Write};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};

use crate::file::{FileType, OtFileError};

/// Byte-stream transform applied to an encoded `.obd` buffer.
pub trait Compressor {
	/// Compresses `data`.
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, OtFileError>;

	/// Reverses [`Compressor::compress`].
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, OtFileError>;
}

/// zlib stream compression.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
	level: Compression,
}

impl Default for ZlibCompressor {
	fn default() -> Self {
		Self {
			level: Compression::best(),
		}
	}
}

impl ZlibCompressor {
	/// Creates a compressor with the given level, `0..=9`.
	pub fn new(level: u32) -> Self {
		Self {
			level: Compression::new(level.min(9)),
		}
	}
}

impl Compressor for ZlibCompressor {
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, OtFileError> {
		let error = |e: std::io::Error| OtFileError::CompressionError {
			file_type: FileType::Obd,
			message: e.to_string(),
		};

		let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
		encoder.write_all(data).map_err(error)?;
		encoder.finish().map_err(error)
	}

	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, OtFileError> {
		let mut decoder = ZlibDecoder::new(data);
		let mut output = Vec::new();
		decoder.read_to_end(&mut output).map_err(|e| OtFileError::DecompressionError {
			file_type: FileType::Obd,
			message: e.to_string(),
		})?;
		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_zlib_round_trip() {
		let data: Vec<u8> = (0..10_000u32).map(|i| (i % 7) as u8).collect();
		let compressor = ZlibCompressor::default();

		let packed = compressor.compress(&data).unwrap();
		assert!(packed.len() < data.len());
		assert_eq!(compressor.decompress(&packed).unwrap(), data);
	}

	#[test]
	fn test_garbage_is_rejected() {
		let err = ZlibCompressor::new(1).decompress(&[0x12, 0x34, 0x56]).unwrap_err();
		assert!(matches!(err, OtFileError::DecompressionError { .. }));
	}
}
