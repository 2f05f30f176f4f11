//! Client version profiles.
//!
//! A [`Version`] names a client release together with the file signatures that
//! release stamps on its `.dat` and `.spr` files. [`ClientFeatures`] carries the
//! optional format switches a client may enable on top of its version.
//!
//! Both types are serde-serializable so profiles can be kept in configuration
//! files, e.g.
//!
//! ```json
//! { "value": 1098, "description": "Client 10.98", "dat_signature": 1107447813, "spr_signature": 1460630278 }
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Client version values that switch file layouts.
pub mod constants {
	/// First client version whose `.spr` header uses a 32-bit sprite count
	pub const EXTENDED_THRESHOLD: u16 = 960;

	/// Client version tag written by `.obd` version 1
	pub const OBD_V1_CLIENT_VERSION: u16 = 1010;

	/// Client version tag written by `.obd` version 2
	pub const OBD_V2_CLIENT_VERSION: u16 = 1050;

	/// Lowest client version tag accepted by the `.obd` version 1 decoder
	pub const OBD_V1_MIN_CLIENT_VERSION: u16 = 710;
}

/// A client release and the signatures of its asset files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
	/// Numeric client version, e.g. `1098` for 10.98
	pub value: u16,

	/// Human readable name
	#[serde(default)]
	pub description: String,

	/// Signature of the `.dat` file
	pub dat_signature: u32,

	/// Signature of the `.spr` file
	pub spr_signature: u32,
}

impl Version {
	/// Creates a new version profile.
	pub fn new(value: u16, description: impl Into<String>, dat_signature: u32, spr_signature: u32) -> Self {
		Self {
			value,
			description: description.into(),
			dat_signature,
			spr_signature,
		}
	}

	/// Returns `true` if this version always uses 32-bit sprite counts.
	#[inline]
	pub fn is_extended(&self) -> bool {
		self.value >= constants::EXTENDED_THRESHOLD
	}
}

impl Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.description.is_empty() {
			write!(f, "Client {}", self.value)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// Optional format switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientFeatures {
	/// 32-bit sprite count in `.spr` headers regardless of version
	#[serde(default)]
	pub extended: bool,

	/// Sprites keep their alpha channel when compressed
	#[serde(default)]
	pub transparency: bool,
}

impl ClientFeatures {
	/// No optional features.
	pub const NONE: Self = Self {
		extended: false,
		transparency: false,
	};

	/// Returns whether `.spr` headers use a 32-bit count for `version`.
	#[inline]
	pub fn extended_for(&self, version: &Version) -> bool {
		self.extended || version.is_extended()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_extended_threshold() {
		let old = Version::new(860, "", 0x4C2C7993, 0x4C220594);
		let new = Version::new(1098, "Client 10.98", 0x42A3, 0x57BBD603);

		assert!(!ClientFeatures::NONE.extended_for(&old));
		assert!(ClientFeatures::NONE.extended_for(&new));

		let features = ClientFeatures {
			extended: true,
			..Default::default()
		};
		assert!(features.extended_for(&old));
	}

	#[test]
	fn test_display() {
		assert_eq!(Version::new(860, "", 1, 2).to_string(), "Client 860");
		assert_eq!(Version::new(1098, "Client 10.98", 1, 2).to_string(), "Client 10.98");
	}
}
