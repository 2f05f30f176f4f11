//! Prelude module for `otsprite_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use otsprite_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let version = Version::new(1098, "Client 10.98", 0x42A3, 0x57BBD603);
//! let mut store = SprStore::temporary(version, ClientFeatures::NONE);
//! let thing = ThingType::create(1, ThingCategory::Outfit).unwrap();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// SPR types
	CancellationToken,
	ChangeKind,
	// Versions
	ClientFeatures,
	CompileHandle,
	CompileOutcome,

	// Errors
	ErrorKind,
	FileType,

	// OBD types
	ObdCompressor,
	ObdVersion,
	Operation,
	OtFileError,
	SaveStatus,

	SprHeader,
	SprStore,
	// Sprite types
	Sprite,
	StoreEvent,
	StoreState,
	Version,
	ZlibCompressor,
};

// Thing types
#[doc(inline)]
pub use crate::file::thing::{
	Animation, AnimationMode, Dimensions, FrameDuration, FrameGroup, FrameGroupKind, FrameGroups, SpriteGroups,
	SpritePosition, SpriteSheet, ThingCategory, ThingData, ThingType,
};

// Re-export format modules for advanced usage
#[doc(inline)]
pub use crate::file::{obd, spr};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
