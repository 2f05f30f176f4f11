//! This crate provides core data types and file format support for the `otsprite-rs` project.
//!
//! # File Formats
//!
//! - **SPR**: Sprite containers holding run-length compressed 32×32 tiles behind an address table
//! - **OBD**: Compressed object bundles carrying one thing and the pixels of its sprites
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use otsprite_types::prelude::*;
//!
//! // Build an item with a single sprite
//! let thing = ThingType::create(100, ThingCategory::Item).unwrap();
//! let data = ThingData::new(thing, SpriteGroups::new(vec![Sprite::new(1, true)])).unwrap();
//!
//! let bytes = obd::encode(&data, ObdVersion::Version1).unwrap();
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use otsprite_types::file::{spr::Store, version::{ClientFeatures, Version}};
//!
//! let version = Version::new(860, "Client 8.60", 0x4C2C7993, 0x4C220594);
//! let store = Store::temporary(version, ClientFeatures::NONE);
//! // ...
//! ```

pub mod file;

/// `use otsprite_types::prelude::*;` to import commonly used items.
pub mod prelude;
