#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `otsprite-rs` reads, edits and writes the sprite assets of Open Tibia clients.
//!
//! - [`otsprite_types::file::spr`]: lazily read `.spr` sprite containers with background compilation
//! - [`otsprite_types::file::obd`]: object bundles that move one thing and its sprites between clients
//!
pub use otsprite_internal::*;
