//! File type support for `otsprite-rs` project.

mod error;

pub mod obd;
pub mod spr;
pub mod sprite;
pub mod thing;
pub mod version;

// Re-export unified error type
pub use error::{ErrorKind, FileType, Operation, OtFileError};

// Re-export main file types
pub use obd::{Compressor as ObdCompressor, ObdVersion, ZlibCompressor};
pub use spr::{
	CancellationToken, ChangeKind, CompileHandle, CompileOutcome, Header as SprHeader, SaveStatus, Store as SprStore,
	StoreEvent, StoreState,
};
pub use sprite::Sprite;
pub use thing::{
	Animation, AnimationMode, DefaultAction, Dimensions, FrameDuration, FrameGroup, FrameGroupKind, FrameGroups,
	Light, MarketInfo, Offset, SpriteGroups, SpritePosition, SpriteSheet, StackOrder, ThingCategory, ThingData,
	ThingType,
};
pub use version::{ClientFeatures, Version};
