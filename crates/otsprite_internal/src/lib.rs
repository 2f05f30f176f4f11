//! This module is separated into its own crate to keep the public facade thin, and should not be used directly.

/// `use otsprite_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export otsprite_types for convenience
pub use otsprite_types;

// Re-export commonly used types at crate root
pub use otsprite_types::file::{ObdVersion, OtFileError, Sprite, SprStore, ThingData, ThingType, Version};
