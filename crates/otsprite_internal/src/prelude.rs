//! Prelude module for `otsprite_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use otsprite_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let sprite = Sprite::new(1, true);
//! assert!(sprite.is_empty());
//!
//! let thing = ThingType::create(7, ThingCategory::Missile).unwrap();
//! assert_eq!(thing.frame_group().unwrap().total_sprites(), 9);
//! ```

// Re-export everything from otsprite_types::prelude
#[doc(inline)]
pub use otsprite_types::prelude::*;

// Re-export the entire otsprite_types module for advanced usage
#[doc(inline)]
pub use otsprite_types;
