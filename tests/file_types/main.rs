//! Integration tests for the file types of `otsprite-rs`

mod obd;
mod spr;

use otsprite_rs::prelude::*;

/// 8.60 client, narrow sprite counts.
fn version_860() -> Version {
	Version::new(860, "Client 8.60", 0x4C2C7993, 0x4C220594)
}

/// 10.98 client, extended sprite counts.
fn version_1098() -> Version {
	Version::new(1098, "Client 10.98", 0x42A3, 0x57BBD603)
}

/// Opaque BGRA tile with a transparent border, shaded by `seed`.
fn framed_tile(seed: u8) -> Vec<u8> {
	let mut pixels = Vec::with_capacity(4096);
	for index in 0..1024usize {
		let (x, y) = (index % 32, index / 32);
		if x == 0 || y == 0 || x == 31 || y == 31 {
			pixels.extend_from_slice(&[0, 0, 0, 0]);
		} else {
			pixels.extend_from_slice(&[seed, x as u8 * 8, y as u8 * 8, 0xFF]);
		}
	}
	pixels
}

/// Runs a save to completion.
fn compile(store: &mut SprStore, path: &std::path::Path) -> CompileOutcome {
	match store.save(path).unwrap() {
		SaveStatus::Compiling(_) => store.finish_compile().unwrap(),
		other => panic!("expected a compile, got {other:?}"),
	}
}
