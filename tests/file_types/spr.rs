use std::fs;

use otsprite_rs::prelude::*;

use crate::{compile, framed_tile, version_860, version_1098};

#[test_log::test]
fn test_build_reload_and_edit() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("Tibia.spr");

	let mut store = SprStore::temporary(version_860(), ClientFeatures::NONE);
	for seed in 0..20 {
		store.add_pixels(&framed_tile(seed)).unwrap();
	}
	assert_eq!(compile(&mut store, &path), CompileOutcome::Compiled);
	assert_eq!(store.count(), 21);
	assert!(!store.is_temporary());
	drop(store);

	let mut store = SprStore::open(&path, version_860(), ClientFeatures::NONE).unwrap();
	assert_eq!(store.count(), 21);
	assert_eq!(store.sprite_pixels(5).unwrap(), framed_tile(3));

	store.replace_pixels(5, &framed_tile(99)).unwrap();
	store.remove_sprite(21).unwrap();
	assert_eq!(store.count(), 20);
	assert_eq!(compile(&mut store, &path), CompileOutcome::Compiled);

	let mut reopened = SprStore::open(&path, version_860(), ClientFeatures::NONE).unwrap();
	assert_eq!(reopened.count(), 20);
	assert_eq!(reopened.sprite_pixels(5).unwrap(), framed_tile(99));
	assert_eq!(reopened.sprite_pixels(6).unwrap(), framed_tile(4));
	let leftovers = std::fs::read_dir(dir.path()).unwrap().filter(|entry| {
		entry.as_ref().unwrap().path().extension().is_some_and(|extension| extension == "tmp")
	});
	assert_eq!(leftovers.count(), 0);
}

#[test_log::test]
fn test_extended_store_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("Tibia.spr");
	let features = ClientFeatures {
		extended: true,
		transparency: true,
	};

	let mut store = SprStore::temporary(version_1098(), features);
	assert_eq!(store.header_size(), 8);
	let id = store.add_pixels(&framed_tile(1)).unwrap();
	compile(&mut store, &path);

	let bytes = fs::read(&path).unwrap();
	assert_eq!(&bytes[0..4], &0x57BBD603u32.to_le_bytes());
	assert_eq!(&bytes[4..8], &2u32.to_le_bytes());

	let mut reopened = SprStore::open(&path, version_1098(), features).unwrap();
	let sprite = reopened.get_sprite(id).unwrap();
	assert!(sprite.is_transparent());
	assert_eq!(sprite.pixels(), framed_tile(1));
}

#[test]
fn test_wrong_client_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("Tibia.spr");

	let mut store = SprStore::temporary(version_860(), ClientFeatures::NONE);
	compile(&mut store, &path);

	let err = SprStore::open(&path, version_1098(), ClientFeatures::NONE).unwrap_err();
	assert!(matches!(err, OtFileError::InvalidSignature { .. }));
	assert_eq!(err.kind(), ErrorKind::Format);
}

#[test_log::test]
fn test_events_follow_lifecycle() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("Tibia.spr");

	let mut store = SprStore::new();
	let events = store.subscribe();

	store.create(version_860(), ClientFeatures::NONE);
	let id = store.add_pixels(&framed_tile(1)).unwrap();
	compile(&mut store, &path);
	store.unload();

	let received: Vec<StoreEvent> = events.try_iter().collect();
	assert_eq!(
		received,
		vec![
			StoreEvent::Loaded,
			StoreEvent::Changed {
				kind: ChangeKind::Add,
				ids: vec![id],
			},
			StoreEvent::Compiled,
			StoreEvent::Unloaded,
		]
	);
}
