use otsprite_rs::prelude::*;

use crate::{compile, framed_tile, version_860, version_1098};

/// Pulls the sprites referenced by the default group out of `store`.
fn collect_sprites(store: &mut SprStore, thing: &ThingType) -> Vec<Sprite> {
	thing.frame_group().unwrap().sprite_ids().iter().map(|&id| store.get_sprite(id).unwrap()).collect()
}

#[test_log::test]
fn test_move_missile_between_clients() {
	let dir = tempfile::tempdir().unwrap();
	let features = ClientFeatures {
		extended: false,
		transparency: true,
	};

	// Source client
	let mut source = SprStore::temporary(version_1098(), features);
	let mut thing = ThingType::create(300, ThingCategory::Missile).unwrap();
	let group = thing.frame_groups.get_mut(FrameGroupKind::Default).unwrap();
	for (seed, id) in group.sprite_ids_mut().iter_mut().enumerate() {
		*id = source.add_pixels(&framed_tile(seed as u8)).unwrap();
	}

	let sprites = collect_sprites(&mut source, &thing);
	let data = ThingData::new(thing, SpriteGroups::new(sprites)).unwrap();
	let bundle = dir.path().join("missile.obd");
	obd::save(&bundle, &data, ObdVersion::Version1).unwrap();

	// Target client
	let imported = obd::load(&bundle).unwrap();
	assert_eq!(imported.category(), ThingCategory::Missile);

	let (mut thing, sprites) = imported.into_parts();
	let mut target = SprStore::temporary(version_860(), ClientFeatures::NONE);
	let ids = target.add_sprites(sprites.get(FrameGroupKind::Default).unwrap().to_vec()).unwrap();
	assert_eq!(ids, (2..=10).collect::<Vec<u32>>());

	let group = thing.frame_groups.get_mut(FrameGroupKind::Default).unwrap();
	group.sprite_ids_mut().copy_from_slice(&ids);

	let path = dir.path().join("Tibia.spr");
	assert_eq!(compile(&mut target, &path), CompileOutcome::Compiled);

	let mut reopened = SprStore::open(&path, version_860(), ClientFeatures::NONE).unwrap();
	for (seed, &id) in thing.frame_group().unwrap().sprite_ids().iter().enumerate() {
		assert_eq!(reopened.sprite_pixels(id).unwrap(), framed_tile(seed as u8));
	}
}

#[test_log::test]
fn test_outfit_bundle_uses_merged_group() {
	let mut store = SprStore::temporary(version_860(), ClientFeatures::NONE);

	let mut outfit = ThingType::create(1, ThingCategory::Outfit).unwrap();
	for kind in FrameGroupKind::ALL {
		let group = outfit.frame_groups.get_mut(kind).unwrap();
		for id in group.sprite_ids_mut() {
			*id = store.add_pixels(&framed_tile(*id as u8)).unwrap();
		}
	}

	let merged = outfit.to_single_frame_group().unwrap();
	let group = merged.frame_group().unwrap();
	assert_eq!(group.frames(), 4);
	assert_eq!(group.total_sprites(), 16);

	let sprites = collect_sprites(&mut store, &merged);
	let data = ThingData::new(merged, SpriteGroups::new(sprites)).unwrap();
	let decoded = obd::decode(&obd::encode(&data, ObdVersion::Version1).unwrap()).unwrap();

	let group = decoded.frame_group(FrameGroupKind::Default).unwrap();
	assert_eq!(group.frames(), 4);
	assert_eq!(group.dimensions().pattern_x, 4);
	assert_eq!(group.animation().unwrap().durations, vec![FrameDuration::new(300, 300); 4]);
	assert_eq!(group.sprite_ids(), data.frame_group(FrameGroupKind::Default).unwrap().sprite_ids());
	assert!(decoded.frame_group(FrameGroupKind::Walking).is_none());
}

#[test]
fn test_sprite_sheet_of_bundle() {
	let mut thing = ThingType::create(5, ThingCategory::Item).unwrap();
	let mut dimensions = thing.frame_group().unwrap().dimensions();
	dimensions.width = 2;
	dimensions.exact_size = 64;
	thing.frame_groups.get_mut(FrameGroupKind::Default).unwrap().reshape(dimensions);

	let sprites = vec![
		Sprite::from_pixels(1, true, &framed_tile(1)).unwrap(),
		Sprite::from_pixels(2, true, &framed_tile(2)).unwrap(),
	];
	let data = ThingData::new(thing, SpriteGroups::new(sprites)).unwrap();
	let decoded = obd::decode(&obd::encode(&data, ObdVersion::Version1).unwrap()).unwrap();

	let sheet = decoded.sprite_sheet(FrameGroupKind::Default).unwrap();
	assert_eq!((sheet.width(), sheet.height()), (64, 32));
	assert_eq!(sheet.rects().len(), 1);
	assert_eq!(sheet.rgba_pixels().len(), 64 * 32 * 4);
}

#[test]
fn test_version_two_is_write_only() {
	let thing = ThingType::create(5, ThingCategory::Effect).unwrap();
	let data = ThingData::new(thing, SpriteGroups::new(vec![Sprite::new(1, true)])).unwrap();

	let bytes = obd::encode(&data, ObdVersion::Version2).unwrap();
	let err = obd::decode(&bytes).unwrap_err();
	assert!(err.is_unsupported());
	assert_eq!(err.kind(), ErrorKind::Format);
}
