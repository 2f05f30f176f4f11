//! Benchmark suite for sprite container compilation
//!
//! Measures a full compile of an in-memory store to disk, and an incremental
//! recompile where most records are copied from the previous file.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench store_compile

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use otsprite_benches::{TileShape, bench_version, generate_store, generate_tile};
use otsprite_types::file::spr::{SaveStatus, Store};
use std::{hint::black_box, path::Path};

fn compile(store: &mut Store, path: &Path) {
	match store.save(path) {
		Ok(SaveStatus::Compiling(_)) => {
			if let Err(e) = store.finish_compile() {
				panic!("compile failed: {e}");
			}
		}
		Ok(other) => panic!("expected a compile, got {other:?}"),
		Err(e) => panic!("save failed: {e}"),
	}
}

/// Benchmark compiling a store that has no backing file yet
fn bench_full_compile(c: &mut Criterion) {
	let mut group = c.benchmark_group("spr_full_compile");
	group.sample_size(20);

	let Ok(dir) = tempfile::tempdir() else {
		eprintln!("Warning: Could not create a temporary directory");
		return;
	};

	for count in [1_000usize, 10_000] {
		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("compile", count), &count, |b, &count| {
			let path = dir.path().join(format!("full_{count}.spr"));
			b.iter_batched(
				|| generate_store(count),
				|mut store| {
					compile(&mut store, &path);
					black_box(store.count())
				},
				BatchSize::LargeInput,
			);
		});
	}

	group.finish();
}

/// Benchmark recompiling a file-backed store after a handful of edits
fn bench_incremental_compile(c: &mut Criterion) {
	let mut group = c.benchmark_group("spr_incremental_compile");
	group.sample_size(20);

	let Ok(dir) = tempfile::tempdir() else {
		eprintln!("Warning: Could not create a temporary directory");
		return;
	};

	let count = 10_000usize;
	let base = dir.path().join("base.spr");
	let mut seed = generate_store(count);
	compile(&mut seed, &base);
	drop(seed);

	let (version, features) = bench_version();
	let edit = generate_tile(TileShape::Checker, 42);
	let target = dir.path().join("incremental.spr");

	group.throughput(Throughput::Elements(count as u64));
	group.bench_function("ten_edits", |b| {
		b.iter_batched(
			|| {
				let Ok(mut store) = Store::open(&base, version.clone(), features) else {
					panic!("failed to open {}", base.display());
				};
				for id in (1..=10).map(|i| i * 997) {
					if let Err(e) = store.replace_pixels(id, &edit) {
						panic!("replace failed: {e}");
					}
				}
				store
			},
			|mut store| {
				compile(&mut store, &target);
				black_box(store.count())
			},
			BatchSize::LargeInput,
		);
	});

	group.finish();
}

criterion_group!(benches, bench_full_compile, bench_incremental_compile);
criterion_main!(benches);
