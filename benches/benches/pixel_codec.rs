//! Benchmark suite for the sprite pixel codec
//!
//! Measures run-length compression and expansion of single 32×32 tiles across
//! shapes that produce very different run counts.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench pixel_codec

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use otsprite_benches::{TileShape, generate_tile};
use otsprite_types::file::sprite::{self, constants::PIXEL_COUNT};
use std::hint::black_box;

/// Benchmark compression with and without the alpha channel
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_compress");
	group.throughput(Throughput::Elements(PIXEL_COUNT as u64));

	for shape in TileShape::ALL {
		let tile = generate_tile(shape, 7);
		for keep_alpha in [false, true] {
			let id = format!("{}/alpha={keep_alpha}", shape.label());
			group.bench_with_input(BenchmarkId::new("compress", id), &tile, |b, tile| {
				b.iter(|| black_box(sprite::compress(black_box(tile), keep_alpha)));
			});
		}
	}

	group.finish();
}

/// Benchmark expansion of compressed payloads
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_decompress");
	group.throughput(Throughput::Elements(PIXEL_COUNT as u64));

	for shape in TileShape::ALL {
		let Ok(payload) = sprite::compress(&generate_tile(shape, 7), true) else {
			eprintln!("Warning: Could not compress {} tile", shape.label());
			continue;
		};

		group.bench_with_input(BenchmarkId::new("decompress", shape.label()), &payload, |b, payload| {
			b.iter(|| black_box(sprite::decompress(black_box(payload), true)));
		});
	}

	group.finish();
}

/// Benchmark the ARGB conversion used by object bundles
fn bench_argb(c: &mut Criterion) {
	let mut group = c.benchmark_group("sprite_argb");
	let tile = generate_tile(TileShape::Disc, 3);

	group.bench_function("to_argb", |b| {
		b.iter(|| black_box(sprite::to_argb(black_box(&tile))));
	});

	group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_argb);
criterion_main!(benches);
