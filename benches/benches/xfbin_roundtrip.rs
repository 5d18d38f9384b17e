//! Benchmark suite for XFBIN decoding and encoding
//!
//! Measures the container round trip on synthetic character files along
//! with the NUD and NUT codecs that dominate model payloads.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use xfbin_benches::{generate_document, generate_nud, generate_nut};
use xfbin_types::prelude::*;

/// Benchmark whole-container decoding at several document sizes
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("xfbin_decode");

	for (characters, models) in [(1, 2), (4, 8), (8, 16)] {
		let Ok(document) = generate_document(characters, 32, models, 64) else {
			eprintln!("Warning: could not build synthetic document");
			continue;
		};
		let Ok(bytes) = XfbinWriter::default().write(&document) else {
			eprintln!("Warning: could not encode synthetic document");
			continue;
		};

		group.throughput(Throughput::Bytes(bytes.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", format!("{characters}x{models}")), &bytes, |b, bytes| {
			b.iter(|| {
				let result = XfbinReader::default().read(black_box(bytes));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark whole-container encoding
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("xfbin_encode");

	for (characters, models) in [(1, 2), (4, 8), (8, 16)] {
		let Ok(document) = generate_document(characters, 32, models, 64) else {
			eprintln!("Warning: could not build synthetic document");
			continue;
		};

		group.throughput(Throughput::Elements(document.chunk_count() as u64));
		group.bench_with_input(
			BenchmarkId::new("encode", format!("{characters}x{models}")),
			&document,
			|b, document| {
				let writer = XfbinWriter::default();
				b.iter(|| {
					let result = writer.write(black_box(document));
					black_box(result)
				});
			},
		);
	}

	group.finish();
}

/// Benchmark the NUD mesh codec in both directions
fn bench_nud(c: &mut Criterion) {
	let mut group = c.benchmark_group("nud");

	for vertex_count in [64, 512, 4096] {
		let nud = generate_nud(4, vertex_count);
		let Ok(bytes) = nud.to_bytes() else {
			eprintln!("Warning: could not encode synthetic NUD");
			continue;
		};

		group.throughput(Throughput::Elements((vertex_count * 4) as u64));
		group.bench_with_input(BenchmarkId::new("write", vertex_count), &nud, |b, nud| {
			b.iter(|| black_box(black_box(nud).to_bytes()));
		});
		group.bench_with_input(BenchmarkId::new("read", vertex_count), &bytes, |b, bytes| {
			b.iter(|| black_box(Nud::from_bytes(black_box(bytes))));
		});
	}

	group.finish();
}

/// Benchmark NUT parsing and DDS export
fn bench_nut_to_dds(c: &mut Criterion) {
	let mut group = c.benchmark_group("nut_dds");

	for size in [64u16, 256, 1024] {
		let Ok(bytes) = generate_nut(size, size) else {
			eprintln!("Warning: could not build synthetic NUT");
			continue;
		};

		group.throughput(Throughput::Bytes(bytes.len() as u64));
		group.bench_with_input(BenchmarkId::new("to_dds", size), &bytes, |b, bytes| {
			b.iter(|| {
				let result = Nut::from_bytes(black_box(bytes)).and_then(|nut| nut.to_dds(0));
				black_box(result)
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_nud, bench_nut_to_dds);
criterion_main!(benches);
