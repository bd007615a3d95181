// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph cache lookups and shelf packing.

#![allow(missing_docs, reason = "criterion macros generate undocumented items")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use trellis_atlas::{
    FontId, GlyphCache, GlyphKey, GlyphMetrics, PixelFormat, Raster, ShelfAllocator,
};

fn block(_key: &GlyphKey) -> Option<Raster<GlyphMetrics>> {
    Some(Raster::new(
        7,
        12,
        PixelFormat::A8,
        vec![0x80; 84],
        GlyphMetrics {
            advance: 8,
            bearing_x: 0,
            bearing_y: 0,
        },
    ))
}

fn bench_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_fetch");
    for count in [64_u32, 512] {
        let keys: Vec<GlyphKey> = (0..count)
            .filter_map(|i| char::from_u32(0x20 + i))
            .map(|ch| GlyphKey::new(FontId(0), ch))
            .collect();

        group.bench_with_input(BenchmarkId::new("cold", count), &keys, |b, keys| {
            b.iter(|| {
                let mut cache = GlyphCache::new(512, 512, PixelFormat::A8).unwrap();
                let mut source = block;
                for key in keys {
                    black_box(cache.fetch(*key, &mut source));
                }
                cache.len()
            });
        });

        let mut warm = GlyphCache::new(512, 512, PixelFormat::A8).unwrap();
        let mut source = block;
        for key in &keys {
            warm.fetch(*key, &mut source);
        }
        group.bench_with_input(BenchmarkId::new("warm", count), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(warm.get(key));
                }
            });
        });
    }
    group.finish();
}

fn bench_shelf(c: &mut Criterion) {
    c.bench_function("shelf_fill_1024", |b| {
        b.iter(|| {
            let mut shelf = ShelfAllocator::new(1024, 1024);
            let mut placed = 0_u32;
            let mut seed = 1_u32;
            while placed < 4096 {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let w = 4 + (seed >> 16) % 20;
                let h = 8 + (seed >> 8) % 8;
                if shelf.alloc(w, h).is_none() {
                    break;
                }
                placed += 1;
            }
            black_box(placed)
        });
    });
}

criterion_group!(benches, bench_fetch, bench_shelf);
criterion_main!(benches);
