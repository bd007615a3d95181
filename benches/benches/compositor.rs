// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage accumulation and full redraws over the in-memory backend.

#![allow(missing_docs, reason = "criterion macros generate undocumented items")]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use trellis_compositor::{
    Canvas, CanvasConfig, Color, DirtyRegion, DrawCtx, MemoryBackend, Rect, Widget, WidgetFlags,
};

struct Fill(Color);

impl Widget for Fill {
    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let r = ctx.local_rect();
        ctx.paint().draw_box(r, self.0);
    }
}

fn bench_damage(c: &mut Criterion) {
    let bounds = Rect::new(0, 0, 1919, 1079);
    c.bench_function("dirty_add_scattered_1000", |b| {
        b.iter(|| {
            let mut region = DirtyRegion::new(bounds);
            let mut seed = 7_i32;
            for _ in 0..1000 {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let x = (seed >> 8).rem_euclid(1900);
                let y = (seed >> 4).rem_euclid(1060);
                region.add(Rect::from_xywh(x, y, 16, 16));
            }
            black_box(region.len())
        });
    });
}

fn bench_redraw(c: &mut Criterion) {
    let mut canvas = Canvas::new(
        MemoryBackend::new(320, 240).unwrap(),
        320,
        240,
        CanvasConfig::default(),
    )
    .unwrap();
    let root = canvas.root();
    for row in 0..12 {
        for col in 0..16 {
            let id = canvas.create_widget(
                Rect::from_xywh(col * 20, row * 20, 18, 18),
                WidgetFlags::VISIBLE,
                Fill(Color::rgb(0x20, 0x40, 0x80)),
            );
            canvas.add_child(root, id);
        }
    }
    c.bench_function("draw_widgets_192", |b| {
        b.iter(|| canvas.draw_widgets(true));
    });
    c.bench_function("redraw_one_widget", |b| {
        b.iter(|| {
            canvas.add_dirty_rect(Rect::from_xywh(100, 100, 18, 18));
            canvas.redraw_widgets(true);
        });
    });
}

criterion_group!(benches, bench_damage, bench_redraw);
criterion_main!(benches);
