// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small widget tree rendered into memory.
//!
//! This example shows:
//! - building a tree of panels and buttons on a [`Canvas`],
//! - feeding pointer and keyboard events through [`Canvas::dispatch_event`],
//! - repainting only what the events damaged, and dumping the result as ASCII.
//!
//! Run:
//! - `cargo run -p trellis_demos --example widgets`

use trellis_compositor::{
    Canvas, CanvasConfig, Color, DrawCtx, Event, EventCtx, FontId, GlyphKey, GlyphMetrics, Key,
    MemoryBackend, Outcome, PixelFormat, Raster, Rect, Widget, WidgetFlags,
};

const PANEL: Color = Color::rgb(0x60, 0x60, 0x60);
const BUTTON: Color = Color::rgb(0x20, 0x60, 0xc0);
const HOT: Color = Color::rgb(0x40, 0xa0, 0xff);
const PRESSED: Color = Color::rgb(0xff, 0xff, 0xff);

struct Panel;

impl Widget for Panel {
    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let r = ctx.local_rect();
        ctx.paint().draw_box(r, PANEL);
    }
}

/// Highlights under the pointer, flashes on double click, and labels itself.
struct Button {
    label: &'static str,
    flashed: bool,
}

impl Widget for Button {
    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        let r = ctx.local_rect();
        let color = match (self.flashed, ctx.is_hovered()) {
            (true, _) => PRESSED,
            (false, true) => HOT,
            (false, false) => BUTTON,
        };
        ctx.paint().draw_box(r, color);
        ctx.paint()
            .draw_string(1, 1, FontId(0), Color::BLACK, self.label);
    }

    fn window_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
        match event {
            Event::MouseEnter { .. } | Event::MouseLeave => ctx.invalidate(),
            Event::DoubleClick { .. } => {
                self.flashed = !self.flashed;
                ctx.invalidate();
            }
            Event::KeyPressed(Key::Enter) => {
                println!("{} activated", self.label);
                return Outcome::Stop;
            }
            _ => {}
        }
        Outcome::Continue
    }
}

/// One-pixel-wide bars, so labels show up in the ASCII dump.
fn bar_glyph(key: &GlyphKey) -> Option<Raster<GlyphMetrics>> {
    if key.code_point == ' ' {
        return Some(Raster::empty(GlyphMetrics {
            advance: 2,
            bearing_x: 0,
            bearing_y: 0,
        }));
    }
    Some(Raster::new(
        1,
        3,
        PixelFormat::A8,
        vec![0xff; 3],
        GlyphMetrics {
            advance: 2,
            bearing_x: 0,
            bearing_y: 0,
        },
    ))
}

fn dump(canvas: &Canvas<MemoryBackend>) {
    let (w, h) = (canvas.width(), canvas.height());
    for y in 0..i32::try_from(h).unwrap_or(0) {
        let line: String = (0..i32::try_from(w).unwrap_or(0))
            .map(|x| match canvas.backend().pixel(x, y) {
                Some(Color::BLACK) => '#',
                Some(PANEL) => '.',
                Some(BUTTON) => 'o',
                Some(HOT) => 'O',
                Some(PRESSED) => '*',
                _ => ' ',
            })
            .collect();
        println!("{line}");
    }
    println!();
}

fn main() {
    let backend = MemoryBackend::new(48, 20).unwrap();
    let mut canvas = Canvas::new(backend, 48, 20, CanvasConfig::default()).unwrap();
    canvas.set_glyph_source(bar_glyph);

    let root = canvas.root();
    let panel = canvas.create_widget(Rect::new(2, 2, 45, 17), WidgetFlags::VISIBLE, Panel);
    canvas.add_child(root, panel);

    let focusable = WidgetFlags::VISIBLE | WidgetFlags::FOCUSABLE;
    let mut buttons = Vec::new();
    for (i, label) in ["ok", "cancel", "help"].into_iter().enumerate() {
        let x = 2 + 14 * i32::try_from(i).unwrap_or(0);
        let button = canvas.create_widget(
            Rect::from_xywh(x, 4, 12, 6),
            focusable,
            Button {
                label,
                flashed: false,
            },
        );
        canvas.add_child(panel, button);
        buttons.push(button);
    }

    canvas.draw_widgets(true);
    println!("initial frame");
    dump(&canvas);

    // Hover the second button, then double click it.
    canvas.dispatch_event(Event::MouseMove { x: 20, y: 8, time: 0 });
    for t in [10, 120] {
        canvas.dispatch_event(Event::MousePress { x: 20, y: 8, button: 1, time: t });
        canvas.dispatch_event(Event::MouseRelease { x: 20, y: 8, button: 1, time: t + 30 });
    }
    println!("dirty before redraw: {:?}", canvas.dirty_region().rects());
    canvas.redraw_widgets(true);
    println!("after double click (focus: {:?})", canvas.focus());
    dump(&canvas);

    // Keyboard traversal shows the focus ring.
    canvas.clear_focus();
    canvas.dispatch_event(Event::KeyReleased(Key::Tab));
    canvas.focus_next();
    canvas.dispatch_event(Event::KeyPressed(Key::Enter));
    canvas.redraw_widgets(true);
    println!("keyboard focus on {:?}", canvas.focus());
    dump(&canvas);

    // Hiding a widget damages the area it covered.
    canvas.set_visible(buttons[2], false);
    canvas.redraw_widgets(true);
    println!("help hidden");
    dump(&canvas);

    let stats = canvas.glyph_cache().stats();
    println!(
        "glyphs cached: {} (hits {}, misses {})",
        canvas.glyph_cache().len(),
        stats.hits,
        stats.misses
    );
}
