// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A canvas shared between threads.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use trellis_rect::Rect;

use crate::{Backend, Canvas, Event, Outcome};

/// A cloneable handle to a canvas behind one lock.
///
/// Every operation, painting included, runs with the lock held, so a redraw never observes
/// a half-applied tree change or event.
pub struct SharedCanvas<B: Backend> {
    inner: Arc<Mutex<Canvas<B>>>,
}

impl<B: Backend> Clone for SharedCanvas<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: Backend> core::fmt::Debug for SharedCanvas<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedCanvas")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl<B: Backend> SharedCanvas<B> {
    /// Share `canvas`.
    pub fn new(canvas: Canvas<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    /// Lock the canvas.
    pub fn lock(&self) -> MutexGuard<'_, Canvas<B>> {
        self.inner.lock()
    }

    /// Run `f` with the canvas locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Canvas<B>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`Canvas::dispatch_event`].
    pub fn dispatch_event(&self, event: Event) -> Outcome {
        self.inner.lock().dispatch_event(event)
    }

    /// See [`Canvas::add_dirty_rect`].
    pub fn add_dirty_rect(&self, rect: Rect) {
        self.inner.lock().add_dirty_rect(rect);
    }

    /// See [`Canvas::redraw_widgets`].
    pub fn redraw_widgets(&self, clear: bool) {
        self.inner.lock().redraw_widgets(clear);
    }

    /// Take the canvas back if this is the last handle.
    pub fn try_unwrap(self) -> Result<Canvas<B>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use trellis_widget_tree::WidgetFlags;

    use super::*;
    use crate::{CanvasConfig, Color, DrawCtx, EventCtx, MemoryBackend, Widget};

    #[derive(Default)]
    struct Counter {
        events: u32,
    }

    impl Widget for Counter {
        fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
            let r = ctx.local_rect();
            ctx.paint().draw_box(r, Color::WHITE);
        }

        fn window_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
            if matches!(event, Event::Custom(_)) {
                self.events += 1;
                ctx.invalidate();
            }
            Outcome::Continue
        }
    }

    #[test]
    fn events_and_redraws_from_many_threads() {
        let mut canvas = Canvas::new(
            MemoryBackend::new(64, 64).unwrap(),
            64,
            64,
            CanvasConfig::default(),
        )
        .unwrap();
        let root = canvas.root();
        let w = canvas.create_widget(
            Rect::new(0, 0, 31, 31),
            WidgetFlags::VISIBLE,
            Counter::default(),
        );
        canvas.add_child(root, w);
        let shared = SharedCanvas::new(canvas);

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..25 {
                        shared.dispatch_event(Event::Custom(i * 100 + n));
                        if n % 5 == 0 {
                            shared.redraw_widgets(true);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        shared.redraw_widgets(true);

        let canvas = shared.try_unwrap().unwrap();
        assert!(canvas.dirty_region().is_empty(), "redraw consumed the damage");
        assert_eq!(canvas.backend().pixel(5, 5), Some(Color::WHITE));
        assert_eq!(canvas.backend().pixel(40, 40), Some(Color::TRANSPARENT));
        let widgets = canvas.destroy();
        assert_eq!(widgets.len(), 1);
    }

    #[test]
    fn try_unwrap_needs_last_handle() {
        let canvas = Canvas::new(
            MemoryBackend::new(8, 8).unwrap(),
            8,
            8,
            CanvasConfig::default(),
        )
        .unwrap();
        let a = SharedCanvas::new(canvas);
        let b = a.clone();
        let a = a.try_unwrap().unwrap_err();
        drop(b);
        assert!(a.try_unwrap().is_ok());
    }
}
