// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing: pointer hover, double clicks, keyboard focus, and propagation.
//!
//! Routing rules:
//!
//! - Pointer moves hit-test the tree. When the widget under the pointer changes, the old
//!   one gets [`Event::MouseLeave`] and the new one [`Event::MouseEnter`], before the move
//!   itself is delivered.
//! - A press goes to the hovered widget and then moves keyboard focus there, hiding the
//!   focus ring. A release goes to the same widget and may complete a double click, which
//!   is delivered as [`Event::DoubleClick`] after the release.
//! - Key and text events go only to the focused widget. Releasing Tab with nothing
//!   focused starts keyboard traversal and shows the focus ring.
//! - Everything else is offered to each visible widget in pre-order until one returns
//!   [`Outcome::Stop`].
//!
//! Pointer positions are handed to widgets in their own coordinate frame.

use kurbo::Point;
use trellis_widget_tree::{WidgetFlags, WidgetId};

use crate::{Backend, Canvas, Event, EventCtx, FocusReason, Key, Outcome};

impl<B: Backend> Canvas<B> {
    /// Route a window event into the widget tree.
    ///
    /// A focus request made by a widget while handling the event is applied afterwards.
    pub fn dispatch_event(&mut self, event: Event) -> Outcome {
        let outcome = match event {
            Event::MouseMove { x, y, .. } => {
                let target = self.widget_at(x, y);
                self.update_hover(target, x, y);
                match target {
                    Some(t) => self.deliver_local(t, &event),
                    None => Outcome::Continue,
                }
            }
            Event::MousePress { x, y, time, .. } => self.on_press(&event, x, y, time),
            Event::MouseRelease { x, y, button, time } => {
                self.on_release(&event, x, y, button, time)
            }
            Event::KeyReleased(Key::Tab) if self.focus.is_none() => {
                self.focus_next();
                Outcome::Stop
            }
            ref ev if ev.is_keyboard() => match self.focus {
                Some(f) => self.deliver(f, &event),
                None => Outcome::Continue,
            },
            _ => self.propagate(&event),
        };
        self.apply_focus_request();
        outcome
    }

    /// Apply a focus request a widget made while handling an event.
    ///
    /// Every entry point that delivers events calls this before returning, so a request never
    /// waits for an unrelated event.
    pub(crate) fn apply_focus_request(&mut self) {
        if let Some(target) = self.pending_focus.take() {
            self.transfer_focus(Some(target), FocusReason::Programmatic);
        }
    }

    fn on_press(&mut self, event: &Event, x: i32, y: i32, time: u64) -> Outcome {
        if self.mouse_over.is_none() {
            let target = self.widget_at(x, y);
            self.update_hover(target, x, y);
        }
        let Some(target) = self.mouse_over else {
            self.click.reset();
            return Outcome::Continue;
        };
        self.click
            .on_press(target, Point::new(f64::from(x), f64::from(y)), time);
        let outcome = self.deliver_local(target, event);
        self.transfer_focus(Some(target), FocusReason::Pointer);
        outcome
    }

    fn on_release(&mut self, event: &Event, x: i32, y: i32, button: u8, time: u64) -> Outcome {
        let Some(target) = self.mouse_over.or_else(|| self.widget_at(x, y)) else {
            self.click.reset();
            return Outcome::Continue;
        };
        let outcome = self.deliver_local(target, event);
        if let Some(t) = self.click.on_release(&target, time) {
            tracing::debug!(?t, "double click");
            self.deliver_local(t, &Event::DoubleClick { x, y, button });
        }
        outcome
    }

    fn propagate(&mut self, event: &Event) -> Outcome {
        let order: Vec<WidgetId> = self.tree.walk(self.tree.root(), true).collect();
        for id in order {
            if self.deliver(id, event) == Outcome::Stop {
                return Outcome::Stop;
            }
        }
        Outcome::Continue
    }

    /// Switch the hovered widget, sending leave to the old one and enter to the new one.
    fn update_hover(&mut self, target: Option<WidgetId>, x: i32, y: i32) {
        if target == self.mouse_over {
            return;
        }
        if let Some(old) = self.mouse_over.take() {
            self.deliver(old, &Event::MouseLeave);
        }
        self.mouse_over = target;
        if let Some(new) = target {
            self.deliver_local(new, &Event::MouseEnter { x, y });
        }
    }

    /// Deliver with pointer positions moved into the widget's frame.
    fn deliver_local(&mut self, id: WidgetId, event: &Event) -> Outcome {
        let Some((ox, oy)) = self.tree.absolute_origin(id) else {
            return Outcome::Continue;
        };
        self.deliver(id, &event.translated(-ox, -oy))
    }

    pub(crate) fn deliver(&mut self, id: WidgetId, event: &Event) -> Outcome {
        let Some(rect) = self.tree.absolute_rect(id) else {
            return Outcome::Continue;
        };
        let Some(widget) = self.widgets.get_mut(&id) else {
            return Outcome::Continue;
        };
        let mut ctx = EventCtx {
            id,
            rect,
            dirty: &mut self.dirty,
            focus_request: &mut self.pending_focus,
            focused: self.focus == Some(id),
            hovered: self.mouse_over == Some(id),
        };
        let outcome = widget.window_event(&mut ctx, event);
        tracing::trace!(?id, ?event, ?outcome, "event delivered");
        outcome
    }

    // --- focus ---

    /// Give keyboard focus to `target`.
    ///
    /// Returns `false` if `target` already has focus or does not belong to this canvas's
    /// tree. A live widget that does not accept focus clears the current focus instead.
    pub fn set_focus(&mut self, target: WidgetId) -> bool {
        let moved = self.transfer_focus(Some(target), FocusReason::Programmatic);
        self.apply_focus_request();
        moved
    }

    /// Drop keyboard focus.
    pub fn clear_focus(&mut self) {
        self.transfer_focus(None, FocusReason::Programmatic);
        self.apply_focus_request();
    }

    /// Move focus to the next focusable widget in pre-order, honouring the configured
    /// wrap mode. Shows the focus ring.
    pub fn focus_next(&mut self) -> Option<WidgetId> {
        let from = self.focus.unwrap_or_else(|| self.tree.root());
        let next = self.tree.find_next_focus(from, self.config.focus_wrap)?;
        self.transfer_focus(Some(next), FocusReason::Keyboard);
        self.apply_focus_request();
        self.focus
    }

    pub(crate) fn transfer_focus(&mut self, target: Option<WidgetId>, reason: FocusReason) -> bool {
        if target == self.focus {
            return false;
        }
        if let Some(t) = target
            && !self.tree.is_attached(t)
        {
            tracing::debug!(?t, "focus request for a widget outside this canvas ignored");
            return false;
        }
        let from = self.focus.take();
        if let Some(old) = from {
            self.damage_focus_box(old);
            self.deliver(old, &Event::FocusLose);
        }
        match reason {
            FocusReason::Pointer => self.show_focus_ring = false,
            FocusReason::Keyboard => self.show_focus_ring = true,
            FocusReason::Programmatic => {}
        }
        if let Some(t) = target
            && self.tree.is_visible_in_tree(t)
            && self.tree.flags(t).is_some_and(WidgetFlags::accepts_focus)
        {
            self.focus = Some(t);
            self.deliver(t, &Event::Focus(reason));
            self.damage_focus_box(t);
        }
        tracing::debug!(?from, to = ?self.focus, ?reason, "focus moved");
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use trellis_rect::Rect;
    use trellis_widget_tree::WrapMode;

    use crate::{CanvasConfig, EventCtx, MemoryBackend, Widget};

    use super::*;

    type Log = Arc<Mutex<Vec<(&'static str, Event)>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        stop: bool,
    }

    impl Widget for Recorder {
        fn window_event(&mut self, _ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
            self.log.lock().push((self.name, event.clone()));
            if self.stop {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        }
    }

    fn canvas() -> Canvas<MemoryBackend> {
        Canvas::new(
            MemoryBackend::new(100, 100).unwrap(),
            100,
            100,
            CanvasConfig::default(),
        )
        .unwrap()
    }

    fn recorder(
        c: &mut Canvas<MemoryBackend>,
        parent: WidgetId,
        area: Rect,
        flags: WidgetFlags,
        name: &'static str,
        log: &Log,
    ) -> WidgetId {
        let id = c.create_widget(
            area,
            flags,
            Recorder {
                name,
                log: log.clone(),
                stop: false,
            },
        );
        assert!(c.add_child(parent, id), "attach {name}");
        id
    }

    fn focusable() -> WidgetFlags {
        WidgetFlags::VISIBLE | WidgetFlags::FOCUSABLE
    }

    fn names(log: &Log) -> Vec<&'static str> {
        log.lock().iter().map(|(n, _)| *n).collect()
    }

    #[test]
    fn leave_and_enter_precede_move() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 49, 99), WidgetFlags::VISIBLE, "a", &log);
        let b = recorder(&mut c, root, Rect::new(50, 0, 99, 99), WidgetFlags::VISIBLE, "b", &log);

        c.dispatch_event(Event::MouseMove { x: 10, y: 10, time: 0 });
        assert_eq!(c.mouse_over(), Some(a));
        c.dispatch_event(Event::MouseMove { x: 60, y: 5, time: 1 });
        assert_eq!(c.mouse_over(), Some(b));

        let log = log.lock();
        let events: Vec<_> = log.iter().map(|(n, e)| (*n, e.clone())).collect();
        assert_eq!(
            events,
            vec![
                ("a", Event::MouseEnter { x: 10, y: 10 }),
                ("a", Event::MouseMove { x: 10, y: 10, time: 0 }),
                ("a", Event::MouseLeave),
                ("b", Event::MouseEnter { x: 10, y: 5 }),
                ("b", Event::MouseMove { x: 10, y: 5, time: 1 }),
            ],
            "enter and leave fire once each, before the move, in local coordinates"
        );
    }

    #[test]
    fn double_click_within_threshold() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        recorder(&mut c, root, Rect::new(0, 0, 99, 99), WidgetFlags::VISIBLE, "w", &log);

        let click = |c: &mut Canvas<MemoryBackend>, t: u64| {
            c.dispatch_event(Event::MousePress { x: 5, y: 5, button: 1, time: t });
            c.dispatch_event(Event::MouseRelease { x: 5, y: 5, button: 1, time: t + 10 });
        };
        click(&mut c, 0);
        click(&mut c, 200);
        let doubles = |log: &Log| {
            log.lock()
                .iter()
                .filter(|(_, e)| matches!(e, Event::DoubleClick { .. }))
                .count()
        };
        assert_eq!(doubles(&log), 1, "second click inside the window");
        let last = log.lock().last().cloned();
        assert_eq!(
            last,
            Some(("w", Event::DoubleClick { x: 5, y: 5, button: 1 })),
            "double click follows the release"
        );

        click(&mut c, 5_000);
        click(&mut c, 6_000);
        assert_eq!(doubles(&log), 1, "clicks too far apart");
    }

    #[test]
    fn pointer_focus_hides_ring_and_tab_shows_it() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 49, 49), focusable(), "a", &log);
        let b = recorder(&mut c, root, Rect::new(50, 0, 99, 49), focusable(), "b", &log);

        c.dispatch_event(Event::KeyReleased(Key::Tab));
        assert_eq!(c.focus(), Some(a), "first focusable in pre-order");
        assert!(c.focus_ring_visible());

        c.dispatch_event(Event::MousePress { x: 60, y: 10, button: 1, time: 0 });
        assert_eq!(c.focus(), Some(b));
        assert!(!c.focus_ring_visible());

        let log = log.lock();
        assert!(log.contains(&("a", Event::Focus(FocusReason::Keyboard))), "a focused");
        assert!(log.contains(&("a", Event::FocusLose)), "a lost focus");
        assert!(log.contains(&("b", Event::Focus(FocusReason::Pointer))), "b focused");
    }

    #[test]
    fn focus_traversal_respects_wrap_mode() {
        let log = Log::default();
        let mut c = Canvas::new(
            MemoryBackend::new(50, 50).unwrap(),
            50,
            50,
            CanvasConfig::default().with_focus_wrap(WrapMode::Wrap),
        )
        .unwrap();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 9, 9), focusable(), "a", &log);
        let b = recorder(&mut c, root, Rect::new(10, 0, 19, 9), focusable(), "b", &log);
        assert_eq!(c.focus_next(), Some(a));
        assert_eq!(c.focus_next(), Some(b));
        assert_eq!(c.focus_next(), Some(a), "wraps to the start");

        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 9, 9), focusable(), "a", &log);
        assert_eq!(c.focus_next(), Some(a));
        assert_eq!(c.focus_next(), None, "end of tree without wrapping");
        assert_eq!(c.focus(), Some(a), "focus stays put");
    }

    #[test]
    fn keys_go_only_to_focus() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 9, 9), focusable(), "a", &log);
        recorder(&mut c, root, Rect::new(10, 0, 19, 9), focusable(), "b", &log);

        c.dispatch_event(Event::Char('x'));
        assert!(log.lock().is_empty(), "nothing focused");

        assert!(c.set_focus(a));
        log.lock().clear();
        c.dispatch_event(Event::KeyPressed(Key::Enter));
        c.dispatch_event(Event::Char('x'));
        assert_eq!(names(&log), ["a", "a"]);
    }

    #[test]
    fn propagation_stops() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        recorder(&mut c, root, Rect::new(10, 0, 19, 9), WidgetFlags::VISIBLE, "b", &log);
        recorder(&mut c, root, Rect::new(20, 0, 29, 9), WidgetFlags::empty(), "h", &log);
        let a = c.create_widget(
            Rect::new(0, 0, 9, 9),
            WidgetFlags::VISIBLE,
            Recorder {
                name: "a",
                log: log.clone(),
                stop: true,
            },
        );
        assert!(c.add_child(root, a));
        recorder(&mut c, a, Rect::new(0, 0, 4, 4), WidgetFlags::VISIBLE, "a1", &log);
        recorder(&mut c, root, Rect::new(30, 0, 39, 9), WidgetFlags::VISIBLE, "c", &log);

        // Pre-order in insertion order; the hidden widget is skipped and `a` consumes it.
        assert_eq!(c.dispatch_event(Event::Custom(7)), Outcome::Stop);
        assert_eq!(names(&log), ["b", "a"]);

        log.lock().clear();
        assert!(c.destroy_widget(a));
        assert_eq!(c.dispatch_event(Event::Custom(8)), Outcome::Continue);
        assert_eq!(names(&log), ["b", "c"], "orphaned child no longer reached");
    }

    #[test]
    fn focus_rejected_across_canvases() {
        let log = Log::default();
        let mut one = canvas();
        let mut two = canvas();
        let root = two.root();
        let foreign = recorder(&mut two, root, Rect::new(0, 0, 9, 9), focusable(), "x", &log);
        assert!(!one.set_focus(foreign));
        assert_eq!(one.focus(), None);

        let detached = one.create_widget(Rect::new(0, 0, 9, 9), focusable(), Recorder {
            name: "d",
            log: log.clone(),
            stop: false,
        });
        assert!(!one.set_focus(detached), "not on the canvas yet");
    }

    #[test]
    fn unfocusable_target_clears_focus() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 9, 9), focusable(), "a", &log);
        let plain = recorder(&mut c, root, Rect::new(10, 0, 19, 9), WidgetFlags::VISIBLE, "p", &log);
        c.set_focus(a);
        c.dispatch_event(Event::MousePress { x: 12, y: 2, button: 1, time: 0 });
        assert_eq!(c.mouse_over(), Some(plain));
        assert_eq!(c.focus(), None);
    }

    #[test]
    fn removal_releases_hover_and_focus() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let group = recorder(&mut c, root, Rect::new(0, 0, 49, 49), WidgetFlags::VISIBLE, "g", &log);
        let a = recorder(&mut c, group, Rect::new(0, 0, 9, 9), focusable(), "a", &log);

        c.dispatch_event(Event::MouseMove { x: 1, y: 1, time: 0 });
        assert_eq!(c.mouse_over(), Some(a));
        c.set_focus(a);
        log.lock().clear();

        assert!(c.remove_from_parent(group));
        assert_eq!(c.focus(), None);
        assert_eq!(c.mouse_over(), None);
        let log = log.lock();
        assert!(log.contains(&("a", Event::FocusLose)), "focus released");
        assert!(log.contains(&("a", Event::MouseLeave)), "hover released");
    }

    #[test]
    fn hiding_and_destroying_release_refs() {
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let a = recorder(&mut c, root, Rect::new(0, 0, 9, 9), focusable(), "a", &log);
        c.set_focus(a);
        assert!(c.set_visible(a, false));
        assert_eq!(c.focus(), None);

        assert!(c.set_visible(a, true));
        c.set_focus(a);
        c.dispatch_event(Event::MouseMove { x: 1, y: 1, time: 0 });
        assert!(c.destroy_widget(a));
        assert_eq!(c.focus(), None);
        assert_eq!(c.mouse_over(), None);
        assert!(!c.tree().is_alive(a));
        assert!(!c.set_focus(a), "stale id");
    }

    #[test]
    fn widget_focus_request_applies_after_event() {
        struct Grabber;
        impl Widget for Grabber {
            fn window_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
                if matches!(event, Event::Custom(_)) {
                    ctx.request_focus();
                    ctx.invalidate();
                    return Outcome::Stop;
                }
                Outcome::Continue
            }
        }
        let mut c = canvas();
        let root = c.root();
        let g = c.create_widget(Rect::new(5, 5, 14, 14), focusable(), Grabber);
        c.add_child(root, g);
        c.redraw_widgets(false);
        c.dispatch_event(Event::Custom(0));
        assert_eq!(c.focus(), Some(g));
        assert!(
            c.dirty_region().union().contains_rect(&Rect::new(5, 5, 14, 14)),
            "widget damage recorded"
        );
    }

    #[test]
    fn focus_requested_during_focus_change_applies_immediately() {
        // Takes focus back whenever it loses it.
        struct Sticky;
        impl Widget for Sticky {
            fn window_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> Outcome {
                if matches!(event, Event::FocusLose) {
                    ctx.request_focus();
                }
                Outcome::Continue
            }
        }
        let log = Log::default();
        let mut c = canvas();
        let root = c.root();
        let s = c.create_widget(Rect::new(0, 0, 9, 9), focusable(), Sticky);
        c.add_child(root, s);
        let other = recorder(&mut c, root, Rect::new(10, 0, 19, 9), focusable(), "o", &log);

        assert!(c.set_focus(s));
        c.clear_focus();
        assert_eq!(c.focus(), Some(s), "request made on focus loss");

        c.set_focus(other);
        assert_eq!(c.focus(), Some(s));
        assert_eq!(
            names(&log),
            ["o", "o"],
            "the other widget saw focus arrive and leave"
        );

        assert!(c.set_flags(s, WidgetFlags::VISIBLE));
        assert_eq!(c.focus(), None, "no longer focusable, so the request is refused");
        c.dispatch_event(Event::Custom(1));
        assert_eq!(c.focus(), None, "nothing left pending");
    }
}
