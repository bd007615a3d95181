// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-click recognition.
//!
//! The recogniser is a three-phase machine driven by press and release events:
//!
//! - **Idle**: nothing pending. A press arms the machine and records the target, position,
//!   and time.
//! - **Armed**: one press seen. A second press on the same target within the time window
//!   (and within the distance tolerance, if one is configured) fires the machine. A press on
//!   another target, or one that comes too late, re-arms from that press instead.
//! - **Fired**: the release that follows reports the double click if it lands on the same
//!   target within the window, and returns the machine to Idle either way.
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use trellis_event_state::double_click::{DoubleClickState, Phase};
//!
//! let mut state: DoubleClickState<u32> = DoubleClickState::new();
//! let at = Point::new(10.0, 10.0);
//!
//! state.on_press(7, at, 1_000);
//! assert_eq!(state.on_release(&7, 1_040), None);
//! assert_eq!(state.on_press(7, at, 1_200), Phase::Fired);
//! assert_eq!(state.on_release(&7, 1_250), Some(7));
//! assert_eq!(state.phase(), Phase::Idle);
//! ```
//!
//! A slow second click re-arms instead of firing:
//!
//! ```
//! # use kurbo::Point;
//! # use trellis_event_state::double_click::{DoubleClickState, Phase};
//! let mut state: DoubleClickState<u32> = DoubleClickState::new();
//! state.on_press(7, Point::ZERO, 0);
//! state.on_release(&7, 50);
//! assert_eq!(state.on_press(7, Point::ZERO, 900), Phase::Armed);
//! assert_eq!(state.on_release(&7, 950), None);
//! ```

use kurbo::Point;

/// Default time window between the first press and the second release, in milliseconds.
pub const DEFAULT_TIME_THRESHOLD_MS: u64 = 750;

/// Recogniser phase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No press pending.
    #[default]
    Idle,
    /// One press recorded.
    Armed,
    /// Second press accepted; waiting for its release.
    Fired,
}

#[derive(Clone, Debug)]
struct Arming<K> {
    target: K,
    position: Point,
    time: u64,
}

/// Double-click state machine.
#[derive(Clone, Debug)]
pub struct DoubleClickState<K> {
    /// Longest time from the arming press to the second release (milliseconds).
    pub time_threshold: u64,
    /// Largest pointer travel between the two presses, or `None` for no spatial check.
    pub distance_threshold: Option<f64>,
    phase: Phase,
    armed: Option<Arming<K>>,
}

impl<K: PartialEq + Clone> DoubleClickState<K> {
    /// Create a recogniser with the default 750 ms window and no distance check.
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_TIME_THRESHOLD_MS, None)
    }

    /// Create a recogniser with custom thresholds.
    pub fn with_thresholds(time_threshold: u64, distance_threshold: Option<f64>) -> Self {
        Self {
            time_threshold,
            distance_threshold,
            phase: Phase::Idle,
            armed: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Target recorded by the arming press, if any.
    pub fn armed_target(&self) -> Option<&K> {
        self.armed.as_ref().map(|a| &a.target)
    }

    /// Record a press and return the resulting phase.
    pub fn on_press(&mut self, target: K, position: Point, timestamp: u64) -> Phase {
        if self.phase == Phase::Armed
            && let Some(a) = &self.armed
            && a.target == target
            && timestamp.saturating_sub(a.time) <= self.time_threshold
            && self
                .distance_threshold
                .is_none_or(|d| a.position.distance(position) <= d)
        {
            self.phase = Phase::Fired;
            return self.phase;
        }
        self.armed = Some(Arming {
            target,
            position,
            time: timestamp,
        });
        self.phase = Phase::Armed;
        self.phase
    }

    /// Record a release.
    ///
    /// Returns the target of a completed double click. A release while Fired always returns
    /// the machine to Idle; a release while Armed leaves it armed.
    pub fn on_release(&mut self, target: &K, timestamp: u64) -> Option<K> {
        if self.phase != Phase::Fired {
            return None;
        }
        self.phase = Phase::Idle;
        let a = self.armed.take()?;
        (a.target == *target && timestamp.saturating_sub(a.time) <= self.time_threshold)
            .then_some(a.target)
    }

    /// Forget any pending sequence.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.armed = None;
    }
}

impl<K: PartialEq + Clone> Default for DoubleClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Point = Point::new(10.0, 20.0);

    #[test]
    fn double_click_within_window() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();

        assert_eq!(state.on_press(42, P, 1000), Phase::Armed);
        assert_eq!(state.on_release(&42, 1050), None);
        assert_eq!(state.on_press(42, P, 1300), Phase::Fired);
        assert_eq!(state.on_release(&42, 1350), Some(42));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn window_is_measured_from_arming_to_release() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();

        state.on_press(42, P, 0);
        state.on_release(&42, 10);
        assert_eq!(state.on_press(42, P, 700), Phase::Fired);
        // Second release lands after 750 ms from the first press.
        assert_eq!(state.on_release(&42, 751), None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn exact_threshold_fires() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();
        state.on_press(1, P, 0);
        state.on_release(&1, 1);
        state.on_press(1, P, 749);
        assert_eq!(state.on_release(&1, 750), Some(1));
    }

    #[test]
    fn slow_second_press_rearms() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();

        state.on_press(42, P, 1000);
        state.on_release(&42, 1050);
        assert_eq!(state.on_press(42, P, 1800), Phase::Armed);
        assert_eq!(state.on_release(&42, 1850), None);
        // The late press became the new first click.
        assert_eq!(state.on_press(42, P, 2000), Phase::Fired);
        assert_eq!(state.on_release(&42, 2050), Some(42));
    }

    #[test]
    fn different_target_rearms() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();

        state.on_press(1, P, 0);
        state.on_release(&1, 10);
        assert_eq!(state.on_press(2, P, 100), Phase::Armed);
        assert_eq!(state.armed_target(), Some(&2));
    }

    #[test]
    fn release_elsewhere_cancels() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();

        state.on_press(1, P, 0);
        state.on_release(&1, 10);
        state.on_press(1, P, 100);
        assert_eq!(state.on_release(&2, 110), None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn distance_threshold_is_optional() {
        let far = Point::new(60.0, 20.0);

        let mut time_only: DoubleClickState<u32> = DoubleClickState::new();
        time_only.on_press(1, P, 0);
        time_only.on_release(&1, 10);
        assert_eq!(time_only.on_press(1, far, 100), Phase::Fired);

        let mut spatial: DoubleClickState<u32> = DoubleClickState::with_thresholds(750, Some(4.0));
        spatial.on_press(1, P, 0);
        spatial.on_release(&1, 10);
        assert_eq!(spatial.on_press(1, far, 100), Phase::Armed);
        spatial.on_release(&1, 110);
        assert_eq!(spatial.on_press(1, Point::new(62.0, 22.0), 200), Phase::Fired);
    }

    #[test]
    fn reset_clears_pending_sequence() {
        let mut state: DoubleClickState<u32> = DoubleClickState::new();
        state.on_press(1, P, 0);
        state.reset();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.armed_target(), None);
        assert_eq!(state.on_press(1, P, 10), Phase::Armed);
    }
}
