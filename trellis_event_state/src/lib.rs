// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_event_state --heading-base-level=0

//! Trellis Event State: small, reusable gesture state machines.
//!
//! - [`double_click::DoubleClickState`]: recognises a second press and release on the same
//!   target within a time window, optionally within a pointer-distance tolerance.
//!
//! State machines are generic over the target key and take explicit millisecond timestamps,
//! so they never read a clock and are trivially testable.
//!
//! This crate is `no_std`. Enable either the `std` (default) or the `libm` feature so that
//! Kurbo can compute distances.

#![no_std]

pub mod double_click;
