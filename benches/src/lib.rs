// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the Trellis crates. Run with `cargo bench -p trellis_benches`.
