// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable Trellis demos. See the `examples/` directory of this package.
