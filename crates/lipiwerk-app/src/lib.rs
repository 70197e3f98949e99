// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lipiwerk-app — request pipeline and services behind the `lipiwerk` binary.

pub mod services;

pub use services::pipeline::{Output, Pipeline, Upload};
