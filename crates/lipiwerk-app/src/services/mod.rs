// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command line to the lipiwerk backend crates.

pub mod config_dir;
pub mod extractor;
pub mod pipeline;
pub mod report;
