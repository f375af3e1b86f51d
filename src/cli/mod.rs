// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem: file-level runs and terminal reporting

pub mod reporter;
pub mod runner;

pub use reporter::Reporter;
pub use runner::{run_flatten, run_flatten_with, FlattenJob, RunReport, SkippedFace};
