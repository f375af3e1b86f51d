// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared helpers

pub mod math;

pub use math::{matrix_from_rows, matrix_to_rows, translation, triangle_normal};
