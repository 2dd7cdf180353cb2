// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes, the per-image store, session state and navigation.

pub mod annotation;
pub mod project;
pub mod session;
pub mod store;
