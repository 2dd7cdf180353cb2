// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the BoxLabel application.

pub mod annotation_list;
pub mod canvas;
pub mod label_dialog;
pub mod toolbar;
