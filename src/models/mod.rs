// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session data: videos, clips, selection and labels.

pub mod annotation;
pub mod catalog;
pub mod clip;
pub mod cursor;
pub mod project;
