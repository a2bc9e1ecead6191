// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: video discovery, label export and document files.

pub mod discovery;
pub mod export;
pub mod serialization;
