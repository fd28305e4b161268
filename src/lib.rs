// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! View delegates for Rust
//!
//! A delegate is a small, immutable projection object that exposes exactly
//! the fields a template needs. Types are declared once with a
//! [`SchemaBuilder`], registered in a [`DelegateRegistry`], constructed from
//! raw input or backend records (optionally switching to a more specific
//! variant), and rendered through a host [`TemplateRenderer`] with an optional
//! bounded per-type cache.

pub mod cache;
pub mod config;
pub mod core;
pub mod delegate;
pub mod engine;
pub mod model;
pub mod registry;
pub mod render;
pub mod testing;

// Primary entry points
pub use config::DelegateConfig;
pub use engine::ViewEngine;
pub use registry::{DelegateRegistry, DelegateType, Resolution, SchemaBuilder};

pub use cache::{CacheConfig, CacheStatsSnapshot, EvictionPolicy, RenderCache, RenderCacheKey};
pub use crate::core::{DelegateError, ErrorCode, Result};
pub use delegate::{Delegate, DelegateId, HelperFacade, RecordValue};
pub use model::{
    BackendRecord, FieldInput, JsonRecord, Local, Locals, Params, ProjectedRecord, ViewData,
};
pub use render::TemplateRenderer;
