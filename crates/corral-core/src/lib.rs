#![forbid(unsafe_code)]
//! corral-core library.
//!
//! The deterministic heart of corral: record model, filter/sort/group
//! pipeline, duplicate detection, and the selection/bulk-operation
//! coordinator. Everything here is a pure projection over a snapshot of
//! records the caller already holds — the core never owns authoritative
//! state and never caches across calls.
//!
//! # Conventions
//!
//! - **Errors**: pipeline functions (filter/sort/group/dedup) never fail on
//!   well-typed input; only mutation-triggering paths return [`error::CrmError`]
//!   or `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod actions;
pub mod config;
pub mod csv;
pub mod dedup;
pub mod error;
pub mod model;
pub mod selection;
pub mod view;

pub use model::record::{Contact, Note, Priority, Record, RecordKind, TaskStatus};
pub use view::{derive_view, FilterContext, FilterState, SortKey, SortOrder, SortState};
