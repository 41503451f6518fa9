//! Local fallback engine for ferry.
//!
//! This crate provides the non-privileged, in-process implementation of the
//! operation set (copy, move, delete, rename, create, restore). The broker
//! orchestrator hands batches here whenever the privileged channel is
//! absent, a path the worker cannot address appears in a batch, or a
//! failure category demands local execution.

mod engine;
mod naming;
mod transfer;

pub use engine::LocalEngine;
pub use naming::validate_name;
