//! # Shape Dispatch
//!
//! File-level entry points above the codecs.
//!
//! ## Components
//! - **Dispatcher**: Routes a path to a reader or writer by its extension
//! - **Aggregate**: Stacks per-vertex attributes from many surfaces
//! - **Convert**: Re-encodes a surface, optionally attaching an overlay

pub mod aggregate;
pub mod convert;
pub mod dispatcher;

pub use aggregate::{aggregate_attributes, aggregate_from_list_file, AggregatedAttributes};
pub use convert::surface_format;
pub use dispatcher::FormatDispatcher;
