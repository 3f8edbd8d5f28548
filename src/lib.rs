//! # shapeio
//!
//! Readers and writers for the surface and overlay formats used in neuroimaging
//! shape pipelines.
//!
//! ## Modules
//! - [`core`]: DFS surface codec and MGH scalar-volume reader
//! - [`shape`]: Extension-based dispatch and multi-file attribute aggregation
//! - [`config`]: TOML/env configuration
//! - [`utils`]: Logging setup and codec metrics
//!
//! ## Example
//! ```rust
//! use shapeio::core::dfs::{decode, encode};
//! use shapeio::MeshPayload;
//!
//! let mesh = MeshPayload::new(
//!     vec![[0, 1, 2], [0, 2, 3]],
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
//! )
//! .with_attributes(vec![0.1, 0.2, 0.3, 0.4]);
//!
//! let bytes = encode(&mesh).unwrap();
//! assert_eq!(bytes.len(), 272);
//! assert_eq!(decode(&bytes).unwrap(), mesh);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod shape;
pub mod utils;

pub use crate::core::dfs::{read_dfs, write_dfs, DfsCodec};
pub use crate::core::header::{DfsHeader, Section};
pub use crate::core::mesh::{MeshPayload, UvCoords};
pub use crate::core::volume::read_scalar_volume;
pub use crate::error::{Result, ShapeError};
pub use crate::shape::FormatDispatcher;
