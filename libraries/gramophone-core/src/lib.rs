//! gramophone core
//!
//! Storage-agnostic domain model for the gramophone media-library server.
//!
//! # Architecture
//!
//! - **Identifiers**: [`specid`] encodes `(kind, numeric id)` pairs into the
//!   opaque tokens clients use to address any entity
//! - **Domain Types**: `Artist`, `Album`, `Track`, `Podcast`, ... with derived
//!   accessors (identifiers, paths, index names)
//! - **Capabilities**: [`AudioFile`] for anything that can be streamed
//! - **Error Handling**: unified [`Error`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use gramophone_core::specid::{SpecId, SpecKind};
//! use gramophone_core::types::split_ids;
//!
//! let queue = split_ids("tr-1,tr-2,bogus,pe-7");
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue[2], SpecId::new(SpecKind::PodcastEpisode, 7));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod specid;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use specid::{MalformedIdentifier, SpecId, SpecKind};
pub use storage::{SettingStore, StorageContext};
pub use traits::AudioFile;
