//! Random-access pixel write cursors for multi-dimensional scientific
//! images.
//!
//! A dataset is addressed as five dimensions: X and Y within a plane, Z
//! across a volume's planes, T across a sequence's volumes, and C across
//! a plane's channels. Reading or writing one pixel the naive way costs a
//! lock/convert/notify cycle every time; the cursor hierarchy in this
//! crate pays that cycle once per touched plane instead, holding each
//! plane's write lock from first touch until an explicit
//! `commit_changes`.
//!
//! See the [`cursor`] module for the access hierarchy and the [`raster`]
//! module for the storage and locking model underneath it.
//!
//! [`cursor`]: ./cursor/index.html
//! [`raster`]: ./raster/index.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

pub mod cursor;
pub mod dataset;
pub mod error;
pub mod raster;
pub mod typedef;

pub use crate::cursor::{PlaneCursor, SequenceCursor, VolumeCursor};
pub use crate::dataset::{InMemSequence, InMemVolume, Sequence, Volume};
pub use crate::error::{CursorError, Result};
pub use crate::raster::{ChannelBuf, InMemRaster, PlaneLock, Raster, Sample};
pub use crate::typedef::SampleType;
