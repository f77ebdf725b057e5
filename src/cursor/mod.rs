//! This module defines the three-tier cursor hierarchy for random-access
//! pixel reads and writes at arbitrary, non-contiguous (X, Y, Z, T, C)
//! coordinates.
//!
//! Control flows top-down: a [`SequenceCursor`] resolves a time index to a
//! [`VolumeCursor`], which resolves a depth index to a [`PlaneCursor`],
//! which reads or writes the raw channel buffer. Each tier materializes
//! its children lazily, so the cost of a batch of accesses (locks taken,
//! notifications fired) is proportional to the set of planes actually
//! touched, never to the dataset's extents.
//!
//! Commit flows the same way: `commit_changes` consumes a cursor,
//! recursing into every child it has materialized, releasing each plane's
//! write lock and firing at most one change notification per dirty plane.
//! A committed cursor is gone; start a new one for the next batch.
//!
//! ```
//! use voxcursor::{InMemSequence, SampleType, SequenceCursor};
//!
//! let seq = InMemSequence::filled(64, 64, 10, 10, 1, SampleType::Uint16);
//! let mut cursor = SequenceCursor::new(&seq);
//! cursor.set(10, 12, 3, 2, 0, 512.)?;
//! assert_eq!(cursor.get(10, 12, 3, 2, 0)?, 512.);
//! cursor.commit_changes()?;
//! # Ok::<(), voxcursor::CursorError>(())
//! ```
//!
//! [`SequenceCursor`]: ./sequence/struct.SequenceCursor.html
//! [`VolumeCursor`]: ./volume/struct.VolumeCursor.html
//! [`PlaneCursor`]: ./plane/struct.PlaneCursor.html

pub mod plane;
pub mod sequence;
pub mod volume;

pub use self::plane::PlaneCursor;
pub use self::sequence::SequenceCursor;
pub use self::volume::VolumeCursor;
