//! Cursor over the full dataset.

use super::volume::VolumeCursor;
use crate::dataset::Sequence;
use crate::error::Result;
use log::trace;
use std::fmt;

/// Delegates `(x, y, z, t, c)` addressing to the right [`VolumeCursor`],
/// constructing it on first touch of its time index.
///
/// Structurally identical to the volume tier one level up: a slot arena
/// pre-sized to the sequence's time count, all empty at construction.
/// Volume cursors, and transitively the plane locks below them, exist
/// only for (T, Z) pairs actually touched by an access.
///
/// An out-of-range `t` panics at the slot access.
///
/// [`VolumeCursor`]: ../volume/struct.VolumeCursor.html
#[must_use = "a sequence cursor owns every lock opened below it until commit_changes is called"]
pub struct SequenceCursor<'a, S: Sequence> {
    sequence: &'a S,
    slots: Vec<Option<VolumeCursor<'a, S::Volume>>>,
}

impl<'a, S: Sequence> SequenceCursor<'a, S> {
    /// Create a cursor over `sequence` with every slot empty. No lock is
    /// acquired until the first access.
    pub fn new(sequence: &'a S) -> Self {
        let slots = (0..sequence.time_count()).map(|_| None).collect();
        SequenceCursor { sequence, slots }
    }

    /// The number of time indexes addressable by this cursor.
    pub fn time_count(&self) -> usize {
        self.slots.len()
    }

    /// The number of volume cursors materialized so far.
    pub fn open_volumes(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// The number of plane cursors materialized so far, over all volumes.
    pub fn open_planes(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .map(VolumeCursor::open_planes)
            .sum()
    }

    /// Whether any plane was mutated since construction.
    pub fn is_dirty(&self) -> bool {
        self.slots.iter().flatten().any(VolumeCursor::is_dirty)
    }

    /// Resolve the volume cursor at time `t`, constructing it on first
    /// touch.
    fn volume(&mut self, t: usize) -> &mut VolumeCursor<'a, S::Volume> {
        let slot = &mut self.slots[t];
        if slot.is_none() {
            trace!("opening volume cursor at t={}", t);
            *slot = Some(VolumeCursor::new(self.sequence.volume(t)));
        }
        match slot {
            Some(cursor) => cursor,
            None => unreachable!(),
        }
    }

    /// Read the intensity at `(x, y)` of depth `z`, time `t`, channel `c`.
    ///
    /// # Errors
    ///
    /// First touch of a (t, z) pair acquires that plane's write lock and
    /// may fail with `CursorError::RasterLocked`.
    pub fn get(&mut self, x: usize, y: usize, z: usize, t: usize, c: usize) -> Result<f64> {
        self.volume(t).get(x, y, z, c)
    }

    /// Write `value` at `(x, y)` of depth `z`, time `t`, channel `c` with
    /// native narrowing semantics.
    ///
    /// # Errors
    ///
    /// See [`get`](#method.get).
    pub fn set(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        c: usize,
        value: f64,
    ) -> Result<()> {
        self.volume(t).set(x, y, z, c, value)
    }

    /// Write `value` at `(x, y)` of depth `z`, time `t`, channel `c`,
    /// rounding and clamping into the sample type's range first.
    ///
    /// # Errors
    ///
    /// See [`get`](#method.get).
    pub fn set_safe(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        t: usize,
        c: usize,
        value: f64,
    ) -> Result<()> {
        self.volume(t).set_safe(x, y, z, c, value)
    }

    /// Commit every volume cursor opened by this cursor, in time order;
    /// each recursively commits its open plane cursors. Slots never
    /// touched cost nothing.
    ///
    /// # Errors
    ///
    /// The first release failure propagates; cursors after the failing
    /// one are dropped with their locks still held.
    pub fn commit_changes(self) -> Result<()> {
        for slot in self.slots {
            if let Some(cursor) = slot {
                cursor.commit_changes()?;
            }
        }
        Ok(())
    }
}

impl<'a, S: Sequence> fmt::Debug for SequenceCursor<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceCursor")
            .field("time_count", &self.time_count())
            .field("open_volumes", &self.open_volumes())
            .field("open_planes", &self.open_planes())
            .finish()
    }
}
