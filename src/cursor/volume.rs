//! Cursor over one volume's stack of planes.

use super::plane::PlaneCursor;
use crate::dataset::Volume;
use crate::error::Result;
use log::trace;
use std::fmt;

/// Delegates `(x, y, z, c)` addressing to the right [`PlaneCursor`],
/// constructing it on first touch of its depth index.
///
/// Slots are pre-sized to the volume's depth and all start empty; a plane
/// cursor (and the write lock it owns) exists only for depth indexes
/// actually touched by a `get`/`set` call. Commit cost is therefore
/// proportional to the number of distinct Z values used, not to the
/// volume's depth.
///
/// An out-of-range `z` panics at the slot access, like any other
/// coordinate contract violation.
///
/// [`PlaneCursor`]: ../plane/struct.PlaneCursor.html
#[must_use = "a volume cursor owns the plane locks it has opened until commit_changes is called"]
pub struct VolumeCursor<'a, V: Volume> {
    volume: &'a V,
    slots: Vec<Option<PlaneCursor<'a, V::Raster>>>,
}

impl<'a, V: Volume> VolumeCursor<'a, V> {
    /// Create a cursor over `volume` with every slot empty. No lock is
    /// acquired until the first access.
    pub fn new(volume: &'a V) -> Self {
        let slots = (0..volume.depth()).map(|_| None).collect();
        VolumeCursor { volume, slots }
    }

    /// The number of depth indexes addressable by this cursor.
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// The number of plane cursors materialized so far.
    pub fn open_planes(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether any plane was mutated since construction.
    pub fn is_dirty(&self) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(PlaneCursor::is_dirty)
    }

    /// Resolve the plane cursor at depth `z`, constructing it on first
    /// touch.
    fn plane(&mut self, z: usize) -> Result<&mut PlaneCursor<'a, V::Raster>> {
        let slot = &mut self.slots[z];
        if slot.is_none() {
            trace!("opening plane cursor at z={}", z);
            *slot = Some(PlaneCursor::new(self.volume.raster(z))?);
        }
        match slot {
            Some(cursor) => Ok(cursor),
            None => unreachable!(),
        }
    }

    /// Read the intensity at `(x, y)` of depth `z` in channel `c`.
    ///
    /// # Errors
    ///
    /// First touch of a depth index acquires that plane's write lock and
    /// may fail with `CursorError::RasterLocked`.
    pub fn get(&mut self, x: usize, y: usize, z: usize, c: usize) -> Result<f64> {
        Ok(self.plane(z)?.get(x, y, c))
    }

    /// Write `value` at `(x, y)` of depth `z` in channel `c` with native
    /// narrowing semantics.
    ///
    /// # Errors
    ///
    /// See [`get`](#method.get).
    pub fn set(&mut self, x: usize, y: usize, z: usize, c: usize, value: f64) -> Result<()> {
        self.plane(z)?.set(x, y, c, value);
        Ok(())
    }

    /// Write `value` at `(x, y)` of depth `z` in channel `c`, rounding
    /// and clamping into the sample type's range first.
    ///
    /// # Errors
    ///
    /// See [`get`](#method.get).
    pub fn set_safe(&mut self, x: usize, y: usize, z: usize, c: usize, value: f64) -> Result<()> {
        self.plane(z)?.set_safe(x, y, c, value);
        Ok(())
    }

    /// Commit every plane cursor opened by this cursor, in depth order.
    /// Planes never touched are never locked and fire no notification.
    ///
    /// # Errors
    ///
    /// The first release failure propagates; plane cursors after the
    /// failing one are dropped with their locks still held.
    pub fn commit_changes(self) -> Result<()> {
        for slot in self.slots {
            if let Some(cursor) = slot {
                cursor.commit_changes()?;
            }
        }
        Ok(())
    }
}

impl<'a, V: Volume> fmt::Debug for VolumeCursor<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeCursor")
            .field("depth", &self.depth())
            .field("open_planes", &self.open_planes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::VolumeCursor;
    use crate::dataset::{InMemVolume, Volume};
    use crate::typedef::SampleType;
    use pretty_assertions::assert_eq;

    #[test]
    fn planes_are_opened_lazily() {
        let volume = InMemVolume::filled(4, 4, 8, 1, SampleType::Uint16);
        let mut cursor = VolumeCursor::new(&volume);
        assert_eq!(cursor.open_planes(), 0);

        cursor.set(1, 1, 5, 0, 77.).unwrap();
        assert_eq!(cursor.open_planes(), 1);
        assert!(volume.raster(5).is_locked());
        assert!(!volume.raster(0).is_locked());

        cursor.set(2, 2, 5, 0, 88.).unwrap();
        assert_eq!(cursor.open_planes(), 1);

        cursor.commit_changes().unwrap();
        assert!(!volume.raster(5).is_locked());
        assert_eq!(volume.raster(5).updates(), 1);
        assert_eq!(volume.raster(0).updates(), 0);
    }

    #[test]
    fn delegates_to_the_right_plane() {
        let volume = InMemVolume::filled(2, 2, 3, 2, SampleType::Int32);
        let mut cursor = VolumeCursor::new(&volume);
        cursor.set(0, 0, 0, 0, 1.).unwrap();
        cursor.set(0, 0, 1, 0, 2.).unwrap();
        cursor.set(0, 0, 2, 1, 3.).unwrap();

        assert_eq!(cursor.get(0, 0, 0, 0).unwrap(), 1.);
        assert_eq!(cursor.get(0, 0, 1, 0).unwrap(), 2.);
        assert_eq!(cursor.get(0, 0, 2, 1).unwrap(), 3.);
        assert_eq!(cursor.get(0, 0, 2, 0).unwrap(), 0.);
        assert!(cursor.is_dirty());
        cursor.commit_changes().unwrap();
    }

    #[test]
    fn untouched_planes_stay_unlocked_after_commit() {
        let volume = InMemVolume::filled(2, 2, 4, 1, SampleType::Uint8);
        let mut cursor = VolumeCursor::new(&volume);
        let _ = cursor.get(0, 0, 2, 0).unwrap();
        cursor.commit_changes().unwrap();

        for z in 0..4 {
            assert!(!volume.raster(z).is_locked());
            assert_eq!(volume.raster(z).updates(), 0);
        }
    }
}
