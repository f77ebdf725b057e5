//! Cursor over a single plane's channel buffers.

use crate::error::Result;
use crate::raster::{ChannelBuf, PlaneLock, Raster};
use crate::typedef::SampleType;
use log::{debug, trace};
use std::fmt;
use std::mem;

/// Direct numeric read/write access over one raster's channel buffers.
///
/// Construction acquires the raster's exclusive write lock; the lock is
/// held until [`commit_changes`] consumes the cursor and gives the
/// buffers back. A cursor that is dropped without committing never
/// returns the buffers and leaves the raster locked; this is not
/// detected or recovered here.
///
/// Coordinates are not validated: an out-of-range `x`, `y` or channel
/// index panics at the underlying buffer access. Callers needing safety
/// must check against the raster's extents before calling, by design, so
/// the per-pixel path stays branch-free.
///
/// [`commit_changes`]: ./struct.PlaneCursor.html#method.commit_changes
#[must_use = "a plane cursor holds the raster's write lock until commit_changes is called"]
pub struct PlaneCursor<'a, R: Raster + ?Sized> {
    raster: &'a R,
    width: u16,
    height: u16,
    kind: SampleType,
    channels: Vec<ChannelBuf>,
    /// Most recently resolved channel, moved out of `channels` so that
    /// repeated same-channel access touches only this pair.
    active: Option<(usize, ChannelBuf)>,
    dirty: bool,
}

impl<'a, R: Raster + ?Sized> PlaneCursor<'a, R> {
    /// Acquire the raster's write lock and wrap it in a cursor.
    ///
    /// # Errors
    ///
    /// - `CursorError::RasterLocked` if another acquisition is live.
    pub fn new(raster: &'a R) -> Result<Self> {
        let lock = raster.lock_for_write()?;
        let (width, height, kind, channels) = lock.into_parts();
        Ok(PlaneCursor {
            raster,
            width,
            height,
            kind,
            channels,
            active: None,
            dirty: false,
        })
    }

    /// The plane width, in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The plane height, in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The number of channels addressable by this cursor.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// The sample type of the underlying buffers.
    pub fn sample_type(&self) -> SampleType {
        self.kind
    }

    /// Whether any sample was mutated since acquisition.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Resolve the buffer for channel `c`, re-resolving only when `c`
    /// differs from the cached channel. Only the buffer reference is
    /// cached, never sample values, so writes are immediately visible to
    /// subsequent reads.
    fn channel(&mut self, c: usize) -> &mut ChannelBuf {
        let hit = matches!(&self.active, Some((cached, _)) if *cached == c);
        if !hit {
            if let Some((prev, buf)) = self.active.take() {
                self.channels[prev] = buf;
            }
            trace!("switching channel cache to {}", c);
            let buf = mem::replace(&mut self.channels[c], ChannelBuf::empty(self.kind));
            self.active = Some((c, buf));
        }
        match self.active.as_mut() {
            Some((_, buf)) => buf,
            None => unreachable!(),
        }
    }

    /// Read the intensity at `(x, y)` in channel `c` as a double
    /// precision value, decoded according to the sample type's
    /// signedness.
    pub fn get(&mut self, x: usize, y: usize, c: usize) -> f64 {
        let width = usize::from(self.width);
        self.channel(c).get(y * width + x)
    }

    /// Write `value` at `(x, y)` in channel `c` with native narrowing
    /// semantics: the fraction is discarded and out-of-range values wrap.
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f64) {
        let width = usize::from(self.width);
        self.channel(c).put(y * width + x, value);
        self.dirty = true;
    }

    /// Write `value` at `(x, y)` in channel `c`, rounding to nearest and
    /// clamping into the sample type's representable range first.
    pub fn set_safe(&mut self, x: usize, y: usize, c: usize, value: f64) {
        let width = usize::from(self.width);
        self.channel(c).put_clamped(y * width + x, value);
        self.dirty = true;
    }

    /// Release the raster's write lock, firing exactly one change
    /// notification if any write happened since acquisition.
    ///
    /// Committing consumes the cursor; a new cursor must be constructed
    /// for a further batch of accesses.
    ///
    /// # Errors
    ///
    /// Failures from the release path propagate. The raster's lock state
    /// is then undefined; in particular the buffers may be lost.
    pub fn commit_changes(self) -> Result<()> {
        let PlaneCursor {
            raster,
            width,
            height,
            kind,
            mut channels,
            active,
            dirty,
        } = self;
        if let Some((c, buf)) = active {
            channels[c] = buf;
        }
        let lock = PlaneLock::new(width, height, kind, channels)?;
        raster.release_write_lock(lock, dirty)?;
        debug!("plane cursor committed, dirty={}", dirty);
        if dirty {
            raster.notify_data_changed();
        }
        Ok(())
    }
}

impl<'a, R: Raster + ?Sized> fmt::Debug for PlaneCursor<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaneCursor")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("kind", &self.kind)
            .field("cached_channel", &self.active.as_ref().map(|(c, _)| *c))
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::PlaneCursor;
    use crate::raster::{ChannelBuf, InMemRaster};
    use crate::typedef::SampleType;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tricolor_plane() -> InMemRaster {
        // 2x2, 3 channels, constant values 10 / 20 / 30
        InMemRaster::from_channels(
            2,
            2,
            vec![
                ChannelBuf::Uint8(vec![10; 4]),
                ChannelBuf::Uint8(vec![20; 4]),
                ChannelBuf::Uint8(vec![30; 4]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn set_then_get_round_trips() {
        let raster = InMemRaster::new(4, 4, 1, SampleType::Int16);
        let mut cursor = PlaneCursor::new(&raster).unwrap();
        cursor.set(3, 2, 0, -1234.);
        assert_eq!(cursor.get(3, 2, 0), -1234.);
        cursor.commit_changes().unwrap();
    }

    #[test]
    fn channel_cache_invalidates_on_switch() {
        let raster = tricolor_plane();
        let mut cursor = PlaneCursor::new(&raster).unwrap();
        assert_eq!(cursor.get(0, 0, 0), 10.);
        assert_eq!(cursor.get(0, 0, 1), 20.);
        assert_eq!(cursor.get(0, 0, 2), 30.);
        assert_eq!(cursor.get(0, 0, 0), 10.);
        cursor.commit_changes().unwrap();
    }

    #[test]
    fn writes_are_visible_through_the_cache() {
        let raster = tricolor_plane();
        let mut cursor = PlaneCursor::new(&raster).unwrap();
        cursor.set(1, 1, 1, 99.);
        assert_eq!(cursor.get(1, 1, 1), 99.);
        // switch away and back
        assert_eq!(cursor.get(1, 1, 2), 30.);
        assert_eq!(cursor.get(1, 1, 1), 99.);
        cursor.commit_changes().unwrap();
    }

    #[test]
    fn set_wraps_and_set_safe_clamps() {
        let raster = InMemRaster::new(2, 2, 1, SampleType::Uint8);
        let mut cursor = PlaneCursor::new(&raster).unwrap();

        cursor.set(0, 0, 0, 300.);
        assert_eq!(cursor.get(0, 0, 0), 44.);

        cursor.set_safe(0, 1, 0, 300.);
        assert_eq!(cursor.get(0, 1, 0), 255.);

        cursor.set_safe(1, 1, 0, -10.);
        assert_eq!(cursor.get(1, 1, 0), 0.);

        cursor.commit_changes().unwrap();
    }

    #[test]
    fn commit_notifies_once_after_many_writes() {
        let raster = InMemRaster::new(4, 4, 2, SampleType::Float64);
        let notifications = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&notifications);
        raster.on_data_changed(move || {
            let _ = seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut cursor = PlaneCursor::new(&raster).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                cursor.set(x, y, 0, (x + y) as f64);
            }
        }
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        cursor.commit_changes().unwrap();
        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        assert_eq!(raster.updates(), 1);
    }

    #[test]
    fn silent_commit_releases_without_notifying() {
        let raster = InMemRaster::new(4, 4, 1, SampleType::Uint32);
        let notifications = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&notifications);
        raster.on_data_changed(move || {
            let _ = seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut cursor = PlaneCursor::new(&raster).unwrap();
        let _ = cursor.get(1, 1, 0);
        assert!(!cursor.is_dirty());
        cursor.commit_changes().unwrap();

        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        assert_eq!(raster.updates(), 0);
        assert!(!raster.is_locked());
    }

    #[test]
    fn cursor_holds_the_lock_until_commit() {
        let raster = InMemRaster::new(2, 2, 1, SampleType::Uint8);
        let cursor = PlaneCursor::new(&raster).unwrap();
        assert!(raster.is_locked());
        assert!(PlaneCursor::new(&raster).is_err());
        cursor.commit_changes().unwrap();
        assert!(!raster.is_locked());
        let again = PlaneCursor::new(&raster).unwrap();
        again.commit_changes().unwrap();
    }

    #[test]
    fn abandoned_cursor_leaks_the_lock() {
        let raster = InMemRaster::new(2, 2, 1, SampleType::Uint8);
        {
            let mut cursor = PlaneCursor::new(&raster).unwrap();
            cursor.set(0, 0, 0, 1.);
            // dropped without commit
        }
        assert!(raster.is_locked());
        assert!(PlaneCursor::new(&raster).is_err());
    }

    #[test]
    fn round_trip_exact_for_every_kind() {
        use SampleType::*;
        for &(kind, value) in &[
            (Uint8, 200.),
            (Int8, -100.),
            (Uint16, 60000.),
            (Int16, -30000.),
            (Uint32, 4000000000.),
            (Int32, -2000000000.),
            (Float32, 0.5),
            (Float64, -1.25e-7),
        ] {
            let raster = InMemRaster::new(3, 3, 1, kind);
            let mut cursor = PlaneCursor::new(&raster).unwrap();
            cursor.set(2, 0, 0, value);
            assert_eq!(cursor.get(2, 0, 0), value, "kind {:?}", kind);
            cursor.commit_changes().unwrap();
        }
    }
}
