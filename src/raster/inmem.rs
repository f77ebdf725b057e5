//! Module holding an in-memory implementation of a raster.

use super::element::ChannelBuf;
use super::{PlaneLock, Raster};
use crate::error::{CursorError, Result};
use crate::typedef::SampleType;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

type Listener = Box<dyn Fn() + Send + Sync>;

/// A raster whose channel buffers live in memory.
///
/// Locking moves the buffers out of the raster and releasing moves them
/// back, so the single-writer rule is carried by ownership rather than by
/// convention: while an acquisition is live the raster simply has no data
/// to hand out, and a cursor that is dropped without committing leaves the
/// raster locked for good. That leak is deliberate and observable through
/// [`is_locked`]; it is not detected or recovered automatically.
///
/// [`is_locked`]: ./struct.InMemRaster.html#method.is_locked
pub struct InMemRaster {
    width: u16,
    height: u16,
    kind: SampleType,
    channel_count: usize,
    /// `None` while a write lock is live.
    state: Mutex<Option<Vec<ChannelBuf>>>,
    listeners: Mutex<Vec<Listener>>,
    updates: AtomicU64,
}

impl InMemRaster {
    /// Create a zero-filled raster of the given extents and sample type.
    pub fn new(width: u16, height: u16, channel_count: usize, kind: SampleType) -> Self {
        let len = usize::from(width) * usize::from(height);
        let channels = (0..channel_count).map(|_| ChannelBuf::new(kind, len)).collect();
        InMemRaster {
            width,
            height,
            kind,
            channel_count,
            state: Mutex::new(Some(channels)),
            listeners: Mutex::new(Vec::new()),
            updates: AtomicU64::new(0),
        }
    }

    /// Create a raster from existing channel buffers. All channels must
    /// hold `width * height` elements of one sample type.
    ///
    /// # Errors
    ///
    /// - `CursorError::InconsistentPlanes` if no channels are given;
    /// - `CursorError::MismatchedPlaneData` if the buffers disagree on
    ///   kind or length.
    pub fn from_channels(width: u16, height: u16, channels: Vec<ChannelBuf>) -> Result<Self> {
        let kind = channels
            .first()
            .map(ChannelBuf::kind)
            .ok_or(CursorError::InconsistentPlanes)?;
        // reuse the lock constructor as the single validation point
        let lock = PlaneLock::new(width, height, kind, channels)?;
        let (_, _, _, channels) = lock.into_parts();
        let channel_count = channels.len();
        Ok(InMemRaster {
            width,
            height,
            kind,
            channel_count,
            state: Mutex::new(Some(channels)),
            listeners: Mutex::new(Vec::new()),
            updates: AtomicU64::new(0),
        })
    }

    /// Whether a write acquisition is currently live.
    pub fn is_locked(&self) -> bool {
        self.state_guard().is_none()
    }

    /// The number of acquisitions released so far with the dirty flag set.
    pub fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }

    /// Register an observer invoked on every [`notify_data_changed`] call,
    /// e.g. a display repaint trigger.
    ///
    /// [`notify_data_changed`]: ../trait.Raster.html#tymethod.notify_data_changed
    pub fn on_data_changed<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners_guard().push(Box::new(listener));
    }

    fn state_guard(&self) -> MutexGuard<'_, Option<Vec<ChannelBuf>>> {
        // a poisoned mutex still holds a consistent Option, keep going
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn listeners_guard(&self) -> MutexGuard<'_, Vec<Listener>> {
        match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Raster for InMemRaster {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn sample_type(&self) -> SampleType {
        self.kind
    }

    fn lock_for_write(&self) -> Result<PlaneLock> {
        let channels = self
            .state_guard()
            .take()
            .ok_or(CursorError::RasterLocked)?;
        debug!(
            "write lock acquired on {}x{}x{} {:?} raster",
            self.width, self.height, self.channel_count, self.kind
        );
        PlaneLock::new(self.width, self.height, self.kind, channels)
    }

    fn release_write_lock(&self, lock: PlaneLock, dirty: bool) -> Result<()> {
        if lock.width() != self.width
            || lock.height() != self.height
            || lock.sample_type() != self.kind
            || lock.channel_count() != self.channel_count
        {
            return Err(CursorError::MismatchedPlaneData);
        }
        let mut state = self.state_guard();
        if state.is_some() {
            // the raster was never locked, this lock belongs elsewhere
            return Err(CursorError::MismatchedPlaneData);
        }
        let (_, _, _, channels) = lock.into_parts();
        *state = Some(channels);
        if dirty {
            let _ = self.updates.fetch_add(1, Ordering::SeqCst);
        }
        debug!("write lock released, dirty={}", dirty);
        Ok(())
    }

    fn notify_data_changed(&self) {
        for listener in self.listeners_guard().iter() {
            listener();
        }
    }
}

impl fmt::Debug for InMemRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemRaster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channel_count", &self.channel_count)
            .field("kind", &self.kind)
            .field("locked", &self.is_locked())
            .field("updates", &self.updates())
            .finish()
    }
}
