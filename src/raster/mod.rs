//! This module defines the raster API: the per-plane pixel store that the
//! cursor hierarchy writes through, and the write-lock discipline it
//! consumes.
//!
//! A [`Raster`] hands out its channel buffers through an exclusive,
//! scoped acquisition: [`lock_for_write`] moves the buffers into a
//! [`PlaneLock`], and the only correct way to give them back is
//! [`release_write_lock`]. Holders that mutate the data are expected to
//! report it through the `dirty` flag on release, so that owners can skip
//! invalidation work after a read-only acquisition.
//!
//! [`Raster`]: ./trait.Raster.html
//! [`PlaneLock`]: ./struct.PlaneLock.html
//! [`lock_for_write`]: ./trait.Raster.html#tymethod.lock_for_write
//! [`release_write_lock`]: ./trait.Raster.html#tymethod.release_write_lock

pub mod element;
pub mod inmem;

pub use self::element::{ChannelBuf, Sample};
pub use self::inmem::InMemRaster;

use crate::error::{CursorError, Result};
use crate::typedef::SampleType;

/// Exclusive possession of one plane's channel buffers, together with the
/// extents needed to address them.
///
/// A lock is produced by [`Raster::lock_for_write`] and owns the buffers
/// for the whole span of the acquisition; the backing raster has no access
/// to its own data until the lock is passed back through
/// [`Raster::release_write_lock`].
///
/// [`Raster::lock_for_write`]: ./trait.Raster.html#tymethod.lock_for_write
/// [`Raster::release_write_lock`]: ./trait.Raster.html#tymethod.release_write_lock
#[derive(Debug)]
pub struct PlaneLock {
    width: u16,
    height: u16,
    kind: SampleType,
    channels: Vec<ChannelBuf>,
}

impl PlaneLock {
    /// Bundle channel buffers with their extents, validating that every
    /// channel carries `width * height` elements of the same kind. This is
    /// the single point where buffers enter the locked state, so the
    /// accessors below can stay infallible.
    pub fn new(
        width: u16,
        height: u16,
        kind: SampleType,
        channels: Vec<ChannelBuf>,
    ) -> Result<Self> {
        let len = usize::from(width) * usize::from(height);
        if channels.iter().any(|c| c.kind() != kind || c.len() != len) {
            return Err(CursorError::MismatchedPlaneData);
        }
        Ok(PlaneLock {
            width,
            height,
            kind,
            channels,
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

    /// The sample type shared by all channels.
    pub fn sample_type(&self) -> SampleType {
        self.kind
    }

    /// The number of channels held.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Disassemble the lock into its extents and buffers. The caller
    /// becomes responsible for reassembling an equivalent lock (through
    /// [`new`]) before the raster can be released.
    ///
    /// [`new`]: ./struct.PlaneLock.html#method.new
    pub fn into_parts(self) -> (u16, u16, SampleType, Vec<ChannelBuf>) {
        (self.width, self.height, self.kind, self.channels)
    }
}

/// Public API for a single plane's pixel store, as consumed by the cursor
/// hierarchy.
///
/// Implementations provide three things: exclusive scoped acquisition of
/// the channel buffers, a release path that learns whether the data was
/// mutated, and a change notification hook for dependents such as display
/// repaint.
pub trait Raster {
    /// The plane width, in pixels.
    fn width(&self) -> u16;

    /// The plane height, in pixels.
    fn height(&self) -> u16;

    /// The number of channels in this plane.
    fn channel_count(&self) -> usize;

    /// The sample type shared by all channels.
    fn sample_type(&self) -> SampleType;

    /// Acquire exclusive write access to the plane's channel buffers.
    ///
    /// # Errors
    ///
    /// - `CursorError::RasterLocked` if an acquisition is already live.
    fn lock_for_write(&self) -> Result<PlaneLock>;

    /// Give the channel buffers back, ending the acquisition. `dirty`
    /// reports whether any sample was mutated during the span; owners may
    /// use `false` to skip invalidation work.
    ///
    /// # Errors
    ///
    /// - `CursorError::MismatchedPlaneData` if the lock does not belong to
    ///   this raster or the buffers no longer match its geometry.
    fn release_write_lock(&self, lock: PlaneLock, dirty: bool) -> Result<()>;

    /// Tell the raster's owner that the plane data has changed, so that
    /// dependents can react. Called at most once per acquisition, after
    /// the lock has been released.
    fn notify_data_changed(&self);
}
