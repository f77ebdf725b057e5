//! This module defines how planes are resolved from the surrounding data
//! structure: a [`Volume`] maps a depth index to a raster, and a
//! [`Sequence`] maps a time index to a volume. Both are pure lookups; the
//! cursor hierarchy consumes them but never owns them.
//!
//! Index resolution performs no bounds checking. An out-of-range depth or
//! time index is a caller contract violation and surfaces as the native
//! index panic of the backing store, keeping the lookup branch-free.
//!
//! [`Volume`]: ./trait.Volume.html
//! [`Sequence`]: ./trait.Sequence.html

use crate::error::{CursorError, Result};
use crate::raster::{InMemRaster, Raster};
use crate::typedef::SampleType;

/// A stack of planes sharing one time index, varying over depth.
pub trait Volume {
    /// The concrete raster type resolved by this volume.
    type Raster: Raster;

    /// The number of planes stacked along Z.
    fn depth(&self) -> usize;

    /// Resolve the raster at depth `z`.
    fn raster(&self, z: usize) -> &Self::Raster;
}

/// The complete dataset: volumes varying over time.
pub trait Sequence {
    /// The concrete volume type resolved by this sequence.
    type Volume: Volume;

    /// The number of volumes along T.
    fn time_count(&self) -> usize;

    /// Resolve the volume at time `t`.
    fn volume(&self, t: usize) -> &Self::Volume;
}

/// An in-memory volume: one [`InMemRaster`] per depth index, all sharing
/// the same extents and sample type.
///
/// [`InMemRaster`]: ../raster/inmem/struct.InMemRaster.html
#[derive(Debug)]
pub struct InMemVolume {
    rasters: Vec<InMemRaster>,
}

impl InMemVolume {
    /// Build a volume from existing rasters.
    ///
    /// # Errors
    ///
    /// - `CursorError::InconsistentPlanes` if no rasters are given or the
    ///   rasters disagree on extents, channel count or sample type.
    pub fn new(rasters: Vec<InMemRaster>) -> Result<Self> {
        let first = rasters.first().ok_or(CursorError::InconsistentPlanes)?;
        let (w, h, nc, kind) = (
            first.width(),
            first.height(),
            first.channel_count(),
            first.sample_type(),
        );
        if rasters.iter().any(|r| {
            r.width() != w || r.height() != h || r.channel_count() != nc || r.sample_type() != kind
        }) {
            return Err(CursorError::InconsistentPlanes);
        }
        Ok(InMemVolume { rasters })
    }

    /// Build a zero-filled volume of the given extents.
    pub fn filled(
        width: u16,
        height: u16,
        depth: usize,
        channel_count: usize,
        kind: SampleType,
    ) -> Self {
        let rasters = (0..depth)
            .map(|_| InMemRaster::new(width, height, channel_count, kind))
            .collect();
        InMemVolume { rasters }
    }

    /// The plane width, in pixels.
    pub fn width(&self) -> u16 {
        self.rasters[0].width()
    }

    /// The plane height, in pixels.
    pub fn height(&self) -> u16 {
        self.rasters[0].height()
    }

    /// The number of channels per plane.
    pub fn channel_count(&self) -> usize {
        self.rasters[0].channel_count()
    }

    /// The sample type shared by all planes.
    pub fn sample_type(&self) -> SampleType {
        self.rasters[0].sample_type()
    }
}

impl Volume for InMemVolume {
    type Raster = InMemRaster;

    fn depth(&self) -> usize {
        self.rasters.len()
    }

    fn raster(&self, z: usize) -> &InMemRaster {
        &self.rasters[z]
    }
}

/// An in-memory sequence: one [`InMemVolume`] per time index, all sharing
/// the same geometry.
///
/// [`InMemVolume`]: ./struct.InMemVolume.html
#[derive(Debug)]
pub struct InMemSequence {
    volumes: Vec<InMemVolume>,
}

impl InMemSequence {
    /// Build a sequence from existing volumes.
    ///
    /// # Errors
    ///
    /// - `CursorError::InconsistentPlanes` if no volumes are given or the
    ///   volumes disagree on geometry.
    pub fn new(volumes: Vec<InMemVolume>) -> Result<Self> {
        let first = volumes.first().ok_or(CursorError::InconsistentPlanes)?;
        let (w, h, d, nc, kind) = (
            first.width(),
            first.height(),
            first.depth(),
            first.channel_count(),
            first.sample_type(),
        );
        if volumes.iter().any(|v| {
            v.width() != w
                || v.height() != h
                || v.depth() != d
                || v.channel_count() != nc
                || v.sample_type() != kind
        }) {
            return Err(CursorError::InconsistentPlanes);
        }
        Ok(InMemSequence { volumes })
    }

    /// Build a zero-filled sequence of the given extents.
    pub fn filled(
        width: u16,
        height: u16,
        depth: usize,
        time_count: usize,
        channel_count: usize,
        kind: SampleType,
    ) -> Self {
        let volumes = (0..time_count)
            .map(|_| InMemVolume::filled(width, height, depth, channel_count, kind))
            .collect();
        InMemSequence { volumes }
    }

    /// The plane width, in pixels.
    pub fn width(&self) -> u16 {
        self.volumes[0].width()
    }

    /// The plane height, in pixels.
    pub fn height(&self) -> u16 {
        self.volumes[0].height()
    }

    /// The number of planes along Z in each volume.
    pub fn depth(&self) -> usize {
        self.volumes[0].depth()
    }

    /// The number of channels per plane.
    pub fn channel_count(&self) -> usize {
        self.volumes[0].channel_count()
    }

    /// The sample type shared by the whole dataset.
    pub fn sample_type(&self) -> SampleType {
        self.volumes[0].sample_type()
    }
}

impl Sequence for InMemSequence {
    type Volume = InMemVolume;

    fn time_count(&self) -> usize {
        self.volumes.len()
    }

    fn volume(&self, t: usize) -> &InMemVolume {
        &self.volumes[t]
    }
}
