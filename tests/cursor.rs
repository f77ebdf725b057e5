use pretty_assertions::assert_eq;

use byteordered::Endianness;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use voxcursor::{
    ChannelBuf, CursorError, InMemRaster, InMemSequence, InMemVolume, PlaneCursor, PlaneLock,
    Raster, SampleType, Sequence, SequenceCursor, Volume, VolumeCursor,
};

#[test]
fn touching_one_plane_locks_exactly_one_plane() {
    let seq = InMemSequence::filled(16, 16, 10, 10, 2, SampleType::Uint16);
    let mut cursor = SequenceCursor::new(&seq);

    cursor.set(4, 4, 3, 2, 0, 1000.).unwrap();
    cursor.set(5, 4, 3, 2, 1, 2000.).unwrap();

    assert_eq!(cursor.open_volumes(), 1);
    assert_eq!(cursor.open_planes(), 1);

    for t in 0..10 {
        for z in 0..10 {
            let raster = seq.volume(t).raster(z);
            if (t, z) == (2, 3) {
                assert!(raster.is_locked(), "touched plane must hold its lock");
            } else {
                assert!(!raster.is_locked(), "untouched plane (t={}, z={})", t, z);
            }
        }
    }

    cursor.commit_changes().unwrap();

    for t in 0..10 {
        for z in 0..10 {
            let raster = seq.volume(t).raster(z);
            assert!(!raster.is_locked());
            let expected = if (t, z) == (2, 3) { 1 } else { 0 };
            assert_eq!(raster.updates(), expected, "(t={}, z={})", t, z);
        }
    }
}

#[test]
fn one_notification_per_dirty_plane() {
    let seq = InMemSequence::filled(8, 8, 4, 4, 1, SampleType::Float64);
    let notifications = Arc::new(AtomicUsize::new(0));
    for t in 0..4 {
        for z in 0..4 {
            let seen = Arc::clone(&notifications);
            seq.volume(t).raster(z).on_data_changed(move || {
                let _ = seen.fetch_add(1, Ordering::SeqCst);
            });
        }
    }

    let mut cursor = SequenceCursor::new(&seq);
    // many writes over two planes, one read-only touch on a third
    for i in 0..8 {
        cursor.set(i, 0, 0, 0, 0, i as f64).unwrap();
        cursor.set(i, 1, 2, 1, 0, i as f64).unwrap();
    }
    let _ = cursor.get(0, 0, 1, 3, 0).unwrap();

    cursor.commit_changes().unwrap();
    assert_eq!(notifications.load(Ordering::SeqCst), 2);
}

#[test]
fn committed_data_is_visible_to_a_new_cursor() {
    let seq = InMemSequence::filled(4, 4, 2, 2, 1, SampleType::Int32);
    let mut writer = SequenceCursor::new(&seq);
    for y in 0..4 {
        for x in 0..4 {
            writer.set(x, y, 1, 1, 0, (y * 4 + x) as f64).unwrap();
        }
    }
    writer.commit_changes().unwrap();

    let mut reader = SequenceCursor::new(&seq);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(reader.get(x, y, 1, 1, 0).unwrap(), (y * 4 + x) as f64);
        }
    }
    reader.commit_changes().unwrap();
}

#[test]
fn set_and_set_safe_differ_outside_the_range() {
    let seq = InMemSequence::filled(2, 2, 1, 1, 1, SampleType::Uint8);
    let mut cursor = SequenceCursor::new(&seq);

    cursor.set(0, 0, 0, 0, 0, 300.).unwrap();
    cursor.set_safe(1, 0, 0, 0, 0, 300.).unwrap();
    cursor.set_safe(0, 1, 0, 0, 0, -10.).unwrap();

    assert_eq!(cursor.get(0, 0, 0, 0, 0).unwrap(), 44.);
    assert_eq!(cursor.get(1, 0, 0, 0, 0).unwrap(), 255.);
    assert_eq!(cursor.get(0, 1, 0, 0, 0).unwrap(), 0.);
    cursor.commit_changes().unwrap();
}

#[test]
fn volume_cursor_rejects_a_plane_locked_elsewhere() {
    let volume = InMemVolume::filled(4, 4, 3, 1, SampleType::Uint8);
    let outside = PlaneCursor::new(volume.raster(1)).unwrap();

    let mut cursor = VolumeCursor::new(&volume);
    cursor.set(0, 0, 0, 0, 1.).unwrap();
    assert!(matches!(
        cursor.set(0, 0, 1, 0, 1.),
        Err(CursorError::RasterLocked)
    ));
    // the failed touch must not have materialized a slot
    assert_eq!(cursor.open_planes(), 1);

    outside.commit_changes().unwrap();
    cursor.set(0, 0, 1, 0, 1.).unwrap();
    cursor.commit_changes().unwrap();
}

#[test]
fn raster_built_from_raw_bytes_reads_back() {
    let le = ChannelBuf::from_raw_bytes(
        SampleType::Int16,
        Endianness::Little,
        &[0x01, 0x00, 0xFF, 0xFF, 0x00, 0x80, 0xFF, 0x7F],
    )
    .unwrap();
    let raster = InMemRaster::from_channels(2, 2, vec![le]).unwrap();

    let mut cursor = PlaneCursor::new(&raster).unwrap();
    assert_eq!(cursor.get(0, 0, 0), 1.);
    assert_eq!(cursor.get(1, 0, 0), -1.);
    assert_eq!(cursor.get(0, 1, 0), -32768.);
    assert_eq!(cursor.get(1, 1, 0), 32767.);
    cursor.commit_changes().unwrap();
}

/// A raster whose release path always fails, for exercising commit
/// failure propagation through the tiers.
#[derive(Debug)]
struct BrokenRelease(InMemRaster);

impl Raster for BrokenRelease {
    fn width(&self) -> u16 {
        self.0.width()
    }
    fn height(&self) -> u16 {
        self.0.height()
    }
    fn channel_count(&self) -> usize {
        self.0.channel_count()
    }
    fn sample_type(&self) -> SampleType {
        self.0.sample_type()
    }
    fn lock_for_write(&self) -> voxcursor::Result<PlaneLock> {
        self.0.lock_for_write()
    }
    fn release_write_lock(&self, _lock: PlaneLock, _dirty: bool) -> voxcursor::Result<()> {
        Err(CursorError::MismatchedPlaneData)
    }
    fn notify_data_changed(&self) {
        self.0.notify_data_changed();
    }
}

#[test]
fn commit_failure_propagates_and_fires_no_notification() {
    let raster = BrokenRelease(InMemRaster::new(2, 2, 1, SampleType::Uint8));
    let notifications = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&notifications);
    raster.0.on_data_changed(move || {
        let _ = seen.fetch_add(1, Ordering::SeqCst);
    });

    let mut cursor = PlaneCursor::new(&raster).unwrap();
    cursor.set(0, 0, 0, 1.);
    assert!(matches!(
        cursor.commit_changes(),
        Err(CursorError::MismatchedPlaneData)
    ));
    assert_eq!(notifications.load(Ordering::SeqCst), 0);
}

#[test]
fn raster_order_scan_round_trips_across_channels() {
    let seq = InMemSequence::filled(6, 5, 2, 2, 3, SampleType::Float32);
    let mut cursor = SequenceCursor::new(&seq);

    for c in 0..3 {
        for y in 0..5 {
            for x in 0..6 {
                let v = (c * 100 + y * 6 + x) as f64;
                cursor.set_safe(x, y, 1, 0, c, v).unwrap();
            }
        }
    }
    for c in 0..3 {
        for y in 0..5 {
            for x in 0..6 {
                let v = (c * 100 + y * 6 + x) as f64;
                assert_eq!(cursor.get(x, y, 1, 0, c).unwrap(), v);
            }
        }
    }
    cursor.commit_changes().unwrap();
    assert_eq!(seq.volume(0).raster(1).updates(), 1);
}
