//! Error types and the crate-wide result alias.
use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    #[derive(Debug)]
    /// Error type for all raster and cursor operations.
    pub enum CursorError {
        /// Attempted to acquire a raster that is already write-locked.
        RasterLocked {
            display("raster is already locked for writing")
        }
        /// A raw sample type code did not map to any of the supported kinds.
        UnsupportedSampleType(code: u16) {
            display("unsupported sample type code {}", code)
        }
        /// Released plane data does not match the raster it came from.
        MismatchedPlaneData {
            display("released plane data does not match the raster's geometry")
        }
        /// The planes of a volume (or volumes of a sequence) disagree on
        /// extents or sample type.
        InconsistentPlanes {
            display("planes in the same dataset must share extents and sample type")
        }
        /// I/O error while reading raw sample data.
        Io(err: IOError) {
            from()
            source(err)
            display("{}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, CursorError>;
