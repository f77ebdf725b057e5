//! This module defines the closed set of sample encodings supported by
//! raster storage. Exactly 8 kinds exist: signed and unsigned integers of
//! 8, 16 and 32 bits, plus single and double precision floating point.
//! Primitive integer codes can be converted to [`SampleType`] and
//! vice-versa, which is how loader front ends hand a kind over to this
//! crate.
//!
//! [`SampleType`]: ./enum.SampleType.html

use crate::error::{CursorError, Result};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

/// Data type for representing the encoding of a single sample in a raster.
///
/// All channels of a raster share one sample type. The discriminant values
/// are stable and can be used as interchange codes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum SampleType {
    /// unsigned 8-bit integer
    Uint8 = 1,
    /// signed 8-bit integer
    Int8 = 2,
    /// unsigned 16-bit integer
    Uint16 = 3,
    /// signed 16-bit integer
    Int16 = 4,
    /// unsigned 32-bit integer
    Uint32 = 5,
    /// signed 32-bit integer
    Int32 = 6,
    /// 32-bit float
    Float32 = 7,
    /// 64-bit float
    Float64 = 8,
}

impl SampleType {
    /// Interpret a raw interchange code as a sample type.
    ///
    /// # Errors
    ///
    /// An unknown code is a data integrity error, not a transient
    /// condition: `CursorError::UnsupportedSampleType` is returned and the
    /// code should not be retried.
    pub fn from_code(code: u16) -> Result<Self> {
        SampleType::from_u16(code).ok_or(CursorError::UnsupportedSampleType(code))
    }

    /// Retrieve the size of an element of this sample type, in bytes.
    pub fn size_of(self) -> usize {
        use SampleType::*;
        match self {
            Int8 | Uint8 => 1,
            Int16 | Uint16 => 2,
            Int32 | Uint32 | Float32 => 4,
            Float64 => 8,
        }
    }

    /// Retrieve the width of an element of this sample type, in bits.
    pub fn bit_width(self) -> usize {
        self.size_of() * 8
    }

    /// Whether this sample type can represent negative values.
    pub fn is_signed(self) -> bool {
        use SampleType::*;
        match self {
            Uint8 | Uint16 | Uint32 => false,
            Int8 | Int16 | Int32 | Float32 | Float64 => true,
        }
    }

    /// Whether this sample type is an integer encoding.
    pub fn is_integer(self) -> bool {
        use SampleType::*;
        match self {
            Float32 | Float64 => false,
            _ => true,
        }
    }

    /// The smallest value representable in this sample type.
    pub fn min_value(self) -> f64 {
        use SampleType::*;
        match self {
            Uint8 | Uint16 | Uint32 => 0.,
            Int8 => f64::from(i8::min_value()),
            Int16 => f64::from(i16::min_value()),
            Int32 => f64::from(i32::min_value()),
            Float32 => f64::from(std::f32::MIN),
            Float64 => std::f64::MIN,
        }
    }

    /// The largest value representable in this sample type.
    pub fn max_value(self) -> f64 {
        use SampleType::*;
        match self {
            Uint8 => f64::from(u8::max_value()),
            Uint16 => f64::from(u16::max_value()),
            Uint32 => f64::from(u32::max_value()),
            Int8 => f64::from(i8::max_value()),
            Int16 => f64::from(i16::max_value()),
            Int32 => f64::from(i32::max_value()),
            Float32 => f64::from(std::f32::MAX),
            Float64 => std::f64::MAX,
        }
    }
}
