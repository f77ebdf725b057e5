//! This module defines the sample element API, which enables raster
//! storage to decode, encode and convert individual pixel samples.
//!
//! The 8 supported encodings are modeled twice: [`Sample`] is the
//! compile-time view, implemented for the primitive numeric types, and
//! [`ChannelBuf`] is the runtime view, a closed tagged variant where each
//! kind carries its own typed contiguous buffer. All kind dispatch funnels
//! through the single match in [`with_samples!`], so the decode and encode
//! paths cannot drift apart per operation.
//!
//! [`Sample`]: ./trait.Sample.html
//! [`ChannelBuf`]: ./enum.ChannelBuf.html
use crate::error::Result;
use crate::typedef::SampleType;
use byteordered::{ByteOrdered, Endian, Endianness};
use num_traits::cast::AsPrimitive;
use std::io::Read;

/// Trait type for characterizing a raster sample element, implemented for
/// the primitive numeric types which represent pixel intensities.
///
/// Decoding honors the kind's signedness: an unsigned 16-bit raw pattern
/// converts as `0..=65535`, never through a two's-complement reading.
pub trait Sample: 'static + Sized + Copy + bytemuck::Pod + AsPrimitive<f64> {
    /// The sample type mapped to the implementing primitive.
    const SAMPLE_TYPE: SampleType;

    /// Encode an intensity with native narrowing semantics.
    ///
    /// The fractional part is discarded and out-of-range values wrap
    /// through a 64-bit integer intermediate. Floating kinds store the
    /// plain cast.
    fn from_f64(value: f64) -> Self;

    /// Encode an intensity, rounding to nearest and clamping into the
    /// kind's representable range. Floating kinds store the plain cast,
    /// for which the clamp is a practical no-op.
    fn from_f64_clamped(value: f64) -> Self;

    /// Read a single element from the given byte source.
    fn from_raw<S, E>(src: S, endianness: E) -> Result<Self>
    where
        S: Read,
        E: Endian;
}

macro_rules! impl_int_sample {
    ($t:ty, $kind:expr, $read:ident) => {
        impl Sample for $t {
            const SAMPLE_TYPE: SampleType = $kind;

            fn from_f64(value: f64) -> Self {
                value as i64 as $t
            }

            fn from_f64_clamped(value: f64) -> Self {
                value
                    .round()
                    .max(Self::SAMPLE_TYPE.min_value())
                    .min(Self::SAMPLE_TYPE.max_value()) as $t
            }

            fn from_raw<S, E>(src: S, endianness: E) -> Result<Self>
            where
                S: Read,
                E: Endian,
            {
                endianness.$read(src).map_err(From::from)
            }
        }
    };
}

impl Sample for u8 {
    const SAMPLE_TYPE: SampleType = SampleType::Uint8;

    fn from_f64(value: f64) -> Self {
        value as i64 as u8
    }

    fn from_f64_clamped(value: f64) -> Self {
        value.round().max(0.).min(255.) as u8
    }

    fn from_raw<S, E>(src: S, _: E) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        ByteOrdered::native(src).read_u8().map_err(From::from)
    }
}

impl Sample for i8 {
    const SAMPLE_TYPE: SampleType = SampleType::Int8;

    fn from_f64(value: f64) -> Self {
        value as i64 as i8
    }

    fn from_f64_clamped(value: f64) -> Self {
        value.round().max(-128.).min(127.) as i8
    }

    fn from_raw<S, E>(src: S, _: E) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        ByteOrdered::native(src).read_i8().map_err(From::from)
    }
}

impl_int_sample!(u16, SampleType::Uint16, read_u16);
impl_int_sample!(i16, SampleType::Int16, read_i16);
impl_int_sample!(u32, SampleType::Uint32, read_u32);
impl_int_sample!(i32, SampleType::Int32, read_i32);

impl Sample for f32 {
    const SAMPLE_TYPE: SampleType = SampleType::Float32;

    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn from_f64_clamped(value: f64) -> Self {
        value as f32
    }

    fn from_raw<S, E>(src: S, endianness: E) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        endianness.read_f32(src).map_err(From::from)
    }
}

impl Sample for f64 {
    const SAMPLE_TYPE: SampleType = SampleType::Float64;

    fn from_f64(value: f64) -> Self {
        value
    }

    fn from_f64_clamped(value: f64) -> Self {
        value
    }

    fn from_raw<S, E>(src: S, endianness: E) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        endianness.read_f64(src).map_err(From::from)
    }
}

/// One channel's pixel store: a contiguous typed buffer tagged by its
/// sample type.
///
/// Element indexes are a caller contract; an out-of-range index surfaces
/// as the native slice index panic rather than a checked error, keeping
/// the per-pixel path branch-free.
#[derive(Debug, PartialEq, Clone)]
pub enum ChannelBuf {
    /// unsigned 8-bit samples
    Uint8(Vec<u8>),
    /// signed 8-bit samples
    Int8(Vec<i8>),
    /// unsigned 16-bit samples
    Uint16(Vec<u16>),
    /// signed 16-bit samples
    Int16(Vec<i16>),
    /// unsigned 32-bit samples
    Uint32(Vec<u32>),
    /// signed 32-bit samples
    Int32(Vec<i32>),
    /// 32-bit float samples
    Float32(Vec<f32>),
    /// 64-bit float samples
    Float64(Vec<f64>),
}

/// The only place where a `ChannelBuf` is taken apart by kind. Binds the
/// typed buffer to `$samples` and evaluates `$action` once for the live
/// variant.
macro_rules! with_samples {
    ($buf:expr, $samples:ident => $action:expr) => {
        match $buf {
            ChannelBuf::Uint8($samples) => $action,
            ChannelBuf::Int8($samples) => $action,
            ChannelBuf::Uint16($samples) => $action,
            ChannelBuf::Int16($samples) => $action,
            ChannelBuf::Uint32($samples) => $action,
            ChannelBuf::Int32($samples) => $action,
            ChannelBuf::Float32($samples) => $action,
            ChannelBuf::Float64($samples) => $action,
        }
    };
}

fn kind_of<T: Sample>(_: &[T]) -> SampleType {
    T::SAMPLE_TYPE
}

fn decode_at<T: Sample>(samples: &[T], index: usize) -> f64 {
    samples[index].as_()
}

fn encode_at<T: Sample>(samples: &mut [T], index: usize, value: f64) {
    samples[index] = T::from_f64(value);
}

fn encode_at_clamped<T: Sample>(samples: &mut [T], index: usize, value: f64) {
    samples[index] = T::from_f64_clamped(value);
}

fn fill_with<T: Sample>(samples: &mut [T], value: f64) {
    let v = T::from_f64(value);
    for s in samples.iter_mut() {
        *s = v;
    }
}

fn read_all<T: Sample>(mut src: &[u8], endianness: Endianness) -> Result<Vec<T>> {
    let count = src.len() / T::SAMPLE_TYPE.size_of();
    (0..count).map(|_| T::from_raw(&mut src, endianness)).collect()
}

impl ChannelBuf {
    /// Allocate a zero-filled buffer of `len` elements of the given kind.
    pub fn new(kind: SampleType, len: usize) -> Self {
        use SampleType::*;
        match kind {
            Uint8 => ChannelBuf::Uint8(vec![0; len]),
            Int8 => ChannelBuf::Int8(vec![0; len]),
            Uint16 => ChannelBuf::Uint16(vec![0; len]),
            Int16 => ChannelBuf::Int16(vec![0; len]),
            Uint32 => ChannelBuf::Uint32(vec![0; len]),
            Int32 => ChannelBuf::Int32(vec![0; len]),
            Float32 => ChannelBuf::Float32(vec![0.; len]),
            Float64 => ChannelBuf::Float64(vec![0.; len]),
        }
    }

    /// Allocate an empty buffer of the given kind. Used as the hole left
    /// behind when a buffer is moved into a cursor's channel cache.
    pub fn empty(kind: SampleType) -> Self {
        ChannelBuf::new(kind, 0)
    }

    /// Decode raw sample bytes in the given byte order into a typed buffer.
    ///
    /// This is the interop seam for loader front ends that produce plain
    /// byte blobs; no file format interpretation happens here. Trailing
    /// bytes that do not fill a whole element are ignored; a length
    /// mismatch against a raster's extents is caught when the buffer is
    /// bundled into a plane.
    pub fn from_raw_bytes(kind: SampleType, endianness: Endianness, bytes: &[u8]) -> Result<Self> {
        use SampleType::*;
        Ok(match kind {
            Uint8 => ChannelBuf::Uint8(read_all(bytes, endianness)?),
            Int8 => ChannelBuf::Int8(read_all(bytes, endianness)?),
            Uint16 => ChannelBuf::Uint16(read_all(bytes, endianness)?),
            Int16 => ChannelBuf::Int16(read_all(bytes, endianness)?),
            Uint32 => ChannelBuf::Uint32(read_all(bytes, endianness)?),
            Int32 => ChannelBuf::Int32(read_all(bytes, endianness)?),
            Float32 => ChannelBuf::Float32(read_all(bytes, endianness)?),
            Float64 => ChannelBuf::Float64(read_all(bytes, endianness)?),
        })
    }

    /// This buffer's sample type.
    pub fn kind(&self) -> SampleType {
        with_samples!(self, samples => kind_of(samples))
    }

    /// The number of elements held.
    pub fn len(&self) -> usize {
        with_samples!(self, samples => samples.len())
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the element at `index` as a double precision value.
    pub fn get(&self, index: usize) -> f64 {
        with_samples!(self, samples => decode_at(samples, index))
    }

    /// Encode `value` into the element at `index` with native narrowing
    /// semantics (see [`Sample::from_f64`]).
    ///
    /// [`Sample::from_f64`]: ./trait.Sample.html#tymethod.from_f64
    pub fn put(&mut self, index: usize, value: f64) {
        with_samples!(self, samples => encode_at(samples, index, value))
    }

    /// Encode `value` into the element at `index`, rounding and clamping
    /// into the kind's representable range first.
    pub fn put_clamped(&mut self, index: usize, value: f64) {
        with_samples!(self, samples => encode_at_clamped(samples, index, value))
    }

    /// Set every element to the narrowing encoding of `value`.
    pub fn fill(&mut self, value: f64) {
        with_samples!(self, samples => fill_with(samples, value))
    }

    /// View the samples as raw bytes in native element order.
    pub fn as_bytes(&self) -> &[u8] {
        with_samples!(self, samples => bytemuck::cast_slice(samples))
    }

    /// View the samples as mutable raw bytes in native element order.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        with_samples!(self, samples => bytemuck::cast_slice_mut(samples))
    }
}

impl From<Vec<u8>> for ChannelBuf {
    fn from(samples: Vec<u8>) -> Self {
        ChannelBuf::Uint8(samples)
    }
}

impl From<Vec<i8>> for ChannelBuf {
    fn from(samples: Vec<i8>) -> Self {
        ChannelBuf::Int8(samples)
    }
}

impl From<Vec<u16>> for ChannelBuf {
    fn from(samples: Vec<u16>) -> Self {
        ChannelBuf::Uint16(samples)
    }
}

impl From<Vec<i16>> for ChannelBuf {
    fn from(samples: Vec<i16>) -> Self {
        ChannelBuf::Int16(samples)
    }
}

impl From<Vec<u32>> for ChannelBuf {
    fn from(samples: Vec<u32>) -> Self {
        ChannelBuf::Uint32(samples)
    }
}

impl From<Vec<i32>> for ChannelBuf {
    fn from(samples: Vec<i32>) -> Self {
        ChannelBuf::Int32(samples)
    }
}

impl From<Vec<f32>> for ChannelBuf {
    fn from(samples: Vec<f32>) -> Self {
        ChannelBuf::Float32(samples)
    }
}

impl From<Vec<f64>> for ChannelBuf {
    fn from(samples: Vec<f64>) -> Self {
        ChannelBuf::Float64(samples)
    }
}
