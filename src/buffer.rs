//! Owned and borrowed sample buffers.
//!
//! A [`Buffer`] owns its storage and releases it exactly once, when it is
//! dropped. [`BufferRef`] and [`BufferMut`] wrap storage owned elsewhere and
//! never free it; the borrow checker keeps the owner alive for as long as
//! any of them exist. All three share the [`BufferAccess`] /
//! [`BufferAccessMut`] interface.

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};

use imgref::{ImgRef, ImgRefMut, ImgVec};
use log::{debug, trace};

use crate::limits::{BufferLimits, LimitExceeded};
use crate::{BufferAccess, BufferAccessMut, Dimensions};

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Errors from buffer operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// Linear index is not below the sample count.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of samples in the buffer.
        len: usize,
    },
    /// Coordinates fall outside `[0, width) x [0, height)`.
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Size of the buffer.
        dimensions: Dimensions,
    },
    /// Two buffers that must match in size do not.
    SizeMismatch {
        /// Dimensions of the destination.
        expected: Dimensions,
        /// Dimensions of the source.
        actual: Dimensions,
    },
    /// External storage holds fewer samples than the buffer needs.
    InsufficientData {
        /// Samples needed.
        required: usize,
        /// Samples available.
        actual: usize,
    },
    /// `width * height` does not fit in memory addressing.
    InvalidDimensions {
        /// The offending dimensions.
        dimensions: Dimensions,
    },
    /// Storage for an owned buffer could not be reserved.
    AllocationFailed {
        /// Samples that were requested.
        elements: usize,
    },
    /// A strided image was offered where contiguous rows are required.
    NotContiguous {
        /// Image width in samples.
        width: usize,
        /// Distance between row starts in samples.
        stride: usize,
    },
    /// A [`BufferLimits`] cap rejected the allocation.
    Limit(LimitExceeded),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range (len: {len})")
            }
            Self::OutOfBounds { x, y, dimensions } => {
                write!(f, "position ({x}, {y}) out of bounds ({dimensions})")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "buffer size mismatch: expected {expected}, got {actual}")
            }
            Self::InsufficientData { required, actual } => {
                write!(f, "storage holds {actual} samples, {required} required")
            }
            Self::InvalidDimensions { dimensions } => {
                write!(f, "dimensions {dimensions} overflow the address space")
            }
            Self::AllocationFailed { elements } => {
                write!(f, "failed to allocate {elements} samples")
            }
            Self::NotContiguous { width, stride } => {
                write!(f, "image stride {stride} differs from width {width}")
            }
            Self::Limit(e) => write!(f, "buffer limit exceeded: {e}"),
        }
    }
}

impl core::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Limit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LimitExceeded> for BufferError {
    fn from(e: LimitExceeded) -> Self {
        Self::Limit(e)
    }
}

// ---------------------------------------------------------------------------
// BufferRef (borrowed, immutable)
// ---------------------------------------------------------------------------

/// Read-only view of samples owned elsewhere.
///
/// Cheap to copy; copies alias the same storage.
pub struct BufferRef<'a, T> {
    data: &'a [T],
    dims: Dimensions,
}

impl<'a, T> BufferRef<'a, T> {
    /// Wrap external storage.
    ///
    /// Samples past `width * height` are not part of the view.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if `width * height` overflows,
    /// [`BufferError::InsufficientData`] if `data` is too short.
    pub fn new(data: &'a [T], dims: Dimensions) -> Result<Self, BufferError> {
        let len = required_len(dims, data.len())?;
        Ok(Self {
            data: &data[..len],
            dims,
        })
    }

    /// Caller guarantees `data.len() == dims.element_count()`.
    #[inline]
    pub(crate) fn from_parts(data: &'a [T], dims: Dimensions) -> Self {
        debug_assert_eq!(Some(data.len()), dims.checked_element_count());
        Self { data, dims }
    }

    /// The underlying storage, with the full borrow lifetime.
    #[inline]
    pub fn into_slice(self) -> &'a [T] {
        self.data
    }
}

impl<T> Clone for BufferRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BufferRef<'_, T> {}

impl<T> BufferAccess for BufferRef<'_, T> {
    type Sample = T;

    #[inline]
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self.data
    }
}

impl<T> fmt::Debug for BufferRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferRef({})", self.dims)
    }
}

// ---------------------------------------------------------------------------
// BufferMut (borrowed, mutable)
// ---------------------------------------------------------------------------

/// Mutable view of samples owned elsewhere.
///
/// Same semantics as [`BufferRef`] but allows writing.
pub struct BufferMut<'a, T> {
    data: &'a mut [T],
    dims: Dimensions,
}

impl<'a, T> BufferMut<'a, T> {
    /// Wrap external storage for writing.
    ///
    /// Samples past `width * height` are not part of the view.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if `width * height` overflows,
    /// [`BufferError::InsufficientData`] if `data` is too short.
    pub fn new(data: &'a mut [T], dims: Dimensions) -> Result<Self, BufferError> {
        let len = required_len(dims, data.len())?;
        Ok(Self {
            data: &mut data[..len],
            dims,
        })
    }

    /// Caller guarantees `data.len() == dims.element_count()`.
    #[inline]
    pub(crate) fn from_parts(data: &'a mut [T], dims: Dimensions) -> Self {
        debug_assert_eq!(Some(data.len()), dims.checked_element_count());
        Self { data, dims }
    }

    /// The underlying storage, with the full borrow lifetime.
    #[inline]
    pub fn into_slice(self) -> &'a mut [T] {
        self.data
    }
}

impl<T> BufferAccess for BufferMut<'_, T> {
    type Sample = T;

    #[inline]
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &*self.data
    }
}

impl<T> BufferAccessMut for BufferMut<'_, T> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }
}

impl<T> fmt::Debug for BufferMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferMut({})", self.dims)
    }
}

// ---------------------------------------------------------------------------
// Buffer (owned)
// ---------------------------------------------------------------------------

/// Owned 2D buffer of samples.
///
/// Storage is allocated at construction and released when the buffer is
/// dropped. [`into_vec`](Self::into_vec) hands the allocation to the caller
/// instead. Cloning makes an independent deep copy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Buffer<T> {
    data: Vec<T>,
    dims: Dimensions,
}

impl<T> Buffer<T> {
    /// Allocate a buffer with every sample set to `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize` or the allocation
    /// size overflows. Use [`try_new`](Self::try_new) to handle both.
    pub fn new(dims: Dimensions) -> Self
    where
        T: Default + Clone,
    {
        Self::filled(dims, T::default())
    }

    /// Allocate a buffer with every sample set to `value`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn filled(dims: Dimensions, value: T) -> Self
    where
        T: Clone,
    {
        let len = dims.element_count();
        trace!("allocating {dims} buffer ({len} samples)");
        Self {
            data: alloc::vec![value; len],
            dims,
        }
    }

    /// Fallible [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if `width * height` overflows,
    /// [`BufferError::AllocationFailed`] if the storage cannot be reserved.
    pub fn try_new(dims: Dimensions) -> Result<Self, BufferError>
    where
        T: Default + Clone,
    {
        Self::try_filled(dims, T::default())
    }

    /// Fallible [`filled`](Self::filled).
    ///
    /// # Errors
    ///
    /// Same as [`try_new`](Self::try_new).
    pub fn try_filled(dims: Dimensions, value: T) -> Result<Self, BufferError>
    where
        T: Clone,
    {
        let len = dims
            .checked_element_count()
            .ok_or(BufferError::InvalidDimensions { dimensions: dims })?;
        let mut data = Vec::new();
        if let Err(e) = data.try_reserve_exact(len) {
            debug!("allocation of {len} samples for {dims} buffer failed: {e}");
            return Err(BufferError::AllocationFailed { elements: len });
        }
        trace!("allocating {dims} buffer ({len} samples)");
        data.resize(len, value);
        Ok(Self { data, dims })
    }

    /// Allocate after checking `limits`.
    ///
    /// # Errors
    ///
    /// [`BufferError::Limit`] if a cap is exceeded; otherwise as
    /// [`try_new`](Self::try_new).
    pub fn try_new_with_limits(dims: Dimensions, limits: &BufferLimits) -> Result<Self, BufferError>
    where
        T: Default + Clone,
    {
        if let Err(e) = limits.check_allocation::<T>(dims) {
            debug!("rejecting {dims} buffer: {e}");
            return Err(e.into());
        }
        Self::try_new(dims)
    }

    /// Take ownership of an existing allocation.
    ///
    /// Samples past `width * height` are dropped.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if `width * height` overflows,
    /// [`BufferError::InsufficientData`] if `data` is too short.
    pub fn from_vec(mut data: Vec<T>, dims: Dimensions) -> Result<Self, BufferError> {
        let len = required_len(dims, data.len())?;
        data.truncate(len);
        trace!("adopting {len} samples as {dims} buffer");
        Ok(Self { data, dims })
    }

    /// Caller guarantees `data.len() == dims.element_count()`.
    #[inline]
    pub(crate) fn from_parts(data: Vec<T>, dims: Dimensions) -> Self {
        debug_assert_eq!(Some(data.len()), dims.checked_element_count());
        Self { data, dims }
    }

    /// Release ownership of the storage to the caller without freeing it.
    pub fn into_vec(self) -> Vec<T> {
        trace!("handing off {} buffer storage", self.dims);
        self.data
    }

    /// Convert into an [`ImgVec`] without copying.
    pub fn into_imgvec(self) -> ImgVec<T> {
        let Dimensions { width, height } = self.dims;
        ImgVec::new(self.data, width as usize, height as usize)
    }
}

impl<T> BufferAccess for Buffer<T> {
    type Sample = T;

    #[inline]
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> BufferAccessMut for Buffer<T> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({})", self.dims)
    }
}

// ---------------------------------------------------------------------------
// Index / IndexMut (panicking access)
// ---------------------------------------------------------------------------

macro_rules! impl_index {
    ($ty:ty $(, $lt:lifetime)?) => {
        impl<$($lt,)? T> Index<usize> for $ty {
            type Output = T;

            #[inline]
            fn index(&self, index: usize) -> &T {
                &self.as_slice()[index]
            }
        }

        impl<$($lt,)? T> Index<(u32, u32)> for $ty {
            type Output = T;

            #[inline]
            fn index(&self, (x, y): (u32, u32)) -> &T {
                let index = xy_index(self.dims, x, y);
                &self.as_slice()[index]
            }
        }
    };
}

macro_rules! impl_index_mut {
    ($ty:ty $(, $lt:lifetime)?) => {
        impl<$($lt,)? T> IndexMut<usize> for $ty {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut T {
                &mut self.as_mut_slice()[index]
            }
        }

        impl<$($lt,)? T> IndexMut<(u32, u32)> for $ty {
            #[inline]
            fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut T {
                let index = xy_index(self.dims, x, y);
                &mut self.as_mut_slice()[index]
            }
        }
    };
}

impl_index!(Buffer<T>);
impl_index!(BufferRef<'a, T>, 'a);
impl_index!(BufferMut<'a, T>, 'a);
impl_index_mut!(Buffer<T>);
impl_index_mut!(BufferMut<'a, T>, 'a);

// ---------------------------------------------------------------------------
// imgref interop
// ---------------------------------------------------------------------------

impl<'a, T> TryFrom<ImgRef<'a, T>> for BufferRef<'a, T> {
    type Error = BufferError;

    /// Zero-copy view of a contiguous image.
    fn try_from(img: ImgRef<'a, T>) -> Result<Self, BufferError> {
        let dims = imgref_dimensions(img.width(), img.height(), img.stride())?;
        BufferRef::new(img.into_buf(), dims)
    }
}

impl<'a, T> TryFrom<ImgRefMut<'a, T>> for BufferMut<'a, T> {
    type Error = BufferError;

    /// Zero-copy mutable view of a contiguous image.
    fn try_from(img: ImgRefMut<'a, T>) -> Result<Self, BufferError> {
        let dims = imgref_dimensions(img.width(), img.height(), img.stride())?;
        BufferMut::new(img.into_buf(), dims)
    }
}

impl<T: Clone> TryFrom<ImgVec<T>> for Buffer<T> {
    type Error = BufferError;

    /// Takes the allocation when rows are contiguous, otherwise copies
    /// the rows into a tightly packed buffer.
    fn try_from(img: ImgVec<T>) -> Result<Self, BufferError> {
        let (width, height) = (img.width(), img.height());
        let dims = usize_dimensions(width, height)?;
        if img.stride() == width || height <= 1 {
            return Buffer::from_vec(img.into_buf(), dims);
        }
        let (buf, _, _) = img.as_ref().to_contiguous_buf();
        Ok(Buffer::from_parts(buf.into_owned(), dims))
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Fail unless both buffers have identical dimensions.
pub(crate) fn check_same_size(expected: Dimensions, actual: Dimensions) -> Result<(), BufferError> {
    if expected != actual {
        debug!("buffer size mismatch: expected {expected}, got {actual}");
        return Err(BufferError::SizeMismatch { expected, actual });
    }
    Ok(())
}

/// Element count for `dims`, checked against `available` samples.
fn required_len(dims: Dimensions, available: usize) -> Result<usize, BufferError> {
    let required = dims
        .checked_element_count()
        .ok_or(BufferError::InvalidDimensions { dimensions: dims })?;
    if available < required {
        return Err(BufferError::InsufficientData {
            required,
            actual: available,
        });
    }
    Ok(required)
}

/// Linear index for the panicking `(x, y)` indexers.
#[inline]
fn xy_index(dims: Dimensions, x: u32, y: u32) -> usize {
    assert!(
        dims.contains(x, y),
        "position ({x}, {y}) out of bounds ({dims})"
    );
    y as usize * dims.width as usize + x as usize
}

fn imgref_dimensions(width: usize, height: usize, stride: usize) -> Result<Dimensions, BufferError> {
    if stride != width && height > 1 {
        return Err(BufferError::NotContiguous { width, stride });
    }
    usize_dimensions(width, height)
}

fn usize_dimensions(width: usize, height: usize) -> Result<Dimensions, BufferError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok(Dimensions::new(w, h)),
        _ => Err(BufferError::InvalidDimensions {
            dimensions: Dimensions::new(
                u32::try_from(width).unwrap_or(u32::MAX),
                u32::try_from(height).unwrap_or(u32::MAX),
            ),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
