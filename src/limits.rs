//! Allocation limits for owned buffers.
//!
//! [`BufferLimits`] caps what [`Buffer::try_new_with_limits`](crate::Buffer::try_new_with_limits)
//! is allowed to allocate. [`LimitExceeded`] is returned when a check fails,
//! before any memory is reserved.

use crate::Dimensions;

/// Caps on buffer size.
///
/// All fields are optional; `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use planebuf::BufferLimits;
///
/// let limits = BufferLimits::none()
///     .with_max_pixels(16_000_000)
///     .with_max_memory(256 * 1024 * 1024);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct BufferLimits {
    /// Maximum buffer width in samples.
    pub max_width: Option<u32>,
    /// Maximum buffer height in samples.
    pub max_height: Option<u32>,
    /// Maximum total samples (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum backing storage in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl BufferLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum width.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum height.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum total samples.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum storage in bytes.
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_pixels.is_some()
            || self.max_memory_bytes.is_some()
    }

    /// Check dimensions against `max_width`, `max_height`, and `max_pixels`.
    pub fn check_dimensions(&self, dims: Dimensions) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width
            && dims.width > max
        {
            return Err(LimitExceeded::Width {
                actual: dims.width,
                max,
            });
        }
        if let Some(max) = self.max_height
            && dims.height > max
        {
            return Err(LimitExceeded::Height {
                actual: dims.height,
                max,
            });
        }
        if let Some(max) = self.max_pixels {
            let pixels = dims.width as u64 * dims.height as u64;
            if pixels > max {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Check a storage size against `max_memory_bytes`.
    pub fn check_memory(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_memory_bytes
            && bytes > max
        {
            return Err(LimitExceeded::Memory { actual: bytes, max });
        }
        Ok(())
    }

    /// Check everything needed to allocate `dims` samples of `T`.
    pub fn check_allocation<T>(&self, dims: Dimensions) -> Result<(), LimitExceeded> {
        self.check_dimensions(dims)?;
        let bytes = (dims.width as u64)
            .saturating_mul(dims.height as u64)
            .saturating_mul(core::mem::size_of::<T>() as u64);
        self.check_memory(bytes)
    }
}

/// A buffer limit was exceeded.
///
/// Each variant carries the actual value and the limit that was exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Width exceeded `max_width`.
    Width {
        /// Actual width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Height exceeded `max_height`.
    Height {
        /// Actual height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Sample count exceeded `max_pixels`.
    Pixels {
        /// Actual sample count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Storage size exceeded `max_memory_bytes`.
    Memory {
        /// Required bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Width { actual, max } => write!(f, "width {actual} exceeds limit {max}"),
            Self::Height { actual, max } => write!(f, "height {actual} exceeds limit {max}"),
            Self::Pixels { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::Memory { actual, max } => {
                write!(f, "memory {actual} bytes exceeds limit {max}")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
