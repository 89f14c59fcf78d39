//! Width/height pair shared by every buffer type.

use core::fmt;

/// Immutable buffer size in samples.
///
/// Fixed when a buffer is created; every buffer holds exactly
/// `width * height` samples for its whole life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Samples per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Dimensions {
    /// Create a width/height pair.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width * height`, or `None` if the product does not fit in `usize`.
    #[inline]
    pub const fn checked_element_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// `width * height`.
    ///
    /// # Panics
    ///
    /// Panics if the product overflows `usize`. Buffers validate this at
    /// construction, so calling it on a live buffer's dimensions never panics.
    #[inline]
    pub const fn element_count(self) -> usize {
        match self.checked_element_count() {
            Some(n) => n,
            None => panic!("dimensions overflow usize"),
        }
    }

    /// Whether `(x, y)` lies inside `[0, width) x [0, height)`.
    #[inline]
    pub const fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Whether either side is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn element_count() {
        assert_eq!(Dimensions::new(4, 3).element_count(), 12);
        assert_eq!(Dimensions::new(0, 3).element_count(), 0);
    }

    #[test]
    fn contains_is_half_open() {
        let d = Dimensions::new(4, 3);
        assert!(d.contains(0, 0));
        assert!(d.contains(3, 2));
        assert!(!d.contains(4, 0));
        assert!(!d.contains(0, 3));
    }

    #[test]
    fn transposed_is_not_equal() {
        assert_ne!(Dimensions::new(4, 3), Dimensions::new(3, 4));
    }

    #[test]
    fn empty() {
        assert!(Dimensions::new(0, 5).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }

    #[test]
    fn from_tuple_and_display() {
        let d: Dimensions = (640, 480).into();
        assert_eq!(format!("{d}"), "640x480");
    }
}
