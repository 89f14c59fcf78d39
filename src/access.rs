//! Read and write capabilities shared by owned and borrowed buffers.
//!
//! [`BufferAccess`] is implemented by [`Buffer`], [`BufferRef`] and
//! [`BufferMut`]; [`BufferAccessMut`] by the two writable ones. Every
//! indexing and bulk operation is a provided method, so implementors only
//! expose their dimensions and contiguous storage.

use crate::{Buffer, BufferError, BufferMut, BufferRef, Dimensions};

/// Read access to a row-major 2D grid of samples.
///
/// Implementors guarantee `as_slice().len() == dimensions().element_count()`.
pub trait BufferAccess {
    /// Per-pixel sample type.
    type Sample;

    /// Width and height in samples.
    fn dimensions(&self) -> Dimensions;

    /// All samples in row-major order, exactly `width * height` long.
    fn as_slice(&self) -> &[Self::Sample];

    /// Samples per row.
    #[inline]
    fn width(&self) -> u32 {
        self.dimensions().width
    }

    /// Number of rows.
    #[inline]
    fn height(&self) -> u32 {
        self.dimensions().height
    }

    /// Number of samples (`width * height`).
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the buffer holds no samples.
    #[inline]
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Linear index of `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if `x >= width` or `y >= height`.
    #[inline]
    fn index_of(&self, x: u32, y: u32) -> Result<usize, BufferError> {
        let dims = self.dimensions();
        if !dims.contains(x, y) {
            return Err(BufferError::OutOfBounds {
                x,
                y,
                dimensions: dims,
            });
        }
        Ok(self.index_of_unchecked(x, y))
    }

    /// `y * width + x` without checking the coordinates.
    ///
    /// The result is only a valid index when `(x, y)` is inside the buffer.
    #[inline]
    fn index_of_unchecked(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }

    /// Linear index of the sample nearest to a real-valued position.
    ///
    /// Both coordinates are rounded half away from zero. Returns `None`
    /// when the rounded position falls outside the buffer or either
    /// coordinate is NaN; a miss is an expected outcome for projected
    /// points, not an error.
    fn index_of_rounded(&self, fx: f32, fy: f32) -> Option<usize> {
        let rx = libm::roundf(fx) as f64;
        let ry = libm::roundf(fy) as f64;
        let dims = self.dimensions();
        let inside = rx >= 0.0
            && rx < dims.width as f64
            && ry >= 0.0
            && ry < dims.height as f64;
        inside.then(|| self.index_of_unchecked(rx as u32, ry as u32))
    }

    /// Sample at linear index `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `index >= len()`.
    #[inline]
    fn get(&self, index: usize) -> Result<&Self::Sample, BufferError> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(BufferError::OutOfRange { index, len })
    }

    /// Sample at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if the coordinates are outside the buffer.
    #[inline]
    fn get_xy(&self, x: u32, y: u32) -> Result<&Self::Sample, BufferError> {
        let index = self.index_of(x, y)?;
        Ok(&self.as_slice()[index])
    }

    /// Sample nearest to a real-valued position, see [`index_of_rounded`](Self::index_of_rounded).
    #[inline]
    fn get_rounded(&self, fx: f32, fy: f32) -> Option<&Self::Sample> {
        let index = self.index_of_rounded(fx, fy)?;
        self.as_slice().get(index)
    }

    /// Sample at linear index `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len()`](Self::len).
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn get_unchecked(&self, index: usize) -> &Self::Sample {
        // SAFETY: the caller guarantees index < len.
        unsafe { self.as_slice().get_unchecked(index) }
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    fn row(&self, y: u32) -> &[Self::Sample] {
        let dims = self.dimensions();
        assert!(
            y < dims.height,
            "row index {y} out of bounds (height: {})",
            dims.height
        );
        let width = dims.width as usize;
        let start = y as usize * width;
        &self.as_slice()[start..start + width]
    }

    /// Iterate over rows from top to bottom.
    fn rows(&self) -> Rows<'_, Self::Sample> {
        let dims = self.dimensions();
        Rows {
            data: self.as_slice(),
            width: dims.width as usize,
            remaining: dims.height,
        }
    }

    /// Copy every sample into `dst`.
    ///
    /// Only the first `len()` samples of `dst` are written.
    ///
    /// # Errors
    ///
    /// [`BufferError::InsufficientData`] if `dst` is shorter than `len()`.
    fn copy_out(&self, dst: &mut [Self::Sample]) -> Result<(), BufferError>
    where
        Self::Sample: Clone,
    {
        let src = self.as_slice();
        let actual = dst.len();
        let Some(dst) = dst.get_mut(..src.len()) else {
            return Err(BufferError::InsufficientData {
                required: src.len(),
                actual,
            });
        };
        dst.clone_from_slice(src);
        Ok(())
    }

    /// Deep copy into a newly allocated [`Buffer`].
    fn to_owned_buffer(&self) -> Buffer<Self::Sample>
    where
        Self::Sample: Clone,
    {
        Buffer::from_parts(self.as_slice().to_vec(), self.dimensions())
    }

    /// Borrow the same storage as a read-only [`BufferRef`].
    ///
    /// No samples are copied; reads through the alias see this buffer's data.
    #[inline]
    fn alias(&self) -> BufferRef<'_, Self::Sample> {
        BufferRef::from_parts(self.as_slice(), self.dimensions())
    }
}

/// Write access to a row-major 2D grid of samples.
pub trait BufferAccessMut: BufferAccess {
    /// All samples in row-major order, mutable.
    fn as_mut_slice(&mut self) -> &mut [Self::Sample];

    /// Mutable sample at linear index `index`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if `index >= len()`.
    #[inline]
    fn get_mut(&mut self, index: usize) -> Result<&mut Self::Sample, BufferError> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(BufferError::OutOfRange { index, len })
    }

    /// Mutable sample at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfBounds`] if the coordinates are outside the buffer.
    #[inline]
    fn get_xy_mut(&mut self, x: u32, y: u32) -> Result<&mut Self::Sample, BufferError> {
        let index = self.index_of(x, y)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Mutable sample at linear index `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len()`](BufferAccess::len).
    #[allow(unsafe_code)]
    #[inline]
    unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut Self::Sample {
        // SAFETY: the caller guarantees index < len.
        unsafe { self.as_mut_slice().get_unchecked_mut(index) }
    }

    /// Mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    fn row_mut(&mut self, y: u32) -> &mut [Self::Sample] {
        let dims = self.dimensions();
        assert!(
            y < dims.height,
            "row index {y} out of bounds (height: {})",
            dims.height
        );
        let width = dims.width as usize;
        let start = y as usize * width;
        &mut self.as_mut_slice()[start..start + width]
    }

    /// Iterate mutably over rows from top to bottom.
    fn rows_mut(&mut self) -> RowsMut<'_, Self::Sample> {
        let dims = self.dimensions();
        RowsMut {
            data: self.as_mut_slice(),
            width: dims.width as usize,
            remaining: dims.height,
        }
    }

    /// Set every sample to `value`.
    fn fill(&mut self, value: Self::Sample)
    where
        Self::Sample: Clone,
    {
        self.as_mut_slice().fill(value);
    }

    /// Deep copy every sample of `src` into this buffer.
    ///
    /// This never aliases: after it returns, the two buffers are independent.
    ///
    /// # Errors
    ///
    /// [`BufferError::SizeMismatch`] if the dimensions differ. The
    /// destination is left untouched.
    fn assign<S>(&mut self, src: &S) -> Result<(), BufferError>
    where
        S: BufferAccess<Sample = Self::Sample> + ?Sized,
        Self::Sample: Clone,
    {
        crate::buffer::check_same_size(self.dimensions(), src.dimensions())?;
        self.as_mut_slice().clone_from_slice(src.as_slice());
        Ok(())
    }

    /// Deep copy `len()` samples from external storage.
    ///
    /// Samples of `src` past `len()` are ignored.
    ///
    /// # Errors
    ///
    /// [`BufferError::InsufficientData`] if `src` is shorter than `len()`.
    fn assign_from_slice(&mut self, src: &[Self::Sample]) -> Result<(), BufferError>
    where
        Self::Sample: Clone,
    {
        let len = self.len();
        let Some(src) = src.get(..len) else {
            return Err(BufferError::InsufficientData {
                required: len,
                actual: src.len(),
            });
        };
        self.as_mut_slice().clone_from_slice(src);
        Ok(())
    }

    /// Mutably borrow the same storage as a [`BufferMut`].
    ///
    /// Writes through the alias are visible through this buffer once the
    /// alias is dropped.
    #[inline]
    fn alias_mut(&mut self) -> BufferMut<'_, Self::Sample> {
        let dims = self.dimensions();
        BufferMut::from_parts(self.as_mut_slice(), dims)
    }
}

/// Row iterator returned by [`BufferAccess::rows`].
#[derive(Clone, Debug)]
pub struct Rows<'a, T> {
    data: &'a [T],
    width: usize,
    remaining: u32,
}

impl<'a, T> Iterator for Rows<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (row, rest) = self.data.split_at(self.width);
        self.data = rest;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Rows<'_, T> {}

/// Mutable row iterator returned by [`BufferAccessMut::rows_mut`].
#[derive(Debug)]
pub struct RowsMut<'a, T> {
    data: &'a mut [T],
    width: usize,
    remaining: u32,
}

impl<'a, T> Iterator for RowsMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let data = core::mem::take(&mut self.data);
        let (row, rest) = data.split_at_mut(self.width);
        self.data = rest;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for RowsMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn ramp(w: u32, h: u32) -> Buffer<u32> {
        let data: Vec<u32> = (0..w * h).collect();
        Buffer::from_vec(data, Dimensions::new(w, h)).unwrap()
    }

    #[test]
    fn every_position_is_reachable() {
        let buf = ramp(4, 3);
        assert_eq!(buf.len(), 12);
        for y in 0..3 {
            for x in 0..4 {
                let i = buf.index_of(x, y).unwrap();
                assert_eq!(i, (y * 4 + x) as usize);
                assert_eq!(*buf.get_xy(x, y).unwrap(), y * 4 + x);
            }
        }
    }

    #[test]
    fn index_of_fails_exactly_outside() {
        let buf = ramp(4, 3);
        assert!(buf.index_of(3, 2).is_ok());
        assert_eq!(
            buf.index_of(4, 0),
            Err(BufferError::OutOfBounds {
                x: 4,
                y: 0,
                dimensions: Dimensions::new(4, 3)
            })
        );
        assert!(buf.index_of(0, 3).is_err());
        assert!(buf.index_of(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn unchecked_index_is_plain_arithmetic() {
        let buf = ramp(4, 3);
        assert_eq!(buf.index_of_unchecked(2, 1), 6);
        // Not validated: (5, 0) wraps onto the next row.
        assert_eq!(buf.index_of_unchecked(5, 0), 5);
    }

    #[test]
    fn linear_get_checks_range() {
        let buf = ramp(4, 3);
        assert_eq!(*buf.get(11).unwrap(), 11);
        assert_eq!(
            buf.get(12),
            Err(BufferError::OutOfRange { index: 12, len: 12 })
        );
    }

    #[test]
    #[allow(unsafe_code)]
    fn unchecked_get_matches_checked() {
        let mut buf = ramp(4, 3);
        for i in 0..buf.len() {
            // SAFETY: i < len.
            assert_eq!(unsafe { *buf.get_unchecked(i) }, *buf.get(i).unwrap());
        }
        // SAFETY: 5 < 12.
        unsafe { *buf.get_unchecked_mut(5) = 99 };
        assert_eq!(buf[5], 99);
    }

    #[test]
    fn rounded_index_rounds_to_nearest() {
        let buf = ramp(4, 3);
        assert_eq!(buf.index_of_rounded(1.4, 0.6), Some(5));
        assert_eq!(buf.index_of_rounded(2.5, 1.5), Some(11));
        assert_eq!(buf.index_of_rounded(-0.4, -0.49), Some(0));
        assert_eq!(buf.index_of_rounded(3.49, 2.2), Some(11));
    }

    #[test]
    fn rounded_index_misses_are_none() {
        let buf = ramp(4, 3);
        assert_eq!(buf.index_of_rounded(-0.5, 0.0), None);
        assert_eq!(buf.index_of_rounded(3.5, 0.0), None);
        assert_eq!(buf.index_of_rounded(0.0, 2.5), None);
        assert_eq!(buf.index_of_rounded(0.0, -1.0), None);
        assert_eq!(buf.index_of_rounded(f32::NAN, 0.0), None);
        assert_eq!(buf.index_of_rounded(0.0, f32::INFINITY), None);
        assert_eq!(buf.index_of_rounded(f32::NEG_INFINITY, 1.0), None);
    }

    #[test]
    fn rounded_index_agrees_with_index_of() {
        let buf = ramp(5, 4);
        let mut fy = -1.0f32;
        while fy < 5.0 {
            let mut fx = -1.0f32;
            while fx < 6.0 {
                let (rx, ry) = (libm::roundf(fx), libm::roundf(fy));
                let inside = rx >= 0.0 && rx < 5.0 && ry >= 0.0 && ry < 4.0;
                let expected = inside.then(|| buf.index_of(rx as u32, ry as u32).unwrap());
                assert_eq!(buf.index_of_rounded(fx, fy), expected, "({fx}, {fy})");
                fx += 0.25;
            }
            fy += 0.25;
        }
    }

    #[test]
    fn get_rounded_reads_sample() {
        let buf = ramp(4, 3);
        assert_eq!(buf.get_rounded(0.9, 1.1), Some(&5));
        assert_eq!(buf.get_rounded(10.0, 1.0), None);
    }

    #[test]
    fn rows_cover_buffer() {
        let buf = ramp(3, 2);
        let rows: Vec<&[u32]> = buf.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2][..], &[3, 4, 5][..]]);
        assert_eq!(buf.row(1), &[3, 4, 5]);
        assert_eq!(buf.rows().len(), 2);
    }

    #[test]
    fn rows_of_zero_width_buffer() {
        let buf: Buffer<u8> = Buffer::new(Dimensions::new(0, 3));
        assert_eq!(buf.rows().count(), 3);
        assert!(buf.rows().all(|r| r.is_empty()));
    }

    #[test]
    #[should_panic(expected = "row index 2 out of bounds")]
    fn row_out_of_bounds_panics() {
        let buf = ramp(3, 2);
        let _ = buf.row(2);
    }

    #[test]
    fn rows_mut_writes_each_row() {
        let mut buf: Buffer<u8> = Buffer::new(Dimensions::new(2, 3));
        for (y, row) in buf.rows_mut().enumerate() {
            row.fill(y as u8);
        }
        assert_eq!(buf.as_slice(), &[0, 0, 1, 1, 2, 2]);
        buf.row_mut(0)[1] = 7;
        assert_eq!(buf[(1, 0)], 7);
    }

    #[test]
    fn fill_sets_every_sample() {
        let mut buf = ramp(4, 3);
        buf.fill(42);
        assert!(buf.as_slice().iter().all(|&v| v == 42));
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(buf[(x, y)], 42);
            }
        }
    }

    #[test]
    fn copy_out_writes_prefix() {
        let buf = ramp(2, 2);
        let mut dst = [9u32; 6];
        buf.copy_out(&mut dst).unwrap();
        assert_eq!(dst, [0, 1, 2, 3, 9, 9]);
    }

    #[test]
    fn copy_out_rejects_short_destination() {
        let buf = ramp(2, 2);
        let mut dst = [9u32; 3];
        assert_eq!(
            buf.copy_out(&mut dst),
            Err(BufferError::InsufficientData {
                required: 4,
                actual: 3
            })
        );
        assert_eq!(dst, [9, 9, 9]);
    }

    #[test]
    fn assign_from_slice_copies() {
        let mut buf: Buffer<u32> = Buffer::new(Dimensions::new(2, 2));
        let src = vec![5, 6, 7, 8, 9];
        buf.assign_from_slice(&src).unwrap();
        assert_eq!(buf.as_slice(), &[5, 6, 7, 8]);
        assert_eq!(
            buf.assign_from_slice(&src[..2]),
            Err(BufferError::InsufficientData {
                required: 4,
                actual: 2
            })
        );
        assert_eq!(buf.as_slice(), &[5, 6, 7, 8]);
    }

    #[test]
    fn checked_mutation() {
        let mut buf: Buffer<u32> = Buffer::new(Dimensions::new(3, 2));
        *buf.get_mut(4).unwrap() = 1;
        *buf.get_xy_mut(2, 0).unwrap() = 2;
        assert_eq!(buf.as_slice(), &[0, 0, 2, 0, 1, 0]);
        assert!(buf.get_mut(6).is_err());
        assert!(buf.get_xy_mut(0, 2).is_err());
    }

    #[test]
    fn to_owned_buffer_is_independent() {
        let mut buf = ramp(2, 2);
        let copy = buf.alias().to_owned_buffer();
        buf.fill(0);
        assert_eq!(copy.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(copy.dimensions(), Dimensions::new(2, 2));
    }
}
