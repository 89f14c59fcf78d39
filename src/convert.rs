//! Grayscale <-> RGB24 conversions between two differently typed buffers.
//!
//! Both directions are deliberately simple: grayscale is the unweighted
//! channel sum, and the reverse divides by three with truncation. A round
//! trip is lossy and is not expected to reproduce the original pixel.

use crate::buffer::check_same_size;
use crate::{BufferAccess, BufferAccessMut, BufferError, GraySample, Rgb24};

/// Write `b + g + r` of every `src` pixel into `dst`.
///
/// The sum is converted with the scalar's native conversion, so narrow
/// integer types wrap (`u8`: 765 becomes 253).
///
/// # Errors
///
/// [`BufferError::SizeMismatch`] if the two buffers have different
/// dimensions. `dst` is left untouched.
///
/// # Example
///
/// ```
/// use planebuf::{Buffer, BufferAccess, Dimensions, Rgb24, rgb_to_gray};
///
/// let dims = Dimensions::new(2, 1);
/// let rgb = Buffer::filled(dims, Rgb24::new(10, 20, 30));
/// let mut gray: Buffer<u16> = Buffer::new(dims);
/// rgb_to_gray(&mut gray, &rgb)?;
/// assert_eq!(gray.as_slice(), &[60, 60]);
/// # Ok::<(), planebuf::BufferError>(())
/// ```
pub fn rgb_to_gray<D, S>(dst: &mut D, src: &S) -> Result<(), BufferError>
where
    D: BufferAccessMut + ?Sized,
    D::Sample: GraySample,
    S: BufferAccess<Sample = Rgb24> + ?Sized,
{
    check_same_size(dst.dimensions(), src.dimensions())?;
    for (out, px) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        let sum = px.b as u16 + px.g as u16 + px.r as u16;
        *out = GraySample::from_channel_sum(sum);
    }
    Ok(())
}

/// Expand every grayscale sample of `src` into an RGB24 pixel of `dst`.
///
/// Each channel becomes `src[i] / 3`, computed in the scalar's own
/// division (integers truncate) and narrowed to `u8`.
///
/// # Errors
///
/// [`BufferError::SizeMismatch`] if the two buffers have different
/// dimensions. `dst` is left untouched.
pub fn gray_to_rgb<D, S>(dst: &mut D, src: &S) -> Result<(), BufferError>
where
    D: BufferAccessMut<Sample = Rgb24> + ?Sized,
    S: BufferAccess + ?Sized,
    S::Sample: GraySample,
{
    check_same_size(dst.dimensions(), src.dimensions())?;
    for (out, &v) in dst.as_mut_slice().iter_mut().zip(src.as_slice()) {
        let c = v.third_as_channel();
        *out = Rgb24::new(c, c, c);
    }
    Ok(())
}
