//! Sample types understood by the color conversions.
//!
//! RGB pixels come from the `rgb` crate. Grayscale buffers may hold any
//! primitive numeric type through [`GraySample`].

use rgb::Rgb;

/// Three 8-bit channels: red, green, blue.
pub type Rgb24 = Rgb<u8>;

/// Scalar that can hold a grayscale value derived from an [`Rgb24`] pixel.
///
/// Both conversions use the type's native arithmetic. Integers wrap and
/// truncate; floats are exact on the way in and saturate on the way out.
/// Nothing is clamped or rescaled.
pub trait GraySample: Copy {
    /// Convert the unweighted sum `r + g + b` (at most 765).
    fn from_channel_sum(sum: u16) -> Self;

    /// `self / 3` in this type's own division, narrowed to one channel.
    fn third_as_channel(self) -> u8;
}

macro_rules! impl_gray_sample_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl GraySample for $t {
                #[inline]
                fn from_channel_sum(sum: u16) -> Self {
                    sum as $t
                }

                #[inline]
                fn third_as_channel(self) -> u8 {
                    (self / 3) as u8
                }
            }
        )*
    };
}

macro_rules! impl_gray_sample_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl GraySample for $t {
                #[inline]
                fn from_channel_sum(sum: u16) -> Self {
                    sum as $t
                }

                #[inline]
                fn third_as_channel(self) -> u8 {
                    (self / 3.0) as u8
                }
            }
        )*
    };
}

impl_gray_sample_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64);
impl_gray_sample_float!(f32, f64);
