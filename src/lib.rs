//! Generic 2D sample buffers with owned or borrowed storage.
//!
//! This crate provides the primitive that image code is built on:
//!
//! - [`Buffer`]: owned, row-major grid of samples, released exactly once on drop
//! - [`BufferRef`] / [`BufferMut`]: views over storage owned elsewhere
//! - [`BufferAccess`] / [`BufferAccessMut`]: shared indexing, fill and deep-copy API
//! - [`rgb_to_gray`] / [`gray_to_rgb`]: additive grayscale <-> [`Rgb24`] conversions
//! - [`BufferLimits`]: allocation caps for owned buffers
//!
//! Aliasing is expressed with borrows: [`BufferAccess::alias`] and
//! [`BufferAccessMut::alias_mut`] share storage, while
//! [`BufferAccessMut::assign`] and [`Clone`] copy it.
//!
//! ```
//! use planebuf::{Buffer, BufferAccess, BufferAccessMut, Dimensions};
//!
//! let mut a: Buffer<u8> = Buffer::new(Dimensions::new(4, 3));
//! let mut b = a.alias_mut();
//! b[(2, 1)] = 7;
//! assert_eq!(a[(2, 1)], 7);
//! assert_eq!(a.index_of_rounded(1.6, 0.6), Some(6));
//! assert_eq!(a.index_of_rounded(-0.6, 0.0), None);
//! ```

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

mod access;
mod buffer;
mod convert;
mod dimensions;
mod limits;
mod pixel;

pub use access::{BufferAccess, BufferAccessMut, Rows, RowsMut};
pub use buffer::{Buffer, BufferError, BufferMut, BufferRef};
pub use convert::{gray_to_rgb, rgb_to_gray};
pub use dimensions::Dimensions;
pub use limits::{BufferLimits, LimitExceeded};
pub use pixel::{GraySample, Rgb24};

// Re-exports for callers building pixels and images.
pub use imgref::{ImgRef, ImgRefMut, ImgVec};
pub use rgb;
pub use rgb::Rgb;
