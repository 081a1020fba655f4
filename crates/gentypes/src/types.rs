//! Fixed-width type aliases
//!
//! Every alias names a type of exactly the advertised width on every target.
//! The volatile aliases wrap the same representation in a [`Volatile`] cell,
//! which is `#[repr(transparent)]`: size, alignment and bit pattern are those
//! of the plain type.
//!
//! # Overflow
//!
//! The aliases are the Rust primitives, so they keep Rust's integer rules.
//! Unsigned and signed overflow in `+`, `-` and `*` panics in debug builds and
//! wraps in release builds. Use the explicit methods when the behaviour
//! matters:
//!
//! ```
//! use gentypes::types::{s8, u8};
//!
//! let byte: u8 = 255;
//! assert_eq!(byte.wrapping_add(1), 0);
//!
//! let small: s8 = 127;
//! assert_eq!(small.checked_add(1), None);
//! assert_eq!(small.wrapping_add(1), -128);
//! ```

#![allow(non_camel_case_types)]
#![deny(missing_docs)]

use core::mem::{align_of, size_of};

use crate::volatile::Volatile;

/// Signed 8-bit integer
pub type s8 = i8;
/// Signed 16-bit integer
pub type s16 = i16;
/// Signed 32-bit integer
pub type s32 = i32;
/// Signed 64-bit integer
pub type s64 = i64;

/// Unsigned 8-bit integer
pub type u8 = core::primitive::u8;
/// Unsigned 16-bit integer
pub type u16 = core::primitive::u16;
/// Unsigned 32-bit integer
pub type u32 = core::primitive::u32;
/// Unsigned 64-bit integer
pub type u64 = core::primitive::u64;

/// IEEE-754 binary32
pub type f32 = core::primitive::f32;
/// IEEE-754 binary64
pub type f64 = core::primitive::f64;

/// Volatile unsigned 8-bit integer
pub type vu8 = Volatile<u8>;
/// Volatile unsigned 16-bit integer
pub type vu16 = Volatile<u16>;
/// Volatile unsigned 32-bit integer
pub type vu32 = Volatile<u32>;
/// Volatile unsigned 64-bit integer
pub type vu64 = Volatile<u64>;

/// Volatile signed 8-bit integer
pub type vs8 = Volatile<s8>;
/// Volatile signed 16-bit integer
pub type vs16 = Volatile<s16>;
/// Volatile signed 32-bit integer
pub type vs32 = Volatile<s32>;
/// Volatile signed 64-bit integer
pub type vs64 = Volatile<s64>;

/// Volatile IEEE-754 binary32
pub type vf32 = Volatile<f32>;
/// Volatile IEEE-754 binary64
pub type vf64 = Volatile<f64>;

// A target that cannot provide these layouts must fail to build.
const _: () = {
    assert!(size_of::<s8>() == 1);
    assert!(size_of::<s16>() == 2);
    assert!(size_of::<s32>() == 4);
    assert!(size_of::<s64>() == 8);
    assert!(size_of::<u8>() == 1);
    assert!(size_of::<u16>() == 2);
    assert!(size_of::<u32>() == 4);
    assert!(size_of::<u64>() == 8);
    assert!(size_of::<f32>() == 4);
    assert!(size_of::<f64>() == 8);

    assert!(f32::RADIX == 2 && f32::MANTISSA_DIGITS == 24 && f32::MAX_EXP == 128);
    assert!(f64::RADIX == 2 && f64::MANTISSA_DIGITS == 53 && f64::MAX_EXP == 1024);

    assert!(size_of::<vu8>() == size_of::<u8>() && align_of::<vu8>() == align_of::<u8>());
    assert!(size_of::<vu16>() == size_of::<u16>() && align_of::<vu16>() == align_of::<u16>());
    assert!(size_of::<vu32>() == size_of::<u32>() && align_of::<vu32>() == align_of::<u32>());
    assert!(size_of::<vu64>() == size_of::<u64>() && align_of::<vu64>() == align_of::<u64>());
    assert!(size_of::<vs8>() == size_of::<s8>() && align_of::<vs8>() == align_of::<s8>());
    assert!(size_of::<vs16>() == size_of::<s16>() && align_of::<vs16>() == align_of::<s16>());
    assert!(size_of::<vs32>() == size_of::<s32>() && align_of::<vs32>() == align_of::<s32>());
    assert!(size_of::<vs64>() == size_of::<s64>() && align_of::<vs64>() == align_of::<s64>());
    assert!(size_of::<vf32>() == size_of::<f32>() && align_of::<vf32>() == align_of::<f32>());
    assert!(size_of::<vf64>() == size_of::<f64>() && align_of::<vf64>() == align_of::<f64>());
};
