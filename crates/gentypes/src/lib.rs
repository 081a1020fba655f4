//! # gentypes - fixed-width primitive aliases
//!
//! Short, platform-independent names for the fixed-width numeric types used
//! when declaring binary layouts and hardware registers, together with
//! volatile counterparts for memory that can change behind the program's back.
//!
//! ## Features
//!
//! - **Types**: `s8`..`s64`, `u8`..`u64`, `f32`, `f64` and their volatile
//!   variants `vs8`..`vf64`
//! - **Volatile**: [`Volatile`] cells and [`Reg`] register handles whose every
//!   access is a real memory access
//! - **Table**: the alias table as data, for tools that need to enumerate it
//!
//! ## Quick Start
//!
//! ```
//! use gentypes::prelude::*;
//!
//! let status: vu8 = Volatile::new(0);
//! status.write(0x40);
//! assert_eq!(status.read(), 0x40);
//!
//! let counter: u8 = 255;
//! assert_eq!(counter.wrapping_add(1), 0);
//! ```
//!
//! Volatile access is not synchronization. See [`volatile`] for what it does
//! and does not promise.
//!
//! ## Modules
//!
//! - [`types`] - The alias definitions
//! - [`volatile`] - Volatile cell and register handle
//! - [`table`] - Alias metadata

#![cfg_attr(not(test), no_std)]

pub mod table;
pub mod types;
pub mod volatile;

pub use table::{ALIASES, Alias, Kind, Primitive, Repr};
pub use volatile::{Reg, Volatile};

/// Convenient re-exports for common usage
///
/// Import everything you need with:
/// ```
/// use gentypes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::types::*;
    pub use crate::volatile::{Reg, Volatile};
}
