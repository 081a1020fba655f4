//! Volatile cells and memory-mapped register handles
//!
//! Every `read` and `write` here is emitted as an actual load or store:
//! the compiler will not cache the value between accesses, merge repeated
//! writes, or reorder these accesses relative to each other.
//!
//! That is all they promise. A volatile access is **not** atomic, gives no
//! ordering guarantee towards other threads, and provides no mutual
//! exclusion. Memory shared between threads needs `core::sync::atomic` or a
//! lock, not these types.
//!
//! # Example
//!
//! ```no_run
//! use gentypes::volatile::Reg;
//!
//! // Hardware status register at a fixed address
//! let status = unsafe { Reg::<u8>::new(0xCC00_6800) };
//!
//! while status.read() & 0x01 == 0 {}
//! status.write(0x00);
//! ```

use core::cell::UnsafeCell;
use core::fmt;
use core::ptr;

/// Memory-compatible volatile cell
///
/// `Volatile<T>` has exactly the layout of `T`, so it can be used for fields
/// of `#[repr(C)]` structures that mirror hardware or wire layouts. Writes go
/// through `&self`, like any other cell.
///
/// The cell is `Send` when `T` is, but never `Sync`: it cannot be shared
/// between threads.
#[repr(transparent)]
pub struct Volatile<T: Copy>(UnsafeCell<T>);

impl<T: Copy> Volatile<T> {
    /// Create a new cell holding `value`
    #[inline]
    pub const fn new(value: T) -> Self {
        Volatile(UnsafeCell::new(value))
    }

    /// Perform a volatile read
    #[inline(always)]
    pub fn read(&self) -> T {
        // SAFETY: the pointer comes from a live cell we borrow, and the cell
        // is !Sync so no other thread can write concurrently.
        unsafe { ptr::read_volatile(self.0.get()) }
    }

    /// Perform a volatile write
    #[inline(always)]
    pub fn write(&self, value: T) {
        // SAFETY: same as `read`
        unsafe { ptr::write_volatile(self.0.get(), value) }
    }

    /// Read, transform and write back, returning the stored value
    ///
    /// This is two separate accesses, not an atomic read-modify-write.
    #[inline]
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        let value = f(self.read());
        self.write(value);
        value
    }

    /// Plain access through an exclusive borrow
    ///
    /// Exclusive access rules out any other observer within the program,
    /// so no volatile access is needed here.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.0.get_mut()
    }

    /// Raw pointer to the contained value
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.0.get()
    }

    /// Consume the cell and return the contained value
    #[inline]
    pub fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

impl<T: Copy + Default> Default for Volatile<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> Clone for Volatile<T> {
    fn clone(&self) -> Self {
        Self::new(self.read())
    }
}

impl<T: Copy> From<T> for Volatile<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Volatile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Volatile").field(&self.read()).finish()
    }
}

/// Handle on a memory-mapped register
///
/// Wraps a raw address; every `read` and `write` is a volatile access to it.
/// Building one is unsafe, using one is not.
pub struct Reg<T: Copy> {
    ptr: *mut T,
}

impl<T: Copy> Reg<T> {
    /// Create a handle for the register at `addr`
    ///
    /// # Safety
    ///
    /// `addr` must be non-null, aligned for `T`, and valid for volatile reads
    /// and writes of `T` for as long as the handle (or any copy) is used.
    #[inline]
    pub const unsafe fn new(addr: usize) -> Self {
        Reg { ptr: addr as *mut T }
    }

    /// Create a handle from an existing pointer
    ///
    /// # Safety
    ///
    /// Same requirements as [`Reg::new`].
    #[inline]
    pub const unsafe fn from_ptr(ptr: *mut T) -> Self {
        Reg { ptr }
    }

    /// Perform a volatile read of the register
    #[inline(always)]
    pub fn read(&self) -> T {
        // SAFETY: upheld by the constructor contract
        unsafe { self.ptr.read_volatile() }
    }

    /// Perform a volatile write of the register
    #[inline(always)]
    pub fn write(&self, value: T) {
        // SAFETY: upheld by the constructor contract
        unsafe { self.ptr.write_volatile(value) }
    }

    /// Read, transform and write back
    ///
    /// Two bus accesses. Registers with read side effects see both.
    #[inline]
    pub fn modify(&self, f: impl FnOnce(T) -> T) {
        self.write(f(self.read()));
    }

    /// Address of the register
    #[inline]
    pub fn addr(&self) -> usize {
        self.ptr as usize
    }
}

impl<T: Copy> Clone for Reg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy> Copy for Reg<T> {}

// Reading a register can have side effects, so only the address is shown.
impl<T: Copy> fmt::Debug for Reg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reg({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let cell = Volatile::new(7u32);
        assert_eq!(cell.read(), 7);
        cell.write(42);
        assert_eq!(cell.read(), 42);
        cell.write(42);
        assert_eq!(cell.read(), 42);
    }

    #[test]
    fn test_update_returns_new_value() {
        let cell = Volatile::new(0x0Fu8);
        assert_eq!(cell.update(|v| v | 0xF0), 0xFF);
        assert_eq!(cell.update(|v| v.wrapping_add(1)), 0);
        assert_eq!(cell.read(), 0);
    }

    #[test]
    fn test_get_mut_and_into_inner() {
        let mut cell = Volatile::new(-5i16);
        *cell.get_mut() += 10;
        assert_eq!(cell.read(), 5);
        assert_eq!(cell.into_inner(), 5);
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Volatile::new(1u64);
        let b = a.clone();
        a.write(2);
        assert_eq!(b.read(), 1);
        assert_eq!(a.read(), 2);
    }

    #[test]
    fn test_external_write_is_observed() {
        let cell = Volatile::new(0u32);
        // Another agent writing through the raw pointer
        unsafe { cell.as_ptr().write(0xDEAD_BEEF) };
        assert_eq!(cell.read(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_debug_and_from() {
        let cell: Volatile<u8> = 3.into();
        assert_eq!(format!("{cell:?}"), "Volatile(3)");
    }

    #[test]
    fn test_reg_on_plain_memory() {
        let mut backing = 0u32;
        let reg = unsafe { Reg::from_ptr(&raw mut backing) };
        reg.write(0x1234_5678);
        assert_eq!(reg.read(), 0x1234_5678);
        reg.modify(|v| v & 0xFFFF);
        assert_eq!(reg.read(), 0x5678);

        let copy = reg;
        copy.write(1);
        assert_eq!(reg.read(), 1);
        assert_eq!(reg.addr(), copy.addr());
        assert_eq!(backing, 1);
    }

    #[test]
    fn test_reg_debug_shows_address() {
        let reg = unsafe { Reg::<u16>::new(0xC000_0000) };
        assert_eq!(format!("{reg:?}"), "Reg(0xc0000000)");
    }
}
