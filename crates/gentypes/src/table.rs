//! Alias metadata
//!
//! The alias set as data: name, numeric representation and qualifier for
//! every alias in [`crate::types`], in the order the C header declares them.

use core::fmt;

use crate::volatile::Volatile;

/// Numeric family of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Two's-complement signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
    /// IEEE-754 binary floating point
    Float,
}

/// Fixed-width numeric representation
///
/// Only the widths the alias set uses can be built: 8, 16, 32 or 64 bits for
/// integers, 32 or 64 bits for floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repr {
    kind: Kind,
    bits: u8,
}

impl Repr {
    /// `None` when `bits` is not a width of `kind`
    pub const fn new(kind: Kind, bits: u8) -> Option<Self> {
        let valid = match kind {
            Kind::Signed | Kind::Unsigned => matches!(bits, 8 | 16 | 32 | 64),
            Kind::Float => matches!(bits, 32 | 64),
        };
        if valid { Some(Repr { kind, bits }) } else { None }
    }

    pub const fn signed(bits: u8) -> Option<Self> {
        Self::new(Kind::Signed, bits)
    }

    pub const fn unsigned(bits: u8) -> Option<Self> {
        Self::new(Kind::Unsigned, bits)
    }

    pub const fn float(bits: u8) -> Option<Self> {
        Self::new(Kind::Float, bits)
    }

    /// Table entries; an unsupported width fails const evaluation
    const fn fixed(kind: Kind, bits: u8) -> Self {
        match Self::new(kind, bits) {
            Some(repr) => repr,
            None => panic!("unsupported width"),
        }
    }

    pub const fn kind(self) -> Kind {
        self.kind
    }

    /// Width in bits
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Size in bytes
    pub const fn bytes(self) -> usize {
        self.bits as usize / 8
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self.kind, Kind::Float)
    }

    /// Smallest representable integer, `None` for floats
    pub const fn min(self) -> Option<i128> {
        match self.kind {
            Kind::Signed => Some(-(1i128 << (self.bits - 1))),
            Kind::Unsigned => Some(0),
            Kind::Float => None,
        }
    }

    /// Largest representable integer, `None` for floats
    pub const fn max(self) -> Option<i128> {
        match self.kind {
            Kind::Signed => Some((1i128 << (self.bits - 1)) - 1),
            Kind::Unsigned => Some((1i128 << self.bits) - 1),
            Kind::Float => None,
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::Signed => "signed",
            Kind::Unsigned => "unsigned",
            Kind::Float => "float",
        };
        write!(f, "{kind} {}-bit", self.bits)
    }
}

/// One entry of the alias table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alias {
    pub name: &'static str,
    pub repr: Repr,
    pub volatile: bool,
}

impl Alias {
    const fn plain(name: &'static str, repr: Repr) -> Self {
        Alias { name, repr, volatile: false }
    }

    const fn volatile(name: &'static str, repr: Repr) -> Self {
        Alias { name, repr, volatile: true }
    }

    /// The non-volatile alias with the same representation
    pub fn base(&self) -> &'static Alias {
        ALIASES
            .iter()
            .find(|a| !a.volatile && a.repr == self.repr)
            .unwrap_or_else(|| unreachable!("every representation has a plain alias"))
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.volatile {
            write!(f, "{} (volatile {})", self.name, self.repr)
        } else {
            write!(f, "{} ({})", self.name, self.repr)
        }
    }
}

/// Every alias, in header order
pub const ALIASES: [Alias; 20] = [
    Alias::plain("s8", Repr::fixed(Kind::Signed, 8)),
    Alias::plain("s16", Repr::fixed(Kind::Signed, 16)),
    Alias::plain("s32", Repr::fixed(Kind::Signed, 32)),
    Alias::plain("s64", Repr::fixed(Kind::Signed, 64)),
    Alias::plain("u8", Repr::fixed(Kind::Unsigned, 8)),
    Alias::plain("u16", Repr::fixed(Kind::Unsigned, 16)),
    Alias::plain("u32", Repr::fixed(Kind::Unsigned, 32)),
    Alias::plain("u64", Repr::fixed(Kind::Unsigned, 64)),
    Alias::volatile("vu8", Repr::fixed(Kind::Unsigned, 8)),
    Alias::volatile("vu16", Repr::fixed(Kind::Unsigned, 16)),
    Alias::volatile("vu32", Repr::fixed(Kind::Unsigned, 32)),
    Alias::volatile("vu64", Repr::fixed(Kind::Unsigned, 64)),
    Alias::volatile("vs8", Repr::fixed(Kind::Signed, 8)),
    Alias::volatile("vs16", Repr::fixed(Kind::Signed, 16)),
    Alias::volatile("vs32", Repr::fixed(Kind::Signed, 32)),
    Alias::volatile("vs64", Repr::fixed(Kind::Signed, 64)),
    Alias::plain("f32", Repr::fixed(Kind::Float, 32)),
    Alias::plain("f64", Repr::fixed(Kind::Float, 64)),
    Alias::volatile("vf32", Repr::fixed(Kind::Float, 32)),
    Alias::volatile("vf64", Repr::fixed(Kind::Float, 64)),
];

/// Find an alias by name
pub fn lookup(name: &str) -> Option<&'static Alias> {
    ALIASES.iter().find(|a| a.name == name)
}

mod sealed {
    pub trait Sealed {}
}

/// Implemented by the ten base types behind the aliases
pub trait Primitive: Copy + sealed::Sealed {
    /// Alias name of the type
    const NAME: &'static str;
    const REPR: Repr;
}

macro_rules! primitive {
    ($($ty:ty => $name:literal, $repr:expr;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const NAME: &'static str = $name;
                const REPR: Repr = $repr;
            }
        )*
    };
}

primitive! {
    i8 => "s8", Repr::fixed(Kind::Signed, 8);
    i16 => "s16", Repr::fixed(Kind::Signed, 16);
    i32 => "s32", Repr::fixed(Kind::Signed, 32);
    i64 => "s64", Repr::fixed(Kind::Signed, 64);
    u8 => "u8", Repr::fixed(Kind::Unsigned, 8);
    u16 => "u16", Repr::fixed(Kind::Unsigned, 16);
    u32 => "u32", Repr::fixed(Kind::Unsigned, 32);
    u64 => "u64", Repr::fixed(Kind::Unsigned, 64);
    f32 => "f32", Repr::fixed(Kind::Float, 32);
    f64 => "f64", Repr::fixed(Kind::Float, 64);
}

impl<T: Primitive> Volatile<T> {
    /// Representation of the wrapped type
    pub const REPR: Repr = T::REPR;
}
