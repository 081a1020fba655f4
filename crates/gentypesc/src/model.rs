//! C integer sizing of the target compiler
//!
//! The C header spells every alias in terms of `char`, `short`, `long` and
//! friends, whose widths depend on the target. The data model fixes them.

use gentypes::{Kind, Repr};

/// C data model of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataModel {
    /// int, long and pointers are 32-bit; plain `char` is unsigned
    /// (PowerPC EABI, the targets the header was written for)
    #[default]
    Ilp32,
    /// long and pointers are 64-bit; plain `char` is signed (x86-64 SysV)
    Lp64,
}

impl DataModel {
    pub fn name(self) -> &'static str {
        match self {
            DataModel::Ilp32 => "ILP32",
            DataModel::Lp64 => "LP64",
        }
    }

    /// Width of `long` in bits
    pub fn long_bits(self) -> u8 {
        match self {
            DataModel::Ilp32 => 32,
            DataModel::Lp64 => 64,
        }
    }

    pub fn char_is_signed(self) -> bool {
        matches!(self, DataModel::Lp64)
    }

    /// C type specifiers that produce `repr` on this model
    pub fn spelling(self, repr: Repr) -> &'static str {
        match (repr.kind(), repr.bits(), self) {
            (Kind::Signed, 8, _) => "signed char",
            (Kind::Signed, 16, _) => "signed short int",
            (Kind::Signed, 32, DataModel::Ilp32) => "signed long",
            (Kind::Signed, 32, DataModel::Lp64) => "signed int",
            (Kind::Signed, _, _) => "signed long long int",
            (Kind::Unsigned, 8, _) => "unsigned char",
            (Kind::Unsigned, 16, _) => "unsigned short int",
            (Kind::Unsigned, 32, DataModel::Ilp32) => "unsigned long",
            (Kind::Unsigned, 32, DataModel::Lp64) => "unsigned int",
            (Kind::Unsigned, _, _) => "unsigned long long int",
            (Kind::Float, 32, _) => "float",
            (Kind::Float, _, _) => "double",
        }
    }
}

impl std::fmt::Display for DataModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
