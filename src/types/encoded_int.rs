//! The varint-backed integer kind.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

/// A signed 64-bit integer stored on the wire as a varint.
///
/// No zig-zag transform is applied, so small non-negative values are compact
/// and negative values take the full ten bytes. Arithmetic wraps at 64 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedInt(pub i64);

impl EncodedInt {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// The two's-complement bit pattern, as written to the wire.
    pub const fn to_bits(self) -> u64 {
        self.0 as u64
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits as i64)
    }

    /// Logical (zero-filling) right shift.
    pub const fn unsigned_shr(self, amount: u32) -> Self {
        Self(((self.0 as u64).wrapping_shr(amount)) as i64)
    }
}

impl fmt::Display for EncodedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// -- Conversions --

macro_rules! from_lossless {
    ($($t:ty),*) => {$(
        impl From<$t> for EncodedInt {
            fn from(v: $t) -> Self {
                Self(i64::from(v))
            }
        }
    )*};
}

from_lossless!(i8, u8, i16, u16, i32, u32, i64);

impl From<u64> for EncodedInt {
    fn from(v: u64) -> Self {
        Self::from_bits(v)
    }
}

impl From<EncodedInt> for i64 {
    fn from(v: EncodedInt) -> Self {
        v.0
    }
}

impl From<EncodedInt> for u64 {
    fn from(v: EncodedInt) -> Self {
        v.to_bits()
    }
}

// -- Operators --

macro_rules! binary_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $apply:expr) => {
        impl $op for EncodedInt {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Self($apply(self.0, rhs.0))
            }
        }

        impl $assign for EncodedInt {
            fn $assign_method(&mut self, rhs: Self) {
                *self = $op::$method(*self, rhs);
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, i64::wrapping_add);
binary_op!(Sub, sub, SubAssign, sub_assign, i64::wrapping_sub);
binary_op!(Mul, mul, MulAssign, mul_assign, i64::wrapping_mul);
binary_op!(Div, div, DivAssign, div_assign, i64::wrapping_div);
binary_op!(Rem, rem, RemAssign, rem_assign, i64::wrapping_rem);
binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, |a: i64, b: i64| a & b);
binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, |a: i64, b: i64| a | b);
binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, |a: i64, b: i64| a ^ b);

impl Shl<u32> for EncodedInt {
    type Output = Self;

    fn shl(self, amount: u32) -> Self {
        Self(self.0.wrapping_shl(amount))
    }
}

impl ShlAssign<u32> for EncodedInt {
    fn shl_assign(&mut self, amount: u32) {
        *self = *self << amount;
    }
}

/// Arithmetic (sign-extending) right shift.
impl Shr<u32> for EncodedInt {
    type Output = Self;

    fn shr(self, amount: u32) -> Self {
        Self(self.0.wrapping_shr(amount))
    }
}

impl ShrAssign<u32> for EncodedInt {
    fn shr_assign(&mut self, amount: u32) {
        *self = *self >> amount;
    }
}

impl Neg for EncodedInt {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Not for EncodedInt {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}
