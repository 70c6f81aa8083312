//! Bit-set newtype support.
//!
//! The window model has many small bit sets (state, decorations, hint flags,
//! and on the backend side the OS style words). They all share the same
//! operator surface, generated by [`flag_set_ops!`](crate::flag_set_ops).

/// Implement the common bit-set surface for a `struct Name(uint)` newtype.
///
/// Generates `empty`, `bits`, `from_bits`, `contains`, `intersects`,
/// `insert`, `remove`, `set`, `is_empty` and the `|`, `|=`, `&`, `&=`, `!`
/// operators.
#[macro_export]
macro_rules! flag_set_ops {
    ($name:ident, $repr:ty) => {
        impl $name {
            /// The empty set.
            pub const fn empty() -> Self {
                Self(0)
            }

            /// The raw bit value.
            pub const fn bits(&self) -> $repr {
                self.0
            }

            /// Build a set from raw bits.
            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            /// Check if every bit of `other` is set.
            pub const fn contains(&self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            /// Check if any bit of `other` is set.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.0 & other.0) != 0
            }

            /// Check if no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.0 == 0
            }

            /// Set the bits of `other`.
            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Clear the bits of `other`.
            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Set or clear the bits of `other`.
            pub fn set(&mut self, other: Self, value: bool) {
                if value {
                    self.insert(other);
                } else {
                    self.remove(other);
                }
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                $name(self.0 | rhs.0)
            }
        }

        impl ::std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                $name(self.0 & rhs.0)
            }
        }

        impl ::std::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl ::std::ops::Not for $name {
            type Output = Self;

            fn not(self) -> Self::Output {
                $name(!self.0)
            }
        }
    };
}
