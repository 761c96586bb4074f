use num_traits::{One, PrimInt};

/// A flag enum whose discriminant selects one bit of `Storage`.
pub trait FlagBit {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be smaller than the bit width of `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// Small bitset over a [`FlagBit`] enum.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Flags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> Flags<T> {
    pub fn empty() -> Self {
        Self { bits: T::zero() }
    }

    pub fn set<U: FlagBit<Storage = T>>(&mut self, flag: U, on: bool) {
        if on {
            self.bits = self.bits | flag.mask();
        } else {
            self.bits = self.bits & !flag.mask();
        }
    }

    pub fn has<U: FlagBit<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    pub fn has_any<U: FlagBit<Storage = T> + Copy>(&self, flags: &[U]) -> bool {
        let combined = flags.iter().fold(T::zero(), |acc, f| acc | f.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Side of the body a contact probe looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContactSide {
    Bottom,
    Left,
    Right,
    Top,
}

impl FlagBit for ContactSide {
    type Storage = u8;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// Which sides of the body are touching something this step.
pub type ContactFlags = Flags<u8>;
