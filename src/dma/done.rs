//! Transfer IDs and the transfer-done snapshot.

use crate::internal::constants::{MAX_TRANSFER_ID, TRANSFER_ID_COUNT};

/// Hardware-assigned transfer ID in `0..=MAX_TRANSFER_ID`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferId(u8);

impl TransferId {
    /// ID the hardware assigns first after the core is (re)enabled
    pub const FIRST: Self = Self(0);

    /// Validate a raw ID read from hardware
    #[inline]
    pub const fn new(raw: u32) -> Option<Self> {
        if raw <= MAX_TRANSFER_ID as u32 {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    /// Raw ID value
    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// ID as an index
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// ID `offset` positions after this one, in hardware wraparound order
    #[inline]
    pub const fn wrapping_add(self, offset: usize) -> Self {
        Self(((self.0 as usize + offset) % TRANSFER_ID_COUNT) as u8)
    }

    /// The ID following this one
    #[inline]
    pub const fn next(self) -> Self {
        self.wrapping_add(1)
    }
}

impl core::fmt::Display for TransferId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of the transfer-done register
///
/// Taken once per scan pass; bits never change underneath a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoneMask(u32);

impl DoneMask {
    /// Wrap a raw register value
    #[inline(always)]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw register value
    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether the transfer with `id` is marked done
    #[inline(always)]
    pub const fn is_done(self, id: TransferId) -> bool {
        (self.0 >> id.0) & 1 != 0
    }

    /// Copy of this snapshot with the bit for `id` cleared
    #[inline(always)]
    pub const fn without(self, id: TransferId) -> Self {
        Self(self.0 & !(1 << id.0))
    }

    /// Whether no transfer is marked done
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 & ((1 << TRANSFER_ID_COUNT) - 1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_id_rejects_out_of_range() {
        assert!(TransferId::new(0).is_some());
        assert!(TransferId::new(30).is_some());
        assert!(TransferId::new(31).is_none());
        assert!(TransferId::new(u32::MAX).is_none());
    }

    #[test]
    fn transfer_id_wraps_after_max() {
        let last = TransferId::new(30).unwrap();
        assert_eq!(last.next().get(), 0);
        assert_eq!(last.wrapping_add(3).get(), 2);
        assert_eq!(TransferId::new(5).unwrap().wrapping_add(31).get(), 5);
    }

    #[test]
    fn done_mask_tests_single_bits() {
        let mask = DoneMask::from_raw((1 << 0) | (1 << 7) | (1 << 30));

        assert!(mask.is_done(TransferId::new(0).unwrap()));
        assert!(mask.is_done(TransferId::new(7).unwrap()));
        assert!(mask.is_done(TransferId::new(30).unwrap()));
        assert!(!mask.is_done(TransferId::new(1).unwrap()));
    }

    #[test]
    fn done_mask_without_clears_one_bit() {
        let mask = DoneMask::from_raw(0b101).without(TransferId::FIRST);
        assert_eq!(mask.raw(), 0b100);
        assert_eq!(mask.without(TransferId::new(1).unwrap()).raw(), 0b100);
    }

    #[test]
    fn done_mask_ignores_bit_31() {
        assert!(DoneMask::from_raw(1 << 31).is_empty());
        assert!(!DoneMask::from_raw(1 << 30).is_empty());
        assert!(DoneMask::default().is_empty());
    }
}
