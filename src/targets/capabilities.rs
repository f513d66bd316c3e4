//! # Capability bitmask of a target.
//!
//! A target advertises the subsystems it supports as [`Capabilities`]. Observers and
//! model factories state the capabilities they need; a target qualifies when it
//! has **all** of them (`target & mask == mask`). The empty mask matches every
//! target.

use bitflags::bitflags;

bitflags! {
    /// Subsystems supported by a target.
    ///
    /// Unknown bits are retained (`from_bits_retain`) so producers may carry
    /// capabilities this crate does not name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const BROWSER = 1 << 0;
        const DOM = 1 << 1;
        const JS = 1 << 2;
        const LOG = 1 << 3;
        const NETWORK = 1 << 4;
        const WORKER = 1 << 5;
    }
}

impl Capabilities {
    /// Bitwise subset test: true if `self` has every capability in `mask`.
    #[inline]
    pub fn satisfies(self, mask: Capabilities) -> bool {
        self.bits() & mask.bits() == mask.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mask_matches_everything() {
        assert!(Capabilities::empty().satisfies(Capabilities::empty()));
        assert!(Capabilities::JS.satisfies(Capabilities::empty()));
    }

    #[test]
    fn test_subset_semantics() {
        let page = Capabilities::from_bits_retain(0b011);
        assert!(page.satisfies(Capabilities::from_bits_retain(0b001)));
        assert!(page.satisfies(Capabilities::from_bits_retain(0b011)));
        assert!(!page.satisfies(Capabilities::from_bits_retain(0b111)));

        let worker = Capabilities::JS | Capabilities::WORKER;
        assert!(!worker.satisfies(Capabilities::DOM));
        assert!(worker.satisfies(Capabilities::JS));
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let caps = Capabilities::from_bits_retain(1 << 20 | 1);
        assert!(caps.satisfies(Capabilities::from_bits_retain(1 << 20)));
        assert!(caps.satisfies(Capabilities::BROWSER));
    }
}
