//! Two-stage running-sum checksum
//!
//! Each byte is added into the first sum, and every intermediate value of the
//! first sum is added into the second. Both wrap at 256. Cheaper than a CRC
//! and still catches transposed bytes.

/// Incremental two-stage checksum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Checksum {
    sum0: u8,
    sum1: u8,
}

impl Checksum {
    /// Create an empty checksum
    pub const fn new() -> Self {
        Self { sum0: 0, sum1: 0 }
    }

    /// Fold one byte into the checksum
    pub fn fold(&mut self, byte: u8) {
        self.sum0 = self.sum0.wrapping_add(byte);
        self.sum1 = self.sum1.wrapping_add(self.sum0);
    }

    /// Fold a run of bytes into the checksum
    pub fn fold_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(byte);
        }
    }

    /// Checksum over `bytes`
    pub fn of(bytes: &[u8]) -> Self {
        let mut checksum = Self::new();
        checksum.fold_all(bytes);
        checksum
    }

    /// First checksum byte (plain sum)
    pub fn sum0(&self) -> u8 {
        self.sum0
    }

    /// Second checksum byte (sum of running sums)
    pub fn sum1(&self) -> u8 {
        self.sum1
    }

    /// Both checksum bytes in wire order
    pub fn to_bytes(&self) -> [u8; 2] {
        [self.sum0, self.sum1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(Checksum::new().to_bytes(), [0, 0]);
    }

    #[test]
    fn test_single_byte_seeds_both_sums() {
        let checksum = Checksum::of(&[0x42]);
        assert_eq!(checksum.sum0(), 0x42);
        assert_eq!(checksum.sum1(), 0x42);
    }

    #[test]
    fn test_running_sums() {
        // sum0: 1, 3, 6 ; sum1: 1, 4, 10
        let checksum = Checksum::of(&[1, 2, 3]);
        assert_eq!(checksum.to_bytes(), [6, 10]);
    }

    #[test]
    fn test_wraps() {
        let checksum = Checksum::of(&[0xFF, 0x02]);
        assert_eq!(checksum.sum0(), 0x01);
        assert_eq!(checksum.sum1(), 0x00);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(Checksum::of(&[1, 2]), Checksum::of(&[2, 1]));
    }
}
