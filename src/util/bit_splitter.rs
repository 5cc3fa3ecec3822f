/// A structure for easily splitting an opcode
/// into its big-endian byte pair and the nibble fields
/// used by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    /// `high` is the byte at `pc`, `low` the byte at `pc + 1`.
    #[cfg(test)]
    pub fn new(high: u8, low: u8) -> BitSplitter {
        BitSplitter(high, low)
    }

    /// Left-shift the high byte 8 bits, then take bitwise or
    /// with the low byte in order to store the opcode in a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// The four nibbles, most significant first: (family, x, y, n).
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.0 >> 4, self.0 & 0x0F, self.1 >> 4, self.1 & 0x0F)
    }

    /// `nn`
    pub fn last_8_bits(&self) -> u8 {
        self.1
    }

    /// `nnn`
    pub fn last_12_bits(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_equals_from_u16() {
        assert_eq!(BitSplitter::new(0x12, 0x34), BitSplitter::from_u16(0x1234));
        assert_eq!(BitSplitter::new(0xFF, 0x00), BitSplitter::from_u16(0xFF00));
    }

    #[test]
    fn as_u16_is_big_endian() {
        assert_eq!(0x0D0E, BitSplitter::new(0x0D, 0x0E).as_u16());
        assert_eq!(0xF0F0, BitSplitter::new(0xF0, 0xF0).as_u16());
    }

    #[test]
    fn nibbles_are_split_in_order() {
        assert_eq!((0xD, 0x1, 0x2, 0x5), BitSplitter::from_u16(0xD125).as_four_u8());
        assert_eq!((0x0, 0x0, 0xE, 0xE), BitSplitter::from_u16(0x00EE).as_four_u8());
    }

    #[test]
    fn operand_fields() {
        let opcode = BitSplitter::from_u16(0xABCD);
        assert_eq!(0xCD, opcode.last_8_bits());
        assert_eq!(0xBCD, opcode.last_12_bits());
    }
}
