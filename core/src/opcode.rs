use std::fmt;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bit big-endian words. Which instruction they encode is cased on:
/// - `(n, _, _, _)` the family; applies to all opcodes
/// - `(_, _, _, n)` the operation within the `5`, `8` and `9` families
/// - `(_, _, n, n)` the operation within the `0`, `E` and `F` families
///
/// The remaining nibbles carry the operands:
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` the height of a sprite
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Combines two subsequent bytes of memory into an opcode.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from(high) << 8 | u16::from(low))
    }

    /// `[n___] [_n__] [__n_] [___n]`
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 & 0xF000) >> 12) as u8,
            ((self.0 & 0x0F00) >> 8) as u8,
            ((self.0 & 0x00F0) >> 4) as u8,
            self.n(),
        )
    }

    /// `[_x__]`
    pub fn x(self) -> usize {
        usize::from(((self.0 & 0x0F00) >> 8) as u8)
    }

    /// `[__y_]`
    pub fn y(self) -> usize {
        usize::from(((self.0 & 0x00F0) >> 4) as u8)
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_is_big_endian() {
        assert_eq!(Opcode::from_bytes(0xAA, 0xBB), Opcode(0xAABB));
    }

    #[test]
    fn test_nibbles() {
        assert_eq!(Opcode(0xABCD).nibbles(), (0xA, 0xB, 0xC, 0xD));
        assert_eq!(Opcode(0x0F00).nibbles(), (0x0, 0xF, 0x0, 0x0));
    }

    #[test]
    fn test_operands() {
        let op = Opcode(0xABCD);
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0x0BCD);
    }

    #[test]
    fn test_display_is_zero_padded_hex() {
        assert_eq!(Opcode(0x00E0).to_string(), "00E0");
    }
}
