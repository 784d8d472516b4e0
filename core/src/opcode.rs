/// # Opcode fields
///
/// Every instruction is a single big-endian 16-bit word. The top nibble
/// selects one of 16 primary groups; depending on the group the remaining
/// nibbles are either further selectors or operands:
/// - `(_, x, _, _)` a register index, or the top of a V0..Vx range
/// - `(_, _, y, _)` a second register index
/// - `(_, _, _, n)` a 4-bit immediate (sprite height) or sub-opcode selector
/// - `(_, _, k, k)` an 8-bit immediate or sub-opcode selector
/// - `(_, n, n, n)` a 12-bit address
pub trait Opcode {
    /// All four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The register index in the second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The register index in the third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The low nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The low byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The low 12 bits.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        ((self >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(0x1234u16.nibbles(), (0x1, 0x2, 0x3, 0x4));
    }

    #[test]
    fn test_x() {
        assert_eq!(0x1234u16.x(), 0x2);
    }

    #[test]
    fn test_y() {
        assert_eq!(0x1234u16.y(), 0x3);
    }

    #[test]
    fn test_n() {
        assert_eq!(0x1234u16.n(), 0x4);
    }

    #[test]
    fn test_kk() {
        assert_eq!(0x1234u16.kk(), 0x34);
    }

    #[test]
    fn test_nnn() {
        assert_eq!(0x1234u16.nnn(), 0x234);
    }
}
