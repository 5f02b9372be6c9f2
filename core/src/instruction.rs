use std::fmt;

use crate::error::{Error, InvalidInstructionSnafu};
use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices, `kk` an immediate byte, `nnn` an address and `n` the
/// height of a sprite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// clear the display
    Cls,
    /// PC = STACK.pop()
    Ret,
    /// PC = nnn; the machine code call of the COSMAC VIP is treated as a plain jump
    Sys { nnn: u16 },
    /// PC = nnn
    Jp { nnn: u16 },
    /// STACK.push(PC); PC = nnn
    Call { nnn: u16 },
    /// if Vx == kk then skip
    SeByte { x: usize, kk: u8 },
    /// if Vx != kk then skip
    SneByte { x: usize, kk: u8 },
    /// if Vx == Vy then skip
    SeReg { x: usize, y: usize },
    /// Vx = kk
    LdByte { x: usize, kk: u8 },
    /// Vx += kk
    AddByte { x: usize, kk: u8 },
    /// Vx = Vy
    LdReg { x: usize, y: usize },
    /// Vx |= Vy
    Or { x: usize, y: usize },
    /// Vx &= Vy
    And { x: usize, y: usize },
    /// Vx ^= Vy
    Xor { x: usize, y: usize },
    /// Vx += Vy; VF = carry
    AddReg { x: usize, y: usize },
    /// Vx -= Vy; VF = !borrow
    Sub { x: usize, y: usize },
    /// Vx >>= 2; VF = lsb
    Shr { x: usize },
    /// Vx = Vy - Vx; VF = !borrow
    Subn { x: usize, y: usize },
    /// Vx <<= 2; VF = msb
    Shl { x: usize },
    /// if Vx != Vy then skip
    SneReg { x: usize, y: usize },
    /// I = nnn
    LdI { nnn: u16 },
    /// PC = nnn + V0
    JpV0 { nnn: u16 },
    /// Vx = rand_byte & kk
    Rnd { x: usize, kk: u8 },
    /// draw_sprite(x=Vx y=Vy height=n)
    Drw { x: usize, y: usize, n: u8 },
    /// if Vx.pressed then skip
    Skp { x: usize },
    /// if !Vx.pressed then skip
    Sknp { x: usize },
    /// Vx = DT
    LdVxDt { x: usize },
    /// Vx = await keypress
    LdVxK { x: usize },
    /// DT = Vx
    LdDtVx { x: usize },
    /// ST = Vx
    LdStVx { x: usize },
    /// I += Vx
    AddI { x: usize },
    /// I = address of the glyph for Vx
    LdF { x: usize },
    /// mem[I..I+3] = bcd(Vx)
    LdB { x: usize },
    /// mem[I..=I+x] = V0..=Vx
    StoreRegs { x: usize },
    /// V0..=Vx = mem[I..=I+x]
    LoadRegs { x: usize },
}

impl Instruction {
    /// Selects the Instruction encoded by an opcode.
    ///
    /// `address` is where the opcode was fetched from and is only used for error reporting.
    pub fn decode(op: Opcode, address: u16) -> Result<Self, Error> {
        use Instruction::*;

        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { nnn },
            (0x1, ..) => Jp { nnn },
            (0x2, ..) => Call { nnn },
            (0x3, ..) => SeByte { x, kk },
            (0x4, ..) => SneByte { x, kk },
            (0x5, .., 0x0) => SeReg { x, y },
            (0x6, ..) => LdByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => LdReg { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x },
            (0x9, .., 0x0) => SneReg { x, y },
            (0xA, ..) => LdI { nnn },
            (0xB, ..) => JpV0 { nnn },
            (0xC, ..) => Rnd { x, kk },
            (0xD, ..) => Drw { x, y, n },
            (0xE, _, 0x9, 0xE) => Skp { x },
            (0xE, _, 0xA, 0x1) => Sknp { x },
            (0xF, _, 0x0, 0x7) => LdVxDt { x },
            (0xF, _, 0x0, 0xA) => LdVxK { x },
            (0xF, _, 0x1, 0x5) => LdDtVx { x },
            (0xF, _, 0x1, 0x8) => LdStVx { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => LdF { x },
            (0xF, _, 0x3, 0x3) => LdB { x },
            (0xF, _, 0x5, 0x5) => StoreRegs { x },
            (0xF, _, 0x6, 0x5) => LoadRegs { x },
            _ => {
                return InvalidInstructionSnafu {
                    opcode: op.0,
                    address,
                }
                .fail()
            }
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Sys { nnn } => write!(f, "SYS {:#05X}", nnn),
            Jp { nnn } => write!(f, "JP {:#05X}", nnn),
            Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { nnn } => write!(f, "LD I, {:#05X}", nnn),
            JpV0 { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdF { x } => write!(f, "LD F, V{:X}", x),
            LdB { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(op: u16) -> Result<Instruction, Error> {
        Instruction::decode(Opcode(op), 0x200)
    }

    #[test]
    fn test_decodes_fixed_opcodes() {
        assert_eq!(decode(0x00E0).unwrap(), Instruction::Cls);
        assert_eq!(decode(0x00EE).unwrap(), Instruction::Ret);
    }

    #[test]
    fn test_other_0nnn_is_a_jump() {
        assert_eq!(decode(0x0123).unwrap(), Instruction::Sys { nnn: 0x123 });
        assert_eq!(decode(0x0000).unwrap(), Instruction::Sys { nnn: 0x000 });
    }

    #[test]
    fn test_decodes_operands() {
        assert_eq!(
            decode(0xD125).unwrap(),
            Instruction::Drw { x: 1, y: 2, n: 5 }
        );
        assert_eq!(
            decode(0x7AFF).unwrap(),
            Instruction::AddByte { x: 0xA, kk: 0xFF }
        );
        assert_eq!(decode(0xB321).unwrap(), Instruction::JpV0 { nnn: 0x321 });
        assert_eq!(decode(0xF365).unwrap(), Instruction::LoadRegs { x: 3 });
    }

    #[test]
    fn test_decodes_every_arithmetic_operation() {
        let expected = [
            (0x8120, Instruction::LdReg { x: 1, y: 2 }),
            (0x8121, Instruction::Or { x: 1, y: 2 }),
            (0x8122, Instruction::And { x: 1, y: 2 }),
            (0x8123, Instruction::Xor { x: 1, y: 2 }),
            (0x8124, Instruction::AddReg { x: 1, y: 2 }),
            (0x8125, Instruction::Sub { x: 1, y: 2 }),
            (0x8126, Instruction::Shr { x: 1 }),
            (0x8127, Instruction::Subn { x: 1, y: 2 }),
            (0x812E, Instruction::Shl { x: 1 }),
        ];
        for (op, instruction) in expected.iter() {
            assert_eq!(decode(*op).unwrap(), *instruction);
        }
    }

    #[test]
    fn test_rejects_unknown_operations() {
        for op in [
            0x5121, 0x9121, 0x8128, 0x812F, 0xE19F, 0xE1A2, 0xF100, 0xF1FF, 0xF166,
        ] {
            match decode(op) {
                Err(Error::InvalidInstruction { opcode, address }) => {
                    assert_eq!(opcode, op);
                    assert_eq!(address, 0x200);
                }
                other => panic!("{:04X} decoded as {:?}", op, other),
            }
        }
    }

    #[test]
    fn test_disassembles() {
        assert_eq!(decode(0x6122).unwrap().to_string(), "LD V1, 0x22");
        assert_eq!(decode(0xD015).unwrap().to_string(), "DRW V0, V1, 5");
        assert_eq!(decode(0x2234).unwrap().to_string(), "CALL 0x234");
        assert_eq!(decode(0xFA55).unwrap().to_string(), "LD [I], VA");
    }
}
