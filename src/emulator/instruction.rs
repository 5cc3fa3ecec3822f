use crate::util::bit_splitter::BitSplitter;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg, Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg, Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    SetPcToV0PlusAddr(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyEqVx(Reg), // EX9E
    IfKeyNeqVx(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    SetRegToGetKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
}

impl Instruction {
    /// Decode an opcode, or `None` if it is not part of the instruction set.
    ///
    /// The `0NNN` machine code routines are deliberately absent,
    /// so only `00E0` and `00EE` decode in the `0` family.
    pub fn decode(value: u16) -> Option<Instruction> {
        let opcode = BitSplitter::from_u16(value);
        let nn = Const(opcode.last_8_bits());
        let nnn = Addr(opcode.last_12_bits());
        let instruction = match opcode.as_four_u8() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Goto(nnn),
            (2, _, _, _) => Instruction::Call(nnn),
            (3, x, _, _) => Instruction::IfRegEqConst(Reg(x), nn),
            (4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), nn),
            (5, x, y, 0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::SetRegToConst(Reg(x), nn),
            (7, x, _, _) => Instruction::IncRegByConst(Reg(x), nn),
            (8, x, y, 0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::IncRegByReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::DecRegByReg(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::BitshiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SetVxVyMinusVx(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::BitshiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(nnn),
            (0xB, _, _, _) => Instruction::SetPcToV0PlusAddr(nnn),
            (0xC, x, _, _) => Instruction::SetVxRand(Reg(x), nn),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::IfKeyEqVx(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::IfKeyNeqVx(Reg(x)),
            (0xF, x, 0, 7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::SetRegToGetKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::SetIToSpriteAddrVx(Reg(x)),
            (0xF, x, 3, 3) => Instruction::SetIToBcdOfReg(Reg(x)),
            (0xF, x, 5, 5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 6, 5) => Instruction::RegLoad(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }

    /// Assemble the instruction back into its opcode.
    pub fn encode(&self) -> u16 {
        fn xy(family: u16, Reg(x): Reg, Reg(y): Reg, n: u16) -> u16 {
            family << 12 | (x as u16 & 0xF) << 8 | (y as u16 & 0xF) << 4 | n
        }
        fn xnn(family: u16, Reg(x): Reg, Const(nn): Const) -> u16 {
            family << 12 | (x as u16 & 0xF) << 8 | nn as u16
        }
        fn fx(Reg(x): Reg, low: u16) -> u16 {
            0xF000 | (x as u16 & 0xF) << 8 | low
        }

        match *self {
            Instruction::ClearScreen => 0x00E0,
            Instruction::Return => 0x00EE,
            Instruction::Goto(Addr(a)) => 0x1000 | a & 0x0FFF,
            Instruction::Call(Addr(a)) => 0x2000 | a & 0x0FFF,
            Instruction::IfRegEqConst(x, nn) => xnn(3, x, nn),
            Instruction::IfRegNeqConst(x, nn) => xnn(4, x, nn),
            Instruction::IfRegEqReg(x, y) => xy(5, x, y, 0),
            Instruction::SetRegToConst(x, nn) => xnn(6, x, nn),
            Instruction::IncRegByConst(x, nn) => xnn(7, x, nn),
            Instruction::SetRegToReg(x, y) => xy(8, x, y, 0),
            Instruction::BitwiseOr(x, y) => xy(8, x, y, 1),
            Instruction::BitwiseAnd(x, y) => xy(8, x, y, 2),
            Instruction::BitwiseXor(x, y) => xy(8, x, y, 3),
            Instruction::IncRegByReg(x, y) => xy(8, x, y, 4),
            Instruction::DecRegByReg(x, y) => xy(8, x, y, 5),
            Instruction::BitshiftRight(x, y) => xy(8, x, y, 6),
            Instruction::SetVxVyMinusVx(x, y) => xy(8, x, y, 7),
            Instruction::BitshiftLeft(x, y) => xy(8, x, y, 0xE),
            Instruction::IfRegNeqReg(x, y) => xy(9, x, y, 0),
            Instruction::SetI(Addr(a)) => 0xA000 | a & 0x0FFF,
            Instruction::SetPcToV0PlusAddr(Addr(a)) => 0xB000 | a & 0x0FFF,
            Instruction::SetVxRand(x, nn) => xnn(0xC, x, nn),
            Instruction::Draw(x, y, Const(n)) => xy(0xD, x, y, n as u16 & 0xF),
            Instruction::IfKeyEqVx(x) => xnn(0xE, x, Const(0x9E)),
            Instruction::IfKeyNeqVx(x) => xnn(0xE, x, Const(0xA1)),
            Instruction::SetRegToDelayTimer(x) => fx(x, 0x07),
            Instruction::SetRegToGetKey(x) => fx(x, 0x0A),
            Instruction::SetDelayTimerToReg(x) => fx(x, 0x15),
            Instruction::SetSoundTimerToReg(x) => fx(x, 0x18),
            Instruction::AddRegToI(x) => fx(x, 0x1E),
            Instruction::SetIToSpriteAddrVx(x) => fx(x, 0x29),
            Instruction::SetIToBcdOfReg(x) => fx(x, 0x33),
            Instruction::RegDump(x) => fx(x, 0x55),
            Instruction::RegLoad(x) => fx(x, 0x65),
        }
    }
}

/// Assemble a sequence of instructions into program bytes, big-endian.
pub fn assemble(program: &[Instruction]) -> Vec<u8> {
    program
        .iter()
        .flat_map(|instruction| instruction.encode().to_be_bytes().to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0x00E0 => Some(Instruction::ClearScreen) ; "clear screen")]
    #[test_case(0x00EE => Some(Instruction::Return) ; "return")]
    #[test_case(0x1025 => Some(Instruction::Goto(Addr(0x25))) ; "goto")]
    #[test_case(0x2037 => Some(Instruction::Call(Addr(0x37))) ; "call")]
    #[test_case(0x3A08 => Some(Instruction::IfRegEqConst(Reg(0xA), Const(8))) ; "if reg eq const")]
    #[test_case(0x4A08 => Some(Instruction::IfRegNeqConst(Reg(0xA), Const(8))) ; "if reg neq const")]
    #[test_case(0x5AB0 => Some(Instruction::IfRegEqReg(Reg(0xA), Reg(0xB))) ; "if reg eq reg")]
    #[test_case(0x6B23 => Some(Instruction::SetRegToConst(Reg(0xB), Const(0x23))) ; "set reg")]
    #[test_case(0x7CA1 => Some(Instruction::IncRegByConst(Reg(0xC), Const(0xA1))) ; "add const")]
    #[test_case(0x8AB0 => Some(Instruction::SetRegToReg(Reg(0xA), Reg(0xB))) ; "copy reg")]
    #[test_case(0x8DE1 => Some(Instruction::BitwiseOr(Reg(0xD), Reg(0xE))) ; "or")]
    #[test_case(0x8DE2 => Some(Instruction::BitwiseAnd(Reg(0xD), Reg(0xE))) ; "and")]
    #[test_case(0x8DE3 => Some(Instruction::BitwiseXor(Reg(0xD), Reg(0xE))) ; "xor")]
    #[test_case(0x8AB4 => Some(Instruction::IncRegByReg(Reg(0xA), Reg(0xB))) ; "add reg")]
    #[test_case(0x8AB5 => Some(Instruction::DecRegByReg(Reg(0xA), Reg(0xB))) ; "sub reg")]
    #[test_case(0x8AB6 => Some(Instruction::BitshiftRight(Reg(0xA), Reg(0xB))) ; "shift right")]
    #[test_case(0x8AB7 => Some(Instruction::SetVxVyMinusVx(Reg(0xA), Reg(0xB))) ; "reverse sub")]
    #[test_case(0x8A0E => Some(Instruction::BitshiftLeft(Reg(0xA), Reg(0x0))) ; "shift left")]
    #[test_case(0x9AB0 => Some(Instruction::IfRegNeqReg(Reg(0xA), Reg(0xB))) ; "if reg neq reg")]
    #[test_case(0xA025 => Some(Instruction::SetI(Addr(0x25))) ; "set i")]
    #[test_case(0xB102 => Some(Instruction::SetPcToV0PlusAddr(Addr(0x102))) ; "jump offset")]
    #[test_case(0xCA23 => Some(Instruction::SetVxRand(Reg(0xA), Const(0x23))) ; "rand")]
    #[test_case(0xDABC => Some(Instruction::Draw(Reg(0xA), Reg(0xB), Const(0xC))) ; "draw")]
    #[test_case(0xEA9E => Some(Instruction::IfKeyEqVx(Reg(0xA))) ; "if key")]
    #[test_case(0xEAA1 => Some(Instruction::IfKeyNeqVx(Reg(0xA))) ; "if not key")]
    #[test_case(0xFA07 => Some(Instruction::SetRegToDelayTimer(Reg(0xA))) ; "get delay")]
    #[test_case(0xFA0A => Some(Instruction::SetRegToGetKey(Reg(0xA))) ; "await key")]
    #[test_case(0xFA15 => Some(Instruction::SetDelayTimerToReg(Reg(0xA))) ; "set delay")]
    #[test_case(0xFA18 => Some(Instruction::SetSoundTimerToReg(Reg(0xA))) ; "set sound")]
    #[test_case(0xFA1E => Some(Instruction::AddRegToI(Reg(0xA))) ; "add i")]
    #[test_case(0xFA29 => Some(Instruction::SetIToSpriteAddrVx(Reg(0xA))) ; "font")]
    #[test_case(0xFA33 => Some(Instruction::SetIToBcdOfReg(Reg(0xA))) ; "bcd")]
    #[test_case(0xFA55 => Some(Instruction::RegDump(Reg(0xA))) ; "dump")]
    #[test_case(0xFA65 => Some(Instruction::RegLoad(Reg(0xA))) ; "load")]
    fn opcodes_are_parsed_correctly(opcode: u16) -> Option<Instruction> {
        Instruction::decode(opcode)
    }

    #[test_case(0x0000 ; "zero")]
    #[test_case(0x0123 ; "machine code routine")]
    #[test_case(0x00E1 ; "near clear screen")]
    #[test_case(0x5AB1 ; "skip with nonzero tail")]
    #[test_case(0x8AB8 ; "unused alu op")]
    #[test_case(0x9AB1 ; "skip neq with nonzero tail")]
    #[test_case(0xEA9F ; "unused key op")]
    #[test_case(0xFA00 ; "unused misc op")]
    #[test_case(0xFFFF ; "all ones")]
    fn unknown_opcodes_are_rejected(opcode: u16) {
        assert_eq!(None, Instruction::decode(opcode));
    }

    #[test]
    fn assemble_is_big_endian() {
        let program = assemble(&[Instruction::ClearScreen, Instruction::Goto(Addr(0x234))]);
        assert_eq!(vec![0x00, 0xE0, 0x12, 0x34], program);
    }

    proptest! {
        #[test]
        fn every_decoded_opcode_encodes_back(opcode in any::<u16>()) {
            if let Some(instruction) = Instruction::decode(opcode) {
                prop_assert_eq!(opcode, instruction.encode());
            }
        }
    }
}
