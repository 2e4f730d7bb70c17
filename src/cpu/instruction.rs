use std::fmt;

use crate::cpu::op::Op;
use crate::cpu::parameter::Parameter;
use crate::hex::hex_bytes;
use crate::string::right_pad;

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub command: Op,
    pub param: Parameter,

    /// instruction length in bytes (1-3), the amount PC advances by
    /// before the instruction executes
    pub length: u8,

    /// clock cycles, the taken-path count for conditional flow
    pub cycles: u8,
}

impl Instruction {
    pub fn new(op: Op) -> Self {
        Instruction {
            command: op,
            param: Parameter::None,
            length: 0,
            cycles: 0,
        }
    }

}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.param {
            Parameter::None => write!(f, "{}", self.command),
            _ => match self.command {
                // these carry a register operand in the mnemonic already
                Op::Mvi(_) | Op::Lxi(_) => write!(f, "{}, {}", self.command, self.param),
                _ => write!(f, "{} {}", self.command, self.param),
            },
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct InstructionInfo {
    pub offset: u16,
    pub bytes: Vec<u8>,
    pub instruction: Instruction,
}

impl fmt::Display for InstructionInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:04X}] {} {}",
            self.offset,
            right_pad(&hex_bytes(&self.bytes), 6),
            self.instruction,
        )
    }
}
