use crate::cpu::instruction::{Instruction, InstructionInfo};
use crate::cpu::op::{Cond, Op};
use crate::cpu::parameter::Parameter;
use crate::cpu::register::{R8, RP};
use crate::memory::FlatMemory;

/// if enabled, prints decoded instructions each time they are being decoded
const DEBUG_DECODER: bool = false;

#[cfg(test)]
#[path = "./decoder_test.rs"]
mod decoder_test;

/// clock cycles per opcode. conditional jump/call/return entries hold
/// the taken-path count
static CYCLES: [u8; 256] = [
     4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4,
     4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4,
     4, 10, 16,  5,  5,  5,  7,  4,  4, 10, 16,  5,  5,  5,  7,  4,
     4, 10, 13,  5, 10, 10, 10,  4,  4, 10, 13,  5,  5,  5,  7,  4,
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5,
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5,
     5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5,
     7,  7,  7,  7,  7,  7,  7,  7,  5,  5,  5,  5,  5,  5,  7,  5,
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4,
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4,
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4,
     4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4,
    11, 10, 10, 10, 17, 11,  7, 11, 11, 10, 10, 10, 17, 17,  7, 11,
    11, 10, 10, 10, 17, 11,  7, 11, 11, 10, 10, 10, 17, 17,  7, 11,
    11, 10, 10, 18, 17, 11,  7, 11, 11,  5, 10,  4, 17, 17,  7, 11,
    11, 10, 10,  4, 17, 11,  7, 11, 11,  5, 10,  4, 17, 17,  7, 11,
];

#[derive(Clone, Default)]
pub struct Decoder {
    /// instruction decoding offset
    current_offset: u16,
}

impl Decoder {
    /// decodes the bytes at `offset` into a Vec with `n` InstructionInfo's
    pub fn decode_to_block(&mut self, memory: &FlatMemory, offset: u16, n: usize) -> Vec<InstructionInfo> {
        let mut ops: Vec<InstructionInfo> = Vec::new();
        let mut inst_offset = offset;
        for _ in 0..n {
            let op = self.get_instruction_info(memory, inst_offset);
            inst_offset = inst_offset.wrapping_add(op.bytes.len() as u16);
            ops.push(op);
        }
        ops
    }

    pub fn disassemble_block_to_str(&mut self, memory: &FlatMemory, offset: u16, n: usize) -> String {
        let ops = self.decode_to_block(memory, offset, n);
        instruction_info_to_str(&ops)
    }

    /// decodes op at offset into a InstructionInfo
    pub fn get_instruction_info(&mut self, memory: &FlatMemory, offset: u16) -> InstructionInfo {
        let instr = self.get_instruction(memory, offset);
        if DEBUG_DECODER {
            println!("get_instruction_info at {:04X}: {}", offset, instr);
        }
        InstructionInfo {
            offset,
            bytes: memory.read(offset, instr.length as usize),
            instruction: instr,
        }
    }

    /// decodes op at offset into a Instruction
    pub fn get_instruction(&mut self, memory: &FlatMemory, offset: u16) -> Instruction {
        self.current_offset = offset;
        let mut op = Instruction::new(Op::Uninitialized);
        self.decode(memory, &mut op);
        op.length = self.current_offset.wrapping_sub(offset) as u8;
        op
    }

    fn decode(&mut self, memory: &FlatMemory, op: &mut Instruction) {
        let b = self.read_u8(memory);
        op.cycles = CYCLES[b as usize];

        match b {
            0x00 => op.command = Op::Nop,
            0x01 => {
                // lxi b, d16
                op.command = Op::Lxi(RP::BC);
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x02 => op.command = Op::Stax(RP::BC),
            0x03 => op.command = Op::Inx(RP::BC),
            0x04 => op.command = Op::Inr(R8::B),
            0x05 => op.command = Op::Dcr(R8::B),
            0x06 => {
                // mvi b, d8
                op.command = Op::Mvi(R8::B);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x07 => op.command = Op::Rlc,
            0x09 => op.command = Op::Dad(RP::BC),
            0x0A => op.command = Op::Ldax(RP::BC),
            0x0B => op.command = Op::Dcx(RP::BC),
            0x0C => op.command = Op::Inr(R8::C),
            0x0D => op.command = Op::Dcr(R8::C),
            0x0E => {
                // mvi c, d8
                op.command = Op::Mvi(R8::C);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x0F => op.command = Op::Rrc,
            0x11 => {
                // lxi d, d16
                op.command = Op::Lxi(RP::DE);
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x12 => op.command = Op::Stax(RP::DE),
            0x13 => op.command = Op::Inx(RP::DE),
            0x14 => op.command = Op::Inr(R8::D),
            0x15 => op.command = Op::Dcr(R8::D),
            0x16 => {
                // mvi d, d8
                op.command = Op::Mvi(R8::D);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x17 => op.command = Op::Ral,
            0x19 => op.command = Op::Dad(RP::DE),
            0x1A => op.command = Op::Ldax(RP::DE),
            0x1B => op.command = Op::Dcx(RP::DE),
            0x1C => op.command = Op::Inr(R8::E),
            0x1D => op.command = Op::Dcr(R8::E),
            0x1E => {
                // mvi e, d8
                op.command = Op::Mvi(R8::E);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x1F => op.command = Op::Rar,
            0x21 => {
                // lxi h, d16
                op.command = Op::Lxi(RP::HL);
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x22 => {
                // shld a16
                op.command = Op::Shld;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x23 => op.command = Op::Inx(RP::HL),
            0x24 => op.command = Op::Inr(R8::H),
            0x25 => op.command = Op::Dcr(R8::H),
            0x26 => {
                // mvi h, d8
                op.command = Op::Mvi(R8::H);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x27 => op.command = Op::Daa,
            0x29 => op.command = Op::Dad(RP::HL),
            0x2A => {
                // lhld a16
                op.command = Op::Lhld;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x2B => op.command = Op::Dcx(RP::HL),
            0x2C => op.command = Op::Inr(R8::L),
            0x2D => op.command = Op::Dcr(R8::L),
            0x2E => {
                // mvi l, d8
                op.command = Op::Mvi(R8::L);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x2F => op.command = Op::Cma,
            0x31 => {
                // lxi sp, d16
                op.command = Op::Lxi(RP::SP);
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x32 => {
                // sta a16
                op.command = Op::Sta;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x33 => op.command = Op::Inx(RP::SP),
            0x34 => op.command = Op::Inr(R8::M),
            0x35 => op.command = Op::Dcr(R8::M),
            0x36 => {
                // mvi m, d8
                op.command = Op::Mvi(R8::M);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x37 => op.command = Op::Stc,
            0x39 => op.command = Op::Dad(RP::SP),
            0x3A => {
                // lda a16
                op.command = Op::Lda;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0x3B => op.command = Op::Dcx(RP::SP),
            0x3C => op.command = Op::Inr(R8::A),
            0x3D => op.command = Op::Dcr(R8::A),
            0x3E => {
                // mvi a, d8
                op.command = Op::Mvi(R8::A);
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0x3F => op.command = Op::Cmc,
            // the unassigned 0x08-0x38 slots decode as nop
            0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => op.command = Op::Nop,
            0x76 => op.command = Op::Hlt,
            0x40..=0x7F => {
                // mov dst, src with the operands in the two low octal digits
                let dst: R8 = ((b >> 3) & 7).into();
                let src: R8 = (b & 7).into();
                op.command = Op::Mov(dst, src);
            }
            0x80..=0x87 => op.command = Op::Add((b & 7).into()),
            0x88..=0x8F => op.command = Op::Adc((b & 7).into()),
            0x90..=0x97 => op.command = Op::Sub((b & 7).into()),
            0x98..=0x9F => op.command = Op::Sbb((b & 7).into()),
            0xA0..=0xA7 => op.command = Op::Ana((b & 7).into()),
            0xA8..=0xAF => op.command = Op::Xra((b & 7).into()),
            0xB0..=0xB7 => op.command = Op::Ora((b & 7).into()),
            0xB8..=0xBF => op.command = Op::Cmp((b & 7).into()),
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                // conditional return
                op.command = Op::Rcc(Cond::from_bits((b >> 3) & 7));
            }
            0xC1 | 0xD1 | 0xE1 | 0xF1 => op.command = Op::Pop(RP::from_stack_bits((b >> 4) & 3)),
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                // conditional jump
                op.command = Op::Jcc(Cond::from_bits((b >> 3) & 7));
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0xC3 | 0xCB => {
                // jmp a16. 0xCB is the undocumented alias the rom relies on
                op.command = Op::Jmp;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                // conditional call
                op.command = Op::Ccc(Cond::from_bits((b >> 3) & 7));
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0xC5 | 0xD5 | 0xE5 | 0xF5 => op.command = Op::Push(RP::from_stack_bits((b >> 4) & 3)),
            0xC6 => {
                // adi d8
                op.command = Op::Adi;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                op.command = Op::Rst((b >> 3) & 7);
            }
            0xC9 | 0xD9 => {
                // ret. 0xD9 is the undocumented alias
                op.command = Op::Ret;
            }
            0xCD | 0xDD | 0xED | 0xFD => {
                // call a16. 0xDD/0xED/0xFD are the undocumented aliases
                op.command = Op::Call;
                op.param = Parameter::Imm16(self.read_u16(memory));
            }
            0xCE => {
                // aci d8
                op.command = Op::Aci;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xD3 => {
                // out d8
                op.command = Op::Out;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xD6 => {
                // sui d8
                op.command = Op::Sui;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xDB => {
                // in d8
                op.command = Op::In;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xDE => {
                // sbi d8
                op.command = Op::Sbi;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xE3 => op.command = Op::Xthl,
            0xE6 => {
                // ani d8
                op.command = Op::Ani;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xE9 => op.command = Op::Pchl,
            0xEB => op.command = Op::Xchg,
            0xEE => {
                // xri d8
                op.command = Op::Xri;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xF3 => op.command = Op::Di,
            0xF6 => {
                // ori d8
                op.command = Op::Ori;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
            0xF9 => op.command = Op::Sphl,
            0xFB => op.command = Op::Ei,
            0xFE => {
                // cpi d8
                op.command = Op::Cpi;
                op.param = Parameter::Imm8(self.read_u8(memory));
            }
        }
    }

    fn read_u8(&mut self, memory: &FlatMemory) -> u8 {
        let b = memory.read_u8(self.current_offset);
        self.current_offset = self.current_offset.wrapping_add(1);
        b
    }

    fn read_u16(&mut self, memory: &FlatMemory) -> u16 {
        let lo = self.read_u8(memory);
        let hi = self.read_u8(memory);
        u16::from(hi) << 8 | u16::from(lo)
    }
}

pub fn instruction_info_to_str(ops: &[InstructionInfo]) -> String {
    let mut lines = Vec::new();
    for op in ops {
        lines.push(op.to_string());
    }
    lines.join("\n")
}
