use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cpu::{Instruction, Op, CPU, R8, RP};
use crate::hex::hex_bytes;
use crate::invaders::InvadersPorts;
use crate::memory::FlatMemory;
use crate::tools::read_binary;

#[cfg(test)]
#[path = "./machine_test.rs"]
mod machine_test;

/// prints each instruction & reg values as they are executed
const DEBUG_EXEC: bool = false;

/// prints access to I/O ports
const DEBUG_IO: bool = false;

quick_error! {
    #[derive(Debug)]
    pub enum RomError {
        Io(err: std::io::Error) {
            from()
            display("rom read error: {}", err)
        }
        TooLarge(len: usize) {
            display("rom image of {} bytes does not fit in the address space", len)
        }
    }
}

pub enum MachineComponent {
    Invaders(InvadersPorts),
}

pub trait Component {
    /// returns Some<u8> if read was handled
    fn in_u8(&mut self, _port: u8) -> Option<u8> {
        None
    }

    /// returns true if write was handled
    fn out_u8(&mut self, _port: u8, _data: u8) -> bool {
        false
    }
}

pub struct Machine {
    pub memory: FlatMemory,
    pub cpu: CPU,

    /// base offset where rom was loaded
    pub rom_base: u16,

    /// length of loaded rom in bytes (used by disassembler)
    pub rom_length: usize,

    /// handlers for i/o ports
    components: Vec<MachineComponent>,

    /// if set, writes an instruction trace to `trace_file`
    trace_file: Option<File>,

    /// if set, limits the execution to `trace_count` instructions
    trace_count: Option<usize>,
}

impl Machine {
    pub fn default() -> Self {
        let mut m = Machine {
            cpu: CPU::default(),
            memory: FlatMemory::new(),
            rom_base: 0,
            rom_length: 0,
            trace_file: None,
            trace_count: None,
            components: Vec::new(),
        };
        m.register_components();
        m
    }

    fn register_components(&mut self) {
        self.components.push(MachineComponent::Invaders(InvadersPorts::default()));
    }

    /// returns a mutable reference to the Invaders port component
    pub fn invaders_mut(&mut self) -> &mut InvadersPorts {
        for component in &mut self.components {
            let MachineComponent::Invaders(c) = component;
            return c;
        }
        unreachable!();
    }

    /// Enables writing of an instruction trace to file
    pub fn write_trace_to(&mut self, filename: &str) {
        let trace_path = Path::new(filename);

        let file = match File::create(&trace_path) {
            Err(why) => panic!("couldn't create {:?}: {}", trace_path.display(), why),
            Ok(file) => file,
        };

        {
            let mut writer = BufWriter::new(&file);
            let _ = writeln!(&mut writer, "; trace started {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        }

        self.trace_file = Some(file);
    }

    /// Limits the instruction trace to `count` instructions
    pub fn set_trace_count(&mut self, count: usize) {
        self.trace_count = Some(count);
    }

    /// Loads a rom image file into memory at `offset` and points PC at it
    pub fn load_rom_file(&mut self, filename: &str, offset: u16) -> Result<(), RomError> {
        let data = read_binary(filename)?;
        self.load_rom(&data, offset)
    }

    /// loads a rom image into memory at `offset` and points PC at it.
    /// the rest of the machine state is untouched
    pub fn load_rom(&mut self, data: &[u8], offset: u16) -> Result<(), RomError> {
        if data.len() + offset as usize > 0x1_0000 {
            return Err(RomError::TooLarge(data.len()));
        }
        self.memory.write(offset, data);
        self.cpu.regs.pc = offset;
        self.rom_base = offset;
        self.rom_length = data.len();
        Ok(())
    }

    /// requests interrupt `n` (serviced as rst `n`). must be called from
    /// the thread that drives execution
    pub fn raise_interrupt(&mut self, n: u8) {
        self.cpu.raise_interrupt(n);
    }

    /// executes instructions until `cycles` clock cycles have passed.
    /// returns true if execution should stop (fatal error or halt)
    pub fn execute_cycles(&mut self, cycles: usize) -> bool {
        let target = self.cpu.cycle_count + cycles;
        loop {
            self.execute_instruction();
            if self.cpu.fatal_error || self.cpu.halt {
                return true;
            }
            if self.cpu.cycle_count >= target {
                return false;
            }
        }
    }

    /// executes enough instructions that can run for 1 video frame
    pub fn execute_frame(&mut self) {
        let fps = 60;
        let cycles = self.cpu.clock_hz / fps;
        self.execute_cycles(cycles);
    }

    /// executes n instructions of the cpu.
    /// returns true if cpu.fatal_error was raised
    pub fn execute_instructions(&mut self, count: usize) -> bool {
        for _ in 0..count {
            self.execute_instruction();
            if self.cpu.fatal_error {
                return true;
            }
        }
        false
    }

    fn trace_regs(&self) -> String {
        format!("A:{:02X} BC:{:04X} DE:{:04X} HL:{:04X} SP:{:04X}",
            self.cpu.regs.a,
            self.cpu.get_rp(RP::BC),
            self.cpu.get_rp(RP::DE),
            self.cpu.get_rp(RP::HL),
            self.cpu.regs.sp)
    }

    /// executes the next CPU instruction, or services a pending interrupt
    pub fn execute_instruction(&mut self) {
        // interrupts are taken at instruction boundaries only
        if self.cpu.int_enable && self.cpu.pending_interrupts != 0 {
            let n = self.cpu.take_pending_interrupt();
            self.execute_interrupt(n);
            return;
        }

        if self.cpu.halt {
            return;
        }

        let pc = self.cpu.regs.pc;
        let op = self.cpu.decoder.get_instruction(&self.memory, pc);

        if self.trace_file.is_some() {
            let regs = self.trace_regs();

            let cf = self.cpu.regs.flags.carry_numeric();
            let zf = self.cpu.regs.flags.zero_numeric();
            let sf = self.cpu.regs.flags.sign_numeric();
            let pf = self.cpu.regs.flags.parity_numeric();
            let af = self.cpu.regs.flags.aux_numeric();

            if let Some(file) = &self.trace_file {
                // pads ops to 18 chars, but does not crop longer ops
                let disasm = format!("{:<18}", format!("{}", op));

                let mut writer = BufWriter::new(file);
                let _ = write!(&mut writer, "{:04X}  {}", pc, &disasm);
                let _ = write!(&mut writer, " {}", regs);
                let _ = writeln!(&mut writer, " C{} Z{} S{} P{} A{}", cf, zf, sf, pf, af);
            }
        }
        if let Some(max) = self.trace_count {
            if self.cpu.instruction_count >= max {
                self.cpu.fatal_error = true;
                println!("[{:04X}] ending execution trace after {} instructions", pc, self.cpu.instruction_count);
                return;
            }
        }

        match op.command {
            Op::Uninitialized => {
                self.cpu.fatal_error = true;
                println!("[{:04X}] ERROR: uninitialized op. {} instructions executed",
                         pc, self.cpu.instruction_count);
            }
            Op::Invalid(_) => {
                let hex = hex_bytes(&self.memory.read(pc, op.length as usize));
                self.cpu.fatal_error = true;
                println!("[{:04X}] {} ERROR: unhandled opcode", pc, hex);
            }
            _ => {
                if DEBUG_EXEC {
                    let bytes = self.memory.read(pc, op.length as usize);
                    println!("[{:04X}] {:<8} {:<18} {}", pc, hex_bytes(&bytes), format!("{}", op), self.trace_regs());
                }

                self.execute(&op);
            }
        }
    }

    /// interrupt entry: pushes the interrupted PC and vectors to 8n,
    /// same as an rst instruction. wakes a halted cpu
    fn execute_interrupt(&mut self, n: u8) {
        self.cpu.halt = false;
        self.cpu.cycle_count += 11;
        let pc = self.cpu.regs.pc;
        self.cpu.push16(&mut self.memory, pc);
        self.cpu.regs.pc = u16::from(n) * 8;
    }

    /// reads the register selected by `r`, resolving M through
    /// the byte at (HL)
    fn read_r8(&self, r: R8) -> u8 {
        match r {
            R8::M => self.memory.read_u8(self.cpu.get_rp(RP::HL)),
            _ => self.cpu.get_r8(r),
        }
    }

    /// writes the register selected by `r`, resolving M through
    /// the byte at (HL)
    fn write_r8(&mut self, r: R8, val: u8) {
        match r {
            R8::M => self.memory.write_u8(self.cpu.get_rp(RP::HL), val),
            _ => self.cpu.set_r8(r, val),
        }
    }

    /// read byte from I/O port
    pub fn in_u8(&mut self, port: u8) -> u8 {
        if DEBUG_IO {
            println!("in_u8: read from {:02X}", port);
        }

        for component in &mut self.components {
            let handled = match component {
                MachineComponent::Invaders(c) => c.in_u8(port),
            };
            if let Some(v) = handled {
                return v;
            }
        }

        println!("in_u8: unhandled port {:02X}", port);
        0
    }

    /// write byte to I/O port
    pub fn out_u8(&mut self, port: u8, data: u8) {
        if DEBUG_IO {
            println!("out_u8: write to {:02X} = {:02X}", port, data);
        }

        for component in &mut self.components {
            let b = match component {
                MachineComponent::Invaders(c) => c.out_u8(port, data),
            };
            if b {
                return;
            }
        }

        println!("out_u8: unhandled port {:02X} = {:02X}", port, data);
    }

    fn execute(&mut self, op: &Instruction) {
        self.cpu.regs.pc = self.cpu.regs.pc.wrapping_add(u16::from(op.length));
        self.cpu.instruction_count += 1;
        self.cpu.cycle_count += op.cycles as usize;
        match op.command {
            Op::Nop => {}
            Op::Mov(dst, src) => {
                let v = self.read_r8(src);
                self.write_r8(dst, v);
            }
            Op::Mvi(r) => {
                let v = op.param.imm8();
                self.write_r8(r, v);
            }
            Op::Lxi(rp) => {
                self.cpu.set_rp(rp, op.param.imm16());
            }
            Op::Lda => {
                self.cpu.regs.a = self.memory.read_u8(op.param.imm16());
            }
            Op::Sta => {
                self.memory.write_u8(op.param.imm16(), self.cpu.regs.a);
            }
            Op::Lhld => {
                let v = self.memory.read_u16(op.param.imm16());
                self.cpu.set_rp(RP::HL, v);
            }
            Op::Shld => {
                let hl = self.cpu.get_rp(RP::HL);
                self.memory.write_u16(op.param.imm16(), hl);
            }
            Op::Ldax(rp) => {
                self.cpu.regs.a = self.memory.read_u8(self.cpu.get_rp(rp));
            }
            Op::Stax(rp) => {
                self.memory.write_u8(self.cpu.get_rp(rp), self.cpu.regs.a);
            }
            Op::Xchg => {
                let de = self.cpu.get_rp(RP::DE);
                let hl = self.cpu.get_rp(RP::HL);
                self.cpu.set_rp(RP::DE, hl);
                self.cpu.set_rp(RP::HL, de);
            }
            Op::Add(r) => {
                let v = self.read_r8(r);
                self.cpu.add8(v, 0);
            }
            Op::Adi => {
                self.cpu.add8(op.param.imm8(), 0);
            }
            Op::Adc(r) => {
                let v = self.read_r8(r);
                let carry = self.cpu.regs.flags.carry_val();
                self.cpu.add8(v, carry);
            }
            Op::Aci => {
                let carry = self.cpu.regs.flags.carry_val();
                self.cpu.add8(op.param.imm8(), carry);
            }
            Op::Sub(r) => {
                let v = self.read_r8(r);
                self.cpu.sub8(v, 0);
            }
            Op::Sui => {
                self.cpu.sub8(op.param.imm8(), 0);
            }
            Op::Sbb(r) => {
                let v = self.read_r8(r);
                let borrow = self.cpu.regs.flags.carry_val();
                self.cpu.sub8(v, borrow);
            }
            Op::Sbi => {
                let borrow = self.cpu.regs.flags.carry_val();
                self.cpu.sub8(op.param.imm8(), borrow);
            }
            Op::Inr(r) => {
                let v = self.read_r8(r);
                let res = self.cpu.inr8(v);
                self.write_r8(r, res);
            }
            Op::Dcr(r) => {
                let v = self.read_r8(r);
                let res = self.cpu.dcr8(v);
                self.write_r8(r, res);
            }
            Op::Inx(rp) => {
                let v = self.cpu.get_rp(rp).wrapping_add(1);
                self.cpu.set_rp(rp, v);
            }
            Op::Dcx(rp) => {
                let v = self.cpu.get_rp(rp).wrapping_sub(1);
                self.cpu.set_rp(rp, v);
            }
            Op::Dad(rp) => {
                let res = self.cpu.get_rp(RP::HL) as usize + self.cpu.get_rp(rp) as usize;
                self.cpu.regs.flags.set_carry_u16(res);
                self.cpu.set_rp(RP::HL, res as u16);
            }
            Op::Ana(r) => {
                let v = self.read_r8(r);
                self.cpu.and8(v);
            }
            Op::Ani => {
                self.cpu.and8(op.param.imm8());
            }
            Op::Xra(r) => {
                let v = self.read_r8(r);
                self.cpu.xor8(v);
            }
            Op::Xri => {
                self.cpu.xor8(op.param.imm8());
            }
            Op::Ora(r) => {
                let v = self.read_r8(r);
                self.cpu.or8(v);
            }
            Op::Ori => {
                self.cpu.or8(op.param.imm8());
            }
            Op::Cmp(r) => {
                let v = self.read_r8(r);
                self.cpu.cmp8(v, 0);
            }
            Op::Cpi => {
                self.cpu.cmp8(op.param.imm8(), 0);
            }
            Op::Rlc => {
                let a = self.cpu.regs.a;
                let hi = a >> 7;
                self.cpu.regs.a = a << 1 | hi;
                self.cpu.regs.flags.carry = hi != 0;
            }
            Op::Rrc => {
                let a = self.cpu.regs.a;
                let lo = a & 1;
                self.cpu.regs.a = a >> 1 | lo << 7;
                self.cpu.regs.flags.carry = lo != 0;
            }
            Op::Ral => {
                let a = self.cpu.regs.a;
                self.cpu.regs.a = a << 1 | self.cpu.regs.flags.carry_val() as u8;
                self.cpu.regs.flags.carry = a & 0x80 != 0;
            }
            Op::Rar => {
                let a = self.cpu.regs.a;
                self.cpu.regs.a = a >> 1 | (self.cpu.regs.flags.carry_val() as u8) << 7;
                self.cpu.regs.flags.carry = a & 1 != 0;
            }
            Op::Jmp => {
                self.cpu.regs.pc = op.param.imm16();
            }
            Op::Jcc(cond) => {
                if self.cpu.condition(cond) {
                    self.cpu.regs.pc = op.param.imm16();
                }
            }
            Op::Call => {
                let ret = self.cpu.regs.pc;
                self.cpu.push16(&mut self.memory, ret);
                self.cpu.regs.pc = op.param.imm16();
            }
            Op::Ccc(cond) => {
                if self.cpu.condition(cond) {
                    let ret = self.cpu.regs.pc;
                    self.cpu.push16(&mut self.memory, ret);
                    self.cpu.regs.pc = op.param.imm16();
                }
            }
            Op::Ret => {
                self.cpu.regs.pc = self.cpu.pop16(&self.memory);
            }
            Op::Rcc(cond) => {
                if self.cpu.condition(cond) {
                    self.cpu.regs.pc = self.cpu.pop16(&self.memory);
                }
            }
            Op::Rst(n) => {
                let ret = self.cpu.regs.pc;
                self.cpu.push16(&mut self.memory, ret);
                self.cpu.regs.pc = u16::from(n) * 8;
            }
            Op::Pchl => {
                self.cpu.regs.pc = self.cpu.get_rp(RP::HL);
            }
            Op::Sphl | Op::Xthl => {
                // both exchange HL with the word at (SP)
                let sp = self.cpu.regs.sp;
                let hl = self.cpu.get_rp(RP::HL);
                let tmp = self.memory.read_u16(sp);
                self.memory.write_u16(sp, hl);
                self.cpu.set_rp(RP::HL, tmp);
            }
            Op::Push(rp) => {
                let v = match rp {
                    // flags in the low byte, A in the high byte
                    RP::PSW => u16::from(self.cpu.regs.a) << 8 | u16::from(self.cpu.regs.flags.u8()),
                    _ => self.cpu.get_rp(rp),
                };
                self.cpu.push16(&mut self.memory, v);
            }
            Op::Pop(rp) => {
                let v = self.cpu.pop16(&self.memory);
                match rp {
                    RP::PSW => {
                        self.cpu.regs.flags.set_u8(v as u8);
                        self.cpu.regs.a = (v >> 8) as u8;
                    }
                    _ => self.cpu.set_rp(rp, v),
                }
            }
            Op::Hlt => {
                self.cpu.halt = true;
            }
            Op::Cma => {
                self.cpu.regs.a = !self.cpu.regs.a;
            }
            Op::Cmc => {
                self.cpu.regs.flags.carry = !self.cpu.regs.flags.carry;
            }
            Op::Stc => {
                self.cpu.regs.flags.carry = true;
            }
            Op::Daa => {
                self.cpu.daa();
            }
            Op::Ei => {
                self.cpu.int_enable = true;
            }
            Op::Di => {
                self.cpu.int_enable = false;
            }
            Op::In => {
                let port = op.param.imm8();
                self.cpu.regs.a = self.in_u8(port);
            }
            Op::Out => {
                let port = op.param.imm8();
                let data = self.cpu.regs.a;
                self.out_u8(port, data);
            }
            Op::Uninitialized | Op::Invalid(_) => unreachable!(),
        }
    }
}
