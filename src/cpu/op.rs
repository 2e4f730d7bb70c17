use std::fmt;

use crate::cpu::register::{R8, RP};

/// 3-bit condition selector shared by the conditional jump, call
/// and return encodings
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Cond {
    NZ, Z, NC, C, PO, PE, P, M
}

impl Cond {
    pub fn from_bits(sel: u8) -> Cond {
        match sel {
            0 => Cond::NZ,
            1 => Cond::Z,
            2 => Cond::NC,
            3 => Cond::C,
            4 => Cond::PO,
            5 => Cond::PE,
            6 => Cond::P,
            7 => Cond::M,
            _ => unreachable!(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cond::NZ => "nz",
            Cond::Z => "z",
            Cond::NC => "nc",
            Cond::C => "c",
            Cond::PO => "po",
            Cond::PE => "pe",
            Cond::P => "p",
            Cond::M => "m",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Uninitialized,

    /// sentinel for opcode bytes without a table entry
    Invalid(u8),

    Nop,

    Mov(R8, R8),
    Mvi(R8),
    Lxi(RP),
    Lda,
    Sta,
    Lhld,
    Shld,
    Ldax(RP),
    Stax(RP),

    /// swaps DE and HL
    Xchg,

    Add(R8), Adi,
    Adc(R8), Aci,
    Sub(R8), Sui,
    Sbb(R8), Sbi,

    Inr(R8), Dcr(R8),
    Inx(RP), Dcx(RP),

    /// adds a register pair to HL, only touches carry
    Dad(RP),

    Ana(R8), Ani,
    Xra(R8), Xri,
    Ora(R8), Ori,
    Cmp(R8), Cpi,

    /// Rotate Accumulator Left
    Rlc,

    /// Rotate Accumulator Right
    Rrc,

    /// Rotate Accumulator Left Through Carry
    Ral,

    /// Rotate Accumulator Right Through Carry
    Rar,

    Jmp,
    Jcc(Cond),
    Call,
    Ccc(Cond),
    Ret,
    Rcc(Cond),

    /// one-byte call to vector 8*n, also the interrupt entry
    Rst(u8),

    /// PC = HL
    Pchl,

    /// exchanges HL with the word at (SP)
    Sphl,

    Push(RP),
    Pop(RP),

    /// exchanges HL with the word at (SP)
    Xthl,

    Hlt,

    /// Complement Accumulator
    Cma,

    /// Complement Carry Flag
    Cmc,

    /// Set Carry Flag
    Stc,

    /// Decimal Adjust Accumulator
    Daa,

    Ei,
    Di,

    In,
    Out,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Uninitialized => write!(f, "(uninitialized)"),
            Op::Invalid(b) => write!(f, "(invalid {:02X})", b),
            Op::Nop => write!(f, "nop"),
            Op::Mov(dst, src) => write!(f, "mov {}, {}", dst.as_str(), src.as_str()),
            Op::Mvi(r) => write!(f, "mvi {}", r.as_str()),
            Op::Lxi(rp) => write!(f, "lxi {}", rp.as_str()),
            Op::Lda => write!(f, "lda"),
            Op::Sta => write!(f, "sta"),
            Op::Lhld => write!(f, "lhld"),
            Op::Shld => write!(f, "shld"),
            Op::Ldax(rp) => write!(f, "ldax {}", rp.as_str()),
            Op::Stax(rp) => write!(f, "stax {}", rp.as_str()),
            Op::Xchg => write!(f, "xchg"),
            Op::Add(r) => write!(f, "add {}", r.as_str()),
            Op::Adi => write!(f, "adi"),
            Op::Adc(r) => write!(f, "adc {}", r.as_str()),
            Op::Aci => write!(f, "aci"),
            Op::Sub(r) => write!(f, "sub {}", r.as_str()),
            Op::Sui => write!(f, "sui"),
            Op::Sbb(r) => write!(f, "sbb {}", r.as_str()),
            Op::Sbi => write!(f, "sbi"),
            Op::Inr(r) => write!(f, "inr {}", r.as_str()),
            Op::Dcr(r) => write!(f, "dcr {}", r.as_str()),
            Op::Inx(rp) => write!(f, "inx {}", rp.as_str()),
            Op::Dcx(rp) => write!(f, "dcx {}", rp.as_str()),
            Op::Dad(rp) => write!(f, "dad {}", rp.as_str()),
            Op::Ana(r) => write!(f, "ana {}", r.as_str()),
            Op::Ani => write!(f, "ani"),
            Op::Xra(r) => write!(f, "xra {}", r.as_str()),
            Op::Xri => write!(f, "xri"),
            Op::Ora(r) => write!(f, "ora {}", r.as_str()),
            Op::Ori => write!(f, "ori"),
            Op::Cmp(r) => write!(f, "cmp {}", r.as_str()),
            Op::Cpi => write!(f, "cpi"),
            Op::Rlc => write!(f, "rlc"),
            Op::Rrc => write!(f, "rrc"),
            Op::Ral => write!(f, "ral"),
            Op::Rar => write!(f, "rar"),
            Op::Jmp => write!(f, "jmp"),
            Op::Jcc(cond) => write!(f, "j{}", cond.as_str()),
            Op::Call => write!(f, "call"),
            Op::Ccc(cond) => write!(f, "c{}", cond.as_str()),
            Op::Ret => write!(f, "ret"),
            Op::Rcc(cond) => write!(f, "r{}", cond.as_str()),
            Op::Rst(n) => write!(f, "rst {}", n),
            Op::Pchl => write!(f, "pchl"),
            Op::Sphl => write!(f, "sphl"),
            Op::Push(rp) => write!(f, "push {}", rp.as_str()),
            Op::Pop(rp) => write!(f, "pop {}", rp.as_str()),
            Op::Xthl => write!(f, "xthl"),
            Op::Hlt => write!(f, "hlt"),
            Op::Cma => write!(f, "cma"),
            Op::Cmc => write!(f, "cmc"),
            Op::Stc => write!(f, "stc"),
            Op::Daa => write!(f, "daa"),
            Op::Ei => write!(f, "ei"),
            Op::Di => write!(f, "di"),
            Op::In => write!(f, "in"),
            Op::Out => write!(f, "out"),
        }
    }
}
