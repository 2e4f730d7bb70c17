#[cfg(test)]
#[path = "./flag_test.rs"]
mod flag_test;

/// the five 8080 condition flags
#[derive(Clone, Default)]
pub struct Flags {
    pub carry: bool,
    pub aux_carry: bool,
    pub sign: bool,
    pub zero: bool,
    pub parity: bool,
}

// bit positions in the byte pushed by push psw / restored by pop psw
const PSW_SIGN: u8 = 0x01;
const PSW_ZERO: u8 = 0x02;
const PSW_AUX: u8 = 0x08;
const PSW_PARITY: u8 = 0x20;
const PSW_CARRY: u8 = 0x80;

static PARITY_LOOKUP: [u8; 256] = [
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0,
    1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 0, 1, 0, 0, 1,
];

impl Flags {
    pub fn set_sign(&mut self, v: usize) {
        // the most-significant bit of the 8-bit result
        self.sign = v & 0x80 != 0;
    }

    pub fn set_zero(&mut self, v: usize) {
        self.zero = v.trailing_zeros() >= 8;
    }

    pub fn set_parity(&mut self, v: usize) {
        // set if the low byte of the result contains an even number
        // of 1 bits (zero included), cleared otherwise
        self.parity = PARITY_LOOKUP[v & 0xFF] != 0;
    }

    /// sets sign, zero and parity from the low byte of `v`
    pub fn set_szp(&mut self, v: usize) {
        self.set_sign(v);
        self.set_zero(v);
        self.set_parity(v);
    }

    pub fn set_carry_u8(&mut self, res: usize) {
        self.carry = res & 0x100 != 0;
    }

    pub fn set_carry_u16(&mut self, res: usize) {
        self.carry = res & 0x1_0000 != 0;
    }

    pub fn set_aux(&mut self, res: usize, v1: usize, v2: usize) {
        // carry or borrow out of bit 3, used by daa.
        // subtraction feeds the two's complement of its operand through
        // v2 so the same expression covers both directions
        self.aux_carry = (res ^ (v1 ^ v2)) & 0x10 != 0;
    }

    pub fn carry_val(&self) -> usize {
        if self.carry {
            1
        } else {
            0
        }
    }

    /// packs the flags into the byte layout used by push psw:
    /// sign=bit0, zero=bit1, aux=bit3, parity=bit5, carry=bit7.
    /// the remaining bits always transmit as zero
    pub fn u8(&self) -> u8 {
        let mut val = 0 as u8;
        if self.sign {
            val |= PSW_SIGN;
        }
        if self.zero {
            val |= PSW_ZERO;
        }
        if self.aux_carry {
            val |= PSW_AUX;
        }
        if self.parity {
            val |= PSW_PARITY;
        }
        if self.carry {
            val |= PSW_CARRY;
        }
        val
    }

    /// restores the flags from a byte in the push psw layout,
    /// ignoring the unassigned bits
    pub fn set_u8(&mut self, val: u8) {
        self.sign = val & PSW_SIGN != 0;
        self.zero = val & PSW_ZERO != 0;
        self.aux_carry = val & PSW_AUX != 0;
        self.parity = val & PSW_PARITY != 0;
        self.carry = val & PSW_CARRY != 0;
    }

    pub fn carry_numeric(&self) -> u8 {
        if self.carry { 1 } else { 0 }
    }

    pub fn zero_numeric(&self) -> u8 {
        if self.zero { 1 } else { 0 }
    }

    pub fn sign_numeric(&self) -> u8 {
        if self.sign { 1 } else { 0 }
    }

    pub fn parity_numeric(&self) -> u8 {
        if self.parity { 1 } else { 0 }
    }

    pub fn aux_numeric(&self) -> u8 {
        if self.aux_carry { 1 } else { 0 }
    }
}
