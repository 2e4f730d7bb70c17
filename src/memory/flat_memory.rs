use crate::hex::hex_bytes_separated;

#[cfg(test)]
#[path = "./flat_memory_test.rs"]
mod flat_memory_test;

const DEBUG_MEMORY: bool = false;

/// the full 8080 address space
pub const MEMORY_SIZE: usize = 0x1_0000;

/// flat 64k memory. addresses wrap at 0xFFFF like the 8080 address bus,
/// so a 16-bit access at 0xFFFF touches 0xFFFF and 0x0000
#[derive(Clone)]
pub struct FlatMemory {
    pub data: Vec<u8>,
}

impl FlatMemory {
    pub fn new() -> Self {
        FlatMemory { data: vec![0u8; MEMORY_SIZE] }
    }

    pub fn read_u8(&self, addr: u16) -> u8 {
        let val = self.data[addr as usize];
        if DEBUG_MEMORY {
            println!("read_u8 from {:04x} = {:02x}", addr, val);
        }
        val
    }

    pub fn read_u16(&self, addr: u16) -> u16 {
        u16::from(self.read_u8(addr.wrapping_add(1))) << 8 | u16::from(self.read_u8(addr))
    }

    pub fn write_u8(&mut self, addr: u16, data: u8) {
        if DEBUG_MEMORY {
            println!("write_u8 to {:04x} = {:02x}", addr, data);
        }
        self.data[addr as usize] = data;
    }

    pub fn write_u16(&mut self, addr: u16, data: u16) {
        self.write_u8(addr, data as u8);
        self.write_u8(addr.wrapping_add(1), (data >> 8) as u8);
    }

    /// reads a sequence of data from memory
    pub fn read(&self, addr: u16, length: usize) -> Vec<u8> {
        (0..length).map(|i| self.read_u8(addr.wrapping_add(i as u16))).collect()
    }

    /// borrows a region of memory, used by the renderer to scan vram.
    /// the region must not straddle the end of the address space
    pub fn slice(&self, addr: u16, length: usize) -> &[u8] {
        let addr = addr as usize;
        &self.data[addr..addr + length]
    }

    /// writes a sequence of data to memory
    pub fn write(&mut self, addr: u16, data: &[u8]) {
        if DEBUG_MEMORY {
            println!("write to {:04x} in {} bytes: {}", addr, data.len(), hex_bytes_separated(data, ' '));
        }
        for (i, b) in data.iter().enumerate() {
            self.data[addr.wrapping_add(i as u16) as usize] = *b;
        }
    }
}
