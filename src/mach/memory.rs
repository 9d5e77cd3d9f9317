use super::Address;

/// ## Block addressable backing store
///
/// The machine never touches memory directly. Every byte goes through
/// these three primitives so the store can live anywhere: a plain
/// vector, a serial RAM chip, a memory mapped file.
pub trait MemoryStore {
    /// Fill `dest` starting at `addr`.
    fn read_block(&self, addr: Address, dest: &mut [u8]);
    fn write_block(&mut self, addr: Address, src: &[u8]);
    /// Zero `len` bytes starting at `addr`. A length of zero clears 256.
    fn clear(&mut self, addr: Address, len: u8);
    /// Highest valid address.
    fn top(&self) -> Address;
}

/// A `MemoryStore` held in a vector.
#[derive(Debug)]
pub struct RamStore {
    ram: Vec<u8>,
}

impl RamStore {
    pub fn new(top: Address) -> RamStore {
        RamStore {
            ram: vec![0; top as usize + 1],
        }
    }
}

impl MemoryStore for RamStore {
    fn read_block(&self, addr: Address, dest: &mut [u8]) {
        let start = addr as usize;
        for (offset, byte) in dest.iter_mut().enumerate() {
            *byte = self.ram.get(start + offset).copied().unwrap_or(0);
        }
    }

    fn write_block(&mut self, addr: Address, src: &[u8]) {
        let start = addr as usize;
        for (offset, byte) in src.iter().enumerate() {
            if let Some(cell) = self.ram.get_mut(start + offset) {
                *cell = *byte;
            }
        }
    }

    fn clear(&mut self, addr: Address, len: u8) {
        let len = if len == 0 { 256 } else { len as usize };
        let start = (addr as usize).min(self.ram.len());
        let end = (start + len).min(self.ram.len());
        for cell in &mut self.ram[start..end] {
            *cell = 0;
        }
    }

    fn top(&self) -> Address {
        (self.ram.len() - 1) as Address
    }
}
