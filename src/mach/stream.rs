use super::{Address, MemoryStore};
use log::trace;

/// Bytes held by the sliding read window.
pub const WINDOW: usize = 64;

/// ## Cached access to the memory store
///
/// Token streams are read sequentially through a 64 byte window. Random
/// reads and writes go straight to the store; a write that overlaps the
/// window marks it dirty so the next sequential read refills it.
pub struct StreamCache {
    store: Box<dyn MemoryStore>,
    window: [u8; WINDOW],
    base: Address,
    index: usize,
    valid: bool,
}

impl std::fmt::Debug for StreamCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StreamCache {{ base: {:04X}, index: {} }}", self.base, self.index)
    }
}

impl StreamCache {
    pub fn new(store: Box<dyn MemoryStore>) -> StreamCache {
        StreamCache {
            store,
            window: [0; WINDOW],
            base: 0,
            index: 0,
            valid: false,
        }
    }

    pub fn top(&self) -> Address {
        self.store.top()
    }

    fn fill(&mut self, addr: Address) {
        self.store.read_block(addr, &mut self.window);
        self.base = addr;
        self.index = 0;
        self.valid = true;
    }

    fn overlaps(&self, addr: Address, len: usize) -> bool {
        let start = addr as usize;
        let base = self.base as usize;
        start < base + WINDOW && base < start + len
    }

    /// Move the read cursor. The window is reused when it already
    /// covers `addr`.
    pub fn set_position(&mut self, addr: Address) {
        if self.valid && addr >= self.base && ((addr - self.base) as usize) < WINDOW {
            self.index = (addr - self.base) as usize;
        } else {
            self.fill(addr);
        }
    }

    /// Address of the next byte `read_byte` returns.
    pub fn position(&self) -> Address {
        self.base.wrapping_add(self.index as Address)
    }

    pub fn read_byte(&mut self) -> u8 {
        if !self.valid || self.index >= WINDOW {
            let next = self.position();
            self.fill(next);
        }
        let byte = self.window[self.index];
        self.index += 1;
        byte
    }

    pub fn peek_byte(&mut self) -> u8 {
        if !self.valid || self.index >= WINDOW {
            let next = self.position();
            self.fill(next);
        }
        self.window[self.index]
    }

    pub fn skip(&mut self, len: usize) {
        let next = self.position().wrapping_add(len as Address);
        self.set_position(next);
    }

    pub fn read_word(&mut self) -> u16 {
        let hi = self.read_byte();
        let lo = self.read_byte();
        u16::from_be_bytes([hi, lo])
    }

    pub fn read_long(&mut self) -> [u8; 4] {
        [
            self.read_byte(),
            self.read_byte(),
            self.read_byte(),
            self.read_byte(),
        ]
    }

    pub fn read(&self, addr: Address) -> u8 {
        let mut byte = [0u8];
        self.store.read_block(addr, &mut byte);
        byte[0]
    }

    pub fn read_word_at(&self, addr: Address) -> u16 {
        let mut bytes = [0u8; 2];
        self.store.read_block(addr, &mut bytes);
        u16::from_be_bytes(bytes)
    }

    pub fn read_long_at(&self, addr: Address) -> [u8; 4] {
        let mut bytes = [0u8; 4];
        self.store.read_block(addr, &mut bytes);
        bytes
    }

    pub fn read_block(&self, addr: Address, dest: &mut [u8]) {
        self.store.read_block(addr, dest);
    }

    pub fn write(&mut self, addr: Address, byte: u8) {
        self.write_block(addr, &[byte]);
    }

    pub fn write_word(&mut self, addr: Address, word: u16) {
        self.write_block(addr, &word.to_be_bytes());
    }

    pub fn write_block(&mut self, addr: Address, src: &[u8]) {
        if self.overlaps(addr, src.len()) {
            self.valid = false;
        }
        self.store.write_block(addr, src);
    }

    /// Zero `len` bytes, any length.
    pub fn clear(&mut self, addr: Address, len: usize) {
        if len == 0 {
            return;
        }
        if self.overlaps(addr, len) {
            self.valid = false;
        }
        let mut at = addr as usize;
        let mut left = len;
        while left > 0 {
            let chunk = left.min(256);
            self.store.clear(at as Address, if chunk == 256 { 0 } else { chunk as u8 });
            at += chunk;
            left -= chunk;
        }
    }

    /// Copy `len` bytes from `src` to `dest` in window sized chunks.
    /// Overlapping ranges are safe in either direction.
    pub fn mem_move(&mut self, dest: Address, src: Address, len: usize) {
        if len == 0 || dest == src {
            return;
        }
        trace!("move {} bytes {:04X} -> {:04X}", len, src, dest);
        let mut chunk = [0u8; WINDOW];
        let (dest, src) = (dest as usize, src as usize);
        if dest < src {
            let mut done = 0;
            while done < len {
                let n = (len - done).min(WINDOW);
                self.store.read_block((src + done) as Address, &mut chunk[..n]);
                self.write_block((dest + done) as Address, &chunk[..n]);
                done += n;
            }
        } else {
            let mut left = len;
            while left > 0 {
                let n = left.min(WINDOW);
                left -= n;
                self.store.read_block((src + left) as Address, &mut chunk[..n]);
                self.write_block((dest + left) as Address, &chunk[..n]);
            }
        }
    }
}
