use super::{Address, Memory, StrRef, Val, SIZE_CLASSES};
use crate::error;
use crate::lang::{Error, VarType};
use log::{debug, trace};

type Result<T> = std::result::Result<T, Error>;

/// Bytes a block of size class `class` occupies, control byte included.
fn block_len(class: u8) -> u16 {
    (class as u16 + 1) * 16 + 1
}

/// ## String heap
///
/// Durable strings live in blocks carved downward from the command line
/// buffer. A block is a control byte holding its size class followed by
/// 16 to 256 data bytes. Free blocks are chained per class in descending
/// address order; the link lives in the first two data bytes.
///
/// Temporary strings are bump allocated above the control stack and
/// abandoned at the start of every statement.
impl Memory {
    /// Abandon every temporary string.
    pub fn temp_reset(&mut self) {
        let l = self.layout_mut();
        l.temp_top = l.gosub_top;
    }

    pub fn temp_alloc(&mut self, len: usize) -> Result<Address> {
        if len == 0 {
            return Ok(0);
        }
        let l = self.layout();
        let addr = l.temp_top;
        if addr as usize + len >= l.string_bot as usize {
            self.temp_reset();
            return Err(error!(InsufficientMemory));
        }
        self.layout_mut().temp_top += len as u16;
        Ok(addr)
    }

    /// Copy bytes into a new temporary string.
    pub fn temp_string(&mut self, bytes: &[u8]) -> Result<StrRef> {
        if bytes.len() > u8::MAX as usize {
            return Err(error!(StringTooLong));
        }
        let addr = self.temp_alloc(bytes.len())?;
        if addr != 0 {
            self.stream.write_block(addr, bytes);
        }
        Ok(StrRef::new(addr, bytes.len() as u8))
    }

    pub fn string_bytes(&self, s: StrRef) -> Vec<u8> {
        let mut v = vec![0; s.len as usize];
        if s.addr != 0 {
            self.stream.read_block(s.addr, &mut v);
        }
        v
    }

    /// Strings that live in program text are never freed or resized.
    pub fn is_constant(&self, addr: Address) -> bool {
        addr > 0 && addr < self.layout().var_start
    }

    fn in_heap(&self, data: Address) -> bool {
        let l = self.layout();
        data > l.string_bot && data < l.cmd_line
    }

    /// Allocate a block of `class` and return its data address.
    pub fn string_alloc(&mut self, class: u8) -> Result<Address> {
        let class = class.min(SIZE_CLASSES as u8 - 1);
        let head = self.free_lists[class as usize];
        if head != 0 {
            self.free_lists[class as usize] = self.stream.read_word_at(head + 1);
            trace!("string block {:04X} class {} reused", head, class);
            return Ok(head + 1);
        }
        let len = block_len(class);
        let l = self.layout();
        if l.string_bot as u32 <= l.temp_top as u32 + len as u32 {
            return Err(error!(InsufficientMemory));
        }
        let ctrl = l.string_bot - len;
        self.layout_mut().string_bot = ctrl;
        self.stream.write(ctrl, class);
        trace!("string block {:04X} class {} carved", ctrl, class);
        Ok(ctrl + 1)
    }

    /// Release the block holding `data`. Addresses outside the heap are
    /// ignored.
    pub fn string_free(&mut self, data: Address) {
        if !self.in_heap(data) {
            return;
        }
        let ctrl = data - 1;
        let class = self.stream.read(ctrl);
        if class as usize >= SIZE_CLASSES {
            debug!("string block {:04X} has bad class {}", ctrl, class);
            return;
        }
        if ctrl == self.layout().string_bot {
            self.layout_mut().string_bot += block_len(class);
            return;
        }
        let list = class as usize;
        let mut prev: Address = 0;
        let mut next = self.free_lists[list];
        while next != 0 && next > ctrl {
            prev = next;
            next = self.stream.read_word_at(next + 1);
        }
        self.stream.write_word(ctrl + 1, next);
        if prev == 0 {
            self.free_lists[list] = ctrl;
        } else {
            self.stream.write_word(prev + 1, ctrl);
        }
    }

    /// Resize the string at `data` to hold `len` bytes. Contents are not
    /// preserved. Returns the new data address, zero for an empty string.
    pub fn string_realloc(&mut self, data: Address, len: u8) -> Result<Address> {
        if len == 0 {
            self.string_free(data);
            return Ok(0);
        }
        let wanted = len / 16;
        if !self.in_heap(data) {
            return self.string_alloc(wanted);
        }
        let class = self.stream.read(data - 1);
        if class as usize >= SIZE_CLASSES {
            return Err(error!(InternalError; "CORRUPT STRING BLOCK"));
        }
        if wanted <= class {
            let head = self.free_lists[wanted as usize];
            if head > data {
                self.string_free(data);
                return self.string_alloc(wanted);
            }
            return Ok(data);
        }
        self.string_free(data);
        self.string_alloc(wanted)
    }

    /// Store `new` in the string slot at `slot`, reusing or replacing
    /// whatever buffer the slot owned. Constants are shared, anything
    /// else is copied into the heap.
    pub fn store_string(&mut self, slot: Address, new: StrRef) -> Result<()> {
        let old = match Val::from_bytes(VarType::String, self.stream.read_long_at(slot)) {
            Val::String(s) => s,
            _ => StrRef::NULL,
        };
        if old == new {
            return Ok(());
        }
        let stored = if self.is_constant(new.addr) || new.len == 0 {
            self.string_free(old.addr);
            new
        } else {
            let bytes = self.string_bytes(new);
            let addr = self.string_realloc(old.addr, new.len)?;
            self.stream.write_block(addr, &bytes);
            StrRef::new(addr, new.len)
        };
        self.stream.write_block(slot, &Val::String(stored).to_bytes());
        Ok(())
    }

    /// Head of the free list for `class`, zero when empty.
    pub fn free_list_head(&self, class: usize) -> Address {
        self.free_lists.get(class).copied().unwrap_or(0)
    }
}
