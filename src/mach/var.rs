use super::{Address, Memory, Region, Val};
use crate::error;
use crate::lang::{Error, VarHash, VarType};
use log::debug;

type Result<T> = std::result::Result<T, Error>;

/// Bytes in a simple variable slot: hash then value.
pub const SLOT_LEN: u16 = 8;

/// ## Symbol tables
///
/// Simple variables are eight byte `[hash][value]` slots from
/// `var_start` to `dim_start`; the first zero hash ends a scan.
///
/// Arrays follow, each laid out as
/// `[hash][size][ndims][bound]*ndims[element]*` where `size` counts every
/// byte after the hash and each bound is the inclusive upper subscript.
/// Elements are stored row major with the last subscript varying fastest.
impl Memory {
    /// Give an untyped name the type its first letter defaults to.
    pub fn resolve(&self, hash: VarHash) -> VarHash {
        if hash.var_type() == VarType::NoType {
            hash.with_type(self.def_type(hash.first_letter()))
        } else {
            hash
        }
    }

    /// Value address of a simple variable.
    pub fn find_var(&self, hash: VarHash) -> Option<Address> {
        let end = self.layout().dim_start;
        let mut addr = self.layout().var_start;
        while addr < end {
            let found = VarHash::from_bytes(self.stream.read_long_at(addr));
            if found.is_empty() {
                break;
            }
            if found == hash {
                return Some(addr + 4);
            }
            addr += SLOT_LEN;
        }
        None
    }

    /// Value address of a simple variable, creating it when missing.
    pub fn var_for_assign(&mut self, hash: VarHash) -> Result<Address> {
        if hash.is_empty() {
            return Err(error!(InternalError; "EMPTY VARIABLE HASH"));
        }
        let end = self.layout().dim_start;
        let mut addr = self.layout().var_start;
        while addr < end {
            let found = VarHash::from_bytes(self.stream.read_long_at(addr));
            if found == hash {
                return Ok(addr + 4);
            }
            if found.is_empty() {
                break;
            }
            addr += SLOT_LEN;
        }
        if addr >= end {
            self.grow(Region::Variables, end, self.var_batch * SLOT_LEN)?;
            debug!("variable table grown by {} slots", self.var_batch);
        }
        self.stream.write_block(addr, &hash.to_bytes());
        self.stream.write_block(addr + 4, &[0; 4]);
        Ok(addr + 4)
    }

    pub fn read_val(&self, addr: Address, var_type: VarType) -> Val {
        Val::from_bytes(var_type, self.stream.read_long_at(addr))
    }

    /// Write a value of matching type. Strings are stored through the
    /// heap so the slot keeps owning its buffer.
    pub fn write_val(&mut self, addr: Address, val: Val) -> Result<()> {
        match val {
            Val::String(s) => self.store_string(addr, s),
            _ => {
                self.stream.write_block(addr, &val.to_bytes());
                Ok(())
            }
        }
    }

    /// Address just past the hash of an array.
    pub fn find_array(&self, hash: VarHash) -> Option<Address> {
        let end = self.layout().gosub_bot;
        let mut addr = self.layout().dim_start;
        while addr < end {
            let found = VarHash::from_bytes(self.stream.read_long_at(addr));
            if found.is_empty() {
                break;
            }
            if found == hash {
                return Some(addr + 4);
            }
            addr += 4 + self.stream.read_word_at(addr + 4);
        }
        None
    }

    /// Create an array with the given inclusive upper bounds.
    pub fn create_array(&mut self, hash: VarHash, bounds: &[i32]) -> Result<Address> {
        if bounds.is_empty() || bounds.len() > u8::MAX as usize {
            return Err(error!(SubscriptOutOfRange));
        }
        let mut elements: u32 = 1;
        for &bound in bounds {
            if bound < 0 || bound > self.max_subscript {
                return Err(error!(ParameterError));
            }
            elements = elements.saturating_mul(bound as u32 + 1);
        }
        let size = elements
            .saturating_mul(4)
            .saturating_add(3 + 2 * bounds.len() as u32);
        if size + 4 > self.bytes_free() as u32 {
            return Err(error!(InsufficientMemory));
        }
        let at = self.layout().gosub_bot;
        self.grow(Region::Arrays, at, size as u16 + 4)?;
        let mut header = hash.to_bytes().to_vec();
        header.extend_from_slice(&(size as u16).to_be_bytes());
        header.push(bounds.len() as u8);
        for &bound in bounds {
            header.extend_from_slice(&(bound as u16).to_be_bytes());
        }
        self.stream.write_block(at, &header);
        debug!("array of {} elements at {:04X}", elements, at);
        Ok(at + 4)
    }

    /// Remove an array, releasing any strings it owned.
    pub fn delete_array(&mut self, base: Address) {
        let size = self.stream.read_word_at(base);
        let hash = VarHash::from_bytes(self.stream.read_long_at(base - 4));
        if hash.var_type() == VarType::String {
            let ndims = self.stream.read(base + 2) as Address;
            let first = base + 3 + 2 * ndims;
            let mut addr = first;
            while addr < base + size {
                if let Val::String(s) = self.read_val(addr, VarType::String) {
                    self.string_free(s.addr);
                }
                addr += 4;
            }
        }
        self.shrink(Region::Arrays, base - 4, size + 4);
    }

    pub fn array_type(&self, base: Address) -> VarType {
        VarHash::from_bytes(self.stream.read_long_at(base - 4)).var_type()
    }

    /// Address of one element.
    pub fn element_address(&self, base: Address, subscripts: &[i32]) -> Result<Address> {
        let ndims = self.stream.read(base + 2) as usize;
        if subscripts.len() != ndims {
            return Err(error!(SubscriptOutOfRange));
        }
        let mut offset: u32 = 0;
        for (i, &sub) in subscripts.iter().enumerate() {
            let bound = self.stream.read_word_at(base + 3 + 2 * i as Address) as i32;
            if sub < 0 || sub > bound {
                return Err(error!(SubscriptOutOfRange));
            }
            offset = offset * (bound as u32 + 1) + sub as u32;
        }
        Ok(base + 3 + 2 * ndims as Address + 4 * offset as Address)
    }
}
