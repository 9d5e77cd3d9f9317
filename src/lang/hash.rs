use crc::{Crc, CRC_16_IBM_3740};

const NAME_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Value type carried in the two low bits of a variable hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    NoType = 0,
    Integer = 1,
    Float = 2,
    String = 3,
}

impl VarType {
    pub fn from_bits(bits: u32) -> VarType {
        match bits & 3 {
            1 => VarType::Integer,
            2 => VarType::Float,
            3 => VarType::String,
            _ => VarType::NoType,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            VarType::NoType => "",
            VarType::Integer => "%",
            VarType::Float => "!",
            VarType::String => "$",
        }
    }
}

/// ## Structural fingerprint of a variable name
///
/// ```text
/// bits  0..2   type
/// bits  2..7   first letter - 'A'
/// bits  7..13  last character - '0'
/// bits 13..16  name length - 1
/// bits 16..32  CRC-16 of the characters between first and last
/// ```
///
/// Names that agree in all of these fields are the same variable.
/// Zero never identifies a variable; it marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarHash(pub u32);

impl VarHash {
    pub const EMPTY: VarHash = VarHash(0);

    /// Hash an upper case name. The type of an array or variable token is
    /// `token - NOTYPE_VAR` masked to two bits.
    pub fn new(var_type: VarType, name: &[u8]) -> VarHash {
        if name.is_empty() {
            return VarHash::EMPTY;
        }
        let last = name.len() - 1;
        let crc = if last > 1 {
            NAME_CRC.checksum(&name[1..last]) as u32
        } else {
            0xFFFF
        };
        let first = (name[0].wrapping_sub(b'A') as u32) & 0x1F;
        let last_char = (name[last].wrapping_sub(b'0') as u32) & 0x3F;
        let len = (last as u32) & 0x07;
        VarHash(var_type as u32 | first << 2 | last_char << 7 | len << 13 | crc << 16)
    }

    pub fn var_type(self) -> VarType {
        VarType::from_bits(self.0)
    }

    /// Index into the per-letter default type table.
    pub fn first_letter(self) -> usize {
        ((self.0 >> 2) & 0x1F) as usize
    }

    pub fn with_type(self, var_type: VarType) -> VarHash {
        VarHash((self.0 & !3) | var_type as u32)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn from_bytes(bytes: [u8; 4]) -> VarHash {
        VarHash(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let hash = VarHash::new(VarType::String, b"NAME");
        assert_eq!(hash.var_type(), VarType::String);
        assert_eq!(hash.first_letter(), (b'N' - b'A') as usize);
        assert_eq!(hash.with_type(VarType::Integer).var_type(), VarType::Integer);
        assert_eq!(VarHash::from_bytes(hash.to_bytes()), hash);
        assert!(VarHash::new(VarType::NoType, b"").is_empty());
        assert!(!VarHash::new(VarType::NoType, b"A").is_empty());
    }

    #[test]
    fn test_names_that_differ() {
        let a = VarHash::new(VarType::Float, b"COUNT");
        assert_eq!(a, VarHash::new(VarType::Float, b"COUNT"));
        assert_ne!(a, VarHash::new(VarType::Float, b"CLINT"));
        assert_ne!(a, VarHash::new(VarType::Float, b"COUNTT"));
        assert_ne!(a, VarHash::new(VarType::Integer, b"COUNT"));
        assert_ne!(VarHash::new(VarType::Float, b"A1"), VarHash::new(VarType::Float, b"A2"));
    }
}
