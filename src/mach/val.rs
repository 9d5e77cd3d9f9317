use super::Address;
use crate::lang::VarType;

/// A string by reference: where the bytes are and how many.
/// The null string is address zero, length zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrRef {
    pub addr: Address,
    pub len: u8,
}

impl StrRef {
    pub const NULL: StrRef = StrRef { addr: 0, len: 0 };

    pub fn new(addr: Address, len: u8) -> StrRef {
        if len == 0 {
            StrRef::NULL
        } else {
            StrRef { addr, len }
        }
    }
}

/// ## Runtime values
///
/// Every value fits the four byte slot of a variable or array element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Val {
    Integer(i32),
    Float(f32),
    String(StrRef),
}

impl Val {
    pub const TRUE: Val = Val::Integer(-1);
    pub const FALSE: Val = Val::Integer(0);

    pub fn from_bool(b: bool) -> Val {
        if b {
            Val::TRUE
        } else {
            Val::FALSE
        }
    }

    /// Zero value of a slot type.
    pub fn zero(var_type: VarType) -> Val {
        match var_type {
            VarType::Integer => Val::Integer(0),
            VarType::String => Val::String(StrRef::NULL),
            VarType::Float | VarType::NoType => Val::Float(0.0),
        }
    }

    pub fn var_type(&self) -> VarType {
        match self {
            Val::Integer(_) => VarType::Integer,
            Val::Float(_) => VarType::Float,
            Val::String(_) => VarType::String,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }

    /// Decode a four byte slot.
    pub fn from_bytes(var_type: VarType, bytes: [u8; 4]) -> Val {
        match var_type {
            VarType::Integer => Val::Integer(i32::from_be_bytes(bytes)),
            VarType::String => Val::String(StrRef::new(
                u16::from_be_bytes([bytes[0], bytes[1]]),
                bytes[2],
            )),
            VarType::Float | VarType::NoType => {
                Val::Float(f32::from_bits(u32::from_be_bytes(bytes)))
            }
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        match self {
            Val::Integer(n) => n.to_be_bytes(),
            Val::Float(n) => n.to_bits().to_be_bytes(),
            Val::String(s) => {
                let [hi, lo] = s.addr.to_be_bytes();
                [hi, lo, s.len, 0]
            }
        }
    }
}
