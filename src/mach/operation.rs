use super::Val;
use crate::error;
use crate::lang::{Error, VarType};

type Result<T> = std::result::Result<T, Error>;

/// ## Numeric operators
///
/// Mixed operands promote to float. Integer arithmetic is checked and
/// raises `ARITHMETIC OVERFLOW` rather than wrapping. Strings are
/// rejected here; the evaluator handles string `+` and comparisons.
pub struct Operation {}

fn floats(lhs: Val, rhs: Val) -> Result<Option<(f32, f32)>> {
    use Val::*;
    match (lhs, rhs) {
        (Integer(_), Integer(_)) => Ok(None),
        (Integer(l), Float(r)) => Ok(Some((l as f32, r))),
        (Float(l), Integer(r)) => Ok(Some((l, r as f32))),
        (Float(l), Float(r)) => Ok(Some((l, r))),
        _ => Err(error!(TypeConflict)),
    }
}

fn int(val: Val) -> Result<i32> {
    match val {
        Val::Integer(n) => Ok(n),
        Val::Float(n) => Ok(n as i32),
        Val::String(_) => Err(error!(TypeConflict)),
    }
}

fn checked(n: Option<i32>) -> Result<Val> {
    match n {
        Some(n) => Ok(Val::Integer(n)),
        None => Err(error!(Overflow)),
    }
}

impl Operation {
    /// Coerce a value to the type of a slot.
    pub fn convert(val: Val, var_type: VarType) -> Result<Val> {
        use Val::*;
        match (var_type, val) {
            (VarType::Integer, Float(n)) => Ok(Integer(n as i32)),
            (VarType::Float, Integer(n)) => Ok(Float(n as f32)),
            (VarType::String, String(_)) => Ok(val),
            (VarType::String, _) | (_, String(_)) => Err(error!(TypeConflict)),
            _ => Ok(val),
        }
    }

    pub fn is_positive(val: Val) -> bool {
        match val {
            Val::Integer(n) => n > 0,
            Val::Float(n) => n > 0.0,
            Val::String(_) => false,
        }
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<bool> {
        Ok(Operation::compare(lhs, rhs)? != std::cmp::Ordering::Greater)
    }

    /// Numeric ordering. NaN compares equal to everything.
    pub fn compare(lhs: Val, rhs: Val) -> Result<std::cmp::Ordering> {
        match floats(lhs, rhs)? {
            Some((l, r)) => Ok(l.partial_cmp(&r).unwrap_or(std::cmp::Ordering::Equal)),
            None => Ok(int(lhs)?.cmp(&int(rhs)?)),
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => checked(n.checked_neg()),
            Val::Float(n) => Ok(Val::Float(-n)),
            Val::String(_) => Err(error!(TypeConflict)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Integer(!int(val)?))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(int(lhs)? & int(rhs)?))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(int(lhs)? | int(rhs)?))
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((l, r)) => Ok(Val::Float(l + r)),
            None => checked(int(lhs)?.checked_add(int(rhs)?)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((l, r)) => Ok(Val::Float(l - r)),
            None => checked(int(lhs)?.checked_sub(int(rhs)?)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((l, r)) => Ok(Val::Float(l * r)),
            None => checked(int(lhs)?.checked_mul(int(rhs)?)),
        }
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((_, r)) if r == 0.0 => Err(error!(DivisionByZero)),
            Some((l, r)) => Ok(Val::Float(l / r)),
            None => {
                let (l, r) = (int(lhs)?, int(rhs)?);
                if r == 0 {
                    return Err(error!(DivisionByZero));
                }
                checked(l.checked_div(r))
            }
        }
    }

    /// Float modulus is `a - b * floor(a / b)`; integer modulus truncates.
    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((_, r)) if r == 0.0 => Err(error!(DivisionByZero)),
            Some((l, r)) => Ok(Val::Float(l - r * (l / r).floor())),
            None => {
                let (l, r) = (int(lhs)?, int(rhs)?);
                if r == 0 {
                    return Err(error!(DivisionByZero));
                }
                checked(l.checked_rem(r))
            }
        }
    }

    /// Integer operands give an integer result, rounded.
    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        match floats(lhs, rhs)? {
            Some((l, r)) => Ok(Val::Float(l.powf(r))),
            None => {
                let n = (int(lhs)? as f64).powf(int(rhs)? as f64).round();
                if n.is_finite() && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
                    Ok(Val::Integer(n as i32))
                } else {
                    Err(error!(Overflow))
                }
            }
        }
    }
}
