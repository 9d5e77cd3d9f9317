use super::Val;
use crate::error;
use crate::lang::token::Token;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// What a function accepts in one argument position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    /// Integer; a float is truncated.
    Int,
    /// Float; an integer is promoted.
    Float,
    /// Either numeric type, passed unchanged.
    Number,
    Str,
}

/// ## Built-in functions
///
/// The argument table and the pure numeric functions. Functions that
/// need strings, devices or machine state run in the runtime.
pub struct Function {}

impl Function {
    pub fn params(token: Token) -> &'static [Param] {
        use Param::*;
        match token {
            Token::ABS | Token::SGN => &[Number],
            Token::ATN
            | Token::COS
            | Token::EXP
            | Token::LOG
            | Token::SIN
            | Token::SQR
            | Token::TAN
            | Token::INT
            | Token::FIX
            | Token::CINT
            | Token::CSNG
            | Token::STR => &[Float],
            Token::PEEK | Token::RND | Token::USR | Token::CHR | Token::TAB => &[Int],
            Token::LEN | Token::VAL | Token::ASC => &[Str],
            Token::STRING => &[Int, Str],
            Token::POINT | Token::AT => &[Int, Int],
            Token::LEFT | Token::RIGHT => &[Str, Int],
            Token::INSTR => &[Str, Str],
            Token::MID => &[Str, Int, Int],
            _ => &[],
        }
    }

    /// Check the argument count and coerce each argument.
    pub fn coerce(token: Token, args: Vec<Val>) -> Result<Vec<Val>> {
        let params = Function::params(token);
        if params.len() != args.len() {
            return Err(error!(ParameterError));
        }
        params
            .iter()
            .zip(args)
            .map(|(param, arg)| match (param, arg) {
                (Param::Int, Val::Float(n)) => Ok(Val::Integer(n as i32)),
                (Param::Float, Val::Integer(n)) => Ok(Val::Float(n as f32)),
                (Param::Str, Val::String(_)) => Ok(arg),
                (Param::Str, _) | (_, Val::String(_)) => Err(error!(ParameterError)),
                _ => Ok(arg),
            })
            .collect()
    }

    fn float(val: Val) -> Result<f32> {
        match val {
            Val::Float(n) => Ok(n),
            Val::Integer(n) => Ok(n as f32),
            Val::String(_) => Err(error!(ParameterError)),
        }
    }

    /// Numeric functions of one argument. `None` when `token` is not one
    /// of them.
    pub fn numeric(token: Token, val: Val) -> Option<Result<Val>> {
        let f = |g: fn(f32) -> f32| Function::float(val).map(|n| Val::Float(g(n)));
        Some(match token {
            Token::ABS => Function::abs(val),
            Token::SGN => Function::sgn(val),
            Token::ATN => f(f32::atan),
            Token::COS => f(f32::cos),
            Token::EXP => f(f32::exp),
            Token::LOG => Function::log(val),
            Token::SIN => f(f32::sin),
            Token::SQR => Function::sqr(val),
            Token::TAN => f(f32::tan),
            Token::INT => f(f32::floor),
            Token::FIX => f(f32::trunc),
            Token::CINT => Function::cint(val),
            Token::CSNG => f(|n| n),
            _ => return None,
        })
    }

    pub fn abs(val: Val) -> Result<Val> {
        match val {
            Val::Integer(n) => match n.checked_abs() {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(error!(Overflow)),
            },
            Val::Float(n) => Ok(Val::Float(n.abs())),
            Val::String(_) => Err(error!(ParameterError)),
        }
    }

    pub fn sgn(val: Val) -> Result<Val> {
        let n = Function::float(val)?;
        Ok(Val::Integer(if n > 0.0 {
            1
        } else if n < 0.0 {
            -1
        } else {
            0
        }))
    }

    pub fn log(val: Val) -> Result<Val> {
        let n = Function::float(val)?;
        if n <= 0.0 {
            return Err(error!(ParameterError));
        }
        Ok(Val::Float(n.ln()))
    }

    pub fn sqr(val: Val) -> Result<Val> {
        let n = Function::float(val)?;
        if n < 0.0 {
            return Err(error!(ParameterError));
        }
        Ok(Val::Float(n.sqrt()))
    }

    /// Largest integer not above the argument.
    pub fn cint(val: Val) -> Result<Val> {
        let n = Function::float(val)?.floor();
        if n >= i32::MIN as f32 && n <= i32::MAX as f32 {
            Ok(Val::Integer(n as i32))
        } else {
            Err(error!(Overflow))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_checks_count_and_types() {
        let args = Function::coerce(Token::LEFT, vec![Val::String(Default::default()), Val::Float(2.7)]);
        assert_eq!(args.unwrap()[1], Val::Integer(2));
        assert!(Function::coerce(Token::LEFT, vec![Val::Integer(1)]).is_err());
        assert!(Function::coerce(Token::LEN, vec![Val::Integer(1)]).is_err());
        assert!(Function::coerce(Token::SIN, vec![Val::String(Default::default())]).is_err());
    }

    #[test]
    fn test_rounding_functions() {
        let n = Val::Float(-2.5);
        assert_eq!(Function::numeric(Token::INT, n).unwrap().unwrap(), Val::Float(-3.0));
        assert_eq!(Function::numeric(Token::FIX, n).unwrap().unwrap(), Val::Float(-2.0));
        assert_eq!(Function::numeric(Token::CINT, n).unwrap().unwrap(), Val::Integer(-3));
        assert_eq!(Function::numeric(Token::SGN, n).unwrap().unwrap(), Val::Integer(-1));
    }
}
