use super::{Function, Runtime, StrRef, Val, GRAPHICS};
use crate::error;
use crate::lang::number::{format_g, parse_float};
use crate::lang::{token::Token, Error};
use chrono::Local;
use rand::Rng;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions that need the machine
///
/// Pure numeric functions are in `function.rs`. Everything here touches
/// strings, devices, the clock or the random generator.
impl Runtime {
    pub(super) fn call(&mut self, token: Token, args: Vec<Val>) -> Result<Val> {
        if token.is_niladic() {
            return self.niladic(token);
        }
        let args = Function::coerce(token, args)?;
        if let [val] = args[..] {
            if let Some(result) = Function::numeric(token, val) {
                return result;
            }
        }
        use Val::{Integer as I, String as S};
        match (token, &args[..]) {
            (Token::LEN, [S(s)]) => Ok(I(s.len as i32)),
            (Token::PEEK, [I(addr)]) => {
                if *addr < 0 || *addr > self.config.ram_top as i32 {
                    return Err(error!(ParameterError));
                }
                Ok(I(self.mem.stream.read(*addr as u16) as i32))
            }
            (Token::RND, [I(n)]) => self.rnd(*n),
            (Token::USR, [I(_)]) => Ok(I(0)),
            (Token::VAL, [S(s)]) => {
                let bytes = self.mem.string_bytes(*s);
                Ok(Val::Float(parse_float(&bytes).0 as f32))
            }
            (Token::ASC, [S(s)]) => {
                let bytes = self.mem.string_bytes(*s);
                Ok(I(bytes.first().copied().unwrap_or(0) as i32))
            }
            (Token::CHR, [I(n)]) => {
                if *n < 0 || *n > u8::MAX as i32 {
                    return Err(error!(ParameterError));
                }
                Ok(S(self.mem.temp_string(&[*n as u8])?))
            }
            (Token::STR, [Val::Float(n)]) => {
                let text = format_g(*n as f64, 6);
                Ok(S(self.mem.temp_string(text.as_bytes())?))
            }
            (Token::TAB, [I(n)]) => {
                self.tab(*n);
                Ok(S(StrRef::NULL))
            }
            (Token::STRING, [I(n), S(s)]) => {
                let n = string_len(*n)?;
                let fill = self.mem.string_bytes(*s).first().copied();
                match fill {
                    Some(ch) => Ok(S(self.mem.temp_string(&vec![ch; n as usize])?)),
                    None => Ok(S(StrRef::NULL)),
                }
            }
            (Token::POINT, [I(x), I(y)]) => Ok(Val::from_bool(self.graph_plot(*x, *y, None)?)),
            (Token::LEFT, [S(s), I(n)]) => {
                let n = string_len(*n)?.min(s.len);
                Ok(S(StrRef::new(s.addr, n)))
            }
            (Token::RIGHT, [S(s), I(n)]) => {
                let n = string_len(*n)?.min(s.len);
                Ok(S(StrRef::new(s.addr + (s.len - n) as u16, n)))
            }
            (Token::MID, [S(s), I(start), I(n)]) => {
                let start = string_len(*start)?.max(1) - 1;
                let n = string_len(*n)?;
                if start >= s.len {
                    return Ok(S(StrRef::NULL));
                }
                let n = n.min(s.len - start);
                Ok(S(StrRef::new(s.addr + start as u16, n)))
            }
            (Token::AT, [I(x), I(y)]) => {
                let (columns, rows) = self.display.size();
                if *x < 0 || *y < 0 || *x >= columns as i32 || *y >= rows as i32 {
                    return Err(error!(ParameterError));
                }
                self.display.set_cursor(*x as u16, *y as u16);
                Ok(S(StrRef::NULL))
            }
            (Token::INSTR, [S(hay), S(needle)]) => {
                let hay = self.mem.string_bytes(*hay).to_ascii_uppercase();
                let needle = self.mem.string_bytes(*needle).to_ascii_uppercase();
                if needle.is_empty() {
                    return Ok(I(1));
                }
                let found = hay
                    .windows(needle.len())
                    .position(|window| window == &needle[..]);
                Ok(I(found.map_or(0, |i| i as i32 + 1)))
            }
            _ => Err(error!(UndefinedFunction)),
        }
    }

    fn niladic(&mut self, token: Token) -> Result<Val> {
        Ok(match token {
            Token::PI => Val::Float(std::f32::consts::PI),
            Token::MEM => Val::Integer(self.mem.bytes_free() as i32),
            Token::POSX => Val::Integer(self.display.cursor().0 as i32),
            Token::POSY => Val::Integer(self.display.cursor().1 as i32),
            Token::INKEY => {
                let key = match self.keyboard.read_key() {
                    Some(key) => key,
                    None => return Ok(Val::String(StrRef::NULL)),
                };
                let [hi, lo] = key.to_be_bytes();
                let s = if lo != 0 {
                    self.mem.temp_string(&[lo])?
                } else {
                    self.mem.temp_string(&[b'X', hi])?
                };
                Val::String(s)
            }
            Token::EXTKEY => Val::Integer(self.keyboard.flags() as i32),
            Token::ERR => Val::Integer(self.last_error.0 as i32),
            Token::ERL => Val::Integer(self.last_error.1.map_or(65535, |n| n as i32)),
            Token::TIME => {
                let now = Local::now().format("%m/%d/%y %H:%M:%S").to_string();
                Val::String(self.mem.temp_string(now.as_bytes())?)
            }
            Token::TIMER => {
                let ms = self.started.elapsed().as_millis();
                Val::Integer((ms % (i32::MAX as u128 + 1)) as i32)
            }
            _ => return Err(error!(UndefinedFunction)),
        })
    }

    fn rnd(&mut self, n: i32) -> Result<Val> {
        match n {
            0 => {
                let f: f32 = self.rng.gen();
                Ok(Val::Float(f.max(f32::EPSILON)))
            }
            n if n > 0 => Ok(Val::Integer(self.rng.gen_range(1..=n))),
            _ => Err(error!(ParameterError)),
        }
    }

    /// Space over to column `n`, starting a new row when already past it.
    pub(super) fn tab(&mut self, n: i32) {
        let (columns, _) = self.display.size();
        let n = if n < 0 || n >= columns as i32 { 0 } else { n as u16 };
        if n < self.display.cursor().0 {
            self.display.put_char(b'\n');
        }
        while self.display.cursor().0 < n {
            self.display.put_char(b' ');
        }
    }

    /// Set (`Some(true)`), clear (`Some(false)`) or test (`None`) one
    /// pixel of the 2x3 block graphics. Returns whether it was lit.
    pub(super) fn graph_plot(&mut self, x: i32, y: i32, set: Option<bool>) -> Result<bool> {
        let (columns, rows) = self.display.size();
        if x < 0 || y < 0 || x >= columns as i32 * 2 || y >= rows as i32 * 3 {
            return Err(error!(ParameterError));
        }
        let (cx, cy) = ((x / 2) as u16, (y / 3) as u16);
        let bit = 1u8 << ((y % 3) * 2 + (x & 1));
        let cell = self.display.cell(cx, cy);
        let cell = if cell < GRAPHICS { GRAPHICS } else { cell };
        let lit = cell & bit != 0;
        match set {
            Some(true) => self.display.set_cell(cx, cy, cell | bit),
            Some(false) => self.display.set_cell(cx, cy, cell & !bit),
            None => {}
        }
        Ok(lit)
    }
}

/// A string length argument.
fn string_len(n: i32) -> Result<u8> {
    if n > u8::MAX as i32 {
        return Err(error!(StringTooLong));
    }
    Ok(n.max(0) as u8)
}
