use super::{program_name, Address, Resume, Runtime};
use crate::error;
use crate::lang::{token::Token, tokenize, Error, Line, VarType, MAX_LINE_NUMBER};
use log::{debug, info};
use std::collections::HashSet;
use std::io::{Read, Write};

type Result<T> = std::result::Result<T, Error>;

/// ## Line management, declarations and files
impl Runtime {
    pub(super) fn r#let(&mut self) -> Result<()> {
        self.assign()
    }

    pub(super) fn dim(&mut self) -> Result<()> {
        loop {
            self.declare()?;
            if self.cur != Token::COMMA {
                break;
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    /// `DEFINT A-C, X` and friends. Names count by their first letter.
    pub(super) fn def_type(&mut self, token: Token) -> Result<()> {
        let var_type = match token {
            Token::DEFINT => VarType::Integer,
            Token::DEFSTR => VarType::String,
            _ => VarType::Float,
        };
        loop {
            let first = self.def_letter()?;
            let mut last = first;
            if self.read_token() == Token::MINUS {
                last = self.def_letter()?;
                self.read_token();
            }
            if first > last {
                return Err(error!(SyntaxError));
            }
            for letter in first..=last {
                self.mem.set_def_type(letter, var_type);
            }
            if self.cur != Token::COMMA {
                break;
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    fn def_letter(&mut self) -> Result<usize> {
        if self.read_token() != Token::NOTYPE_VAR {
            return Err(error!(SyntaxError));
        }
        Ok(self.read_hash().first_letter())
    }

    /// Optional `[lo][-[hi]]` line range. No range is every line.
    fn line_range(&mut self) -> Result<(u16, u16)> {
        let mut token = self.read_token();
        let mut lo = None;
        let mut hi = None;
        let mut dash = false;
        if token == Token::INT_CONST {
            lo = Some(self.read_int());
            token = self.read_token();
        }
        if token == Token::MINUS || token == Token::NEGATE {
            dash = true;
            token = self.read_token();
            if token == Token::INT_CONST {
                hi = Some(self.read_int());
                self.read_token();
            }
        }
        if !self.at_end() {
            return Err(error!(NotAllowedHere));
        }
        let check = |n: i32| {
            if n < 0 || n > MAX_LINE_NUMBER as i32 {
                Err(error!(InvalidLineNumber))
            } else {
                Ok(n as u16)
            }
        };
        let lo = match lo {
            Some(n) => check(n)?,
            None => {
                dash = true;
                0
            }
        };
        let hi = match hi {
            Some(n) => check(n)?,
            None if dash => MAX_LINE_NUMBER,
            None => lo,
        };
        Ok((lo, hi))
    }

    pub(super) fn list(&mut self) -> Result<()> {
        let (lo, hi) = self.line_range()?;
        for addr in self.mem.lines() {
            let number = self.mem.line_number_at(addr);
            if number >= lo && number <= hi {
                let text = self.mem.line(addr).to_string();
                self.print_str(&text);
                self.print_str("\n");
            }
        }
        Ok(())
    }

    pub(super) fn delete(&mut self) -> Result<()> {
        let (lo, hi) = self.line_range()?;
        self.mem.delete_range(lo, hi);
        self.stop_editing();
        Ok(())
    }

    /// Changing the program invalidates everything that points into it.
    fn stop_editing(&mut self) {
        if self.line.is_some() {
            self.running = false;
        }
        self.clear_variables();
    }

    /// `EDIT n` prints the line so the host can offer it for re-entry.
    pub(super) fn edit(&mut self) -> Result<()> {
        let number = self.eval_line_number()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        let addr = self.line_address(number)?;
        let text = self.mem.line(addr).to_string();
        self.print_str(&text);
        self.print_str("\n");
        self.running = false;
        Ok(())
    }

    /// `AUTO [start[, step]]`
    pub(super) fn auto_cmd(&mut self) -> Result<()> {
        let mut start = 10;
        let mut step = 10;
        let next = self.peek_token();
        if !next.is_terminal() && next != Token::ELSE {
            if next != Token::COMMA {
                start = self.eval_line_number()?;
            } else {
                self.read_token();
            }
            if self.cur == Token::COMMA {
                step = self.eval_line_number()?;
            }
        } else {
            self.read_token();
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        self.auto = Some((start, step));
        self.print_str(&format!("{} ", start));
        Ok(())
    }

    pub(super) fn clear_cmd(&mut self) -> Result<()> {
        self.expect_end()?;
        self.clear_variables();
        Ok(())
    }

    pub(super) fn new_cmd(&mut self) -> Result<()> {
        self.expect_end()?;
        self.mem.clear_everything();
        self.clear_variables();
        self.running = false;
        self.cur = Token::EOL;
        Ok(())
    }

    /// `RUN [n]` clears the variables and starts at the first line
    /// numbered `n` or higher.
    pub(super) fn run(&mut self) -> Result<()> {
        let next = self.peek_token();
        let from = if next.is_terminal() || next == Token::ELSE {
            self.read_token();
            None
        } else {
            let number = self.line_target()?;
            if !self.at_end() {
                return Err(error!(SyntaxError));
            }
            Some(number)
        };
        let addr = match from {
            None => self.mem.layout().prog_start,
            Some(number) => match self.mem.find_line(number, false) {
                Some(addr) => addr,
                None => return Err(error!(InvalidLineNumber)),
            },
        };
        self.clear_variables();
        self.start_at(addr);
        Ok(())
    }

    /// Run from the record at `addr`.
    fn start_at(&mut self, addr: Address) {
        if addr >= self.mem.layout().var_start {
            self.running = false;
            self.cur = Token::EOL;
            return;
        }
        let number = self.mem.line_number_at(addr);
        debug!("run from line {}", number);
        self.jump(Resume {
            addr: addr + 3,
            line: Some(number),
        });
    }

    pub(super) fn exit(&mut self) -> Result<()> {
        self.expect_end()?;
        self.running = false;
        self.exited = true;
        Ok(())
    }

    fn file_name(&mut self) -> Result<String> {
        let s = self.eval_string()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        let name = String::from_utf8_lossy(&self.mem.string_bytes(s)).trim().to_string();
        if name.is_empty() {
            return Err(error!(FileNotFound));
        }
        Ok(name)
    }

    pub(super) fn files_cmd(&mut self) -> Result<()> {
        self.expect_end()?;
        let names = match self.files.list() {
            Ok(names) => names,
            Err(_) => return Err(error!(FileIo)),
        };
        for name in names {
            self.print_str(&name);
            self.print_str("\n");
        }
        Ok(())
    }

    pub(super) fn save(&mut self) -> Result<()> {
        let name = self.file_name()?;
        let text = self.listing();
        let mut file = match self.files.open_write(&name) {
            Ok(file) => file,
            Err(_) => return Err(error!(FileIo)),
        };
        if file.write_all(text.as_bytes()).and_then(|_| file.flush()).is_err() {
            return Err(error!(FileIo));
        }
        info!("saved {}", program_name(&name));
        Ok(())
    }

    /// `LOAD "name"` replaces the program with a text file. Blank lines
    /// and lines starting with `;` are skipped. Unnumbered lines and
    /// lines repeating a number already loaded follow the previous line
    /// by 10. A line holding only `RUN` ends the file and starts the
    /// program.
    pub(super) fn load(&mut self) -> Result<()> {
        let name = self.file_name()?;
        let mut text = String::new();
        let mut file = match self.files.open_read(&name) {
            Ok(file) => file,
            Err(_) => return Err(error!(FileNotFound)),
        };
        if file.read_to_string(&mut text).is_err() {
            return Err(error!(FileIo));
        }
        self.running = false;
        self.cur = Token::EOL;
        self.mem.clear_everything();
        self.clear_variables();
        let mut previous = 0u16;
        let mut labels = HashSet::new();
        let mut run = false;
        for src in text.lines().map(str::trim) {
            if src.is_empty() || src.starts_with(';') {
                continue;
            }
            if src.eq_ignore_ascii_case("RUN") {
                run = true;
                break;
            }
            let line = tokenize(src)?;
            let number = match line.number() {
                Some(n) if self.mem.find_line(n, true).is_none() => n,
                _ => match previous.checked_add(10) {
                    Some(n) if n <= MAX_LINE_NUMBER => n,
                    _ => return Err(error!(InvalidLineNumber)),
                },
            };
            let tokens = line.tokens();
            if tokens.first() == Some(&Token::LABEL.0) {
                let len = tokens.get(1).copied().unwrap_or(0) as usize;
                let label = tokens.get(2..2 + len).unwrap_or(&[]).to_vec();
                if !labels.insert(label) {
                    return Err(error!(SyntaxError; "DUPLICATE LABEL").in_line_number(Some(number)));
                }
            }
            self.mem.store_line(&Line::new(Some(number), tokens.to_vec()))?;
            previous = number;
        }
        info!("loaded {}", program_name(&name));
        self.clear_variables();
        if run {
            let start = self.mem.layout().prog_start;
            self.start_at(start);
        }
        Ok(())
    }
}
