use super::{ForLoop, Operation, Resume, Runtime, Val};
use crate::error;
use crate::lang::{token::Token, Error, VarType, MAX_LINE_NUMBER};
use log::debug;
use std::time::Duration;

type Result<T> = std::result::Result<T, Error>;

fn is_true(val: Val) -> Result<bool> {
    match val {
        Val::Integer(n) => Ok(n != 0),
        Val::Float(n) => Ok(n != 0.0),
        Val::String(_) => Err(error!(TypeConflict)),
    }
}

/// ## Flow control statements
impl Runtime {
    /// A line number expression or a `_label`.
    pub(super) fn line_target(&mut self) -> Result<u16> {
        if self.peek_token() != Token::LABEL {
            return self.eval_line_number();
        }
        self.read_token();
        let hash = self.read_hash();
        self.read_token();
        match self.mem.find_label(hash) {
            Some(addr) => Ok(self.mem.line_number_at(addr)),
            None => Err(error!(InvalidLineNumber; "UNDEFINED LABEL")),
        }
    }

    pub(super) fn goto(&mut self) -> Result<()> {
        let number = self.line_target()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        self.goto_line(number)
    }

    pub(super) fn gosub(&mut self) -> Result<()> {
        let number = self.line_target()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        self.gosub_line(number)
    }

    fn gosub_line(&mut self, number: u16) -> Result<()> {
        let addr = self.line_address(number)?;
        let ret = self.next_statement();
        self.control.push_gosub(&mut self.mem, ret)?;
        self.jump(Resume {
            addr: addr + 3,
            line: Some(number),
        });
        Ok(())
    }

    pub(super) fn r#return(&mut self) -> Result<()> {
        self.expect_end()?;
        let ret = self.control.pop_gosub(&mut self.mem)?;
        self.jump(ret);
        Ok(())
    }

    /// `IF cond THEN ... ELSE ...` and `IF cond GOTO n`. A false
    /// condition follows the jump byte to the statements after the
    /// matching `ELSE`, or to the end of the line.
    pub(super) fn r#if(&mut self) -> Result<()> {
        let offset = self.mem.stream.read_byte();
        let after = self.mem.stream.position();
        let truth = is_true(self.eval()?)?;
        let keyword = self.cur;
        if keyword != Token::THEN && keyword != Token::GOTO {
            return Err(error!(SyntaxError));
        }
        if truth {
            return if keyword == Token::GOTO {
                self.goto()
            } else {
                self.branch()
            };
        }
        self.mem.stream.set_position(after + offset as u16);
        if self.peek_token() == Token::EOL {
            self.read_token();
            return Ok(());
        }
        self.branch()
    }

    /// Start a `THEN` or `ELSE` clause, which may be a bare line number.
    fn branch(&mut self) -> Result<()> {
        if self.peek_token() == Token::INT_CONST {
            return self.goto();
        }
        self.cur = Token::COLON;
        Ok(())
    }

    pub(super) fn r#for(&mut self) -> Result<()> {
        if !self.read_token().is_variable() {
            return Err(error!(SyntaxError));
        }
        let hash = self.read_hash();
        let hash = self.mem.resolve(hash);
        let var_type = hash.var_type();
        if var_type == VarType::String {
            return Err(error!(TypeConflict));
        }
        self.expect(Token::EQUAL)?;
        let start = Operation::convert(self.eval()?, var_type)?;
        if self.cur != Token::TO {
            return Err(error!(SyntaxError));
        }
        let to = Operation::convert(self.eval()?, var_type)?;
        let step = if self.cur == Token::STEP {
            Operation::convert(self.eval()?, var_type)?
        } else {
            Operation::convert(Val::Integer(1), var_type)?
        };
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        let addr = self.mem.var_for_assign(hash)?;
        self.mem.write_val(addr, start)?;
        let body = self.next_statement();
        self.control.push_for(
            &mut self.mem,
            ForLoop {
                hash,
                to,
                step,
                body,
            },
        )
    }

    /// `NEXT`, `NEXT v` or `NEXT v, w, ...`.
    pub(super) fn next(&mut self) -> Result<()> {
        let mut token = self.read_token();
        loop {
            let hash = if token.is_variable() {
                let hash = self.read_hash();
                Some(self.mem.resolve(hash))
            } else {
                None
            };
            if let Some(body) = self.control.advance_for(&mut self.mem, hash)? {
                self.jump(body);
                return Ok(());
            }
            if hash.is_none() || self.read_token() != Token::COMMA {
                break;
            }
            token = self.read_token();
            if !token.is_variable() {
                return Err(error!(SyntaxError));
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    /// `ON ERROR GOTO n` or `ON expr GOTO|GOSUB n, ...`.
    pub(super) fn on(&mut self) -> Result<()> {
        if self.peek_token() == Token::ERROR {
            self.read_token();
            self.expect(Token::GOTO)?;
            let number = self.eval_int()?;
            if number < 0 || number > MAX_LINE_NUMBER as i32 {
                return Err(error!(InvalidLineNumber));
            }
            if !self.at_end() {
                return Err(error!(SyntaxError));
            }
            debug!("error trap set to line {}", number);
            self.trap_line = number as u16;
            return Ok(());
        }
        let index = self.eval_int()?;
        let keyword = self.cur;
        if keyword != Token::GOTO && keyword != Token::GOSUB {
            return Err(error!(SyntaxError));
        }
        let mut targets = vec![];
        loop {
            targets.push(self.line_target()?);
            if self.cur != Token::COMMA {
                break;
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        if index < 1 || index as usize > targets.len() {
            return Ok(());
        }
        let number = targets[index as usize - 1];
        if keyword == Token::GOSUB {
            self.gosub_line(number)
        } else {
            self.goto_line(number)
        }
    }

    /// `RESUME`, `RESUME NEXT` or `RESUME n`.
    pub(super) fn resume_cmd(&mut self) -> Result<()> {
        let next = self.peek_token();
        let number = if next.is_terminal() || next == Token::ELSE {
            self.read_token();
            None
        } else if next == Token::NEXT {
            self.read_token();
            self.expect_end()?;
            None
        } else {
            let number = self.line_target()?;
            if !self.at_end() {
                return Err(error!(SyntaxError));
            }
            Some(number)
        };
        let resume = match self.resume.take() {
            Some(resume) => resume,
            None => return Err(error!(UnexpectedResume)),
        };
        debug!("resume from {:04X}", resume.addr);
        match number {
            Some(number) => self.goto_line(number),
            None if next == Token::NEXT => {
                self.jump(resume);
                self.skip_token();
                self.skip_statement()
            }
            None => {
                self.jump(resume);
                Ok(())
            }
        }
    }

    /// `ERROR n` raises error code `n`.
    pub(super) fn error_cmd(&mut self) -> Result<()> {
        let code = self.eval_int()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        if code < 1 || code > u8::MAX as i32 {
            return Err(error!(ParameterError));
        }
        Err(Error::from_code(code as u16))
    }

    pub(super) fn end(&mut self) -> Result<()> {
        self.expect_end()?;
        self.running = false;
        self.cont = None;
        Ok(())
    }

    pub(super) fn stop(&mut self) -> Result<()> {
        self.expect_end()?;
        let at = self.next_statement();
        self.halt(at);
        Ok(())
    }

    pub(super) fn cont_cmd(&mut self) -> Result<()> {
        self.expect_end()?;
        match self.cont.take() {
            Some(at) => {
                self.jump(at);
                Ok(())
            }
            None => Err(error!(CantContinue)),
        }
    }

    /// `PAUSE ms` sleeps.
    pub(super) fn pause(&mut self) -> Result<()> {
        let ms = self.eval_int()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        if ms < 0 {
            return Err(error!(ParameterError));
        }
        std::thread::sleep(Duration::from_millis(ms as u64));
        Ok(())
    }
}
