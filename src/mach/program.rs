use super::{Address, Memory, Region};
use crate::error;
use crate::lang::{token::Token, Error, Line, LineNumber, VarHash, DIRECT_LINE};
use log::debug;

type Result<T> = std::result::Result<T, Error>;

/// ## Program store
///
/// Line records sit back to back from `prog_start` to `var_start` in
/// ascending line number order. Each is
/// `[number hi][number lo][len][tokens][CR]` where `len` counts the
/// tokens and the CR, so the next record starts `len + 3` bytes later.
impl Memory {
    /// Address of the first record numbered `number` or higher. With
    /// `exact` only a record numbered exactly `number` is returned.
    pub fn find_line(&self, number: u16, exact: bool) -> Option<Address> {
        let end = self.layout().var_start;
        let mut addr = self.layout().prog_start;
        while addr < end {
            let n = self.stream.read_word_at(addr);
            if n >= number {
                if exact && n != number {
                    return None;
                }
                return Some(addr);
            }
            addr = self.next_line(addr);
        }
        None
    }

    pub fn next_line(&self, addr: Address) -> Address {
        addr + self.stream.read(addr + 2) as Address + 3
    }

    pub fn line_number_at(&self, addr: Address) -> u16 {
        self.stream.read_word_at(addr)
    }

    /// Token body of the record at `addr` without the CR.
    pub fn line_tokens(&self, addr: Address) -> Vec<u8> {
        let len = self.stream.read(addr + 2) as usize;
        let mut v = vec![0; len.saturating_sub(1)];
        self.stream.read_block(addr + 3, &mut v);
        v
    }

    /// Addresses of every stored record in order.
    pub fn lines(&self) -> Vec<Address> {
        let end = self.layout().var_start;
        let mut v = vec![];
        let mut addr = self.layout().prog_start;
        while addr < end {
            v.push(addr);
            addr = self.next_line(addr);
        }
        v
    }

    pub fn line(&self, addr: Address) -> Line {
        let n = self.line_number_at(addr);
        let number: LineNumber = if n == DIRECT_LINE { None } else { Some(n) };
        Line::new(number, self.line_tokens(addr))
    }

    /// Insert, replace or delete a numbered line. An empty line only
    /// deletes. The caller must clear variables afterwards since every
    /// region above the program moved.
    pub fn store_line(&mut self, line: &Line) -> Result<()> {
        let number = match line.number() {
            Some(n) => n,
            None => return Err(error!(InternalError; "DIRECT LINE STORED")),
        };
        if let Some(addr) = self.find_line(number, true) {
            let len = self.stream.read(addr + 2) as u16 + 3;
            self.shrink(Region::Program, addr, len);
            debug!("line {} deleted", number);
        }
        if line.is_empty() {
            return Ok(());
        }
        let record = line.record();
        let at = self
            .find_line(number, false)
            .unwrap_or(self.layout().var_start);
        self.grow(Region::Program, at, record.len() as u16)?;
        self.stream.write_block(at, &record);
        debug!("line {} stored at {:04X}", number, at);
        Ok(())
    }

    /// Write a direct mode line to the command line buffer and return
    /// its address.
    pub fn store_direct(&mut self, line: &Line) -> Address {
        let addr = self.layout().cmd_line;
        self.stream.write_block(addr, &line.record());
        addr
    }

    /// Record whose first token is the label `hash`.
    pub fn find_label(&self, hash: VarHash) -> Option<Address> {
        self.lines().into_iter().find(|&addr| {
            let tokens = self.line_tokens(addr);
            if tokens.first() != Some(&Token::LABEL.0) {
                return false;
            }
            let at = 2 + tokens.get(1).copied().unwrap_or(0) as usize;
            match tokens.get(at..at + 4) {
                Some(bytes) => bytes == hash.to_bytes(),
                None => false,
            }
        })
    }

    /// Delete every line numbered `lo` through `hi`.
    pub fn delete_range(&mut self, lo: u16, hi: u16) {
        if lo > hi {
            return;
        }
        let end_of_program = self.layout().var_start;
        let start = match self.find_line(lo, false) {
            Some(addr) => addr,
            None => return,
        };
        let end = match hi.checked_add(1) {
            Some(after) => self.find_line(after, false).unwrap_or(end_of_program),
            None => end_of_program,
        };
        if end > start {
            self.shrink(Region::Program, start, end - start);
            debug!("lines {}-{} deleted", lo, hi);
        }
    }
}
