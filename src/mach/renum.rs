use super::Runtime;
use crate::error;
use crate::lang::token::{token_span, Token};
use crate::lang::{Error, MAX_LINE_NUMBER};
use log::debug;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// Rewrite every line number reference in `tokens` through `map`.
/// References are integer constants following `GOTO`, `GOSUB`, `THEN`,
/// `ELSE`, `RESTORE` and `RESUME`, and the rest of an `ON` list.
fn renumber_refs(tokens: &mut [u8], map: &HashMap<u16, u16>) {
    let mut want = false;
    let mut on = false;
    let mut list = false;
    let mut i = 0;
    while i < tokens.len() {
        let token = Token(tokens[i]);
        let span = token_span(tokens, i).max(1);
        match token {
            Token::INT_CONST if want && span == 5 => {
                let mut bytes = [0; 4];
                bytes.copy_from_slice(&tokens[i + 1..i + 5]);
                let old = i32::from_be_bytes(bytes);
                if old > 0 && old <= MAX_LINE_NUMBER as i32 {
                    if let Some(&new) = map.get(&(old as u16)) {
                        tokens[i + 1..i + 5].copy_from_slice(&(new as i32).to_be_bytes());
                    }
                }
                want = false;
            }
            Token::GOTO | Token::GOSUB => {
                list = on;
                want = true;
            }
            Token::THEN | Token::ELSE | Token::RESTORE | Token::RESUME => want = true,
            Token::ON => on = true,
            Token::COMMA => want = list,
            Token::COLON => {
                on = false;
                list = false;
                want = false;
            }
            _ => want = false,
        }
        i += span;
    }
}

impl Runtime {
    /// `RENUM [old][, [new][, step]]` renumbers lines from `old` on so
    /// they start at `new`, rewriting references to them.
    pub(super) fn renum(&mut self) -> Result<()> {
        let mut args: [Option<u16>; 3] = [None; 3];
        let mut index = 0;
        loop {
            let next = self.peek_token();
            if next.is_terminal() || next == Token::ELSE {
                self.read_token();
                break;
            }
            if next == Token::COMMA {
                self.read_token();
            } else {
                args[index] = Some(self.eval_line_number()?);
                if self.at_end() {
                    break;
                }
                if self.cur != Token::COMMA {
                    return Err(error!(SyntaxError));
                }
            }
            index += 1;
            if index >= args.len() {
                return Err(error!(SyntaxError));
            }
        }
        let old = args[0].unwrap_or(0);
        let new = args[1].unwrap_or_else(|| old.max(10));
        let step = args[2].unwrap_or(10);
        if new < old {
            return Err(error!(ParameterError));
        }
        let lines = self.mem.lines();
        let mut map = HashMap::new();
        let mut number = new as u32;
        for &addr in &lines {
            let current = self.mem.line_number_at(addr);
            if current >= old {
                if number > MAX_LINE_NUMBER as u32 {
                    return Err(error!(InvalidLineNumber));
                }
                map.insert(current, number as u16);
                number += step as u32;
            }
        }
        for &addr in &lines {
            let mut tokens = self.mem.line_tokens(addr);
            renumber_refs(&mut tokens, &map);
            self.mem.stream.write_block(addr + 3, &tokens);
            if let Some(&n) = map.get(&self.mem.line_number_at(addr)) {
                self.mem.stream.write_word(addr, n);
            }
        }
        debug!("renumbered {} lines", map.len());
        if self.line.is_some() {
            self.running = false;
        }
        self.clear_variables();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenize;

    #[test]
    fn test_references_follow_the_map() {
        let mut map = HashMap::new();
        map.insert(100, 10);
        map.insert(200, 20);
        let line = tokenize("IF A THEN 100 ELSE 200").unwrap();
        let mut tokens = line.tokens().to_vec();
        renumber_refs(&mut tokens, &map);
        let line = crate::lang::Line::new(None, tokens);
        assert_eq!(line.to_string(), "IF A THEN 10 ELSE 20");
    }

    #[test]
    fn test_on_list_and_plain_numbers() {
        let mut map = HashMap::new();
        map.insert(100, 10);
        map.insert(200, 20);
        let line = tokenize("ON X GOTO 100,200:PRINT 100").unwrap();
        let mut tokens = line.tokens().to_vec();
        renumber_refs(&mut tokens, &map);
        let line = crate::lang::Line::new(None, tokens);
        assert_eq!(line.to_string(), "ON X GOTO 10, 20 : PRINT 100");
    }
}
