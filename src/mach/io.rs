use super::runtime::{DataCursor, PendingInput};
use super::{parse_using, Address, Operation, StrRef, Runtime, Using, Val};
use crate::error;
use crate::lang::number::parse_float;
use crate::lang::token::{token_span, Token};
use crate::lang::{Error, VarType};
use log::trace;

type Result<T> = std::result::Result<T, Error>;

/// Split an `INPUT` answer at commas. Quoted fields keep their commas.
fn split_fields(answer: &str) -> Vec<Vec<u8>> {
    let mut fields = vec![];
    let mut field = vec![];
    let mut quoted = false;
    for &ch in answer.as_bytes() {
        match ch {
            b'"' => quoted = !quoted,
            b',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }
    fields.push(field);
    fields
        .into_iter()
        .map(|f| {
            let start = f.iter().position(|c| *c != b' ').unwrap_or(f.len());
            let end = f.iter().rposition(|c| *c != b' ').map_or(start, |i| i + 1);
            f[start..end.max(start)].to_vec()
        })
        .collect()
}

/// Numeric value of an answer field. `None` when it is not a number.
fn numeric_field(field: &[u8], var_type: VarType) -> Option<Val> {
    if field.is_empty() {
        return Operation::convert(Val::Integer(0), var_type).ok();
    }
    let (value, len) = parse_float(field);
    if len != field.len() {
        return None;
    }
    match var_type {
        VarType::Integer => {
            if value < i32::MIN as f64 || value > i32::MAX as f64 {
                None
            } else {
                Some(Val::Integer(value as i32))
            }
        }
        _ => Some(Val::Float(value as f32)),
    }
}

/// ## Console and data statements
impl Runtime {
    fn print_bytes(&mut self, bytes: &[u8]) {
        for &ch in bytes {
            self.display.put_char(ch);
        }
    }

    fn print_val(&mut self, val: Val) {
        match val {
            Val::Integer(n) => self.print_str(&format!("{:>2}", n)),
            Val::Float(n) => {
                let text = self.formatter.plain(n);
                self.print_str(&text);
            }
            Val::String(s) => {
                let bytes = self.mem.string_bytes(s);
                self.print_bytes(&bytes);
            }
        }
    }

    /// `PRINT [@pos,] [USING fmt;] items`
    pub(super) fn print(&mut self) -> Result<()> {
        if self.peek_token() == Token::AT_SIGN {
            self.read_token();
            let pos = self.eval_int()?;
            if self.cur != Token::COMMA {
                return Err(error!(SyntaxError));
            }
            let (columns, rows) = self.display.size();
            if pos < 0 || pos >= columns as i32 * rows as i32 {
                return Err(error!(ParameterError));
            }
            let pos = pos as u16;
            self.display.set_cursor(pos % columns, pos / columns);
        }
        if self.peek_token() == Token::USING {
            self.read_token();
            return self.print_using();
        }
        let mut newline = true;
        loop {
            let next = self.peek_token();
            if next.is_terminal() || next == Token::ELSE {
                self.read_token();
                break;
            }
            if next == Token::SEMICOLON || next == Token::COMMA {
                self.read_token();
            } else {
                let val = self.eval()?;
                self.print_val(val);
                newline = true;
                if self.at_end() {
                    break;
                }
            }
            match self.cur {
                Token::SEMICOLON => newline = false,
                Token::COMMA => {
                    newline = false;
                    self.display.put_char(b'\t');
                }
                _ => return Err(error!(SyntaxError)),
            }
        }
        if newline {
            self.display.put_char(b'\n');
        }
        Ok(())
    }

    /// Next `PRINT USING` argument, `None` when the list is exhausted.
    fn using_arg(&mut self, trailing: &mut bool) -> Result<Option<Val>> {
        if self.at_end() {
            return Ok(None);
        }
        let next = self.peek_token();
        if next.is_terminal() || next == Token::ELSE {
            self.read_token();
            *trailing = true;
            return Ok(None);
        }
        let val = self.eval()?;
        match self.cur {
            Token::COMMA | Token::SEMICOLON => {}
            _ if self.at_end() => {}
            _ => return Err(error!(SyntaxError)),
        }
        Ok(Some(val))
    }

    fn print_using(&mut self) -> Result<()> {
        let fmt = self.eval_string()?;
        if self.cur != Token::SEMICOLON || fmt.len == 0 {
            return Err(error!(ParameterError));
        }
        let next = self.peek_token();
        if next.is_terminal() || next == Token::ELSE {
            return Err(error!(ParameterError));
        }
        let items = parse_using(&self.mem.string_bytes(fmt))?;
        let mut trailing = false;
        'outer: loop {
            for item in &items {
                match item {
                    Using::Literal(ch) => self.display.put_char(*ch as u8),
                    Using::Text(width) => {
                        let s = match self.using_arg(&mut trailing)? {
                            Some(Val::String(s)) => s,
                            Some(_) => return Err(error!(TypeConflict)),
                            None => break 'outer,
                        };
                        let mut bytes = self.mem.string_bytes(s);
                        if *width > 0 {
                            bytes.resize(*width, b' ');
                        }
                        self.print_bytes(&bytes);
                    }
                    Using::Number(field) => {
                        let n = match self.using_arg(&mut trailing)? {
                            Some(Val::Integer(n)) => n as f32,
                            Some(Val::Float(n)) => n,
                            Some(Val::String(_)) => return Err(error!(TypeConflict)),
                            None => break 'outer,
                        };
                        let text = self.formatter.format(n, field);
                        self.print_str(&text);
                    }
                }
            }
            if self.at_end() {
                break;
            }
        }
        if !trailing {
            self.display.put_char(b'\n');
        }
        Ok(())
    }

    pub(super) fn cls(&mut self) -> Result<()> {
        self.expect_end()?;
        self.display.clear();
        Ok(())
    }

    /// `PLOT x, y` and `UNPLOT x, y`.
    pub(super) fn plot_cmd(&mut self, set: bool) -> Result<()> {
        let x = self.eval_int()?;
        if self.cur != Token::COMMA {
            return Err(error!(SyntaxError));
        }
        let y = self.eval_int()?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        self.graph_plot(x, y, Some(set))?;
        Ok(())
    }

    pub(super) fn line_input(&mut self) -> Result<()> {
        self.expect(Token::INPUT)?;
        self.input_cmd(true)
    }

    /// Hand the prompt to the host and come back to this statement
    /// when the answer arrives.
    fn suspend_input(&mut self, prompt: String, done: usize) {
        self.input = Some(PendingInput {
            prompt,
            answer: None,
            done,
        });
        self.mem.stream.set_position(self.stmt_addr);
        self.cur = Token::COLON;
    }

    /// `INPUT ["prompt";] v, ...` and `LINE INPUT ["prompt";] v$`. Runs
    /// once to ask and again for every answer.
    pub(super) fn input_cmd(&mut self, whole_line: bool) -> Result<()> {
        let mut prompt = String::new();
        if self.peek_token() == Token::STRING_CONST {
            self.read_token();
            let s = self.read_str();
            prompt = String::from_utf8_lossy(&self.mem.string_bytes(s)).to_string();
            let sep = self.read_token();
            if sep != Token::SEMICOLON && sep != Token::COMMA {
                return Err(error!(SyntaxError));
            }
        }
        if !whole_line {
            prompt.push_str("? ");
        }
        let targets_at = self.mem.stream.position();
        let pending = self.input.take();
        let (answer, done, asked) = match pending {
            Some(PendingInput {
                answer: Some(answer),
                done,
                prompt,
            }) => (answer, done, prompt),
            _ => {
                self.suspend_input(prompt, 0);
                return Ok(());
            }
        };
        let mut types = vec![];
        loop {
            types.push(self.target()?.1);
            if self.cur != Token::COMMA {
                break;
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        let fields = if whole_line {
            if types.len() != 1 || types[0] != VarType::String {
                return Err(error!(TypeConflict));
            }
            vec![answer.into_bytes()]
        } else {
            split_fields(&answer)
        };
        let wanted = &types[done.min(types.len())..];
        let mut values = vec![];
        for (field, &var_type) in fields.iter().zip(wanted) {
            let val = if var_type == VarType::String {
                Val::String(StrRef::NULL)
            } else {
                match numeric_field(field, var_type) {
                    Some(val) => val,
                    None => {
                        self.print_str("?REDO FROM START\n");
                        self.suspend_input(asked, done);
                        return Ok(());
                    }
                }
            };
            values.push(val);
        }
        self.mem.stream.set_position(targets_at);
        for i in 0..types.len() {
            let (addr, var_type) = self.target()?;
            if i >= done && i - done < values.len() {
                let val = match values[i - done] {
                    Val::String(_) => Val::String(self.mem.temp_string(&fields[i - done])?),
                    val => val,
                };
                self.mem.write_val(addr, Operation::convert(val, var_type)?)?;
            }
        }
        let done = done + values.len();
        trace!("input assigned {} of {}", done, types.len());
        if done < types.len() {
            self.suspend_input("?? ".to_string(), done);
        } else if fields.len() > wanted.len() {
            self.print_str("?EXTRA IGNORED\n");
        }
        Ok(())
    }

    /// `READ v, ...` from the `DATA` lines.
    pub(super) fn read(&mut self) -> Result<()> {
        loop {
            let (addr, var_type) = self.target()?;
            let val = self.read_data(var_type)?;
            self.mem.write_val(addr, val)?;
            if self.cur != Token::COMMA {
                break;
            }
        }
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    /// Next `DATA` item converted for a slot of `var_type`. A `DATA`
    /// line is one whose first token is `DATA`.
    fn read_data(&mut self, var_type: VarType) -> Result<Val> {
        loop {
            match self.data {
                DataCursor::Scan(mut addr) => loop {
                    if addr >= self.mem.layout().var_start {
                        return Err(error!(OutOfData));
                    }
                    if self.mem.stream.read(addr + 3) == Token::DATA.0 {
                        self.data = DataCursor::Item {
                            line: addr,
                            offset: 1,
                        };
                        break;
                    }
                    addr = self.mem.next_line(addr);
                },
                DataCursor::Item { line, offset } => {
                    let tokens = self.mem.line_tokens(line);
                    match tokens.get(offset).map(|&t| Token(t)) {
                        None | Some(Token::COLON) => {
                            self.data = DataCursor::Scan(self.mem.next_line(line));
                            continue;
                        }
                        _ => {}
                    }
                    let (val, next) = self.data_item(line, &tokens, offset, var_type)?;
                    let offset = match tokens.get(next).map(|&t| Token(t)) {
                        Some(Token::COMMA) => next + 1,
                        None | Some(Token::COLON) => tokens.len(),
                        Some(_) => return Err(error!(SyntaxError; "BAD DATA")),
                    };
                    self.data = DataCursor::Item { line, offset };
                    return Ok(val);
                }
            }
        }
    }

    /// Decode the item at `tokens[i]` and return it with the index after.
    fn data_item(&mut self, line: Address, tokens: &[u8], i: usize, var_type: VarType) -> Result<(Val, usize)> {
        let negative = tokens[i] == Token::NEGATE.0;
        let at = if negative { i + 1 } else { i };
        let token = Token(tokens.get(at).copied().unwrap_or(Token::EOL.0));
        let span = token_span(tokens, at);
        let payload = |n: usize| {
            let mut bytes = [0; 4];
            bytes.copy_from_slice(&tokens[at + n..at + n + 4]);
            bytes
        };
        let val = match token {
            Token::INT_CONST if span == 5 => {
                let n = i32::from_be_bytes(payload(1));
                Val::Integer(if negative { n.wrapping_neg() } else { n })
            }
            Token::FLOAT_CONST if span == 5 => {
                let n = f32::from_bits(u32::from_be_bytes(payload(1)));
                Val::Float(if negative { -n } else { n })
            }
            Token::STRING_CONST if !negative && span >= 2 => {
                let len = (span - 2) as u8;
                Val::String(StrRef::new(line + 3 + at as Address + 2, len))
            }
            _ if token.has_name() && !negative && span >= 6 => {
                let name = tokens[at + 2..at + span - 4].to_vec();
                Val::String(self.mem.temp_string(&name)?)
            }
            _ => return Err(error!(SyntaxError; "BAD DATA")),
        };
        Ok((Operation::convert(val, var_type)?, at + span))
    }

    /// `RESTORE [n]` points `READ` at the first `DATA` line at or
    /// after line `n`.
    pub(super) fn restore(&mut self) -> Result<()> {
        let next = self.peek_token();
        let from = if next.is_terminal() || next == Token::ELSE {
            self.read_token();
            self.mem.layout().prog_start
        } else {
            let number = self.line_target()?;
            if !self.at_end() {
                return Err(error!(SyntaxError));
            }
            self.mem
                .find_line(number, false)
                .unwrap_or(self.mem.layout().var_start)
        };
        self.data = DataCursor::Scan(from);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        let fields = split_fields(r#" 1, "A,B" ,x "#);
        assert_eq!(fields, vec![b"1".to_vec(), b"A,B".to_vec(), b"x".to_vec()]);
        assert_eq!(split_fields(""), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_numeric_field() {
        assert_eq!(numeric_field(b"12", VarType::Integer), Some(Val::Integer(12)));
        assert_eq!(numeric_field(b"2.5", VarType::Float), Some(Val::Float(2.5)));
        assert_eq!(numeric_field(b"", VarType::Float), Some(Val::Float(0.0)));
        assert_eq!(numeric_field(b"12X", VarType::Float), None);
    }
}
