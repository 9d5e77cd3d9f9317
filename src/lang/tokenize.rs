use super::number::{parse_float, parse_int};
use super::token::{match_keyword, Token};
use super::{Error, Line, VarHash, VarType, MAX_LINE_NUMBER};

type Result<T> = std::result::Result<T, Error>;

/// Longest token body a line may hold.
pub const MAX_BODY: usize = 240;

/// Names this long or longer are rejected.
pub const MAX_NAME: usize = 32;

/// Convert one line of source text into a tokenized `Line`.
pub fn tokenize(s: &str) -> Result<Line> {
    Tokenizer::new(s.as_bytes()).run()
}

struct Tokenizer<'a> {
    src: &'a [u8],
    pos: usize,
    body: Vec<u8>,
    last: Token,
    parens: i32,
    assignment: bool,
    start_of_statement: bool,
    jumps: Vec<usize>,
}

fn col(pos: usize) -> std::ops::Range<usize> {
    (pos + 1)..(pos + 2)
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a [u8]) -> Tokenizer<'a> {
        Tokenizer {
            src,
            pos: 0,
            body: vec![],
            last: Token::NONE,
            parens: 0,
            assignment: false,
            start_of_statement: true,
            jumps: vec![],
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_blanks(&mut self) -> Option<u8> {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_whitespace() {
                return Some(ch);
            }
            self.pos += 1;
        }
        None
    }

    fn line_number(&mut self) -> Result<Option<u16>> {
        match self.skip_blanks() {
            Some(ch) if ch.is_ascii_digit() => {}
            _ => return Ok(None),
        }
        let start = self.pos;
        let mut number: u32 = 0;
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            number = (number * 10 + (ch - b'0') as u32).min(u32::from(u16::MAX) + 1);
            self.pos += 1;
        }
        if number == 0 || number > MAX_LINE_NUMBER as u32 {
            return Err(error!(InvalidLineNumber, ..&col(start)));
        }
        Ok(Some(number as u16))
    }

    fn run(mut self) -> Result<Line> {
        let number = self.line_number()?;
        while let Some(ch) = self.skip_blanks() {
            let at = self.pos;
            if let Some((token, len)) = match_keyword(&self.src[self.pos..]) {
                self.pos += len;
                self.keyword(token)?;
            } else if ch.is_ascii_digit() || ch == b'.' {
                self.number()?;
            } else if ch == b'"' {
                self.string()?;
            } else if ch.is_ascii_alphabetic() {
                self.variable()?;
            } else if ch == b'_' {
                self.label();
            } else {
                return Err(error!(UnrecognizedSymbol, ..&col(at)));
            }
            if self.body.len() >= MAX_BODY {
                return Err(error!(LineTooLong, ..&col(at)));
            }
        }
        if self.parens != 0 {
            return Err(error!(ParenthesisMismatch, ..&col(self.pos)));
        }
        self.fix_jumps();
        Ok(Line::new(number, self.body))
    }

    fn keyword(&mut self, mut token: Token) -> Result<()> {
        match token {
            Token::QUESTION => token = Token::PRINT,
            Token::LPAREN => self.parens += 1,
            Token::RPAREN => {
                self.parens -= 1;
                if self.parens < 0 {
                    return Err(error!(ParenthesisMismatch, ..&col(self.pos - 1)));
                }
            }
            Token::LET => self.assignment = true,
            Token::ASSIGN => {
                if self.assignment && self.parens == 0 {
                    self.assignment = false;
                } else {
                    token = Token::EQUAL;
                }
            }
            _ => {}
        }
        if (token == Token::PLUS || token == Token::MINUS) && self.is_pre_unary() {
            if token == Token::PLUS {
                return Ok(());
            }
            if self.last == Token::NEGATE {
                self.body.pop();
                self.last = Token::PLUS;
                return Ok(());
            }
            token = Token::NEGATE;
        }
        self.body.push(token.0);
        self.start_of_statement =
            token == Token::COLON || token == Token::THEN || token == Token::ELSE;
        self.last = token;
        if token == Token::REM || token == Token::APOSTROPHE {
            if self.peek() == Some(b' ') {
                self.pos += 1;
            }
            self.rest_verbatim();
        }
        if token == Token::IF || token == Token::ELSE {
            self.jumps.push(self.body.len());
            self.body.push(0);
        }
        Ok(())
    }

    fn is_pre_unary(&self) -> bool {
        self.last == Token::NONE || self.last.is_pre_unary()
    }

    fn rest_verbatim(&mut self) {
        self.body.extend_from_slice(&self.src[self.pos..]);
        self.pos = self.src.len();
    }

    fn number(&mut self) -> Result<()> {
        let at = self.pos;
        let rest = &self.src[self.pos..];
        let (int, int_len) = parse_int(rest);
        let next = rest.get(int_len).copied().unwrap_or(0);
        if next == b'.' || next.to_ascii_uppercase() == b'E' || int_len == 0 {
            let (float, float_len) = parse_float(rest);
            if float_len == 0 {
                return Err(error!(SyntaxError, ..&col(at)));
            }
            self.body.push(Token::FLOAT_CONST.0);
            self.body.extend_from_slice(&(float as f32).to_bits().to_be_bytes());
            self.last = Token::FLOAT_CONST;
            self.pos += float_len;
        } else {
            self.body.push(Token::INT_CONST.0);
            self.body.extend_from_slice(&int.to_be_bytes());
            self.last = Token::INT_CONST;
            self.pos += int_len;
        }
        self.start_of_statement = false;
        Ok(())
    }

    fn string(&mut self) -> Result<()> {
        self.pos += 1;
        let len_index = self.body.len() + 1;
        self.body.push(Token::STRING_CONST.0);
        self.body.push(0);
        let mut len = 0u8;
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(ch) if self.body.len() < MAX_BODY => {
                    self.body.push(ch);
                    self.pos += 1;
                    len += 1;
                }
                Some(_) => return Err(error!(LineTooLong, ..&col(self.pos))),
                None => return Err(error!(MissingQuote, ..&col(self.pos))),
            }
        }
        self.body[len_index] = len;
        self.last = Token::STRING_CONST;
        self.start_of_statement = false;
        Ok(())
    }

    fn name(&mut self) -> Vec<u8> {
        let mut name = vec![];
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphanumeric() {
                break;
            }
            name.push(ch.to_ascii_uppercase());
            self.pos += 1;
        }
        name
    }

    fn variable(&mut self) -> Result<()> {
        let at = self.pos;
        if self.start_of_statement {
            self.assignment = true;
            self.body.push(Token::IMPLIED_LET.0);
        }
        let name = self.name();
        if name.len() >= MAX_NAME {
            return Err(error!(NameTooLong, ..&col(at)));
        }
        let mut token = match self.peek() {
            Some(b'$') => Token::STRING_VAR,
            Some(b'%') => Token::INT_VAR,
            Some(b'!') | Some(b'#') => Token::FLOAT_VAR,
            _ => Token::NOTYPE_VAR,
        };
        if token != Token::NOTYPE_VAR {
            self.pos += 1;
        }
        if self.skip_blanks() == Some(b'(') {
            token = Token(token.0 + 4);
        }
        let var_type = VarType::from_bits(u32::from(token.0 - Token::NOTYPE_VAR.0));
        self.push_name(token, &name, VarHash::new(var_type, &name));
        self.last = token;
        self.start_of_statement = false;
        Ok(())
    }

    fn push_name(&mut self, token: Token, name: &[u8], hash: VarHash) {
        self.body.push(token.0);
        self.body.push(name.len() as u8);
        self.body.extend_from_slice(name);
        self.body.extend_from_slice(&hash.to_bytes());
    }

    fn label(&mut self) {
        let first = self.body.is_empty();
        self.pos += 1;
        let mut name = self.name();
        name.truncate(MAX_NAME - 1);
        self.push_name(Token::LABEL, &name, VarHash::new(VarType::NoType, &name));
        self.last = Token::LABEL;
        self.start_of_statement = false;
        if first {
            self.rest_verbatim();
        }
    }

    /// Fill in the IF and ELSE jump bytes. An IF jumps to the nearest
    /// ELSE that follows it, an ELSE jumps to the end of the line.
    fn fix_jumps(&mut self) {
        let eol = self.body.len();
        let mut elses: Vec<usize> = vec![];
        for &index in self.jumps.iter().rev() {
            let after = index + 1;
            if self.body[index - 1] == Token::ELSE.0 {
                elses.push(after);
                self.body[index] = (eol - after) as u8;
            } else {
                let target = elses.pop().unwrap_or(eol);
                self.body[index] = (target - after) as u8;
            }
        }
    }
}
