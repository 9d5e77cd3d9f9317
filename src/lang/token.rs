/*!
## Token codes

Every element of a tokenized line starts with one of these byte codes.
The numeric ranges classify them: constants, variables and arrays sit
below 0x10, operators from 0x80, functions from 0xA0 and statements
from 0xC8.

*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u8);

impl Token {
    pub const NONE: Token = Token(0x00);

    pub const INT_CONST: Token = Token(0x01);
    pub const FLOAT_CONST: Token = Token(0x02);
    pub const STRING_CONST: Token = Token(0x03);
    pub const NOTYPE_VAR: Token = Token(0x04);
    pub const INT_VAR: Token = Token(0x05);
    pub const FLOAT_VAR: Token = Token(0x06);
    pub const STRING_VAR: Token = Token(0x07);
    pub const NOTYPE_ARRAY: Token = Token(0x08);
    pub const INT_ARRAY: Token = Token(0x09);
    pub const FLOAT_ARRAY: Token = Token(0x0A);
    pub const STRING_ARRAY: Token = Token(0x0B);
    pub const LABEL: Token = Token(0x0C);
    pub const EOL: Token = Token(0x0D);

    pub const ASSIGN: Token = Token(0x80);
    pub const COMMA: Token = Token(0x81);
    pub const LPAREN: Token = Token(0x82);
    pub const OR: Token = Token(0x83);
    pub const AND: Token = Token(0x84);
    pub const EQUAL: Token = Token(0x85);
    pub const LESS_EQUAL: Token = Token(0x86);
    pub const GREATER_EQUAL: Token = Token(0x87);
    pub const NOT_EQUAL: Token = Token(0x88);
    pub const GREATER: Token = Token(0x89);
    pub const LESS: Token = Token(0x8A);
    pub const PLUS: Token = Token(0x8B);
    pub const MINUS: Token = Token(0x8C);
    pub const MULTIPLY: Token = Token(0x8D);
    pub const DIVIDE: Token = Token(0x8E);
    pub const MODULUS: Token = Token(0x8F);
    pub const NEGATE: Token = Token(0x90);
    pub const NOT: Token = Token(0x91);
    pub const POWER: Token = Token(0x92);
    pub const COLON: Token = Token(0x93);
    pub const SEMICOLON: Token = Token(0x94);
    pub const RPAREN: Token = Token(0x95);
    pub const AT_SIGN: Token = Token(0x96);

    pub const PI: Token = Token(0xA0);
    pub const MEM: Token = Token(0xA1);
    pub const POSX: Token = Token(0xA2);
    pub const POSY: Token = Token(0xA3);
    pub const INKEY: Token = Token(0xA4);
    pub const EXTKEY: Token = Token(0xA5);
    pub const ERR: Token = Token(0xA6);
    pub const ERL: Token = Token(0xA7);
    pub const TIME: Token = Token(0xA8);
    pub const TIMER: Token = Token(0xA9);
    pub const ABS: Token = Token(0xAA);
    pub const ATN: Token = Token(0xAB);
    pub const COS: Token = Token(0xAC);
    pub const EXP: Token = Token(0xAD);
    pub const LOG: Token = Token(0xAE);
    pub const SIN: Token = Token(0xAF);
    pub const SQR: Token = Token(0xB0);
    pub const TAN: Token = Token(0xB1);
    pub const INT: Token = Token(0xB2);
    pub const FIX: Token = Token(0xB3);
    pub const CINT: Token = Token(0xB4);
    pub const CSNG: Token = Token(0xB5);
    pub const LEN: Token = Token(0xB6);
    pub const PEEK: Token = Token(0xB7);
    pub const RND: Token = Token(0xB8);
    pub const SGN: Token = Token(0xB9);
    pub const USR: Token = Token(0xBA);
    pub const VAL: Token = Token(0xBB);
    pub const ASC: Token = Token(0xBC);
    pub const CHR: Token = Token(0xBD);
    pub const STR: Token = Token(0xBE);
    pub const TAB: Token = Token(0xBF);
    pub const STRING: Token = Token(0xC0);
    pub const POINT: Token = Token(0xC1);
    pub const LEFT: Token = Token(0xC2);
    pub const RIGHT: Token = Token(0xC3);
    pub const AT: Token = Token(0xC4);
    pub const INSTR: Token = Token(0xC5);
    pub const MID: Token = Token(0xC6);

    pub const BEGIN: Token = Token(0xC8);
    pub const ELSE: Token = Token(0xC9);
    pub const STEP: Token = Token(0xCA);
    pub const THEN: Token = Token(0xCB);
    pub const TO: Token = Token(0xCC);
    pub const AUTO: Token = Token(0xCD);
    pub const CLEAR: Token = Token(0xCE);
    pub const CLS: Token = Token(0xCF);
    pub const CONT: Token = Token(0xD0);
    pub const DATA: Token = Token(0xD1);
    pub const DEFDBL: Token = Token(0xD2);
    pub const DEFINT: Token = Token(0xD3);
    pub const DEFSNG: Token = Token(0xD4);
    pub const DEFSTR: Token = Token(0xD5);
    pub const DELETE: Token = Token(0xD6);
    pub const DIM: Token = Token(0xD7);
    pub const EDIT: Token = Token(0xD8);
    pub const LOAD: Token = Token(0xD9);
    pub const SAVE: Token = Token(0xDA);
    pub const END: Token = Token(0xDB);
    pub const ERROR: Token = Token(0xDC);
    pub const FOR: Token = Token(0xDD);
    pub const GOSUB: Token = Token(0xDE);
    pub const GOTO: Token = Token(0xDF);
    pub const IF: Token = Token(0xE0);
    pub const INPUT: Token = Token(0xE1);
    pub const FILES: Token = Token(0xE2);
    pub const LET: Token = Token(0xE3);
    pub const LINE: Token = Token(0xE4);
    pub const LIST: Token = Token(0xE5);
    pub const NEW: Token = Token(0xE6);
    pub const NEXT: Token = Token(0xE7);
    pub const ON: Token = Token(0xE8);
    pub const OUT: Token = Token(0xE9);
    pub const PAUSE: Token = Token(0xEA);
    pub const PLOT: Token = Token(0xEB);
    pub const PRINT: Token = Token(0xEC);
    pub const QUESTION: Token = Token(0xED);
    pub const READ: Token = Token(0xEE);
    pub const REM: Token = Token(0xEF);
    pub const APOSTROPHE: Token = Token(0xF0);
    pub const RENUM: Token = Token(0xF1);
    pub const RESTORE: Token = Token(0xF2);
    pub const RESUME: Token = Token(0xF3);
    pub const RETURN: Token = Token(0xF4);
    pub const RUN: Token = Token(0xF5);
    pub const STOP: Token = Token(0xF6);
    pub const UNPLOT: Token = Token(0xF7);
    pub const EXIT: Token = Token(0xF8);
    pub const USING: Token = Token(0xF9);
    pub const POKE: Token = Token(0xFA);
    /// Written in front of an assignment that has no `LET`.
    pub const IMPLIED_LET: Token = Token(0xFB);
}

pub const OPERATOR_START: u8 = 0x80;
pub const FUNCTION_START: u8 = 0xA0;
pub const COMMAND_START: u8 = 0xC8;

/// Operator spellings in token order.
pub const OPERATORS: &[&str] = &[
    "=", ",", "(", "OR", "AND", "=", "<=", ">=", "<>", ">", "<", "+", "-", "*", "/", "MOD", "-",
    "NOT", "^", ":", ";", ")", "@",
];

/// Function names in token order, grouped by argument count.
pub const FUNCTIONS: &[&str] = &[
    "PI", "MEM", "POSX", "POSY", "INKEY$", "EXTKEY", "ERR", "ERL", "TIME$", "TIMER", "ABS",
    "ATN", "COS", "EXP", "LOG", "SIN", "SQR", "TAN", "INT", "FIX", "CINT", "CSNG", "LEN", "PEEK",
    "RND", "SGN", "USR", "VAL", "ASC", "CHR$", "STR$", "TAB", "STRING$", "POINT", "LEFT$",
    "RIGHT$", "AT", "INSTR", "MID$",
];

/// Statement keywords in token order.
pub const COMMANDS: &[&str] = &[
    "BEGIN", "ELSE", "STEP", "THEN", "TO", "AUTO", "CLEAR", "CLS", "CONT", "DATA", "DEFDBL",
    "DEFINT", "DEFSNG", "DEFSTR", "DELETE", "DIM", "EDIT", "LOAD", "SAVE", "END", "ERROR", "FOR",
    "GOSUB", "GOTO", "IF", "INPUT", "FILES", "LET", "LINE", "LIST", "NEW", "NEXT", "ON", "OUT",
    "PAUSE", "PLOT", "PRINT", "?", "READ", "REM", "'", "RENUM", "RESTORE", "RESUME", "RETURN",
    "RUN", "STOP", "UNPLOT", "EXIT", "USING", "POKE",
];

/// Search one keyword table for the entry spelled at the start of `s`.
/// Among entries that match, the longest wins and the earlier entry
/// wins a tie.
fn match_table(table: &[&str], s: &[u8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (index, word) in table.iter().enumerate() {
        let word = word.as_bytes();
        if word.len() > s.len() {
            continue;
        }
        if !word
            .iter()
            .zip(s.iter())
            .all(|(w, c)| *w == c.to_ascii_uppercase())
        {
            continue;
        }
        match best {
            Some((_, len)) if len >= word.len() => {}
            _ => best = Some((index, word.len())),
        }
    }
    best
}

/// Match a keyword at the start of `s`. Tables are searched in order:
/// operators, statements, functions. Returns the token and the number
/// of bytes it spans.
pub fn match_keyword(s: &[u8]) -> Option<(Token, usize)> {
    if let Some((index, len)) = match_table(OPERATORS, s) {
        return Some((Token(OPERATOR_START + index as u8), len));
    }
    if let Some((index, len)) = match_table(COMMANDS, s) {
        return Some((Token(COMMAND_START + index as u8), len));
    }
    if let Some((index, len)) = match_table(FUNCTIONS, s) {
        return Some((Token(FUNCTION_START + index as u8), len));
    }
    None
}

impl Token {
    pub fn is_constant(self) -> bool {
        self >= Token::INT_CONST && self <= Token::STRING_CONST
    }

    pub fn is_variable(self) -> bool {
        self >= Token::NOTYPE_VAR && self <= Token::STRING_VAR
    }

    pub fn is_array(self) -> bool {
        self >= Token::NOTYPE_ARRAY && self <= Token::STRING_ARRAY
    }

    /// Tokens followed by a name and a hash.
    pub fn has_name(self) -> bool {
        self.is_variable() || self.is_array() || self == Token::LABEL
    }

    /// Operators the evaluator applies, `OR` through `^`.
    pub fn is_operator(self) -> bool {
        self >= Token::OR && self <= Token::POWER
    }

    pub fn is_function(self) -> bool {
        self >= Token::PI && self <= Token::MID
    }

    /// Functions that take no argument list.
    pub fn is_niladic(self) -> bool {
        self >= Token::PI && self < Token::ABS
    }

    pub fn is_command(self) -> bool {
        self >= Token::BEGIN && self <= Token::IMPLIED_LET
    }

    pub fn is_unary(self) -> bool {
        self == Token::NEGATE || self == Token::NOT
    }

    /// Number of arguments a function call must have.
    pub fn arity(self) -> usize {
        match self.0 {
            0xA0..=0xA9 => 0,
            0xAA..=0xBF => 1,
            0xC0..=0xC5 => 2,
            0xC6 => 3,
            _ => 0,
        }
    }

    /// Statement boundary: end of line or `:`.
    pub fn is_terminal(self) -> bool {
        self == Token::EOL || self == Token::COLON
    }

    /// Tokens after which a `+` or `-` is unary.
    pub fn is_pre_unary(self) -> bool {
        (self.0 >= OPERATOR_START && self.0 < Token::AT_SIGN.0 + 1 && self != Token::RPAREN)
            || self.is_command()
    }

    pub fn precedence(self) -> u8 {
        if !(self.0 >= OPERATOR_START && self.0 <= Token::AT_SIGN.0) {
            return 0;
        }
        let p = self.0 - OPERATOR_START + 1;
        match p {
            7..=11 => 6,
            13 => 12,
            15 | 16 => 14,
            _ => p,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == Token::NOT || self == Token::NEGATE || self == Token::POWER
    }

    /// Keyword spelling, or `None` for tokens that carry data.
    pub fn keyword(self) -> Option<&'static str> {
        let n = self.0;
        if n >= OPERATOR_START && n <= Token::AT_SIGN.0 {
            OPERATORS.get((n - OPERATOR_START) as usize).copied()
        } else if n >= FUNCTION_START && n <= Token::MID.0 {
            FUNCTIONS.get((n - FUNCTION_START) as usize).copied()
        } else if n >= COMMAND_START && n < Token::IMPLIED_LET.0 {
            COMMANDS.get((n - COMMAND_START) as usize).copied()
        } else {
            None
        }
    }
}

/// Length of the token at `tokens[i]` with its payload. `REM`, `'` and a
/// label that starts the line run to the end of the slice.
pub fn token_span(tokens: &[u8], i: usize) -> usize {
    let token = match tokens.get(i) {
        Some(&t) => Token(t),
        None => return 0,
    };
    let byte = |j: usize| tokens.get(j).copied().unwrap_or(0) as usize;
    let span = match token {
        Token::INT_CONST | Token::FLOAT_CONST => 5,
        Token::STRING_CONST => 2 + byte(i + 1),
        Token::LABEL if i == 0 => tokens.len(),
        Token::REM | Token::APOSTROPHE => tokens.len() - i,
        Token::IF | Token::ELSE => 2,
        _ if token.has_name() => 6 + byte(i + 1),
        _ => 1,
    };
    span.min(tokens.len() - i)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.keyword() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "<{:02X}>", self.0),
        }
    }
}
