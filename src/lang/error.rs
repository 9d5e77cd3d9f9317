use super::{Column, LineNumber};

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    column: Column,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, ..$col:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_column($col)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, ..$col:expr;  $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_column($col)
            .message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error::from_code(code as u16)
    }

    /// Errors raised by the `ERROR` statement may carry any code.
    pub fn from_code(code: u16) -> Error {
        Error {
            code,
            line_number: None,
            column: 0..0,
            message: "",
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn column(&self) -> Column {
        self.column.clone()
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        Error {
            code: self.code,
            line_number: line,
            column: self.column.clone(),
            message: self.message,
        }
    }

    pub fn in_column(&self, column: &Column) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            column: column.clone(),
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            column: self.column.clone(),
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    OutOfData = 4,
    ParameterError = 5,
    Overflow = 6,
    InsufficientMemory = 7,
    InvalidLineNumber = 8,
    SubscriptOutOfRange = 9,
    RedimensionedArray = 10,
    DivisionByZero = 11,
    IllegalDirect = 12,
    TypeConflict = 13,
    OutOfStringSpace = 14,
    StringTooLong = 15,
    ExpressionTooComplex = 16,
    CantContinue = 17,
    NoResume = 18,
    UnexpectedResume = 19,
    UndefinedError = 20,
    MissingOperand = 21,
    StackOverflow = 22,
    StackUnderflow = 23,
    MissingQuote = 24,
    UnexpectedEndOfLine = 25,
    MalformedNumber = 26,
    NeedsParenthesis = 27,
    Undecipherable = 28,
    LineTooLong = 29,
    UnrecognizedSymbol = 30,
    InternalError = 31,
    NameTooLong = 32,
    NotAllowedHere = 33,
    BadCommand = 34,
    UndefinedVariable = 35,
    UndefinedFunction = 36,
    InvalidInput = 37,
    FileNotFound = 38,
    FileIo = 39,
    ParenthesisMismatch = 40,
}

fn code_str(code: u16) -> &'static str {
    match code {
        1 => "NEXT WITHOUT FOR",
        2 => "SYNTAX",
        3 => "RETURN WITHOUT GOSUB",
        4 => "OUT OF DATA",
        5 => "PARAMETER ERROR",
        6 => "ARITHMETIC OVERFLOW",
        7 => "INSUFFICIENT MEMORY",
        8 => "INVALID LINE NUMBER",
        9 => "SUBSCRIPT OUT OF RANGE",
        10 => "REDIMENSIONED ARRAY",
        11 => "DIVIDE BY ZERO",
        12 => "ILLEGAL DIRECT",
        13 => "TYPE CONFLICT",
        14 => "OUT OF STRING SPACE",
        15 => "STRING TOO LONG",
        16 => "EXPRESSION TOO COMPLEX",
        17 => "CAN'T CONTINUE",
        18 => "NO RESUME",
        19 => "UNEXPECTED RESUME",
        20 => "UNDEFINED ERROR",
        21 => "MISSING OPERAND",
        22 => "EXPRESSION STACK OVERFLOW",
        23 => "EXPRESSION STACK UNDERFLOW",
        24 => "MISSING QUOTE",
        25 => "UNEXPECTED END OF LINE",
        26 => "MALFORMED NUMERIC CONSTANT",
        27 => "FUNCTION NEEDS PARENTHESIS",
        28 => "UNDECIFERABLE EXPRESSION",
        29 => "LINE TOO LONG",
        30 => "UNRECOGNIZED SYMBOL",
        31 => "INTERNAL ERROR",
        32 => "VARIABLE NAME TOO LONG",
        33 => "NOT ALLOWED HERE",
        34 => "BAD COMMAND",
        35 => "UNDEFINED VARIABLE",
        36 => "UNDEFINED FUNCTION",
        37 => "INVALID INPUT VALUE",
        38 => "FILE NOT FOUND",
        39 => "FILE I/O",
        40 => "PARENTHESIS MISMATCH",
        _ => "",
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", code_str(*self as u16))
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = code_str(self.code);
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        if (0..0) != self.column {
            suffix.push_str(&format!(" ({}..{})", self.column.start, self.column.end));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "UNPRINTABLE ERROR {}", self.code)
            } else {
                write!(f, "UNPRINTABLE ERROR {} IN{}", self.code, suffix)
            }
        } else if suffix.is_empty() {
            write!(f, "{}", code_str)
        } else {
            write!(f, "{} IN{}", code_str, suffix)
        }
    }
}
