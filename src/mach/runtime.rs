use super::eval::{Item, Pending};
use super::{
    Address, Config, ControlStack, DiskFiles, Display, FileSystem, KeyQueue, Keyboard, Memory,
    NumericFormatter, RamStore, Resume, Screen, Stack, StdFormatter, StrRef,
};
use crate::error;
use crate::lang::{token::Token, tokenize, Error, Line, LineNumber, VarHash, DIRECT_LINE};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

type Result<T> = std::result::Result<T, Error>;

/// ## Events
///
/// `execute` reports what the host must do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Nothing to run. The host reads a line and calls `enter`.
    Stopped,
    /// The cycle budget ran out; call `execute` again.
    Running,
    Print(String),
    /// Show the prompt and pass the answer to `enter`.
    Input(String),
    Errors(Arc<Vec<Error>>),
}

/// Where `READ` finds its next item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum DataCursor {
    /// Search for a `DATA` line starting with the record at this address.
    Scan(Address),
    /// Inside the `DATA` line at `line`, `offset` bytes into its tokens.
    Item { line: Address, offset: usize },
}

/// An `INPUT` statement waiting on the host.
#[derive(Debug, Clone)]
pub(super) struct PendingInput {
    pub prompt: String,
    pub answer: Option<String>,
    /// Variables already assigned by earlier answers.
    pub done: usize,
}

/// ## Virtual machine
///
/// Executes the tokenized program in place. `enter` feeds it lines,
/// `execute` runs statements until the cycle budget runs out or the
/// host has something to do.
pub struct Runtime {
    pub(super) mem: Memory,
    pub(super) control: ControlStack,
    pub(super) calc: Stack<Item>,
    pub(super) ops: Stack<Pending>,
    pub(super) args: Stack<u8>,
    pub(super) params: Stack<bool>,
    pub(super) config: Config,
    pub(super) display: Box<dyn Display>,
    pub(super) keyboard: Box<dyn Keyboard>,
    pub(super) files: Box<dyn FileSystem>,
    pub(super) formatter: Box<dyn NumericFormatter>,
    pub(super) rng: StdRng,
    pub(super) started: Instant,
    /// Last token read from the stream.
    pub(super) cur: Token,
    pub(super) line: LineNumber,
    /// First byte of the statement executing.
    pub(super) stmt_addr: Address,
    pub(super) running: bool,
    jumped: bool,
    pub(super) cont: Option<Resume>,
    pub(super) trap_line: u16,
    pub(super) resume: Option<Resume>,
    pub(super) last_error: (u16, LineNumber),
    pub(super) data: DataCursor,
    pub(super) auto: Option<(u16, u16)>,
    pub(super) input: Option<PendingInput>,
    pub(super) exited: bool,
    output: String,
    errors: Vec<Error>,
    interrupted: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Runtime {
        let display = Box::new(Screen::new(config.columns, config.rows));
        Runtime::with_devices(
            config,
            display,
            Box::new(KeyQueue::default()),
            Box::new(DiskFiles::from_env()),
            Box::new(StdFormatter),
        )
    }

    pub fn with_devices(
        config: Config,
        display: Box<dyn Display>,
        keyboard: Box<dyn Keyboard>,
        files: Box<dyn FileSystem>,
        formatter: Box<dyn NumericFormatter>,
    ) -> Runtime {
        let mem = Memory::new(Box::new(RamStore::new(config.ram_top)), &config);
        let prog_start = mem.layout().prog_start;
        Runtime {
            mem,
            control: ControlStack::new(),
            calc: Stack::new(config.calc_capacity),
            ops: Stack::new(config.operator_capacity),
            args: Stack::new(config.argument_capacity),
            params: Stack::new(config.parameter_capacity),
            config,
            display,
            keyboard,
            files,
            formatter,
            rng: StdRng::from_entropy(),
            started: Instant::now(),
            cur: Token::EOL,
            line: None,
            stmt_addr: 0,
            running: false,
            jumped: false,
            cont: None,
            trap_line: 0,
            resume: None,
            last_error: (0, None),
            data: DataCursor::Scan(prog_start),
            auto: None,
            input: None,
            exited: false,
            output: String::new(),
            errors: vec![],
            interrupted: false,
        }
    }

    /// Enter a line of text. An answer when `INPUT` is waiting, a
    /// program line when numbered, otherwise a direct mode statement.
    /// Returns false when the line did not tokenize.
    pub fn enter(&mut self, text: &str) -> bool {
        if let Some(input) = &mut self.input {
            if input.answer.is_none() {
                input.answer = Some(text.to_string());
                return true;
            }
        }
        let text = match self.auto {
            Some(_) if text.trim().is_empty() => {
                self.auto = None;
                return true;
            }
            Some((number, _)) => format!("{} {}", number, text),
            None => text.to_string(),
        };
        let line = match tokenize(&text) {
            Ok(line) => line,
            Err(error) => {
                self.errors.push(error);
                return false;
            }
        };
        if line.is_direct() {
            if !line.is_empty() {
                self.run_direct(&line);
            }
            return true;
        }
        self.running = false;
        self.input = None;
        self.clear_variables();
        if let Err(error) = self.mem.store_line(&line) {
            self.errors.push(error);
            return false;
        }
        if let (Some((number, step)), Some(entered)) = (self.auto, line.number()) {
            if entered == number {
                self.next_auto(number, step);
            }
        }
        true
    }

    /// Request a break. Honoured at the next line boundary.
    pub fn interrupt(&mut self) {
        if self.input.is_some() {
            self.input = None;
            self.break_in();
        } else if self.running {
            self.interrupted = true;
        }
    }

    /// True once `EXIT` has run.
    pub fn exited(&self) -> bool {
        self.exited
    }

    /// Detokenized program text, one line per record.
    pub fn listing(&self) -> String {
        let mut s = String::new();
        for addr in self.mem.lines() {
            s.push_str(&self.mem.line(addr).to_string());
            s.push('\n');
        }
        s
    }

    /// Run up to `cycles` statements.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.pending_event() {
            return event;
        }
        for _ in 0..cycles {
            if !self.running || self.waiting() {
                break;
            }
            if let Err(error) = self.step() {
                self.fail(error);
            }
            let out = self.display.take_output();
            if !out.is_empty() {
                self.output.push_str(&out);
                break;
            }
        }
        match self.pending_event() {
            Some(event) => event,
            None => Event::Running,
        }
    }

    fn waiting(&self) -> bool {
        match &self.input {
            Some(input) => input.answer.is_none(),
            None => false,
        }
    }

    fn pending_event(&mut self) -> Option<Event> {
        let out = self.display.take_output();
        self.output.push_str(&out);
        if !self.output.is_empty() {
            return Some(Event::Print(std::mem::take(&mut self.output)));
        }
        if !self.errors.is_empty() {
            return Some(Event::Errors(Arc::new(std::mem::take(&mut self.errors))));
        }
        if let Some(input) = &self.input {
            if input.answer.is_none() {
                return Some(Event::Input(input.prompt.clone()));
            }
        }
        if !self.running {
            self.interrupted = false;
            return Some(Event::Stopped);
        }
        None
    }

    fn run_direct(&mut self, line: &Line) {
        self.input = None;
        self.interrupted = false;
        let addr = self.mem.store_direct(line);
        self.running = true;
        self.enter_line(addr);
    }

    pub(super) fn next_auto(&mut self, number: u16, step: u16) {
        match number.checked_add(step) {
            Some(next) if next <= crate::lang::MAX_LINE_NUMBER => {
                self.auto = Some((next, step));
                self.print_str(&format!("{} ", next));
            }
            _ => self.auto = None,
        }
    }

    /// Start executing the record at `addr`.
    fn enter_line(&mut self, addr: Address) {
        self.mem.stream.set_position(addr);
        let number = self.mem.stream.read_word();
        self.mem.stream.read_byte();
        self.line = if number == DIRECT_LINE {
            None
        } else {
            Some(number)
        };
        self.cur = Token::COLON;
        self.jumped = true;
    }

    /// Execute one statement.
    fn step(&mut self) -> Result<()> {
        if self.cur == Token::ELSE {
            self.skip_else();
        }
        if self.cur == Token::EOL {
            let addr = self.mem.stream.position();
            if addr >= self.mem.layout().var_start {
                self.running = false;
                return Ok(());
            }
            self.enter_line(addr);
        }
        if std::mem::take(&mut self.jumped) && self.break_requested() {
            self.break_in();
            return Ok(());
        }
        self.mem.temp_reset();
        self.stmt_addr = self.mem.stream.position();
        let token = self.read_token();
        self.statement(token)?;
        if !self.at_end() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    fn statement(&mut self, token: Token) -> Result<()> {
        match token {
            Token::EOL | Token::COLON => Ok(()),
            Token::ELSE => {
                self.cur = Token::ELSE;
                Ok(())
            }
            Token::LET | Token::IMPLIED_LET => self.r#let(),
            Token::AUTO => self.auto_cmd(),
            Token::CLEAR => self.clear_cmd(),
            Token::CLS => self.cls(),
            Token::CONT => self.cont_cmd(),
            Token::DATA | Token::OUT | Token::POKE => self.skip_statement(),
            Token::DEFDBL | Token::DEFINT | Token::DEFSNG | Token::DEFSTR => self.def_type(token),
            Token::DELETE => self.delete(),
            Token::DIM => self.dim(),
            Token::EDIT => self.edit(),
            Token::END => self.end(),
            Token::ERROR => self.error_cmd(),
            Token::EXIT => self.exit(),
            Token::FILES => self.files_cmd(),
            Token::FOR => self.r#for(),
            Token::GOSUB => self.gosub(),
            Token::GOTO => self.goto(),
            Token::IF => self.r#if(),
            Token::INPUT => self.input_cmd(false),
            Token::LABEL | Token::REM | Token::APOSTROPHE => {
                self.skip_to_eol();
                Ok(())
            }
            Token::LINE => self.line_input(),
            Token::LIST => self.list(),
            Token::LOAD => self.load(),
            Token::NEW => self.new_cmd(),
            Token::NEXT => self.next(),
            Token::ON => self.on(),
            Token::PAUSE => self.pause(),
            Token::PLOT => self.plot_cmd(true),
            Token::PRINT => self.print(),
            Token::READ => self.read(),
            Token::RENUM => self.renum(),
            Token::RESTORE => self.restore(),
            Token::RESUME => self.resume_cmd(),
            Token::RETURN => self.r#return(),
            Token::RUN => self.run(),
            Token::SAVE => self.save(),
            Token::STOP => self.stop(),
            Token::UNPLOT => self.plot_cmd(false),
            _ => Err(error!(BadCommand)),
        }
    }

    /// Decide between trapping and reporting an error.
    fn fail(&mut self, error: Error) {
        let error = match error.line_number() {
            Some(_) => error,
            None => error.in_line_number(self.line),
        };
        self.last_error = (error.code(), self.line);
        self.input = None;
        if self.trap_line != 0 && self.resume.is_none() {
            debug!("{} trapped to line {}", error, self.trap_line);
            self.resume = Some(Resume {
                addr: self.stmt_addr,
                line: self.line,
            });
            if let Err(error) = self.goto_line(self.trap_line) {
                self.report(error.in_line_number(self.line));
            }
            return;
        }
        self.report(error);
    }

    fn report(&mut self, error: Error) {
        debug!("stopped by {}", error);
        self.errors.push(error);
        self.running = false;
        self.cont = None;
        self.resume = None;
    }

    fn break_requested(&mut self) -> bool {
        let interrupted = std::mem::take(&mut self.interrupted);
        self.keyboard.take_break() || interrupted
    }

    /// Halt at the current statement so `CONT` can pick it up.
    pub(super) fn break_in(&mut self) {
        let at = Resume {
            addr: self.mem.stream.position(),
            line: self.line,
        };
        self.halt(at);
    }

    /// Stop with `CONT` set to pick up at `at`.
    pub(super) fn halt(&mut self, at: Resume) {
        match self.line {
            Some(number) => {
                self.cont = if at.addr == 0 { None } else { Some(at) };
                self.print_str(&format!("BREAK IN {}\n", number));
            }
            None => self.print_str("BREAK\n"),
        }
        debug!("break at {:04X}", at.addr);
        self.running = false;
    }

    /// Forget variables, arrays, loops, strings and error state.
    pub(super) fn clear_variables(&mut self) {
        self.mem.clear_variables();
        self.control.clear();
        self.cont = None;
        self.data = DataCursor::Scan(self.mem.layout().prog_start);
        self.trap_line = 0;
        self.resume = None;
    }

    pub(super) fn print_str(&mut self, s: &str) {
        for &ch in s.as_bytes() {
            self.display.put_char(ch);
        }
    }

    pub(super) fn read_token(&mut self) -> Token {
        self.cur = Token(self.mem.stream.read_byte());
        self.cur
    }

    pub(super) fn peek_token(&mut self) -> Token {
        Token(self.mem.stream.peek_byte())
    }

    pub(super) fn read_int(&mut self) -> i32 {
        i32::from_be_bytes(self.mem.stream.read_long())
    }

    pub(super) fn read_float(&mut self) -> f32 {
        f32::from_bits(u32::from_be_bytes(self.mem.stream.read_long()))
    }

    /// A string constant is used where it sits.
    pub(super) fn read_str(&mut self) -> StrRef {
        let len = self.mem.stream.read_byte();
        let addr = self.mem.stream.position();
        self.mem.stream.skip(len as usize);
        StrRef::new(addr, len)
    }

    pub(super) fn read_hash(&mut self) -> VarHash {
        let len = self.mem.stream.read_byte();
        self.mem.stream.skip(len as usize);
        VarHash::from_bytes(self.mem.stream.read_long())
    }

    /// Read a token and step over whatever it carries.
    pub(super) fn skip_token(&mut self) -> Token {
        let token = self.read_token();
        match token {
            Token::INT_CONST | Token::FLOAT_CONST => self.mem.stream.skip(4),
            Token::STRING_CONST => {
                let len = self.mem.stream.read_byte();
                self.mem.stream.skip(len as usize);
            }
            Token::IF | Token::ELSE => self.mem.stream.skip(1),
            Token::REM | Token::APOSTROPHE => self.skip_to_eol(),
            _ if token.has_name() => {
                self.read_hash();
            }
            _ => {}
        }
        self.cur
    }

    /// Consume bytes up to and including the CR.
    pub(super) fn skip_to_eol(&mut self) {
        while self.mem.stream.read_byte() != Token::EOL.0 {}
        self.cur = Token::EOL;
    }

    /// Step over the rest of a statement.
    pub(super) fn skip_statement(&mut self) -> Result<()> {
        while !self.at_end() {
            self.skip_token();
        }
        Ok(())
    }

    /// An `ELSE` reached after a taken `THEN` ends the line.
    pub(super) fn skip_else(&mut self) {
        let offset = self.mem.stream.read_byte();
        self.mem.stream.skip(offset as usize);
        self.read_token();
    }

    /// The current token ends the statement.
    pub(super) fn at_end(&self) -> bool {
        self.cur.is_terminal() || self.cur == Token::ELSE
    }

    /// Read the next token, which must end the statement.
    pub(super) fn expect_end(&mut self) -> Result<()> {
        self.read_token();
        if self.at_end() {
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    pub(super) fn expect(&mut self, token: Token) -> Result<()> {
        if self.read_token() == token {
            Ok(())
        } else {
            Err(error!(SyntaxError))
        }
    }

    pub(super) fn line_address(&self, number: u16) -> Result<Address> {
        match self.mem.find_line(number, true) {
            Some(addr) => Ok(addr),
            None => Err(error!(InvalidLineNumber)),
        }
    }

    pub(super) fn goto_line(&mut self, number: u16) -> Result<()> {
        let addr = self.line_address(number)?;
        self.jump(Resume {
            addr: addr + 3,
            line: Some(number),
        });
        Ok(())
    }

    /// Continue at `to`. Address zero is the end of the program.
    pub(super) fn jump(&mut self, to: Resume) {
        if to.addr == 0 {
            self.running = false;
            self.cur = Token::EOL;
            return;
        }
        trace!("jump to {:04X} in {:?}", to.addr, to.line);
        self.mem.stream.set_position(to.addr);
        self.line = to.line;
        self.cur = Token::COLON;
        self.jumped = true;
        self.running = true;
    }

    /// Where the statement after the current one starts.
    pub(super) fn next_statement(&mut self) -> Resume {
        if self.cur == Token::ELSE {
            self.skip_else();
        }
        let pos = self.mem.stream.position();
        if self.cur != Token::EOL {
            return Resume {
                addr: pos,
                line: self.line,
            };
        }
        if pos >= self.mem.layout().var_start {
            Resume { addr: 0, line: None }
        } else {
            Resume {
                addr: pos + 3,
                line: Some(self.mem.line_number_at(pos)),
            }
        }
    }
}
