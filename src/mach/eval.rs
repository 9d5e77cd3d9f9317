use super::{Address, Operation, Runtime, StrRef, Val};
use crate::error;
use crate::lang::{token::Token, Error, VarHash, VarType, MAX_LINE_NUMBER};
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// Entry on the calculation stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item {
    Value(Val),
    /// Slot an assignment writes to.
    Target(Address, VarType),
}

/// How an array reference is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Access {
    Read,
    Target,
    Declare,
}

/// Entry on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pending {
    Operator(Token),
    Paren,
    Function(Token),
    Array(VarHash, Access),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Read,
    /// The first variable outside parentheses is a target.
    Assign,
    /// Variables and arrays outside parentheses are declared.
    Dim,
}

fn item_value(item: Item) -> Result<Val> {
    match item {
        Item::Value(val) => Ok(val),
        Item::Target(..) => Err(error!(SyntaxError)),
    }
}

fn subscript(val: &Val) -> Result<i32> {
    match val {
        Val::Integer(n) => Ok(*n),
        Val::Float(n) => Ok(*n as i32),
        Val::String(_) => Err(error!(TypeConflict)),
    }
}

/// ## Expression evaluator
///
/// Operator precedence parsing over four bounded stacks instead of
/// recursion. Values go to `calc`; operators, open parentheses, pending
/// function calls and array references wait on `ops`. For every open call
/// `args` counts completed arguments and `params` records whether the
/// current argument has received anything yet.
impl Runtime {
    /// Evaluate from the stream position. Stops at the first token that
    /// cannot continue the expression and leaves it in `cur`.
    pub(super) fn expression(&mut self, mode: Mode) -> Result<()> {
        self.calc.clear();
        self.ops.clear();
        self.args.clear();
        self.params.clear();
        let mut parens = 0;
        let mut want_target = mode == Mode::Assign;
        loop {
            let token = self.read_token();
            match token {
                Token::INT_CONST => {
                    let n = self.read_int();
                    self.operand(Val::Integer(n))?;
                }
                Token::FLOAT_CONST => {
                    let n = self.read_float();
                    self.operand(Val::Float(n))?;
                }
                Token::STRING_CONST => {
                    let s = self.read_str();
                    self.operand(Val::String(s))?;
                }
                _ if token.is_variable() => {
                    let hash = self.read_hash();
                    let hash = self.mem.resolve(hash);
                    if parens == 0 && want_target {
                        want_target = false;
                        let addr = self.mem.var_for_assign(hash)?;
                        self.mark_param()?;
                        self.calc.push(Item::Target(addr, hash.var_type()))?;
                    } else if parens == 0 && mode == Mode::Dim {
                        self.mem.var_for_assign(hash)?;
                    } else {
                        let addr = match self.mem.find_var(hash) {
                            Some(addr) => addr,
                            None => return Err(error!(UndefinedVariable)),
                        };
                        let val = self.mem.read_val(addr, hash.var_type());
                        self.operand(val)?;
                    }
                }
                _ if token.is_array() => {
                    let hash = self.read_hash();
                    let hash = self.mem.resolve(hash);
                    let access = if parens == 0 && want_target {
                        want_target = false;
                        Access::Target
                    } else if parens == 0 && mode == Mode::Dim {
                        if let Some(base) = self.mem.find_array(hash) {
                            self.mem.delete_array(base);
                        }
                        Access::Declare
                    } else {
                        Access::Read
                    };
                    self.open_call(Pending::Array(hash, access))?;
                }
                _ if token.is_niladic() => {
                    let val = self.call(token, vec![])?;
                    self.operand(val)?;
                }
                _ if token.is_function() => {
                    if self.peek_token() != Token::LPAREN {
                        return Err(error!(NeedsParenthesis));
                    }
                    self.open_call(Pending::Function(token))?;
                }
                Token::LPAREN => {
                    self.ops.push(Pending::Paren)?;
                    parens += 1;
                }
                Token::COMMA => {
                    if parens == 0 {
                        break;
                    }
                    self.reduce_to_paren(error!(ParameterError))?;
                    match self.ops.peek(1) {
                        Ok(Pending::Function(_)) | Ok(Pending::Array(..)) => {}
                        _ => return Err(error!(ParameterError)),
                    }
                    if !self.params.pop()? {
                        return Err(error!(ParameterError));
                    }
                    let count = self.args.pop()?;
                    self.args.push(count + 1)?;
                    self.params.push(false)?;
                }
                Token::RPAREN => {
                    if parens == 0 {
                        return Err(error!(ParenthesisMismatch));
                    }
                    parens -= 1;
                    self.reduce_to_paren(error!(ParenthesisMismatch))?;
                    self.ops.pop()?;
                    match self.ops.peek(0) {
                        Ok(&call @ Pending::Function(_)) | Ok(&call @ Pending::Array(..)) => {
                            self.ops.pop()?;
                            self.close_call(call)?;
                        }
                        _ => {}
                    }
                }
                Token::ASSIGN => self.ops.push(Pending::Operator(token))?,
                _ if token.is_operator() => self.push_operator(token)?,
                _ => break,
            }
        }
        while !self.ops.is_empty() {
            match self.ops.pop()? {
                Pending::Operator(Token::ASSIGN) => self.store()?,
                Pending::Operator(op) => self.apply(op)?,
                Pending::Paren => return Err(error!(ParenthesisMismatch)),
                Pending::Function(_) | Pending::Array(..) => return Err(error!(NeedsParenthesis)),
            }
        }
        Ok(())
    }

    /// Evaluate to exactly one value.
    pub(super) fn eval(&mut self) -> Result<Val> {
        self.expression(Mode::Read)?;
        let val = match self.calc.pop() {
            Ok(item) => item_value(item)?,
            Err(_) => return Err(error!(MissingOperand)),
        };
        if !self.calc.is_empty() {
            return Err(error!(Undecipherable));
        }
        Ok(val)
    }

    pub(super) fn eval_int(&mut self) -> Result<i32> {
        match self.eval()? {
            Val::Integer(n) => Ok(n),
            Val::Float(n) => Ok(n as i32),
            Val::String(_) => Err(error!(TypeConflict)),
        }
    }

    pub(super) fn eval_string(&mut self) -> Result<StrRef> {
        match self.eval()? {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeConflict)),
        }
    }

    pub(super) fn eval_line_number(&mut self) -> Result<u16> {
        let n = self.eval_int()?;
        if n < 1 || n > MAX_LINE_NUMBER as i32 {
            return Err(error!(InvalidLineNumber));
        }
        Ok(n as u16)
    }

    /// Run an assignment statement.
    pub(super) fn assign(&mut self) -> Result<()> {
        self.expression(Mode::Assign)?;
        if !self.calc.is_empty() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    /// Parse one variable or array element to be written.
    pub(super) fn target(&mut self) -> Result<(Address, VarType)> {
        self.expression(Mode::Assign)?;
        match self.calc.pop() {
            Ok(Item::Target(addr, var_type)) if self.calc.is_empty() => Ok((addr, var_type)),
            _ => Err(error!(SyntaxError)),
        }
    }

    /// Parse declarations up to the end of a `DIM` item.
    pub(super) fn declare(&mut self) -> Result<()> {
        self.expression(Mode::Dim)?;
        if !self.calc.is_empty() {
            return Err(error!(SyntaxError));
        }
        Ok(())
    }

    fn mark_param(&mut self) -> Result<()> {
        if !self.params.is_empty() {
            self.params.pop()?;
            self.params.push(true)?;
        }
        Ok(())
    }

    fn operand(&mut self, val: Val) -> Result<()> {
        self.mark_param()?;
        self.calc.push(Item::Value(val))
    }

    fn open_call(&mut self, call: Pending) -> Result<()> {
        self.mark_param()?;
        self.ops.push(call)?;
        self.args.push(0)?;
        self.params.push(false)
    }

    fn close_call(&mut self, call: Pending) -> Result<()> {
        let count = self.args.pop()? as usize;
        if !self.params.pop()? {
            return Err(error!(ParameterError));
        }
        let items = self.calc.pop_n(count + 1)?;
        let values = items
            .into_iter()
            .map(item_value)
            .collect::<Result<Vec<Val>>>()?;
        match call {
            Pending::Function(token) => {
                let val = self.call(token, values)?;
                self.calc.push(Item::Value(val))
            }
            Pending::Array(hash, access) => {
                let subs = values.iter().map(subscript).collect::<Result<Vec<i32>>>()?;
                if access == Access::Declare {
                    self.create_array(hash, &subs)?;
                    return Ok(());
                }
                let base = match self.mem.find_array(hash) {
                    Some(base) => base,
                    None => {
                        let bounds = vec![self.config.default_bound; subs.len()];
                        self.create_array(hash, &bounds)?
                    }
                };
                let addr = self.mem.element_address(base, &subs)?;
                let var_type = hash.var_type();
                if access == Access::Target {
                    self.calc.push(Item::Target(addr, var_type))
                } else {
                    let val = self.mem.read_val(addr, var_type);
                    self.calc.push(Item::Value(val))
                }
            }
            _ => Err(error!(InternalError; "NOT A CALL")),
        }
    }

    /// Create an array while temporary strings are on the stack. The
    /// temporaries move up with everything above the array store.
    fn create_array(&mut self, hash: VarHash, bounds: &[i32]) -> Result<Address> {
        let from = self.mem.layout().gosub_bot;
        let base = self.mem.create_array(hash, bounds)?;
        let by = self.mem.layout().gosub_bot - from;
        let until = self.mem.layout().temp_top - by;
        for item in self.calc.iter_mut() {
            match item {
                Item::Value(Val::String(s)) if s.addr >= from && s.addr < until => s.addr += by,
                Item::Target(addr, _) if *addr >= from && *addr < until => *addr += by,
                _ => {}
            }
        }
        Ok(base)
    }

    /// Apply operators down to the innermost open parenthesis, which
    /// stays on the stack.
    fn reduce_to_paren(&mut self, missing: Error) -> Result<()> {
        loop {
            match self.ops.peek(0) {
                Ok(Pending::Paren) => return Ok(()),
                Ok(&Pending::Operator(op)) if op.is_operator() => {
                    self.ops.pop()?;
                    self.apply(op)?;
                }
                _ => return Err(missing),
            }
        }
    }

    fn push_operator(&mut self, token: Token) -> Result<()> {
        if !token.is_unary() {
            while let Ok(&Pending::Operator(top)) = self.ops.peek(0) {
                if !top.is_operator() {
                    break;
                }
                let done = if token.is_right_associative() {
                    token.precedence() >= top.precedence()
                } else {
                    token.precedence() > top.precedence()
                };
                if done {
                    break;
                }
                self.ops.pop()?;
                self.apply(top)?;
            }
        }
        self.ops.push(Pending::Operator(token))
    }

    fn operand_at(&self, depth: usize) -> Result<Val> {
        match self.calc.peek(depth) {
            Ok(Item::Value(val)) => Ok(*val),
            Ok(Item::Target(..)) => Err(error!(SyntaxError)),
            Err(_) => Err(error!(MissingOperand)),
        }
    }

    /// Apply one operator. Operands stay on the stack when it fails.
    fn apply(&mut self, op: Token) -> Result<()> {
        if op.is_unary() {
            let val = self.operand_at(0)?;
            let result = if op == Token::NEGATE {
                Operation::negate(val)?
            } else {
                Operation::not(val)?
            };
            self.calc.pop()?;
            return self.calc.push(Item::Value(result));
        }
        let rhs = self.operand_at(0)?;
        let lhs = self.operand_at(1)?;
        let result = match (lhs, rhs) {
            (Val::String(l), Val::String(r)) => self.string_operation(op, l, r)?,
            (Val::String(_), _) | (_, Val::String(_)) => return Err(error!(TypeConflict)),
            _ => match op {
                Token::OR => Operation::or(lhs, rhs)?,
                Token::AND => Operation::and(lhs, rhs)?,
                Token::PLUS => Operation::sum(lhs, rhs)?,
                Token::MINUS => Operation::subtract(lhs, rhs)?,
                Token::MULTIPLY => Operation::multiply(lhs, rhs)?,
                Token::DIVIDE => Operation::divide(lhs, rhs)?,
                Token::MODULUS => Operation::modulus(lhs, rhs)?,
                Token::POWER => Operation::power(lhs, rhs)?,
                _ => Val::from_bool(compare(op, Operation::compare(lhs, rhs)?)?),
            },
        };
        self.calc.pop_2()?;
        self.calc.push(Item::Value(result))
    }

    fn string_operation(&mut self, op: Token, lhs: StrRef, rhs: StrRef) -> Result<Val> {
        let l = self.mem.string_bytes(lhs);
        let r = self.mem.string_bytes(rhs);
        if op == Token::PLUS {
            if l.len() + r.len() > u8::MAX as usize {
                return Err(error!(StringTooLong));
            }
            if l.is_empty() {
                return Ok(Val::String(rhs));
            }
            if r.is_empty() {
                return Ok(Val::String(lhs));
            }
            let mut joined = l;
            joined.extend_from_slice(&r);
            return Ok(Val::String(self.mem.temp_string(&joined)?));
        }
        let ordering = l
            .iter()
            .map(u8::to_ascii_uppercase)
            .cmp(r.iter().map(u8::to_ascii_uppercase));
        match compare(op, ordering) {
            Ok(b) => Ok(Val::from_bool(b)),
            Err(_) => Err(error!(TypeConflict)),
        }
    }

    /// Pop the value and target of an assignment and store.
    fn store(&mut self) -> Result<()> {
        let val = self.operand_at(0)?;
        let (addr, var_type) = match self.calc.peek(1) {
            Ok(Item::Target(addr, var_type)) => (*addr, *var_type),
            _ => return Err(error!(SyntaxError)),
        };
        let val = Operation::convert(val, var_type)?;
        self.mem.write_val(addr, val)?;
        self.calc.pop_2()?;
        Ok(())
    }
}

fn compare(op: Token, ordering: Ordering) -> Result<bool> {
    Ok(match op {
        Token::EQUAL => ordering == Ordering::Equal,
        Token::NOT_EQUAL => ordering != Ordering::Equal,
        Token::LESS => ordering == Ordering::Less,
        Token::LESS_EQUAL => ordering != Ordering::Greater,
        Token::GREATER => ordering == Ordering::Greater,
        Token::GREATER_EQUAL => ordering != Ordering::Less,
        _ => return Err(error!(TypeConflict)),
    })
}
