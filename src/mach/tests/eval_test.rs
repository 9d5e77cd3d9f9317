use super::*;
use crate::lang::token::Token;
use crate::mach::eval::{Item, Mode};

fn start(runtime: &mut Runtime, s: &str) {
    let line = match tokenize(s) {
        Ok(line) => line,
        Err(e) => panic!("{}: {}", s, e),
    };
    let addr = runtime.mem.store_direct(&line);
    runtime.mem.stream.set_position(addr + 3);
}

#[test]
fn test_failed_division_keeps_operands() {
    for (s, op) in &[("?7/0", Token::DIVIDE), ("?7 MOD 0", Token::MODULUS)] {
        let mut r = Runtime::default();
        start(&mut r, s);
        assert_eq!(r.read_token(), Token::PRINT);
        let e = r.expression(Mode::Read).unwrap_err();
        assert!(e.is(ErrorCode::DivisionByZero), "{:?}", op);
        assert_eq!(r.calc.len(), 2);
        assert_eq!(*r.calc.peek(1).unwrap(), Item::Value(Val::Integer(7)));
        assert_eq!(*r.calc.peek(0).unwrap(), Item::Value(Val::Integer(0)));
    }
}

#[test]
fn test_expression_leaves_one_value() {
    let mut r = Runtime::default();
    start(&mut r, "?1+2*3");
    r.read_token();
    r.expression(Mode::Read).unwrap();
    assert_eq!(r.calc.len(), 1);
    assert_eq!(*r.calc.peek(0).unwrap(), Item::Value(Val::Integer(7)));
    assert_eq!(r.cur, Token::EOL);
}
