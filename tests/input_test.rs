mod common;
use basic::mach::{Event, Runtime};
use common::*;

#[test]
fn test_input_list() {
    let mut r = Runtime::default();
    r.enter("input a%,b(a%):print a%;: print b(2-a%);");
    assert_eq!(exec(&mut r), "? ");
    r.enter("1,2");
    assert_eq!(exec(&mut r), " 1 2");
}

#[test]
fn test_input_prompt() {
    let mut r = Runtime::default();
    r.enter("INPUT \"NAME\";N$:PRINT \"HI \";N$");
    assert_eq!(exec(&mut r), "NAME? ");
    r.enter("BOB");
    assert_eq!(exec(&mut r), "HI BOB\n");
}

#[test]
fn test_redo_from_start() {
    let mut r = Runtime::default();
    r.enter("INPUT A:PRINT A");
    assert_eq!(exec(&mut r), "? ");
    r.enter("X");
    assert_eq!(exec(&mut r), "?REDO FROM START\n? ");
    r.enter("5");
    assert_eq!(exec(&mut r), " 5\n");
}

#[test]
fn test_extra_ignored() {
    let mut r = Runtime::default();
    r.enter("INPUT A:PRINT A");
    assert_eq!(exec(&mut r), "? ");
    r.enter("1,2");
    assert_eq!(exec(&mut r), "?EXTRA IGNORED\n 1\n");
}

#[test]
fn test_short_answer_asks_again() {
    let mut r = Runtime::default();
    r.enter("INPUT A,B:PRINT A;B");
    assert_eq!(exec(&mut r), "? ");
    r.enter("1");
    assert_eq!(exec(&mut r), "?? ");
    r.enter("2");
    assert_eq!(exec(&mut r), " 1 2\n");
}

#[test]
fn test_quoted_field_keeps_comma() {
    let mut r = Runtime::default();
    r.enter("INPUT A$,B:PRINT A$;B");
    assert_eq!(exec(&mut r), "? ");
    r.enter("\"X,Y\", 3");
    assert_eq!(exec(&mut r), "X,Y 3\n");
}

#[test]
fn test_line_input() {
    let mut r = Runtime::default();
    r.enter("LINE INPUT \"TEXT: \";T$:PRINT T$");
    assert_eq!(exec(&mut r), "TEXT: ");
    r.enter("a, b");
    assert_eq!(exec(&mut r), "a, b\n");
}

#[test]
fn test_input_in_program() {
    let mut r = Runtime::default();
    r.enter("10 INPUT X");
    r.enter("20 PRINT X*2");
    r.enter("RUN");
    assert_eq!(r.execute(100), Event::Input("? ".to_string()));
    assert_eq!(r.execute(100), Event::Input("? ".to_string()));
    r.enter("21");
    assert_eq!(exec(&mut r), "42\n");
}

#[test]
fn test_interrupt_while_waiting() {
    let mut r = Runtime::default();
    r.enter("10 INPUT X");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "? ");
    r.interrupt();
    assert_eq!(exec(&mut r), "BREAK IN 10\n");
}
