mod common;
use basic::mach::Runtime;
use common::*;

#[test]
fn test_resume_next() {
    let out = run(&[
        "10 ON ERROR GOTO 100",
        "20 PRINT 1/0",
        "30 PRINT \"NEXT\"",
        "40 END",
        "100 PRINT ERR:PRINT ERL",
        "110 RESUME NEXT",
        "RUN",
    ]);
    assert_eq!(out, "11\n20\nNEXT\n");
}

#[test]
fn test_resume_retries_statement() {
    let out = run(&[
        "10 ON ERROR GOTO 100",
        "20 D=0",
        "30 PRINT 10/D",
        "40 END",
        "100 D=2",
        "110 RESUME",
        "RUN",
    ]);
    assert_eq!(out, " 5\n");
}

#[test]
fn test_resume_line() {
    let out = run(&[
        "10 ON ERROR GOTO 100",
        "20 ERROR 4",
        "30 END",
        "40 PRINT \"AT 40\"",
        "50 END",
        "100 RESUME 40",
        "RUN",
    ]);
    assert_eq!(out, "AT 40\n");
}

#[test]
fn test_error_in_handler_is_reported() {
    let out = run(&[
        "10 ON ERROR GOTO 100",
        "20 ERROR 5",
        "100 PRINT \"T\"",
        "110 ERROR 6",
        "RUN",
    ]);
    assert_eq!(out, "T\nARITHMETIC OVERFLOW IN 110\n");
}

#[test]
fn test_trap_disabled() {
    let out = run(&[
        "10 ON ERROR GOTO 100",
        "20 ON ERROR GOTO 0",
        "30 ERROR 13",
        "100 PRINT \"T\"",
        "RUN",
    ]);
    assert_eq!(out, "TYPE CONFLICT IN 30\n");
}

#[test]
fn test_unexpected_resume() {
    let mut r = Runtime::default();
}

#[test]
fn test_error_statement() {
    let mut r = Runtime::default();
    r.enter("ERROR 200");
    assert_eq!(exec(&mut r), "UNPRINTABLE ERROR 200\n");
    r.enter("ERROR 0");
    assert_eq!(exec(&mut r), "PARAMETER ERROR\n");
}

#[test]
fn test_last_error_in_direct_mode() {
    let mut r = Runtime::default();
    r.enter("?1/0");
    assert_eq!(exec(&mut r), "DIVIDE BY ZERO\n");
    r.enter("?ERR:?ERL");
    assert_eq!(exec(&mut r), "11\n65535\n");
}

#[test]
fn test_direct_errors_are_trapped() {
    let mut r = Runtime::default();
    r.enter("100 PRINT \"TRAPPED\":END");
    r.enter("ON ERROR GOTO 100:ERROR 4");
    assert_eq!(exec(&mut r), "TRAPPED\n");
}

#[test]
fn test_reported_error_rearms_trap() {
    let mut r = Runtime::default();
    r.enter("10 ON ERROR GOTO 100");
    r.enter("20 ERROR 5");
    r.enter("30 END");
    r.enter("100 PRINT \"T\"");
    r.enter("110 ERROR 6");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "T\nARITHMETIC OVERFLOW IN 110\n");
    r.enter("GOTO 20");
    assert_eq!(exec(&mut r), "T\nARITHMETIC OVERFLOW IN 110\n");
}
