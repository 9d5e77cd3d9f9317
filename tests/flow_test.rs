mod common;
use basic::mach::{Event, Runtime};
use common::*;

#[test]
fn test_for_next() {
    let out = run(&[
        "10 FOR I=1 TO 3",
        "20 PRINT I;",
        "30 NEXT I",
        "40 PRINT I",
        "RUN",
    ]);
    assert_eq!(out, " 1 2 3 4\n");
}

#[test]
fn test_for_step_and_single_pass() {
    let mut r = Runtime::default();
    r.enter("FOR I=3 TO 1 STEP -1:PRINT I;:NEXT:PRINT");
    assert_eq!(exec(&mut r), " 3 2 1\n");
    r.enter("FOR I=3 TO 1:PRINT I;:NEXT:PRINT");
    assert_eq!(exec(&mut r), " 3\n");
}

#[test]
fn test_next_list() {
    let out = run(&[
        "10 FOR I=1 TO 2",
        "20 FOR J=1 TO 2",
        "30 PRINT I;J;",
        "40 NEXT J,I",
        "RUN",
    ]);
    assert_eq!(out, " 1 1 1 2 2 1 2 2");
}

#[test]
fn test_next_without_for() {
    let mut r = Runtime::default();
    r.enter("NEXT");
    assert_eq!(exec(&mut r), "NEXT WITHOUT FOR\n");
}

#[test]
fn test_gosub_return() {
    let out = run(&[
        "10 GOSUB 100",
        "20 PRINT \"B\";",
        "30 END",
        "100 PRINT \"A\";",
        "110 RETURN",
        "RUN",
    ]);
    assert_eq!(out, "AB");
}

#[test]
fn test_return_without_gosub() {
    let mut r = Runtime::default();
    r.enter("RETURN");
    assert_eq!(exec(&mut r), "RETURN WITHOUT GOSUB\n");
    assert_eq!(run(&["10 RETURN", "RUN"]), "RETURN WITHOUT GOSUB IN 10\n");
}

#[test]
fn test_return_discards_loops() {
    let out = run(&[
        "10 GOSUB 100",
        "20 NEXT",
        "100 FOR I=1 TO 2",
        "110 RETURN",
        "RUN",
    ]);
    assert_eq!(out, "NEXT WITHOUT FOR IN 20\n");
}

#[test]
fn test_goto_loop() {
    let out = run(&[
        "10 N=0",
        "20 N=N+1",
        "30 IF N<3 GOTO 20",
        "40 PRINT N",
        "RUN",
    ]);
    assert_eq!(out, " 3\n");
}

#[test]
fn test_if_then_else() {
    let mut r = Runtime::default();
    r.enter("if 0 then ? \"one\" else ? \"two\";:?2");
    assert_eq!(exec(&mut r), "two 2\n");
    r.enter("if 1 then ? \"one\" else ? \"two\":?2");
    assert_eq!(exec(&mut r), "one\n");
    r.enter("if 0 then ? \"one\";:?2");
    assert_eq!(exec(&mut r), "");
}

#[test]
fn test_if_line_numbers() {
    let out = run(&[
        "10 IF 0 THEN 20 ELSE 30",
        "20 PRINT \"NO\"",
        "30 IF 1 THEN 50",
        "40 PRINT \"NO\"",
        "50 PRINT \"YES\"",
        "RUN",
    ]);
    assert_eq!(out, "YES\n");
}

#[test]
fn test_on_gosub() {
    let out = run(&[
        "10 FOR K=1 TO 3",
        "20 ON K GOSUB 100,200,300",
        "30 NEXT",
        "40 ON 5 GOTO 100",
        "50 END",
        "100 PRINT \"A\";:RETURN",
        "200 PRINT \"B\";:RETURN",
        "300 PRINT \"C\";:RETURN",
        "RUN",
    ]);
    assert_eq!(out, "ABC");
}

#[test]
fn test_labels() {
    let out = run(&[
        "10 GOSUB _SHOW",
        "20 GOTO _DONE",
        "30 _SHOW",
        "40 PRINT \"S\";",
        "50 RETURN",
        "60 _DONE",
        "70 PRINT \"D\"",
        "RUN",
    ]);
    assert_eq!(out, "SD\n");
}

#[test]
fn test_undefined_label() {
    assert_eq!(
        run(&["10 GOTO _NOWHERE", "RUN"]),
        "INVALID LINE NUMBER IN 10; UNDEFINED LABEL\n"
    );
}

#[test]
fn test_stop_and_cont() {
    let mut r = Runtime::default();
    r.enter("10 PRINT \"A\";");
    r.enter("20 STOP");
    r.enter("30 PRINT \"B\"");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "ABREAK IN 20\n");
    r.enter("CONT");
    assert_eq!(exec(&mut r), "B\n");
    r.enter("CONT");
    assert_eq!(exec(&mut r), "CAN'T CONTINUE\n");
}

#[test]
fn test_interrupt() {
    let mut r = Runtime::default();
    r.enter("10 GOTO 10");
    r.enter("RUN");
    assert_eq!(r.execute(100), Event::Running);
    r.interrupt();
    assert_eq!(exec(&mut r), "BREAK IN 10\n");
    r.enter("CONT");
    assert_eq!(r.execute(100), Event::Running);
}

#[test]
fn test_end_and_exit() {
    let mut r = Runtime::default();
    r.enter("10 END");
    r.enter("20 PRINT \"NO\"");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "");
    assert!(!r.exited());
    r.enter("EXIT");
    assert_eq!(exec(&mut r), "");
    assert!(r.exited());
}
