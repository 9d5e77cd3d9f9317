mod common;
use common::*;

#[test]
fn test_read_mixed_items() {
    let out = run(&[
        "10 READ A,B$,C",
        "20 PRINT A;B$;C",
        "30 DATA 1,HELLO,-2.5",
        "RUN",
    ]);
    assert_eq!(out, " 1HELLO-2.5\n");
}

#[test]
fn test_quoted_data() {
    let out = run(&[
        "10 DATA \"A,B\",3",
        "20 READ S$,N",
        "30 PRINT S$;N",
        "RUN",
    ]);
    assert_eq!(out, "A,B 3\n");
}

#[test]
fn test_out_of_data() {
    let out = run(&["10 READ A", "20 READ A", "30 DATA 5", "RUN"]);
    assert_eq!(out, "OUT OF DATA IN 20\n");
}

#[test]
fn test_restore() {
    let out = run(&[
        "10 READ A",
        "20 RESTORE",
        "30 READ B",
        "40 PRINT A;B",
        "50 DATA 7",
        "RUN",
    ]);
    assert_eq!(out, " 7 7\n");
}

#[test]
fn test_restore_line() {
    let out = run(&[
        "10 DATA 1",
        "20 DATA 2",
        "30 RESTORE 20",
        "40 READ A:PRINT A",
        "RUN",
    ]);
    assert_eq!(out, " 2\n");
}

#[test]
fn test_read_type_conflict() {
    let out = run(&["10 READ A", "20 DATA HELLO", "RUN"]);
    assert_eq!(out, "TYPE CONFLICT IN 10\n");
}
