mod common;
use basic::mach::{MemoryFiles, Runtime};
use common::*;

#[test]
fn test_list() {
    let mut r = Runtime::default();
    r.enter("20 print \"b\"");
    r.enter("10 a=1:b=2");
    r.enter("LIST");
    assert_eq!(exec(&mut r), "10 A = 1 : B = 2\n20 PRINT \"b\"\n");
    r.enter("LIST 20");
    assert_eq!(exec(&mut r), "20 PRINT \"b\"\n");
    r.enter("LIST -10");
    assert_eq!(exec(&mut r), "10 A = 1 : B = 2\n");
}

#[test]
fn test_replace_and_delete_lines() {
    let mut r = Runtime::default();
    r.enter("10 PRINT 1");
    r.enter("20 PRINT 2");
    r.enter("30 PRINT 3");
    r.enter("20 PRINT 4");
    assert_eq!(r.listing(), "10 PRINT 1\n20 PRINT 4\n30 PRINT 3\n");
    r.enter("10");
    assert_eq!(r.listing(), "20 PRINT 4\n30 PRINT 3\n");
    r.enter("DELETE 20-30");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.listing(), "");
}

#[test]
fn test_new_clears_program() {
    let mut r = Runtime::default();
    r.enter("10 A=1");
    r.enter("A=5");
    assert_eq!(exec(&mut r), "");
    r.enter("NEW");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.listing(), "");
    r.enter("?A");
    assert_eq!(exec(&mut r), "UNDEFINED VARIABLE\n");
}

#[test]
fn test_renum() {
    let mut r = Runtime::default();
    r.enter("5 GOSUB 25");
    r.enter("15 END");
    r.enter("25 RETURN");
    r.enter("RENUM");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.listing(), "10 GOSUB 30\n20 END\n30 RETURN\n");
    r.enter("RENUM 20,100");
    assert_eq!(exec(&mut r), "");
    assert_eq!(r.listing(), "10 GOSUB 110\n100 END\n110 RETURN\n");
}

#[test]
fn test_save() {
    let files = MemoryFiles::default();
    let mut r = with_files(&files);
    r.enter("10 PRINT \"HI\"");
    r.enter("SAVE \"HELLO\"");
    assert_eq!(exec(&mut r), "");
    assert_eq!(files.get("HELLO"), Some("10 PRINT \"HI\"\n".to_string()));
}

#[test]
fn test_load_numbers_lines_and_runs() {
    let files = MemoryFiles::default();
    files.insert(
        "DEMO",
        "10 PRINT \"A\";\nPRINT \"B\"\n\n; a comment\n10 END\nRUN\n",
    );
    let mut r = with_files(&files);
    r.enter("99 PRINT \"GONE\"");
    r.enter("LOAD \"DEMO\"");
    assert_eq!(exec(&mut r), "AB\n");
    assert_eq!(r.listing(), "10 PRINT \"A\";\n20 PRINT \"B\"\n30 END\n");
}

#[test]
fn test_load_missing_file() {
    let files = MemoryFiles::default();
    let mut r = with_files(&files);
    r.enter("LOAD \"NOPE\"");
    assert_eq!(exec(&mut r), "FILE NOT FOUND\n");
}

#[test]
fn test_duplicate_label() {
    let files = MemoryFiles::default();
    files.insert("TWICE", "_A\n_A\n");
    let mut r = with_files(&files);
    r.enter("LOAD \"TWICE\"");
    assert_eq!(exec(&mut r), "SYNTAX IN 20; DUPLICATE LABEL\n");
}
