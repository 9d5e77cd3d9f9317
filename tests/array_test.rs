mod common;
use basic::mach::Runtime;
use common::*;

#[test]
fn test_dim_and_subscripts() {
    let mut r = Runtime::default();
    r.enter("DIM A(5):A(5)=1:?A(5)");
    assert_eq!(exec(&mut r), " 1\n");
    r.enter("A(6)=1");
    assert_eq!(exec(&mut r), "SUBSCRIPT OUT OF RANGE\n");
    r.enter("A(-1)=1");
    assert_eq!(exec(&mut r), "SUBSCRIPT OUT OF RANGE\n");
}

#[test]
fn test_automatic_dimension() {
    let mut r = Runtime::default();
    r.enter("B(3)=7:?B(3);B(10)");
    assert_eq!(exec(&mut r), " 7 0\n");
    r.enter("?B(11)");
    assert_eq!(exec(&mut r), "SUBSCRIPT OUT OF RANGE\n");
}

#[test]
fn test_two_dimensions() {
    let mut r = Runtime::default();
    r.enter("DIM M(2,3):M(1,2)=5:?M(1,2);M(2,3)");
    assert_eq!(exec(&mut r), " 5 0\n");
}

#[test]
fn test_string_elements() {
    let mut r = Runtime::default();
    r.enter("S$(1)=\"X\":?S$(1)+\"Y\"");
    assert_eq!(exec(&mut r), "XY\n");
}

#[test]
fn test_redimension_clears() {
    let mut r = Runtime::default();
    r.enter("DIM C(2):C(1)=4:DIM C(2):?C(1)");
    assert_eq!(exec(&mut r), " 0\n");
}

#[test]
fn test_arrays_in_loops() {
    let out = run(&[
        "10 DIM T%(4)",
        "20 FOR I=0 TO 4:T%(I)=I*I:NEXT",
        "30 FOR I=4 TO 0 STEP -2:PRINT T%(I);:NEXT",
        "40 PRINT",
        "RUN",
    ]);
    assert_eq!(out, "16 4 0\n");
}
