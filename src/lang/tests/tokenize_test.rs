use super::*;

#[test]
fn test_line_number_and_keyword() {
    let line = tokenize("10 print 1").unwrap();
    assert_eq!(line.number(), Some(10));
    let mut expect = vec![Token::PRINT.0];
    expect.extend(int(1));
    assert_eq!(line.tokens(), &expect[..]);
    assert!(tokenize("list").unwrap().is_direct());
}

#[test]
fn test_record_layout() {
    let line = tokenize("300 END").unwrap();
    assert_eq!(line.record(), vec![0x01, 0x2C, 2, Token::END.0, b'\r']);
    let line = tokenize("END").unwrap();
    assert_eq!(&line.record()[..2], &[0xFF, 0xFF]);
}

#[test]
fn test_implied_let_and_assign() {
    let mut expect = vec![Token::IMPLIED_LET.0];
    expect.extend(var(Token::NOTYPE_VAR, "A"));
    expect.push(Token::ASSIGN.0);
    expect.extend(int(1));
    assert_eq!(body("a=1"), expect);
}

#[test]
fn test_equal_is_comparison_outside_assignment() {
    let b = body("IF A=1 THEN B=2");
    let assigns = b.iter().filter(|&&t| t == Token::ASSIGN.0).count();
    let equals = b.iter().filter(|&&t| t == Token::EQUAL.0).count();
    assert_eq!(assigns, 1);
    assert_eq!(equals, 1);
    let b = body("LET X(A=1)=2");
    assert_eq!(b.iter().filter(|&&t| t == Token::ASSIGN.0).count(), 1);
}

#[test]
fn test_for_uses_equal() {
    let b = body("FOR I=1 TO 3");
    assert!(b.contains(&Token::EQUAL.0));
    assert!(!b.contains(&Token::ASSIGN.0));
}

#[test]
fn test_unary_operators() {
    let mut expect = vec![Token::PRINT.0, Token::NEGATE.0];
    expect.extend(int(1));
    assert_eq!(body("PRINT -1"), expect);
    let mut expect = vec![Token::PRINT.0];
    expect.extend(int(1));
    assert_eq!(body("PRINT --1"), expect);
    assert_eq!(body("PRINT +1"), expect);
    let mut expect = vec![Token::PRINT.0];
    expect.extend(int(2));
    expect.push(Token::MINUS.0);
    expect.extend(int(1));
    assert_eq!(body("PRINT 2-1"), expect);
}

#[test]
fn test_numbers() {
    let b = body("?1.5");
    assert_eq!(b[0], Token::PRINT.0);
    assert_eq!(b[1], Token::FLOAT_CONST.0);
    assert_eq!(&b[2..6], &1.5f32.to_bits().to_be_bytes());
    let b = body("?.5");
    assert_eq!(b[1], Token::FLOAT_CONST.0);
    let b = body("?1E3");
    assert_eq!(&b[2..6], &1000f32.to_bits().to_be_bytes());
}

#[test]
fn test_string_constant() {
    assert_eq!(
        body(r#"PRINT "Hi""#),
        vec![Token::PRINT.0, Token::STRING_CONST.0, 2, b'H', b'i']
    );
}

#[test]
fn test_variable_types() {
    assert_eq!(body("?A%")[1], Token::INT_VAR.0);
    assert_eq!(body("?A!")[1], Token::FLOAT_VAR.0);
    assert_eq!(body("?A#")[1], Token::FLOAT_VAR.0);
    assert_eq!(body("?A$")[1], Token::STRING_VAR.0);
    assert_eq!(body("?A (1)")[1], Token::NOTYPE_ARRAY.0);
    assert_eq!(body("?A$(1)")[1], Token::STRING_ARRAY.0);
}

#[test]
fn test_keyword_tie_break() {
    assert_eq!(body("?ATN(1)")[1], Token::ATN.0);
    assert_eq!(body("?AT(1,1)")[1], Token::AT.0);
    assert_eq!(body("?STRING$(2,\"A\")")[1], Token::STRING.0);
    assert_eq!(body("?A<=B")[1 + 7], Token::LESS_EQUAL.0);
    assert_eq!(body("GOSUB 10")[0], Token::GOSUB.0);
    assert_eq!(body("error 5")[0], Token::ERROR.0);
}

#[test]
fn test_rem_is_verbatim() {
    assert_eq!(body("REM  a:b"), vec![Token::REM.0, b' ', b'a', b':', b'b']);
    assert_eq!(body("'x"), vec![Token::APOSTROPHE.0, b'x']);
}

#[test]
fn test_label_definition() {
    let b = body("_START print");
    assert_eq!(b[0], Token::LABEL.0);
    assert_eq!(b[1], 5);
    assert_eq!(&b[2..7], b"START");
    assert_eq!(&b[11..], b" print");
}

#[test]
fn test_if_else_offsets() {
    let b = body("IF 1 THEN 10 ELSE 20");
    assert_eq!(b[0], Token::IF.0);
    assert_eq!(b[13], Token::ELSE.0);
    assert_eq!(b[1] as usize, 15 - 2);
    assert_eq!(b[14] as usize, b.len() - 15);
    let b = body("IF 1 THEN 10");
    assert_eq!(b[1] as usize, b.len() - 2);
}

#[test]
fn test_nested_if_else() {
    let b = body("IF 1 THEN IF 0 THEN 10 ELSE 20 ELSE 30");
    assert_eq!(b[0], Token::IF.0);
    assert_eq!(b[8], Token::IF.0);
    assert_eq!(b[21], Token::ELSE.0);
    assert_eq!(b[28], Token::ELSE.0);
    assert_eq!(b[9] as usize, 23 - 10);
    assert_eq!(b[1] as usize, 30 - 2);
    assert_eq!(b[22] as usize, b.len() - 23);
}

#[test]
fn test_errors() {
    assert!(tokenize(r#"PRINT "abc"#).unwrap_err().is(ErrorCode::MissingQuote));
    assert!(tokenize("PRINT (1").unwrap_err().is(ErrorCode::ParenthesisMismatch));
    assert!(tokenize("PRINT 1)").unwrap_err().is(ErrorCode::ParenthesisMismatch));
    assert!(tokenize("70000 PRINT").unwrap_err().is(ErrorCode::InvalidLineNumber));
    assert!(tokenize("0 PRINT").unwrap_err().is(ErrorCode::InvalidLineNumber));
    assert!(tokenize("PRINT {").unwrap_err().is(ErrorCode::UnrecognizedSymbol));
    let long = format!("{}=1", "X".repeat(40));
    assert!(tokenize(&long).unwrap_err().is(ErrorCode::NameTooLong));
    let long = format!("PRINT \"{}\"", "X".repeat(250));
    assert!(tokenize(&long).unwrap_err().is(ErrorCode::LineTooLong));
}

#[test]
fn test_error_column() {
    let e = tokenize("PRINT {").unwrap_err();
    assert_eq!(e.column(), 7..8);
}

#[test]
fn test_hash_structure() {
    let a = VarHash::new(VarType::Float, b"AB");
    assert_eq!(a.0 >> 16, 0xFFFF);
    assert_eq!(a.var_type(), VarType::Float);
    assert_eq!(a.first_letter(), 0);
    assert_ne!(VarHash::new(VarType::Float, b"ABC"), VarHash::new(VarType::Float, b"ADC"));
    assert_ne!(VarHash::new(VarType::Integer, b"A"), VarHash::new(VarType::Float, b"A"));
    assert_eq!(a.with_type(VarType::String).var_type(), VarType::String);
}
