use super::token::Token;
use super::*;

mod tokenize_test;

fn body(s: &str) -> Vec<u8> {
    match tokenize(s) {
        Ok(line) => line.tokens().to_vec(),
        Err(e) => panic!("{} => {}", s, e),
    }
}

fn list(s: &str) -> String {
    match tokenize(s) {
        Ok(line) => line.to_string(),
        Err(e) => panic!("{} => {}", s, e),
    }
}

fn var(token: Token, name: &str) -> Vec<u8> {
    let var_type = VarType::from_bits(u32::from(token.0 - Token::NOTYPE_VAR.0));
    let mut v = vec![token.0, name.len() as u8];
    v.extend_from_slice(name.as_bytes());
    v.extend_from_slice(&VarHash::new(var_type, name.as_bytes()).to_bytes());
    v
}

fn int(n: i32) -> Vec<u8> {
    let mut v = vec![Token::INT_CONST.0];
    v.extend_from_slice(&n.to_be_bytes());
    v
}
