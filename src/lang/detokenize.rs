use super::number::format_g;
use super::token::Token;
use super::VarType;

/// Space before a keyword or operator, unless one was just printed.
fn pre_space(token: Token) -> bool {
    if token == Token::LPAREN || token == Token::COMMA {
        return false;
    }
    if token < Token::SEMICOLON && token != Token::NEGATE {
        return true;
    }
    token.is_command()
}

fn post_space(token: Token) -> bool {
    if token == Token::LPAREN {
        return false;
    }
    if token <= Token::SEMICOLON && token != Token::NEGATE {
        return true;
    }
    token.is_command()
}

fn long_at(tokens: &[u8], index: usize) -> Option<[u8; 4]> {
    let bytes = tokens.get(index..index + 4)?;
    Some([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Render the token body of a line as source text. Stops at the line
/// terminator or the end of the slice.
pub fn detokenize(tokens: &[u8]) -> String {
    let mut s = String::new();
    let mut last_space = true;
    let mut i = 0;
    while i < tokens.len() {
        let token = Token(tokens[i]);
        i += 1;
        match token {
            Token::EOL => break,
            Token::INT_CONST => {
                let bytes = match long_at(tokens, i) {
                    Some(bytes) => bytes,
                    None => break,
                };
                s.push_str(&i32::from_be_bytes(bytes).to_string());
                i += 4;
                last_space = false;
            }
            Token::FLOAT_CONST => {
                let bytes = match long_at(tokens, i) {
                    Some(bytes) => bytes,
                    None => break,
                };
                let value = f32::from_bits(u32::from_be_bytes(bytes));
                s.push_str(&format_g(value as f64, 6));
                i += 4;
                last_space = false;
            }
            Token::STRING_CONST => {
                let len = tokens.get(i).copied().unwrap_or(0) as usize;
                let end = (i + 1 + len).min(tokens.len());
                s.push('"');
                s.extend(tokens[i + 1..end].iter().map(|&b| b as char));
                s.push('"');
                i = end;
                last_space = false;
            }
            Token::LABEL => {
                let len = tokens.get(i).copied().unwrap_or(0) as usize;
                let end = (i + 1 + len).min(tokens.len());
                s.push('_');
                s.extend(tokens[i + 1..end].iter().map(|&b| b as char));
                i = end + 4;
                if i == 6 + len {
                    let rest = &tokens[i.min(tokens.len())..];
                    let end = rest.iter().position(|&b| b == b'\r').unwrap_or(rest.len());
                    s.extend(rest[..end].iter().map(|&b| b as char));
                    break;
                }
                last_space = false;
            }
            _ if token.is_variable() || token.is_array() => {
                let len = tokens.get(i).copied().unwrap_or(0) as usize;
                let end = (i + 1 + len).min(tokens.len());
                s.extend(tokens[i + 1..end].iter().map(|&b| b as char));
                let bits = u32::from((token.0 - Token::NOTYPE_VAR.0) & 3);
                s.push_str(VarType::from_bits(bits).suffix());
                i = end + 4;
                last_space = false;
            }
            Token::IMPLIED_LET => {}
            _ => {
                let word = match token.keyword() {
                    Some(word) => word,
                    None => break,
                };
                if !last_space && pre_space(token) {
                    s.push(' ');
                }
                s.push_str(word);
                last_space = post_space(token);
                if last_space {
                    s.push(' ');
                }
                if token == Token::REM || token == Token::APOSTROPHE {
                    let rest = &tokens[i..];
                    let end = rest.iter().position(|&b| b == b'\r').unwrap_or(rest.len());
                    s.extend(rest[..end].iter().map(|&b| b as char));
                    break;
                }
                if token == Token::IF || token == Token::ELSE {
                    i += 1;
                }
            }
        }
    }
    s.trim_end().to_string()
}
