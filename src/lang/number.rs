//! Numeric text scanning and `%G` style rendering shared by the
//! tokenizer, the listing, `VAL`, `STR$` and `INPUT`.

fn scan_digits(s: &[u8], mut i: usize) -> usize {
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Leading integer of `s`, clamped to `i32`. Returns the value and the
/// number of bytes consumed; zero bytes consumed means no number.
pub fn parse_int(s: &[u8]) -> (i32, usize) {
    let mut i = 0;
    while i < s.len() && (s[i] == b' ' || s[i] == b'\t') {
        i += 1;
    }
    let mut negative = false;
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        negative = s[i] == b'-';
        i += 1;
    }
    let start = i;
    let end = scan_digits(s, i);
    if end == start {
        return (0, 0);
    }
    let mut value: i64 = 0;
    for &d in &s[start..end] {
        value = (value * 10 + (d - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    if negative {
        value = -value;
    }
    let value = value.max(i32::MIN as i64).min(i32::MAX as i64) as i32;
    (value, end)
}

/// Leading floating point number of `s`. Returns the value and the
/// number of bytes consumed; zero bytes consumed means no number.
pub fn parse_float(s: &[u8]) -> (f64, usize) {
    let mut i = 0;
    while i < s.len() && (s[i] == b' ' || s[i] == b'\t') {
        i += 1;
    }
    let begin = i;
    if i < s.len() && (s[i] == b'+' || s[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    i = scan_digits(s, i);
    let mut digits = i - int_start;
    if i < s.len() && s[i] == b'.' {
        let frac_start = i + 1;
        let frac_end = scan_digits(s, frac_start);
        digits += frac_end - frac_start;
        if digits > 0 {
            i = frac_end;
        }
    }
    if digits == 0 {
        return (0.0, 0);
    }
    if i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') {
            j += 1;
        }
        let exp_end = scan_digits(s, j);
        if exp_end > j {
            i = exp_end;
        }
    }
    let text = String::from_utf8_lossy(&s[begin..i]);
    match text.parse::<f64>() {
        Ok(value) => (value, i),
        Err(_) => (0.0, 0),
    }
}

fn strip_fraction_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Render like C's `%.<precision>G`.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-INF" } else { "INF" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let mut parts = sci.splitn(2, 'e');
    let mantissa = parts.next().unwrap_or("0");
    let exp: i32 = parts.next().and_then(|e| e.parse().ok()).unwrap_or(0);
    if exp < -4 || exp >= precision as i32 {
        format!(
            "{}E{}{:02}",
            strip_fraction_zeros(mantissa),
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value))
    }
}
