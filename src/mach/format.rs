use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// A float broken into decimal digits.
#[derive(Debug, Clone, PartialEq)]
pub enum Digits {
    /// Significant digits without leading or trailing zeros. The decimal
    /// point sits before digit `point`; it may be negative or past the end.
    Finite {
        digits: String,
        point: i32,
        negative: bool,
    },
    /// `NaN `, `+INF` or `-INF`.
    Special(&'static str),
}

/// One numeric field of a `PRINT USING` format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// Positions before the decimal point, sign and `$` included.
    pub lead: u8,
    /// Positions after the decimal point.
    pub post: u8,
    pub dollar: bool,
    pub star: bool,
    pub comma: bool,
    pub point: bool,
    pub exponent: bool,
    pub plus: bool,
    pub post_sign: bool,
    /// `PRINT` style: choose between standard and exponent form.
    pub plain: bool,
}

impl Field {
    pub fn plain() -> Field {
        Field {
            lead: 2,
            point: true,
            plain: true,
            ..Field::default()
        }
    }
}

/// ## Number formatting
///
/// The runtime never renders floats itself. `decompose` is the only
/// required method; the field layout is shared.
pub trait NumericFormatter {
    /// Digits of `value`. With `fraction` the value is rounded to that
    /// many decimal places, otherwise to six significant digits.
    fn decompose(&self, value: f32, fraction: Option<usize>) -> Digits;

    /// Render `value` as `PRINT` does.
    fn plain(&self, value: f32) -> String {
        self.format(value, &Field::plain())
    }

    /// Render `value` into a `PRINT USING` field. A `%` in front means
    /// the field was too small.
    fn format(&self, value: f32, field: &Field) -> String {
        let fraction = if field.exponent || field.plain {
            None
        } else {
            Some(field.post as usize)
        };
        let (digits, mut dec, negative) = match self.decompose(value, fraction) {
            Digits::Special(s) => return s.to_string(),
            Digits::Finite {
                digits,
                point,
                negative,
            } => (digits.into_bytes(), point, negative),
        };
        let mut f = field.clone();
        let pre_plus = f.plus && !f.post_sign;
        let mut lead = f.lead as i32;
        let mut post = f.post as i32;
        if f.plain {
            f = Field {
                plain: true,
                ..Field::default()
            };
            lead = 2;
            let a = value.abs();
            let len = digits.len() as i32;
            if a == 0.0 || (a >= 0.000001 && a <= 16_777_215.0) {
                post = if dec < 0 { len - dec } else { (len - dec).max(0) };
            } else {
                post = len - 1;
                f.exponent = true;
            }
            f.point = post != 0;
        }
        let mut out = String::new();
        let mut next = digits.iter().map(|&d| d as char);
        if f.exponent {
            if !f.post_sign && negative && lead == 0 {
                out.push('%');
            }
            if !f.post_sign {
                out.push(if negative {
                    '-'
                } else if pre_plus {
                    '+'
                } else {
                    ' '
                });
                lead = (lead - 1).max(0);
            }
            if value == 0.0 {
                if lead > 0 {
                    out.extend(std::iter::repeat(' ').take(lead as usize - 1));
                    out.push('0');
                }
                if f.point {
                    out.push('.');
                }
                out.extend(std::iter::repeat('0').take(post.max(0) as usize));
                out.push_str("E+00");
                return out;
            }
            for _ in 0..lead {
                out.extend(next.next());
                dec -= 1;
            }
            if f.point {
                out.push('.');
            }
            for _ in 0..post {
                out.extend(next.next());
            }
            out.push('E');
            out.push(if dec < 0 { '-' } else { '+' });
            out.push_str(&format!("{:02}", dec.abs()));
            if f.post_sign {
                out.push(if negative {
                    '-'
                } else if f.plus {
                    '+'
                } else {
                    ' '
                });
            }
            return out;
        }
        let mut lead_zeros = 0;
        if dec < 0 {
            lead_zeros = -dec;
            dec = 0;
        }
        let mut commas = if f.comma { ((dec - 1) / 3).max(0) } else { 0 };
        let mut pad = lead - dec - commas;
        if !f.post_sign && (negative || pre_plus) {
            pad -= 1;
        }
        if f.dollar {
            pad -= 1;
        }
        if pad < 0 {
            if !f.plain {
                out.push('%');
            }
            lead -= pad;
            pad = 0;
        }
        let mut fill_zero = false;
        if dec == 0 && pad > 0 {
            pad -= 1;
            fill_zero = true;
        }
        let pad_char = if f.star { '*' } else { ' ' };
        out.extend(std::iter::repeat(pad_char).take(pad as usize));
        if !f.post_sign {
            if negative {
                out.push('-');
            } else if pre_plus {
                out.push('+');
            }
        }
        if f.dollar {
            out.push('$');
        }
        if fill_zero {
            out.push('0');
        }
        if lead > 0 {
            for i in 0..dec {
                out.push(next.next().unwrap_or('0'));
                if commas > 0 && (dec - i) % 3 == 1 {
                    out.push(',');
                    commas -= 1;
                }
            }
        }
        if f.point {
            out.push('.');
        }
        for _ in 0..post {
            if lead_zeros > 0 {
                out.push('0');
                lead_zeros -= 1;
            } else {
                out.push(next.next().unwrap_or('0'));
            }
        }
        if f.post_sign {
            out.push(if negative {
                '-'
            } else if f.plus {
                '+'
            } else {
                ' '
            });
        }
        out
    }
}

/// Decimal conversion through Rust's float formatting.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFormatter;

fn split_digits(int_part: &str, frac_part: &str) -> (String, i32) {
    let int_part = int_part.trim_start_matches('0');
    let (digits, point) = if int_part.is_empty() {
        let zeros = frac_part.len() - frac_part.trim_start_matches('0').len();
        (frac_part.trim_start_matches('0').to_string(), -(zeros as i32))
    } else {
        (format!("{}{}", int_part, frac_part), int_part.len() as i32)
    };
    let digits = digits.trim_end_matches('0').to_string();
    if digits.is_empty() {
        (digits, 0)
    } else {
        (digits, point)
    }
}

impl NumericFormatter for StdFormatter {
    fn decompose(&self, value: f32, fraction: Option<usize>) -> Digits {
        if value.is_nan() {
            return Digits::Special("NaN ");
        }
        if value.is_infinite() {
            return Digits::Special(if value < 0.0 { "-INF" } else { "+INF" });
        }
        let negative = value < 0.0;
        if value == 0.0 {
            return Digits::Finite {
                digits: "0".to_string(),
                point: 1,
                negative: false,
            };
        }
        let abs = (value as f64).abs();
        let (digits, point) = match fraction {
            Some(places) => {
                let s = format!("{:.*}", places, abs);
                let mut parts = s.splitn(2, '.');
                let int_part = parts.next().unwrap_or("");
                let frac_part = parts.next().unwrap_or("");
                split_digits(int_part, frac_part)
            }
            None if abs >= 1_000_000.0 && abs <= 16_777_215.0 => {
                split_digits(&format!("{:.0}", abs.trunc()), "")
            }
            None => {
                let s = format!("{:.5e}", abs);
                let mut parts = s.splitn(2, 'e');
                let mantissa = parts.next().unwrap_or("0").replace('.', "");
                let exp: i32 = parts.next().and_then(|e| e.parse().ok()).unwrap_or(0);
                let digits = mantissa.trim_end_matches('0').to_string();
                (digits, exp + 1)
            }
        };
        Digits::Finite {
            digits,
            point,
            negative,
        }
    }
}

/// One element of a `PRINT USING` format.
#[derive(Debug, Clone, PartialEq)]
pub enum Using {
    Literal(char),
    /// String field of a fixed width, or the whole string when zero.
    Text(usize),
    Number(Field),
}

/// Scan a `PRINT USING` format. A format with no fields, or a numeric
/// field wider than 15 positions on either side, is a `PARAMETER ERROR`.
pub fn parse_using(fmt: &[u8]) -> Result<Vec<Using>> {
    let at = |i: usize| fmt.get(i).copied().unwrap_or(0);
    let mut items = vec![];
    let mut field = Field::default();
    let mut pre: u32 = 0;
    let mut i = 0;
    let mut found = false;
    while i < fmt.len() {
        let c = fmt[i];
        let c1 = at(i + 1);
        let start_number = match c {
            b'!' => {
                items.push(Using::Text(1));
                found = true;
                i += 1;
                continue;
            }
            b'&' => {
                items.push(Using::Text(0));
                found = true;
                i += 1;
                continue;
            }
            b'%' => {
                let mut j = i + 1;
                while j < fmt.len() && fmt[j] == b' ' {
                    j += 1;
                }
                if at(j) == b'%' {
                    items.push(Using::Text(j - i + 1));
                    found = true;
                    i = j + 1;
                    continue;
                }
                false
            }
            b'+' => {
                let c2 = at(i + 2);
                if c1 == b'#' || (c1 == b'*' && c2 == b'*') || (c1 == b'$' && c2 == b'$') {
                    field = Field {
                        plus: true,
                        ..Field::default()
                    };
                    pre = 1;
                    i += 1;
                    continue;
                }
                false
            }
            b'$' if c1 == b'$' => {
                field.dollar = true;
                pre += 2;
                i += 2;
                true
            }
            b'*' if c1 == b'*' => {
                field.star = true;
                pre += 2;
                i += 2;
                if at(i) == b'$' {
                    field.dollar = true;
                    pre += 1;
                    i += 1;
                }
                true
            }
            b'.' if c1 == b'#' => {
                field.point = true;
                i += 1;
                true
            }
            b'#' => true,
            _ => false,
        };
        if !start_number {
            let mut c = c;
            if c == b'_' && i + 1 < fmt.len() {
                i += 1;
                c = fmt[i];
            }
            items.push(Using::Literal(c as char));
            field = Field::default();
            pre = 0;
            i += 1;
            continue;
        }
        let mut post: u32 = 0;
        while i < fmt.len() {
            let ch = fmt[i];
            if ch == b'#' && !field.exponent {
                if field.point {
                    post += 1;
                } else {
                    pre += 1;
                }
            } else if ch == b',' && !(field.comma || field.point || field.exponent) {
                field.comma = true;
                pre += 1;
            } else if ch == b'.' && !(field.point || field.exponent) {
                field.point = true;
            } else if ch == b'+' && !(field.plus || field.post_sign) {
                field.plus = true;
                field.post_sign = true;
                i += 1;
                break;
            } else if ch == b'-' && !field.plus {
                field.post_sign = true;
                i += 1;
                break;
            } else if ch == b'^' && at(i + 1) == b'^' && at(i + 2) == b'^' && at(i + 3) == b'^' {
                field.exponent = true;
                i += 4;
                continue;
            } else {
                break;
            }
            i += 1;
        }
        if pre > 15 || post > 15 || pre + post == 0 {
            return Err(error!(ParameterError));
        }
        field.lead = pre as u8;
        field.post = post as u8;
        items.push(Using::Number(std::mem::take(&mut field)));
        found = true;
        pre = 0;
    }
    if !found {
        return Err(error!(ParameterError));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(v: f32) -> String {
        StdFormatter.plain(v)
    }

    fn using(fmt: &str, v: f32) -> String {
        match &parse_using(fmt.as_bytes()).unwrap()[0] {
            Using::Number(field) => StdFormatter.format(v, field),
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn test_plain() {
        assert_eq!(plain(2.5), " 2.5");
        assert_eq!(plain(12.5), "12.5");
        assert_eq!(plain(0.5), " 0.5");
        assert_eq!(plain(0.0), " 0");
        assert_eq!(plain(-2.5), "-2.5");
        assert_eq!(plain(100.0), "100");
        assert_eq!(plain(1.0 / 3.0), " 0.333333");
        assert_eq!(plain(1234567.0), "1234567");
        assert_eq!(plain(1e10), " 1E+10");
        assert_eq!(plain(-1.5e-7), "-1.5E-07");
    }

    #[test]
    fn test_using_fields() {
        assert_eq!(using("###.##", 3.14159), "  3.14");
        assert_eq!(using("##", 123.0), "%123");
        assert_eq!(using("$$##.##", 5.5), "  $5.50");
        assert_eq!(using("**##", 12.0), "**12");
        assert_eq!(using("#,###", 1234.0), "1,234");
        assert_eq!(using("##.##-", -1.5), " 1.50-");
        assert_eq!(using("+##", 5.0), " +5");
    }

    #[test]
    fn test_parse_using_literals_and_text() {
        let items = parse_using(b"A! %  %_#").unwrap();
        assert_eq!(
            items,
            vec![
                Using::Literal('A'),
                Using::Text(1),
                Using::Literal(' '),
                Using::Text(4),
                Using::Literal('#'),
            ]
        );
        assert!(parse_using(b"NO FIELDS").is_err());
    }
}
