//! printf-style text rendering of matrices.
use std::fmt;
use std::str::FromStr;

use crate::error::{MatrixError, Result};
use crate::math::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Fixed,
    Exponent,
    General,
    Shortest,
    Integer,
}

/// Parsed `%[flags][width][.precision]conv` element specifier.
///
/// Supported conversions are `f`, `e`, `g`, `s` and `d`; supported flags are
/// `-` (left-align), `+` (always print a sign) and `0` (zero padding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    conversion: Conversion,
    width: usize,
    precision: Option<usize>,
    left_align: bool,
    plus_sign: bool,
    zero_pad: bool,
}

impl NumberFormat {
    pub const DEFAULT_SPEC: &'static str = "%6.2f";

    /// Render `value`; a result that only shows zero digits never carries a
    /// minus sign.
    pub fn format(&self, value: f64) -> String {
        let body = self.render(value);
        let body = if is_negative_zero(&body) {
            self.render(0.0)
        } else {
            body
        };
        let body = if self.plus_sign && !body.starts_with('-') {
            format!("+{}", body)
        } else {
            body
        };
        self.pad(body)
    }

    fn render(&self, value: f64) -> String {
        match self.conversion {
            Conversion::Fixed => format!("{:.*}", self.precision.unwrap_or(6), value),
            Conversion::Exponent => c_exponent(value, self.precision.unwrap_or(6)),
            Conversion::General => c_general(value, self.precision.unwrap_or(6)),
            Conversion::Shortest => match self.precision {
                Some(p) => format!("{:.*}", p, value),
                None => format!("{}", value),
            },
            Conversion::Integer => format!("{}", value.trunc() as i64),
        }
    }

    fn pad(&self, body: String) -> String {
        let len = body.chars().count();
        if len >= self.width {
            return body;
        }
        let fill = self.width - len;
        if self.left_align {
            format!("{}{}", body, " ".repeat(fill))
        } else if self.zero_pad && self.conversion != Conversion::Shortest {
            let (sign, digits) = match body.chars().next() {
                Some(c @ ('-' | '+')) => (c.to_string(), &body[1..]),
                _ => (String::new(), body.as_str()),
            };
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}", " ".repeat(fill), body)
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            conversion: Conversion::Fixed,
            width: 6,
            precision: Some(2),
            left_align: false,
            plus_sign: false,
            zero_pad: false,
        }
    }
}

impl FromStr for NumberFormat {
    type Err = MatrixError;

    fn from_str(spec: &str) -> Result<Self> {
        let invalid = || MatrixError::InvalidArgument(format!("invalid number format '{}'", spec));
        let rest = spec.strip_prefix('%').ok_or_else(invalid)?;
        let mut chars = rest.chars().peekable();

        let mut fmt = NumberFormat {
            conversion: Conversion::Fixed,
            width: 0,
            precision: None,
            left_align: false,
            plus_sign: false,
            zero_pad: false,
        };
        while let Some(&c) = chars.peek() {
            match c {
                '-' => fmt.left_align = true,
                '+' => fmt.plus_sign = true,
                '0' => fmt.zero_pad = true,
                _ => break,
            }
            chars.next();
        }

        let mut width = String::new();
        while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
            width.push(c);
        }
        if !width.is_empty() {
            fmt.width = width.parse().map_err(|_| invalid())?;
        }

        if chars.next_if_eq(&'.').is_some() {
            let mut precision = String::new();
            while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
                precision.push(c);
            }
            fmt.precision = Some(if precision.is_empty() {
                0
            } else {
                precision.parse().map_err(|_| invalid())?
            });
        }

        fmt.conversion = match chars.next() {
            Some('f') | Some('F') => Conversion::Fixed,
            Some('e') | Some('E') => Conversion::Exponent,
            Some('g') | Some('G') => Conversion::General,
            Some('s') => Conversion::Shortest,
            Some('d') | Some('i') => Conversion::Integer,
            _ => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(fmt)
    }
}

/// `%e` rendering: mantissa, signed exponent of at least two digits.
fn c_exponent(value: f64, precision: usize) -> String {
    let s = format!("{:.*e}", precision, value);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// `%g` rendering: the shorter of fixed and exponent notation, without
/// trailing zeros.
fn c_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, value);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exp < -4 || exp >= p as i32 {
        let s = c_exponent(value, p - 1);
        match s.split_once('e') {
            Some((mantissa, e)) => format!("{}e{}", strip_zeros(mantissa), e),
            None => s,
        }
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `-0.00`, `-0`, `-0.0e+00` and the like.
fn is_negative_zero(body: &str) -> bool {
    match body.strip_prefix('-') {
        Some(rest) => rest
            .split(|c| c == 'e' || c == 'E')
            .next()
            .map_or(false, |mantissa| {
                mantissa.chars().all(|c| c == '0' || c == '.')
            }),
        None => false,
    }
}

impl Matrix {
    /// One line per row, every element rendered with `format`.
    pub fn to_display_string(&self, format: &NumberFormat) -> Result<String> {
        self.ensure_populated()?;
        let mut out = String::new();
        for r in 0..self.nrows() {
            for &v in self.row_slice(r) {
                out.push_str(&format.format(v));
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Like [`Matrix::to_display_string`], parsing a printf-style specifier.
    pub fn to_display_string_with(&self, spec: &str) -> Result<String> {
        self.to_display_string(&spec.parse::<NumberFormat>()?)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        match self.to_display_string(&NumberFormat::default()) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
