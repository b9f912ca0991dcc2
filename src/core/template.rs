//! printf-style message templates
//!
//! Destinations carry a two-slot template (severity name, message) such as
//! `"%-10s %s"`, and `Router::logf` accepts a caller-supplied template with a
//! slice of typed arguments. Both go through [`render`].
//!
//! Supported directives: `%s %v %d %i %f %F %e %x %X %o %b %q %t %c %%`, with
//! the flags `-` (left-align), `0` (zero pad), `+` (force sign) and ` ` (space
//! for sign), an optional width and an optional `.precision`.
//!
//! Rendering never guesses: a missing argument, a leftover argument, an
//! unknown verb or an argument of the wrong kind is a [`TemplateError`].

use std::fmt::{self, Write as _};

/// Typed argument for a templated log call
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl FormatArg {
    /// Short name of the argument kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "string",
            FormatArg::Int(_) => "int",
            FormatArg::UInt(_) => "uint",
            FormatArg::Float(_) => "float",
            FormatArg::Bool(_) => "bool",
            FormatArg::Char(_) => "char",
        }
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(s) => write!(f, "{}", s),
            FormatArg::Int(i) => write!(f, "{}", i),
            FormatArg::UInt(u) => write!(f, "{}", u),
            FormatArg::Float(fl) => write!(f, "{}", fl),
            FormatArg::Bool(b) => write!(f, "{}", b),
            FormatArg::Char(c) => write!(f, "{}", c),
        }
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        FormatArg::Str(s)
    }
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        FormatArg::Str(s.to_string())
    }
}

impl From<&String> for FormatArg {
    fn from(s: &String) -> Self {
        FormatArg::Str(s.clone())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg {
            fn from(i: $t) -> Self {
                FormatArg::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FormatArg {
            fn from(u: $t) -> Self {
                FormatArg::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FormatArg {
    fn from(f: f32) -> Self {
        FormatArg::Float(f64::from(f))
    }
}

impl From<f64> for FormatArg {
    fn from(f: f64) -> Self {
        FormatArg::Float(f)
    }
}

impl From<bool> for FormatArg {
    fn from(b: bool) -> Self {
        FormatArg::Bool(b)
    }
}

impl From<char> for FormatArg {
    fn from(c: char) -> Self {
        FormatArg::Char(c)
    }
}

impl From<crate::core::Severity> for FormatArg {
    fn from(s: crate::core::Severity) -> Self {
        FormatArg::Str(s.render().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A directive has no argument left to consume (1-based index)
    #[error("missing argument for directive #{index}")]
    MissingArgument { index: usize },

    #[error("{count} argument(s) not consumed by the template")]
    ExtraArguments { count: usize },

    #[error("unknown verb '%{verb}' at byte {position}")]
    UnknownVerb { verb: char, position: usize },

    #[error("verb '%{verb}' cannot format {kind} argument #{index}")]
    BadArgument {
        verb: char,
        kind: &'static str,
        index: usize,
    },

    /// The template ends in the middle of a directive
    #[error("incomplete directive at byte {position}")]
    Incomplete { position: usize },

    #[error("width {width} of directive at byte {position} exceeds the 1000000 limit")]
    BadWidth { width: usize, position: usize },

    #[error("precision {precision} of directive at byte {position} exceeds the 1000000 limit")]
    BadPrecision { precision: usize, position: usize },
}

/// Largest width or precision a directive may ask for
pub const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Render `template` against `args`.
///
/// ```
/// use rust_fanout_logger::core::template::{render, FormatArg};
///
/// let line = render("%s=%d", &["count".into(), 5.into()]).unwrap();
/// assert_eq!(line, "count=5");
///
/// let line = render("%-10s %s", &[FormatArg::from("DEBUG"), "hello".into()]).unwrap();
/// assert_eq!(line, "DEBUG      hello");
/// ```
pub fn render(template: &str, args: &[FormatArg]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next_arg = 0usize;
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();

        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => directive.left = true,
                '0' => directive.zero = true,
                '+' => directive.plus = true,
                ' ' => directive.space = true,
                _ => break,
            }
            chars.next();
        }

        directive.width = take_number(&mut chars);
        if let Some(width) = directive.width.filter(|w| *w > MAX_WIDTH) {
            return Err(TemplateError::BadWidth { width, position: pos });
        }

        if let Some(&(_, '.')) = chars.peek() {
            chars.next();
            let precision = take_number(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                return Err(TemplateError::BadPrecision { precision, position: pos });
            }
            directive.precision = Some(precision);
        }

        let (verb_pos, verb) = chars.next().ok_or(TemplateError::Incomplete { position: pos })?;

        if verb == '%' {
            out.push('%');
            continue;
        }
        if !is_known_verb(verb) {
            return Err(TemplateError::UnknownVerb {
                verb,
                position: verb_pos,
            });
        }

        next_arg += 1;
        let arg = args
            .get(next_arg - 1)
            .ok_or(TemplateError::MissingArgument { index: next_arg })?;

        format_one(&mut out, verb, &directive, arg).map_err(|_| TemplateError::BadArgument {
            verb,
            kind: arg.kind(),
            index: next_arg,
        })?;
    }

    if next_arg < args.len() {
        return Err(TemplateError::ExtraArguments {
            count: args.len() - next_arg,
        });
    }

    Ok(out)
}

fn take_number(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&(_, d)) = chars.peek() {
        let Some(digit) = d.to_digit(10) else { break };
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

fn is_known_verb(verb: char) -> bool {
    matches!(
        verb,
        's' | 'v' | 'd' | 'i' | 'f' | 'F' | 'e' | 'x' | 'X' | 'o' | 'b' | 'q' | 't' | 'c'
    )
}

/// Marker for a verb/argument mismatch; the caller attaches the details.
struct Mismatch;

fn format_one(
    out: &mut String,
    verb: char,
    d: &Directive,
    arg: &FormatArg,
) -> Result<(), Mismatch> {
    match (verb, arg) {
        ('s' | 'v', FormatArg::Str(s)) => {
            let text = match d.precision {
                Some(p) => s.chars().take(p).collect::<String>(),
                None => s.clone(),
            };
            pad_text(out, &text, d);
        }
        ('s' | 'v', FormatArg::Float(f)) if d.precision.is_some() => {
            pad_number(out, *f < 0.0, &format!("{:.*}", d.precision.unwrap_or(6), f.abs()), d)
        }
        ('s' | 'v', FormatArg::Int(i)) => pad_number(out, *i < 0, &i.unsigned_abs().to_string(), d),
        ('s' | 'v', FormatArg::UInt(u)) => pad_number(out, false, &u.to_string(), d),
        ('s' | 'v', FormatArg::Float(f)) => pad_number(out, *f < 0.0, &f.abs().to_string(), d),
        ('s' | 'v' | 't', FormatArg::Bool(b)) => pad_text(out, if *b { "true" } else { "false" }, d),
        ('s' | 'v' | 'c', FormatArg::Char(c)) => pad_text(out, &c.to_string(), d),

        ('d' | 'i', FormatArg::Int(i)) => {
            pad_number(out, *i < 0, &min_digits(i.unsigned_abs().to_string(), d), d)
        }
        ('d' | 'i', FormatArg::UInt(u)) => pad_number(out, false, &min_digits(u.to_string(), d), d),

        ('f' | 'F', FormatArg::Float(f)) => {
            let body = format!("{:.*}", d.precision.unwrap_or(6), f.abs());
            pad_number(out, f.is_sign_negative() && *f != 0.0, &body, d);
        }
        ('e', FormatArg::Float(f)) => {
            let body = c_exponent(f.abs(), d.precision.unwrap_or(6));
            pad_number(out, f.is_sign_negative() && *f != 0.0, &body, d);
        }

        ('x' | 'X' | 'o' | 'b', FormatArg::Int(i)) => {
            let body = radix(i.unsigned_abs(), verb);
            pad_number(out, *i < 0, &min_digits(body, d), d);
        }
        ('x' | 'X' | 'o' | 'b', FormatArg::UInt(u)) => {
            pad_number(out, false, &min_digits(radix(*u, verb), d), d)
        }
        ('x' | 'X', FormatArg::Str(s)) => {
            let mut hex = String::with_capacity(s.len() * 2);
            for byte in s.bytes() {
                if verb == 'x' {
                    let _ = write!(hex, "{:02x}", byte);
                } else {
                    let _ = write!(hex, "{:02X}", byte);
                }
            }
            pad_text(out, &hex, d);
        }

        ('q', FormatArg::Str(s)) => pad_text(out, &format!("{:?}", s), d),
        ('q', FormatArg::Char(c)) => pad_text(out, &format!("{:?}", c), d),

        ('c', FormatArg::Int(i)) => {
            let c = u32::try_from(*i).ok().and_then(char::from_u32).ok_or(Mismatch)?;
            pad_text(out, &c.to_string(), d);
        }
        ('c', FormatArg::UInt(u)) => {
            let c = u32::try_from(*u).ok().and_then(char::from_u32).ok_or(Mismatch)?;
            pad_text(out, &c.to_string(), d);
        }

        _ => return Err(Mismatch),
    }
    Ok(())
}

fn radix(value: u64, verb: char) -> String {
    match verb {
        'x' => format!("{:x}", value),
        'X' => format!("{:X}", value),
        'o' => format!("{:o}", value),
        _ => format!("{:b}", value),
    }
}

/// Integer precision is a minimum digit count.
fn min_digits(digits: String, d: &Directive) -> String {
    match d.precision {
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    }
}

/// `1.5e+00` style exponent, as C and Go print it.
fn c_exponent(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(rest) => ('-', rest),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

fn pad_text(out: &mut String, text: &str, d: &Directive) {
    let len = text.chars().count();
    let fill = d.width.unwrap_or(0).saturating_sub(len);
    if d.left {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}

fn pad_number(out: &mut String, negative: bool, body: &str, d: &Directive) {
    let sign = if negative {
        "-"
    } else if d.plus {
        "+"
    } else if d.space {
        " "
    } else {
        ""
    };
    let len = sign.len() + body.chars().count();
    let fill = d.width.unwrap_or(0).saturating_sub(len);

    if d.left {
        out.push_str(sign);
        out.push_str(body);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if d.zero {
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(body);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(sign);
        out.push_str(body);
    }
}
