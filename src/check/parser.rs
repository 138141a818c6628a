//! Parser for the textual form of checks
//!
//! Grammar:
//!
//! ```text
//! list  := expr (',' expr)*
//! expr  := NAME '(' [expr (',' expr)*] ')' | INT | STRING
//! ```
//!
//! Strings are double-quoted and support the escapes `\" \\ \n \t \r`.
//! Which names are allowed depends on where the call appears: a list check,
//! a string check or an integer check.

use super::{Check, IntCheck, Pattern, StrCheck};
use crate::error::ParseError;

/// Deepest nesting of calls accepted in check text
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Int(i64),
    Str(String),
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Call {
        name: String,
        args: Vec<Expr>,
        pos: usize,
    },
    Int(i64, usize),
    Str(String, usize),
}

impl Expr {
    fn pos(&self) -> usize {
        match self {
            Expr::Call { pos, .. } | Expr::Int(_, pos) | Expr::Str(_, pos) => *pos,
        }
    }
}

/// Parse a comma-separated, non-empty list of list checks
///
/// # Examples
/// ```
/// use semver_params::check::parse_checks;
///
/// let checks = parse_checks(r#"Length(GT(0)), SliceByPos(EQ("rc"))"#).unwrap();
/// assert_eq!(checks.len(), 2);
/// assert!(checks[1].check(&["rc", "1"]).is_ok());
/// ```
pub fn parse_checks(src: &str) -> Result<Vec<Check>, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens,
        next: 0,
        depth: 0,
    };
    let exprs = parser.list()?;
    exprs.iter().map(|e| to_check(src, e)).collect()
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' => {
                chars.next();
                let tok = match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => Token::Comma,
                };
                tokens.push((pos, tok));
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((esc_pos, '\\')) => match chars.next() {
                            Some((_, '"')) => s.push('"'),
                            Some((_, '\\')) => s.push('\\'),
                            Some((_, 'n')) => s.push('\n'),
                            Some((_, 't')) => s.push('\t'),
                            Some((_, 'r')) => s.push('\r'),
                            Some((_, other)) => {
                                return Err(ParseError::bad_check(
                                    src,
                                    esc_pos,
                                    format!("unknown escape sequence: \\{}", other),
                                ))
                            }
                            None => {
                                return Err(ParseError::bad_check(src, pos, "unterminated string"))
                            }
                        },
                        Some((_, other)) => s.push(other),
                        None => return Err(ParseError::bad_check(src, pos, "unterminated string")),
                    }
                }
                tokens.push((pos, Token::Str(s)));
            }
            c if c == '-' || c.is_ascii_digit() => {
                let mut text = String::new();
                text.push(c);
                chars.next();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    text.push(d);
                    chars.next();
                }
                let n = text.parse::<i64>().map_err(|e| {
                    ParseError::bad_check(src, pos, format!("bad number ({}): {}", text, e))
                })?;
                tokens.push((pos, Token::Int(n)));
            }
            c if c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !(d.is_ascii_alphanumeric() || d == '_') {
                        break;
                    }
                    name.push(d);
                    chars.next();
                }
                tokens.push((pos, Token::Name(name)));
            }
            other => {
                return Err(ParseError::bad_check(
                    src,
                    pos,
                    format!("unexpected character: {:?}", other),
                ))
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<(usize, Token)>,
    next: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next).map(|(_, t)| t)
    }

    /// Offset of the next token, or the end of the text
    fn pos(&self) -> usize {
        self.tokens
            .get(self.next)
            .map(|(p, _)| *p)
            .unwrap_or(self.src.len())
    }

    fn bump(&mut self) -> Option<(usize, Token)> {
        let tok = self.tokens.get(self.next).cloned();
        if tok.is_some() {
            self.next += 1;
        }
        tok
    }

    fn err(&self, reason: impl Into<String>) -> ParseError {
        ParseError::bad_check(self.src, self.pos(), reason)
    }

    fn expect(&mut self, want: Token) -> Result<(), ParseError> {
        if self.peek() == Some(&want) {
            self.next += 1;
            Ok(())
        } else {
            Err(self.err(format!("expected {}", describe(Some(&want)))))
        }
    }

    fn list(&mut self) -> Result<Vec<Expr>, ParseError> {
        if self.peek().is_none() {
            return Err(self.err("no checks given"));
        }
        let mut exprs = vec![self.expr()?];
        while self.peek() == Some(&Token::Comma) {
            self.next += 1;
            exprs.push(self.expr()?);
        }
        if self.peek().is_some() {
            return Err(self.err(format!("unexpected {}", describe(self.peek()))));
        }
        Ok(exprs)
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let pos = self.pos();
        match self.bump() {
            Some((_, Token::Int(n))) => Ok(Expr::Int(n, pos)),
            Some((_, Token::Str(s))) => Ok(Expr::Str(s, pos)),
            Some((_, Token::Name(name))) => {
                if self.depth >= MAX_DEPTH {
                    return Err(ParseError::bad_check(
                        self.src,
                        pos,
                        format!("the checks are nested more than {} deep", MAX_DEPTH),
                    ));
                }
                self.expect(Token::LParen)?;
                self.depth += 1;
                let mut args = Vec::new();
                if self.peek() != Some(&Token::RParen) {
                    args.push(self.expr()?);
                    while self.peek() == Some(&Token::Comma) {
                        self.next += 1;
                        args.push(self.expr()?);
                    }
                }
                self.depth -= 1;
                self.expect(Token::RParen)?;
                Ok(Expr::Call { name, args, pos })
            }
            other => {
                self.next = self.next.saturating_sub(usize::from(other.is_some()));
                Err(self.err(format!(
                    "expected a check, found {}",
                    describe(other.as_ref().map(|(_, t)| t))
                )))
            }
        }
    }
}

fn describe(tok: Option<&Token>) -> String {
    match tok {
        None => "the end of the text".to_string(),
        Some(Token::Name(n)) => format!("'{}'", n),
        Some(Token::Int(n)) => format!("the number {}", n),
        Some(Token::Str(s)) => format!("the string {:?}", s),
        Some(Token::LParen) => "'('".to_string(),
        Some(Token::RParen) => "')'".to_string(),
        Some(Token::Comma) => "','".to_string(),
    }
}

fn arity(src: &str, name: &str, args: &[Expr], pos: usize, want: usize) -> Result<(), ParseError> {
    if args.len() != want {
        return Err(ParseError::bad_check(
            src,
            pos,
            format!("{} expects {} argument(s), found {}", name, want, args.len()),
        ));
    }
    Ok(())
}

fn at_least(src: &str, name: &str, args: &[Expr], pos: usize, min: usize) -> Result<(), ParseError> {
    if args.len() < min {
        return Err(ParseError::bad_check(
            src,
            pos,
            format!("{} expects at least {} argument(s), found {}", name, min, args.len()),
        ));
    }
    Ok(())
}

fn int_arg(src: &str, e: &Expr) -> Result<i64, ParseError> {
    match e {
        Expr::Int(n, _) => Ok(*n),
        other => Err(ParseError::bad_check(src, other.pos(), "expected a number")),
    }
}

fn str_arg(src: &str, e: &Expr) -> Result<String, ParseError> {
    match e {
        Expr::Str(s, _) => Ok(s.clone()),
        other => Err(ParseError::bad_check(src, other.pos(), "expected a string")),
    }
}

fn call<'e>(src: &str, e: &'e Expr, what: &str) -> Result<(&'e str, &'e [Expr], usize), ParseError> {
    match e {
        Expr::Call { name, args, pos } => Ok((name.as_str(), args.as_slice(), *pos)),
        other => Err(ParseError::bad_check(src, other.pos(), format!("expected {}", what))),
    }
}

fn to_check(src: &str, e: &Expr) -> Result<Check, ParseError> {
    let (name, args, pos) = call(src, e, "a list check")?;
    let check = match name {
        "Length" => {
            arity(src, name, args, pos, 1)?;
            Check::Length(to_int_check(src, &args[0])?)
        }
        "SliceByPos" => {
            at_least(src, name, args, pos, 1)?;
            Check::SliceByPos(
                args.iter()
                    .map(|a| to_str_check(src, a))
                    .collect::<Result<_, _>>()?,
            )
        }
        "SliceAll" => {
            arity(src, name, args, pos, 1)?;
            Check::SliceAll(to_str_check(src, &args[0])?)
        }
        "SliceAny" => {
            arity(src, name, args, pos, 1)?;
            Check::SliceAny(to_str_check(src, &args[0])?)
        }
        "NoDups" => {
            arity(src, name, args, pos, 0)?;
            Check::NoDups
        }
        "Not" => {
            arity(src, name, args, pos, 1)?;
            Check::Not(Box::new(to_check(src, &args[0])?))
        }
        "And" | "Or" => {
            at_least(src, name, args, pos, 1)?;
            let checks = args
                .iter()
                .map(|a| to_check(src, a))
                .collect::<Result<Vec<_>, _>>()?;
            if name == "And" {
                Check::And(checks)
            } else {
                Check::Or(checks)
            }
        }
        other => {
            return Err(ParseError::bad_check(
                src,
                pos,
                format!("unknown list check: {}", other),
            ))
        }
    };
    Ok(check)
}

fn to_str_check(src: &str, e: &Expr) -> Result<StrCheck, ParseError> {
    let (name, args, pos) = call(src, e, "a string check")?;
    let check = match name {
        "EQ" | "NE" | "HasPrefix" | "HasSuffix" => {
            arity(src, name, args, pos, 1)?;
            let s = str_arg(src, &args[0])?;
            match name {
                "EQ" => StrCheck::Eq(s),
                "NE" => StrCheck::Ne(s),
                "HasPrefix" => StrCheck::HasPrefix(s),
                _ => StrCheck::HasSuffix(s),
            }
        }
        "MatchesPattern" => {
            arity(src, name, args, pos, 2)?;
            let source = str_arg(src, &args[0])?;
            let desc = str_arg(src, &args[1])?;
            let pattern = Pattern::new(source, desc).map_err(|e| {
                ParseError::bad_check(src, args[0].pos(), format!("bad pattern: {}", e))
            })?;
            StrCheck::MatchesPattern(pattern)
        }
        "Length" => {
            arity(src, name, args, pos, 1)?;
            StrCheck::Length(to_int_check(src, &args[0])?)
        }
        "Not" => {
            arity(src, name, args, pos, 1)?;
            StrCheck::Not(Box::new(to_str_check(src, &args[0])?))
        }
        "And" | "Or" => {
            at_least(src, name, args, pos, 1)?;
            let checks = args
                .iter()
                .map(|a| to_str_check(src, a))
                .collect::<Result<Vec<_>, _>>()?;
            if name == "And" {
                StrCheck::And(checks)
            } else {
                StrCheck::Or(checks)
            }
        }
        other => {
            return Err(ParseError::bad_check(
                src,
                pos,
                format!("unknown string check: {}", other),
            ))
        }
    };
    Ok(check)
}

fn to_int_check(src: &str, e: &Expr) -> Result<IntCheck, ParseError> {
    let (name, args, pos) = call(src, e, "a number check")?;
    let check = match name {
        "EQ" | "NE" | "GT" | "GE" | "LT" | "LE" => {
            arity(src, name, args, pos, 1)?;
            let n = int_arg(src, &args[0])?;
            match name {
                "EQ" => IntCheck::Eq(n),
                "NE" => IntCheck::Ne(n),
                "GT" => IntCheck::Gt(n),
                "GE" => IntCheck::Ge(n),
                "LT" => IntCheck::Lt(n),
                _ => IntCheck::Le(n),
            }
        }
        "Between" => {
            arity(src, name, args, pos, 2)?;
            let lo = int_arg(src, &args[0])?;
            let hi = int_arg(src, &args[1])?;
            if lo > hi {
                return Err(ParseError::bad_check(
                    src,
                    pos,
                    format!("Between: the lower limit ({}) is above the upper ({})", lo, hi),
                ));
            }
            IntCheck::Between(lo, hi)
        }
        "Not" => {
            arity(src, name, args, pos, 1)?;
            IntCheck::Not(Box::new(to_int_check(src, &args[0])?))
        }
        "And" | "Or" => {
            at_least(src, name, args, pos, 1)?;
            let checks = args
                .iter()
                .map(|a| to_int_check(src, a))
                .collect::<Result<Vec<_>, _>>()?;
            if name == "And" {
                IntCheck::And(checks)
            } else {
                IntCheck::Or(checks)
            }
        }
        other => {
            return Err(ParseError::bad_check(
                src,
                pos,
                format!("unknown number check: {}", other),
            ))
        }
    };
    Ok(check)
}
