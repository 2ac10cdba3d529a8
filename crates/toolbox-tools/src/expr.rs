//! Arithmetic expression evaluator used by the `calculator` tool.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so
//! `-2^2` is `-4`.

use std::f64::consts;

use thiserror::Error;

/// Evaluation failures, reported verbatim to the client.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ExprError {
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("Undefined symbol {name}")]
    UndefinedSymbol { name: String },
    #[error("Undefined function {name}")]
    UndefinedFunction { name: String },
    #[error("Wrong number of arguments in function {name} ({given} provided)")]
    Arity { name: String, given: usize },
    #[error("Invalid number '{literal}'")]
    InvalidNumber { literal: String },
    #[error("Expression nested too deeply (limit {})", MAX_DEPTH)]
    TooDeep,
}

/// Maximum nesting of unary operators, parentheses and function calls.
pub(crate) const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Ident(s) => s.clone(),
            Self::Op(c) => c.to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Comma => ",".to_string(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation: 1e3, 2.5E-4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExprError::InvalidNumber { literal })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            _ => return Err(ExprError::UnexpectedChar { ch: c, pos: i + 1 }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, want: &Token) -> Result<(), ExprError> {
        match self.next() {
            Some(ref t) if t == want => Ok(()),
            Some(t) => Err(ExprError::UnexpectedToken {
                token: t.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == '+' { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut acc = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.unary()?;
            acc = match op {
                '*' => acc * rhs,
                '/' => acc / rhs,
                _ => acc % rhs,
            };
        }
        Ok(acc)
    }

    /// Every recursive path of the grammar passes through here, so this is
    /// where nesting is bounded.
    fn unary(&mut self) -> Result<f64, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let value = self.unary_operand();
        self.depth -= 1;
        value
    }

    fn unary_operand(&mut self) -> Result<f64, ExprError> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, ExprError> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let args = self.args()?;
                    call_function(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(t) => Err(ExprError::UnexpectedToken {
                token: t.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn args(&mut self) -> Result<Vec<f64>, ExprError> {
        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(t) => {
                    return Err(ExprError::UnexpectedToken {
                        token: t.describe(),
                    })
                }
                None => return Err(ExprError::UnexpectedEnd),
            }
        }
    }
}

fn constant(name: &str) -> Result<f64, ExprError> {
    match name {
        "pi" | "PI" => Ok(consts::PI),
        "e" | "E" => Ok(consts::E),
        "tau" => Ok(consts::TAU),
        "Infinity" => Ok(f64::INFINITY),
        _ => Err(ExprError::UndefinedSymbol {
            name: name.to_string(),
        }),
    }
}

fn call_function(name: &str, args: &[f64]) -> Result<f64, ExprError> {
    let arity = |n: usize| -> Result<(), ExprError> {
        if args.len() == n {
            Ok(())
        } else {
            Err(ExprError::Arity {
                name: name.to_string(),
                given: args.len(),
            })
        }
    };

    let unary: Option<fn(f64) -> f64> = match name {
        "sqrt" => Some(f64::sqrt),
        "cbrt" => Some(f64::cbrt),
        "abs" => Some(f64::abs),
        "sin" => Some(f64::sin),
        "cos" => Some(f64::cos),
        "tan" => Some(f64::tan),
        "asin" => Some(f64::asin),
        "acos" => Some(f64::acos),
        "atan" => Some(f64::atan),
        "exp" => Some(f64::exp),
        "ln" => Some(f64::ln),
        "log10" => Some(f64::log10),
        "log2" => Some(f64::log2),
        "floor" => Some(f64::floor),
        "ceil" => Some(f64::ceil),
        "round" => Some(f64::round),
        _ => None,
    };
    if let Some(f) = unary {
        arity(1)?;
        return Ok(f(args[0]));
    }

    match name {
        // log(x) is natural log, log(x, base) uses the given base.
        "log" => match args {
            [x] => Ok(x.ln()),
            [x, base] => Ok(x.log(*base)),
            _ => Err(ExprError::Arity {
                name: name.to_string(),
                given: args.len(),
            }),
        },
        "pow" => {
            arity(2)?;
            Ok(args[0].powf(args[1]))
        }
        "min" | "max" if !args.is_empty() => {
            let fold = if name == "min" { f64::min } else { f64::max };
            Ok(args[1..].iter().copied().fold(args[0], fold))
        }
        "min" | "max" => Err(ExprError::Arity {
            name: name.to_string(),
            given: 0,
        }),
        _ => Err(ExprError::UndefinedFunction {
            name: name.to_string(),
        }),
    }
}

/// Evaluates an arithmetic expression.
pub(crate) fn evaluate(input: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.next() {
        None => Ok(value),
        Some(t) => Err(ExprError::UnexpectedToken {
            token: t.describe(),
        }),
    }
}

/// Formats a result with at most 14 significant digits, dropping a
/// trailing `.0` on integral values.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let rounded: f64 = format!("{value:.13e}").parse().unwrap_or(value);
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{rounded:.0}");
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> f64 {
        evaluate(s).expect(s)
    }

    #[test]
    fn precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("7 % 4"), 3.0);
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_minus() {
        assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
        assert_eq!(eval("-2 ^ 2"), -4.0);
        assert_eq!(eval("2 ^ -1"), 0.5);
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(eval("sqrt(16)"), 4.0);
        assert_eq!(eval("max(1, 7, 3)"), 7.0);
        assert_eq!(eval("log(8, 2)"), 3.0);
        assert!((eval("sin(pi / 2)") - 1.0).abs() < 1e-12);
        assert!((eval("log(e)") - 1.0).abs() < 1e-12);
        assert!((eval("ln(e ^ 2)") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(eval("1e3 + 2.5E-1"), 1000.25);
    }

    #[test]
    fn errors() {
        assert_eq!(evaluate("2 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(
            evaluate("foo + 1"),
            Err(ExprError::UndefinedSymbol { name: "foo".into() })
        );
        assert_eq!(
            evaluate("nope(1)"),
            Err(ExprError::UndefinedFunction {
                name: "nope".into()
            })
        );
        assert!(matches!(
            evaluate("2 $ 3"),
            Err(ExprError::UnexpectedChar { ch: '$', .. })
        ));
        assert!(matches!(
            evaluate("(1 + 2"),
            Err(ExprError::UnexpectedEnd)
        ));
        assert!(matches!(
            evaluate("1 2"),
            Err(ExprError::UnexpectedToken { .. })
        ));
        assert!(matches!(evaluate("sqrt(1, 2)"), Err(ExprError::Arity { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let minuses = format!("{}1", "-".repeat(200_000));
        assert_eq!(evaluate(&minuses), Err(ExprError::TooDeep));

        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate(&parens), Err(ExprError::TooDeep));

        let calls = format!("{}1{}", "abs(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(evaluate(&calls), Err(ExprError::TooDeep));
    }

    #[test]
    fn nesting_below_the_limit_evaluates() {
        let depth = MAX_DEPTH / 2;
        let parens = format!("{}2{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&parens), 2.0);
        assert_eq!(eval(&format!("{}3", "-".repeat(depth))), 3.0);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.33333333333333");
        assert_eq!(format_number(1.0 / 0.0), "Infinity");
        assert_eq!(format_number(-0.0), "0");
    }
}
