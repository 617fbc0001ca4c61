//! 문자열 → 기호식 파서
//!
//! 문법:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | ident | ident '(' ident ')' | '(' expr ')'
//! ```
//!
//! 지수는 정수 상수여야 한다. `sin`, `cos`, `tan` 외의 호출은 미정 함수로
//! 해석되며, 모든 함수 인자는 단일 기호여야 한다.

use num::{BigInt, BigRational, Signed};

use super::atom::Symbol;
use super::expr::Expr;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(BigRational),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        let start = i;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
                continue;
            }
            '+' => tokens.push((start, Token::Plus)),
            '-' => tokens.push((start, Token::Minus)),
            '/' => tokens.push((start, Token::Slash)),
            '^' => tokens.push((start, Token::Caret)),
            '(' => tokens.push((start, Token::LParen)),
            ')' => tokens.push((start, Token::RParen)),
            '*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    i += 1;
                    tokens.push((start, Token::Caret));
                } else {
                    tokens.push((start, Token::Star));
                }
            }
            '0'..='9' | '.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &src[start..i];
                tokens.push((start, Token::Number(parse_decimal(text, start)?)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(src[start..i].to_string())));
                continue;
            }
            other => {
                // 비 ASCII 입력도 문자 단위로 보고한다
                let found = src[start..].chars().next().unwrap_or(other);
                return Err(Error::Parse {
                    position: start,
                    message: format!("unexpected character `{found}`"),
                });
            }
        }
        i += 1;
    }
    Ok(tokens)
}

/// `3.83405` 같은 소수를 정확한 유리수로
fn parse_decimal(text: &str, position: usize) -> Result<BigRational> {
    let bad = || Error::Parse {
        position,
        message: format!("malformed number `{text}`"),
    };
    let (int_part, frac_part) = match text.split_once('.') {
        Some((a, b)) => (a, b),
        None => (text, ""),
    };
    if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
        return Err(bad());
    }
    let digits = format!("{int_part}{frac_part}");
    let numer: BigInt = digits.parse().map_err(|_| bad())?;
    let denom = num::pow(BigInt::from(10), frac_part.len());
    Ok(BigRational::new(numer, denom))
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map(|(p, _)| *p).unwrap_or(self.end)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.position(),
            message: message.into(),
        }
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        tok
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        if self.peek() == Some(&want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {want:?}")))
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc = acc + self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc = acc - self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc = acc * self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let at = self.position();
                    let rhs = self.unary()?;
                    acc = acc.try_div(&rhs).map_err(|_| Error::Parse {
                        position: at,
                        message: "division by zero".to_string(),
                    })?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.primary()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.pos += 1;
        let at = self.position();
        let exponent = self.unary()?;
        let exp = exponent
            .as_constant()
            .filter(|c| c.is_integer() && c.abs() <= BigRational::from_integer(BigInt::from(64)))
            .and_then(|c| num::ToPrimitive::to_i32(c.numer()))
            .ok_or_else(|| Error::Parse {
                position: at,
                message: "exponent must be an integer constant".to_string(),
            })?;
        base.pow(exp).map_err(|_| Error::Parse {
            position: at,
            message: "zero raised to a negative power".to_string(),
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        let at = self.position();
        match self.bump() {
            Some(Token::Number(c)) => Ok(Expr::from_rational(c)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() != Some(&Token::LParen) {
                    return Ok(Expr::symbol(&Symbol::new(&name)));
                }
                self.pos += 1;
                let arg = match self.bump() {
                    Some(Token::Ident(arg)) => Symbol::new(&arg),
                    _ => {
                        return Err(Error::Parse {
                            position: at,
                            message: format!("argument of `{name}` must be a single symbol"),
                        })
                    }
                };
                self.expect(Token::RParen)?;
                match name.as_str() {
                    "sin" => Ok(Expr::sin(&arg)),
                    "cos" => Ok(Expr::cos(&arg)),
                    "tan" => Expr::sin(&arg).try_div(&Expr::cos(&arg)),
                    _ => Ok(Expr::function(&name, &arg)),
                }
            }
            Some(other) => Err(Error::Parse {
                position: at,
                message: format!("unexpected token {other:?}"),
            }),
            None => Err(Error::Parse {
                position: at,
                message: "unexpected end of input".to_string(),
            }),
        }
    }
}

/// 식 문자열을 `Expr`로 파싱
pub fn parse(src: &str) -> Result<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.len(),
    };
    let expr = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("trailing input"));
    }
    Ok(expr)
}

impl std::str::FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_and_associativity() {
        let a = parse("1 + 2*3^2").unwrap();
        assert_eq!(a, Expr::integer(19));
        let b = parse("8/2/2").unwrap();
        assert_eq!(b, Expr::integer(2));
        let c = parse("2**3 - -1").unwrap();
        assert_eq!(c, Expr::integer(9));
    }

    #[test]
    fn decimals_are_exact() {
        let v = parse("3.83405").unwrap();
        assert_eq!(v, Expr::rational(383405, 100000).unwrap());
    }

    #[test]
    fn schwarzschild_entry_matches_builder() {
        let r = Symbol::new("r");
        let m = Symbol::new("M");
        let built = -(Expr::one()
            - Expr::integer(2) * Expr::symbol(&m).try_div(&Expr::symbol(&r)).unwrap());
        assert!(parse("-(1 - 2*M/r)").unwrap().equivalent(&built));
    }

    #[test]
    fn functions_and_tan() {
        let theta = Symbol::new("theta");
        let tan = parse("tan(theta)*cos(theta)").unwrap();
        assert!(tan.equivalent(&Expr::sin(&theta)));
        let r = Symbol::new("r");
        assert_eq!(parse("A(r)").unwrap(), Expr::function("A", &r));
    }

    #[test]
    fn errors_carry_positions() {
        match parse("r + * 2") {
            Err(Error::Parse { position, .. }) => assert_eq!(position, 4),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse("r^x"), Err(Error::Parse { .. })));
        assert!(matches!(parse("sin(r*2)"), Err(Error::Parse { .. })));
        assert!(matches!(parse("1/0"), Err(Error::Parse { .. })));
        assert!(matches!(parse("(r"), Err(Error::Parse { .. })));
    }

    #[test]
    fn non_ascii_character_is_reported_whole() {
        match parse("r^2*sin(θ)^2") {
            Err(Error::Parse { position, message }) => {
                assert_eq!(position, 8);
                assert_eq!(message, "unexpected character `θ`");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
