//! Arithmetic expression evaluation.
//!
//! Hand-written tokenizer and recursive-descent evaluator for the
//! calculator language: integer literals, `+ - * / ^`, postfix `!`,
//! `factorial(x)`, `sqrt(x)`, and parentheses. Unary minus binds looser
//! than `^`, so `-2^2` is -4; `!` binds tighter than `^`, so `2^3!` is 64.

use thiserror::Error;

/// Absolute tolerance when comparing a result against the target integer,
/// absorbing floating-point error from root and factorial operations.
pub const RESULT_TOLERANCE: f64 = 1e-9;

/// Largest factorial operand that stays finite in f64.
const MAX_FACTORIAL: f64 = 170.0;

/// Errors raised while tokenizing or evaluating an expression.
#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression, expected {0}")]
    UnexpectedEnd(String),

    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: String, found: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("factorial of {0} is undefined")]
    FactorialDomain(f64),

    #[error("square root of negative number {0}")]
    SqrtDomain(f64),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Bang,
    LParen,
    RParen,
    Sqrt,
    Factorial,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("{}", n),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::Caret => "^".to_string(),
            Token::Bang => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Sqrt => "sqrt".to_string(),
            Token::Factorial => "factorial".to_string(),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expr.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Bang);
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
            '0'..='9' => {
                let mut value = 0f64;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    value = value * 10.0 + chars[i].to_digit(10).unwrap() as f64;
                    i += 1;
                }
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "sqrt" => tokens.push(Token::Sqrt),
                    "factorial" => tokens.push(Token::Factorial),
                    _ => return Err(ExprError::UnexpectedChar(chars[start])),
                }
            }
            other => return Err(ExprError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

/// Evaluates the expression to a floating-point value.
pub fn evaluate(expr: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(ExprError::UnexpectedToken {
            expected: "end of expression".to_string(),
            found: tok.describe(),
        });
    }
    Ok(value)
}

/// Returns whether an evaluated value hits the target integer within the
/// result tolerance.
pub fn matches_target(value: f64, target: u32) -> bool {
    (value - f64::from(target)).abs() < RESULT_TOLERANCE
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Token, expected: &str) -> Result<(), ExprError> {
        match self.advance() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(ExprError::UnexpectedToken {
                expected: expected.to_string(),
                found: tok.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd(expected.to_string())),
        }
    }

    // expr := term { (+|-) term }
    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    // term := factor { (*|/) factor }
    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    if rhs == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    value /= rhs;
                }
                _ => return Ok(value),
            }
        }
    }

    // factor := '-' factor | power
    fn factor(&mut self) -> Result<f64, ExprError> {
        if let Some(Token::Minus) = self.peek() {
            self.pos += 1;
            return Ok(-self.factor()?);
        }
        self.power()
    }

    // power := postfix [ '^' factor ]  (right-associative)
    fn power(&mut self) -> Result<f64, ExprError> {
        let base = self.postfix()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.factor()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    // postfix := primary { '!' }
    fn postfix(&mut self) -> Result<f64, ExprError> {
        let mut value = self.primary()?;
        while let Some(Token::Bang) = self.peek() {
            self.pos += 1;
            value = factorial(value)?;
        }
        Ok(value)
    }

    // primary := number | '(' expr ')' | sqrt '(' expr ')' | factorial '(' expr ')'
    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen, ")")?;
                Ok(value)
            }
            Some(Token::Sqrt) => {
                self.expect(Token::LParen, "( after sqrt")?;
                let operand = self.expr()?;
                self.expect(Token::RParen, ")")?;
                if operand < 0.0 {
                    return Err(ExprError::SqrtDomain(operand));
                }
                Ok(operand.sqrt())
            }
            Some(Token::Factorial) => {
                self.expect(Token::LParen, "( after factorial")?;
                let operand = self.expr()?;
                self.expect(Token::RParen, ")")?;
                factorial(operand)
            }
            Some(tok) => Err(ExprError::UnexpectedToken {
                expected: "number, '(', or function".to_string(),
                found: tok.describe(),
            }),
            None => Err(ExprError::UnexpectedEnd("number, '(', or function".to_string())),
        }
    }
}

/// Factorial of a non-negative near-integer operand, computed in f64.
fn factorial(value: f64) -> Result<f64, ExprError> {
    let rounded = value.round();
    if value < 0.0 || (value - rounded).abs() >= RESULT_TOLERANCE || rounded > MAX_FACTORIAL {
        return Err(ExprError::FactorialDomain(value));
    }
    let mut result = 1f64;
    let mut k = 2f64;
    while k <= rounded {
        result *= k;
        k += 1.0;
    }
    Ok(result)
}
