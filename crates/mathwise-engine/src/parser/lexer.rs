use mathwise_core::{Constant, Func, MathError, MathResult};

use super::tokens::{Operator, Special, Token};

/// Names recognised inside a run of letters, longest first so that `sinh`
/// wins over `sin` and `exp` over `e`.
const KNOWN_NAMES: &[&str] = &[
    "factorial", "asin", "acos", "atan", "sinh", "cosh", "tanh", "sqrt", "root", "sin", "cos",
    "tan", "cot", "sec", "csc", "exp", "log", "abs", "ln", "pi",
];

/// Close any parentheses left open, e.g. `root(3, 27` from the normalizer.
pub(crate) fn balance_parentheses(input: &str) -> String {
    let mut depth: i32 = 0;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
    }
    let mut out = input.to_string();
    for _ in 0..depth.max(0) {
        out.push(')');
    }
    out
}

pub(crate) fn lex(input: &str) -> MathResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
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
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| MathError::Parse(format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphabetic() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                split_word(&word, &mut tokens);
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Operator(Operator::Pow));
                i += 2;
            }
            '^' => {
                tokens.push(Token::Operator(Operator::Pow));
                i += 1;
            }
            '*' | '×' | '·' => {
                tokens.push(Token::Operator(Operator::Mul));
                i += 1;
            }
            '/' | '÷' => {
                tokens.push(Token::Operator(Operator::Div));
                i += 1;
            }
            '+' => {
                tokens.push(Token::Operator(Operator::Add));
                i += 1;
            }
            '-' | '−' => {
                tokens.push(Token::Operator(Operator::Sub));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Bang);
                i += 1;
            }
            other => {
                return Err(MathError::Parse(format!("unexpected character '{other}'")));
            }
        }
    }

    Ok(tokens)
}

/// Split a run of letters into names and single-letter symbols, so `xy`
/// becomes `x`, `y` and `xsin` becomes `x`, `sin`.
fn split_word(word: &str, out: &mut Vec<Token>) {
    let mut rest = word;
    while !rest.is_empty() {
        if let Some(name) = KNOWN_NAMES.iter().find(|n| rest.starts_with(*n)) {
            out.push(name_token(name));
            rest = &rest[name.len()..];
            continue;
        }
        let mut it = rest.char_indices();
        let (_, c) = match it.next() {
            Some(pair) => pair,
            None => break,
        };
        let next = it.next().map_or(rest.len(), |(idx, _)| idx);
        out.push(match c {
            'E' => Token::Constant(Constant::E),
            'I' => Token::Constant(Constant::I),
            _ => Token::Identifier(c.to_string()),
        });
        rest = &rest[next..];
    }
}

fn name_token(name: &str) -> Token {
    match name {
        "pi" => Token::Constant(Constant::Pi),
        "sqrt" => Token::Special(Special::Sqrt),
        "root" => Token::Special(Special::Root),
        "factorial" => Token::Special(Special::Factorial),
        other => match Func::from_name(other) {
            Some(f) => Token::Function(f),
            None => Token::Identifier(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_power_aliases() {
        let a = lex("x**2").unwrap();
        let b = lex("x^2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a[1], Token::Operator(Operator::Pow));
    }

    #[test]
    fn test_lex_splits_letter_runs() {
        let tokens = lex("xy").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Identifier("x".into()), Token::Identifier("y".into())]
        );
        let tokens = lex("sinh").unwrap();
        assert_eq!(tokens, vec![Token::Function(Func::Sinh)]);
        let tokens = lex("2pi").unwrap();
        assert_eq!(tokens, vec![Token::Number(2.0), Token::Constant(Constant::Pi)]);
    }

    #[test]
    fn test_lex_division_sign() {
        let tokens = lex("6÷3").unwrap();
        assert_eq!(tokens[1], Token::Operator(Operator::Div));
    }

    #[test]
    fn test_lex_rejects_unknown_characters() {
        assert!(matches!(lex("3 > 2"), Err(MathError::Parse(_))));
        assert!(lex("1.2.3").is_err());
    }

    #[test]
    fn test_balance_parentheses() {
        assert_eq!(balance_parentheses("root(3, 27"), "root(3, 27)");
        assert_eq!(balance_parentheses("(x)"), "(x)");
    }
}
