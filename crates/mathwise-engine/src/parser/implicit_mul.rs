//! Implicit multiplication, e.g. `2x` → `2 * x` and `(x+1)(x-1)`.

use super::tokens::{Operator, Token};

fn ends_operand(t: &Token) -> bool {
    matches!(
        t,
        Token::Number(_)
            | Token::Identifier(_)
            | Token::Constant(_)
            | Token::RightParen
            | Token::Bang
    )
}

fn should_insert_mul(current: &Token, next: &Token) -> bool {
    if !ends_operand(current) {
        return false;
    }
    match next {
        // `2 3` stays a syntax error
        Token::Number(_) => !matches!(current, Token::Number(_)),
        Token::Identifier(_) | Token::Constant(_) | Token::LeftParen => true,
        t if t.is_callable() => true,
        _ => false,
    }
}

pub(crate) fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let needs_insertion = tokens
        .windows(2)
        .any(|w| should_insert_mul(&w[0], &w[1]));
    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();
    while let Some(current) = it.next() {
        let needs_mul = it
            .peek()
            .is_some_and(|next| should_insert_mul(&current, next));
        result.push(current);
        if needs_mul {
            result.push(Token::Operator(Operator::Mul));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::Func;

    #[test]
    fn test_number_identifier() {
        let out =
            insert_implicit_multiplication(vec![Token::Number(2.0), Token::Identifier("x".into())]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], Token::Operator(Operator::Mul));
    }

    #[test]
    fn test_paren_paren() {
        let out = insert_implicit_multiplication(vec![Token::RightParen, Token::LeftParen]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_function_call_untouched() {
        let out =
            insert_implicit_multiplication(vec![Token::Function(Func::Sin), Token::LeftParen]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_number_function() {
        let out =
            insert_implicit_multiplication(vec![Token::Number(4.0), Token::Function(Func::Cos)]);
        assert_eq!(out[1], Token::Operator(Operator::Mul));
    }

    #[test]
    fn test_adjacent_numbers_left_alone() {
        let out = insert_implicit_multiplication(vec![Token::Number(2.0), Token::Number(3.0)]);
        assert_eq!(out.len(), 2);
    }
}
