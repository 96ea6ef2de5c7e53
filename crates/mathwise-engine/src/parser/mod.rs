//! Text to [`Expr`]: balance → lex → implicit multiplication → Pratt parse.
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use mathwise_core::{Expr, MathError, MathResult};

/// Parse a formula into a raw (not yet simplified) expression.
///
/// # Errors
/// `MathError::Parse` for empty input, unknown characters or bad syntax.
pub fn parse(input: &str) -> MathResult<Expr> {
    if input.trim().is_empty() {
        return Err(MathError::Parse("empty expression".into()));
    }
    let balanced = lexer::balance_parentheses(input);
    let tokens = lexer::lex(&balanced)?;
    let tokens = implicit_mul::insert_implicit_multiplication(tokens);
    pratt::parse_expression(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathwise_core::Constant;

    #[test]
    fn test_implicit_multiplication_end_to_end() {
        assert_eq!(parse("2x").unwrap(), parse("2*x").unwrap());
        assert_eq!(parse("(x+1)(x-1)").unwrap(), parse("(x+1)*(x-1)").unwrap());
    }

    #[test]
    fn test_constants_and_sqrt() {
        assert_eq!(parse("pi").unwrap(), Expr::Constant(Constant::Pi));
        assert_eq!(
            parse("sqrt(x)").unwrap(),
            Expr::pow(Expr::symbol("x"), Expr::number(0.5))
        );
    }

    #[test]
    fn test_normalizer_output_parses() {
        assert!(parse("(25/100) * 80").is_ok());
        assert!(parse("root(3, 27").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("2 +").is_err());
        assert!(parse("x = 2").is_err());
    }
}
