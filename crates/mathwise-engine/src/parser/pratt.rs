use mathwise_core::{Expr, Func, MathError, MathResult};

use super::tokens::{Operator, Special, Token};

/// Between Mul (20) and Pow (30): `-x^2` is `-(x^2)`.
const UNARY_PRECEDENCE: u8 = 25;

pub(crate) fn parse_expression(tokens: &[Token]) -> MathResult<Expr> {
    if tokens.is_empty() {
        return Err(MathError::Parse("empty expression".into()));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;
    match parser.current() {
        None => Ok(expr),
        Some(t) => Err(MathError::Parse(format!("unexpected {}", t.describe()))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect_right_paren(&mut self) -> MathResult<()> {
        match self.current() {
            Some(Token::RightParen) => {
                self.advance();
                Ok(())
            }
            Some(t) => Err(MathError::Parse(format!("expected ')', found {}", t.describe()))),
            None => Err(MathError::Parse("expected ')', found end of input".into())),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> MathResult<Expr> {
        let mut left = self.parse_prefix()?;

        while let Some(token) = self.current() {
            match token {
                // postfix factorial binds tighter than anything else
                Token::Bang => {
                    self.advance();
                    left = Expr::Factorial(Box::new(left));
                }
                Token::Operator(op) => {
                    if op.precedence() < min_precedence {
                        break;
                    }
                    left = self.parse_infix(left, *op)?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_infix(&mut self, left: Expr, op: Operator) -> MathResult<Expr> {
        self.advance();
        let precedence = op.precedence();
        let next_precedence = if op == Operator::Pow {
            precedence
        } else {
            precedence + 1
        };
        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add(vec![left, right]),
            Operator::Sub => Expr::sub(left, right),
            Operator::Mul => Expr::mul(vec![left, right]),
            Operator::Div => Expr::div(left, right),
            Operator::Pow => Expr::pow(left, right),
        })
    }

    fn parse_arguments(&mut self) -> MathResult<Vec<Expr>> {
        match self.current() {
            Some(Token::LeftParen) => self.advance(),
            // `sin x` applies to the following operand
            _ => return Ok(vec![self.parse_expr(UNARY_PRECEDENCE)?]),
        }
        if let Some(Token::RightParen) = self.current() {
            return Err(MathError::Parse("empty argument list".into()));
        }
        let mut args = Vec::new();
        loop {
            args.push(self.parse_expr(0)?);
            match self.current() {
                Some(Token::Comma) => self.advance(),
                _ => break,
            }
        }
        self.expect_right_paren()?;
        Ok(args)
    }

    fn parse_prefix(&mut self) -> MathResult<Expr> {
        let token = self
            .current()
            .ok_or_else(|| MathError::Parse("unexpected end of input".into()))?;

        match token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name.clone()))
            }
            Token::Constant(c) => {
                self.advance();
                Ok(Expr::Constant(*c))
            }
            Token::Function(f) => {
                self.advance();
                let args = self.parse_arguments()?;
                function_call(*f, args)
            }
            Token::Special(s) => {
                self.advance();
                let args = self.parse_arguments()?;
                special_call(*s, args)
            }
            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(match expr {
                    Expr::Number(n) => Expr::number(-n),
                    other => Expr::neg(other),
                })
            }
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }
            Token::LeftParen => {
                self.advance();
                if let Some(Token::RightParen) = self.current() {
                    return Err(MathError::Parse("empty parentheses".into()));
                }
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }
            other => Err(MathError::Parse(format!("unexpected {}", other.describe()))),
        }
    }
}

fn arity_error(name: &str, expected: &str, got: usize) -> MathError {
    MathError::Parse(format!("{name} expects {expected} argument(s), got {got}"))
}

fn function_call(f: Func, mut args: Vec<Expr>) -> MathResult<Expr> {
    match (f, args.len()) {
        (_, 1) => Ok(Expr::func(f, args.remove(0))),
        // log(x, b) is log base b
        (Func::Log, 2) => {
            let base = args.remove(1);
            let x = args.remove(0);
            Ok(Expr::div(Expr::func(Func::Log, x), Expr::func(Func::Log, base)))
        }
        (Func::Log, n) => Err(arity_error("log", "1 or 2", n)),
        (f, n) => Err(arity_error(f.name(), "1", n)),
    }
}

fn special_call(s: Special, mut args: Vec<Expr>) -> MathResult<Expr> {
    match (s, args.len()) {
        (Special::Sqrt, 1) => Ok(Expr::pow(args.remove(0), Expr::number(0.5))),
        (Special::Factorial, 1) => Ok(Expr::Factorial(Box::new(args.remove(0)))),
        // root(n, x) is the n-th root of x
        (Special::Root, 2) => {
            let x = args.remove(1);
            let n = args.remove(0);
            Ok(Expr::pow(x, Expr::pow(n, Expr::number(-1.0))))
        }
        (Special::Sqrt, n) => Err(arity_error("sqrt", "1", n)),
        (Special::Factorial, n) => Err(arity_error("factorial", "1", n)),
        (Special::Root, n) => Err(arity_error("root", "2", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Token {
        Token::Identifier(s.into())
    }

    #[test]
    fn test_precedence() {
        // x + 2 * 3
        let tokens = vec![
            sym("x"),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
            Token::Operator(Operator::Mul),
            Token::Number(3.0),
        ];
        match parse_expression(&tokens).unwrap() {
            Expr::Add(terms) => {
                assert_eq!(terms[0], Expr::symbol("x"));
                assert!(matches!(terms[1], Expr::Mul(_)));
            }
            other => panic!("expected Add, got {other:?}"),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2^3^2 = 2^(3^2)
        let tokens = vec![
            Token::Number(2.0),
            Token::Operator(Operator::Pow),
            Token::Number(3.0),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ];
        match parse_expression(&tokens).unwrap() {
            Expr::Pow(base, exp) => {
                assert_eq!(*base, Expr::number(2.0));
                assert!(matches!(*exp, Expr::Pow(..)));
            }
            other => panic!("expected Pow, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_minus_below_power() {
        // -x^2 = -(x^2)
        let tokens = vec![
            Token::Operator(Operator::Sub),
            sym("x"),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(
            ast,
            Expr::neg(Expr::pow(Expr::symbol("x"), Expr::number(2.0)))
        );
    }

    #[test]
    fn test_postfix_factorial() {
        let tokens = vec![Token::Number(5.0), Token::Bang];
        assert_eq!(
            parse_expression(&tokens).unwrap(),
            Expr::Factorial(Box::new(Expr::number(5.0)))
        );
    }

    #[test]
    fn test_empty_parentheses_fail() {
        assert!(parse_expression(&[Token::LeftParen, Token::RightParen]).is_err());
    }

    #[test]
    fn test_trailing_tokens_fail() {
        let tokens = vec![Token::Number(1.0), Token::RightParen];
        assert!(parse_expression(&tokens).is_err());
    }

    #[test]
    fn test_log_with_base() {
        let tokens = vec![
            Token::Function(Func::Log),
            Token::LeftParen,
            Token::Number(8.0),
            Token::Comma,
            Token::Number(2.0),
            Token::RightParen,
        ];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(
            ast,
            Expr::div(
                Expr::func(Func::Log, Expr::number(8.0)),
                Expr::func(Func::Log, Expr::number(2.0))
            )
        );
    }
}
