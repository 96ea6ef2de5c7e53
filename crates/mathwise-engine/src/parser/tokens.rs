use mathwise_core::{Constant, Func};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => 10,
            Self::Mul | Self::Div => 20,
            Self::Pow => 30,
        }
    }
}

/// Names that take an argument list but have no [`Func`] counterpart; the
/// parser rewrites them into powers or quotients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Special {
    Sqrt,
    Root,
    Factorial,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    Constant(Constant),
    Function(Func),
    Special(Special),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
    Bang,
}

impl Token {
    pub(crate) fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Special(_))
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Identifier(s) => format!("symbol '{s}'"),
            Self::Constant(c) => format!("constant '{}'", c.name()),
            Self::Function(f) => format!("function '{}'", f.name()),
            Self::Special(Special::Sqrt) => "function 'sqrt'".into(),
            Self::Special(Special::Root) => "function 'root'".into(),
            Self::Special(Special::Factorial) => "function 'factorial'".into(),
            Self::Operator(op) => format!("operator {op:?}"),
            Self::LeftParen => "'('".into(),
            Self::RightParen => "')'".into(),
            Self::Comma => "','".into(),
            Self::Bang => "'!'".into(),
        }
    }
}
