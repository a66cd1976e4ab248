use std::fmt::Display;
use crate::token::{self, Token};

macro_rules! generate_ast {
    ($($typename:ident => $($propname:ident: $proptype:ty),+);+) => {
        #[derive(Debug, PartialEq, Clone)]
        pub enum Expr {
            $($typename($typename)),+
        }

        $(
            #[derive(Debug, PartialEq, Clone)]
            pub struct $typename {
                $(pub $propname: $proptype),+
            }

            impl From<$typename> for Expr {
                fn from(e: $typename) -> Self {
                    Expr::$typename(e)
                }
            }
        )+
    }
}

macro_rules! generate_visitor {
    ($($typename:ident => $visitname:ident);+) => {
        pub trait Visitor<T> {
            $(fn $visitname(&mut self, e: &$typename) -> T;)+
        }

        impl Expr {
            pub fn accept<T, V: Visitor<T>>(&self, v: &mut V) -> T {
                match self {
                    $(Expr::$typename(a) => v.$visitname(a),)+
                }
            }
        }
    };
}

generate_ast!(
    Binary => left: Box<Expr>, op: Token, right: Box<Expr>;
    Grouping => expression: Box<Expr>;
    Literal => value: LoxLiteral;
    Unary => op: Token, right: Box<Expr>
);

generate_visitor!(
    Binary => visit_binary_expr;
    Grouping => visit_grouping_expr;
    Literal => visit_literal_expr;
    Unary => visit_unary_expr
);

impl Expr {
    pub fn binary(left: Expr, op: Token, right: Expr) -> Self {
        Binary { left: Box::new(left), op, right: Box::new(right) }.into()
    }

    pub fn grouping(expression: Expr) -> Self {
        Grouping { expression: Box::new(expression) }.into()
    }

    pub fn literal<L: Into<LoxLiteral>>(value: L) -> Self {
        Literal { value: value.into() }.into()
    }

    pub fn unary(op: Token, right: Expr) -> Self {
        Unary { op, right: Box::new(right) }.into()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum LoxLiteral {
    Bool(bool),
    Nil,
    Number(f64),
    String(String),
}

impl From<bool> for LoxLiteral {
    fn from(b: bool) -> Self {
        LoxLiteral::Bool(b)
    }
}

impl From<f64> for LoxLiteral {
    fn from(n: f64) -> Self {
        LoxLiteral::Number(n)
    }
}

impl From<String> for LoxLiteral {
    fn from(s: String) -> Self {
        LoxLiteral::String(s)
    }
}

impl From<&str> for LoxLiteral {
    fn from(s: &str) -> Self {
        LoxLiteral::String(s.to_string())
    }
}

impl From<token::Literal> for LoxLiteral {
    fn from(l: token::Literal) -> Self {
        match l {
            token::Literal::Number(n) => LoxLiteral::Number(n),
            token::Literal::String(s) => LoxLiteral::String(s),
        }
    }
}

impl Display for LoxLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LoxLiteral::*;
        match self {
            Bool(b) => write!(f, "{}", b),
            Nil => write!(f, "nil"),
            Number(n) => write!(f, "{}", n),
            String(s) => write!(f, "{}", s),
        }
    }
}
