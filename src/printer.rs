use std::fmt::{self, Display, Write};

use crate::expr::{self, Expr};

/// Renders an expression tree as an s-expression, e.g.
/// `(* (- 123) (group 45.67))`.
pub fn print(e: &Expr) -> String {
    e.to_string()
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut SExpr { f })
    }
}

struct SExpr<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl SExpr<'_, '_> {
    fn list(&mut self, head: &str, items: &[&Expr]) -> fmt::Result {
        write!(self.f, "({}", head)?;
        for item in items {
            self.f.write_char(' ')?;
            item.accept(self)?;
        }
        self.f.write_char(')')
    }
}

impl expr::Visitor<fmt::Result> for SExpr<'_, '_> {
    fn visit_binary_expr(&mut self, e: &expr::Binary) -> fmt::Result {
        self.list(e.op.lexeme(), &[e.left.as_ref(), e.right.as_ref()])
    }

    fn visit_grouping_expr(&mut self, e: &expr::Grouping) -> fmt::Result {
        self.list("group", &[e.expression.as_ref()])
    }

    fn visit_literal_expr(&mut self, e: &expr::Literal) -> fmt::Result {
        write!(self.f, "{}", e.value)
    }

    fn visit_unary_expr(&mut self, e: &expr::Unary) -> fmt::Result {
        self.list(e.op.lexeme(), &[e.right.as_ref()])
    }
}
