//! Case-insensitive text matching that treats user input literally.

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

const ESCAPE: char = '\\';

/// Escape `LIKE` metacharacters so `value` only ever matches itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(column) LIKE 'value%'`
pub fn starts_with_ci<C: IntoColumnRef>(column: C, value: &str) -> SimpleExpr {
    lower_like(column, format!("{}%", escape_like(&value.to_lowercase())))
}

/// `LOWER(column) LIKE '%value%'`
pub fn contains_ci<C: IntoColumnRef>(column: C, value: &str) -> SimpleExpr {
    lower_like(column, format!("%{}%", escape_like(&value.to_lowercase())))
}

fn lower_like<C: IntoColumnRef>(column: C, pattern: String) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(ESCAPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metacharacters_are_escaped() {
        assert_eq!(escape_like("sugar"), "sugar");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }
}
