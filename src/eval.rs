//! Evaluation of expression trees to text.

use crate::parser::Expression;

impl Expression {
    /// Evaluate to text.
    ///
    /// Literals render directly: integers in base 10, doubles with six
    /// decimals, strings and identifiers verbatim. A call hands its arguments
    /// to the function's rule and renders the result.
    pub fn eval(&self) -> String {
        match self {
            Expression::FunctionCall(call) => call.function.apply(&call.arguments).eval(),
            Expression::Identifier(name) => name.clone(),
            Expression::String(text) => text.clone(),
            Expression::Integer(value) => value.to_string(),
            Expression::Double(value) => fixed_point(*value),
        }
    }
}

/// Six decimals. A sum can overflow to infinity, which renders as `+Inf` or
/// `-Inf`.
fn fixed_point(value: f64) -> String {
    match value {
        f64::INFINITY => "+Inf".to_string(),
        f64::NEG_INFINITY => "-Inf".to_string(),
        v if v.is_nan() => "NaN".to_string(),
        v => format!("{v:.6}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluate;

    fn eval(input: &str) -> String {
        evaluate("test", input).unwrap()
    }

    #[test]
    fn test_literal_forms() {
        assert_eq!(eval(".5"), "0.500000");
        assert_eq!(eval("3."), "3.000000");
        assert_eq!(eval("-5"), "-5");
        assert_eq!(eval("007"), "7");
        assert_eq!(eval("abc"), "abc");
        assert_eq!(eval(r#""a\"b""#), "a\"b");
    }

    #[test]
    fn test_sum() {
        assert_eq!(eval("(+ 1.0 2.0 3.0)"), "6.000000");
        assert_eq!(eval("(+)"), "0.000000");
        assert_eq!(eval("(+ -1.5 .25)"), "-1.250000");
    }

    #[test]
    fn test_overflowing_sum() {
        let big = format!("{}.0", "9".repeat(308));
        assert_eq!(eval(&format!("(+ {big} {big})")), "+Inf");
        assert_eq!(eval(&format!("(+ -{big} -{big})")), "-Inf");
    }
}
