use std::fmt;

use crate::functions::Function;

/// A parsed expression.
///
/// A [`Expression::FunctionCall`] only exists if every entry of its
/// function's profile was satisfied while parsing; argument expressions are
/// owned by their call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Expression {
    FunctionCall(FunctionCall),
    Identifier(String),
    String(String),
    Integer(i64),
    Double(f64),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionCall {
    #[cfg_attr(feature = "serde", serde(rename = "name", serialize_with = "function_name"))]
    pub function: Function,
    pub arguments: Vec<Expression>,
}

#[cfg(feature = "serde")]
fn function_name<S: serde::Serializer>(function: &Function, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(function.name)
}

impl Expression {
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::FunctionCall(_) => ExpressionType::Function,
            Expression::Identifier(_) => ExpressionType::Identifier,
            Expression::String(_) => ExpressionType::String,
            Expression::Integer(_) => ExpressionType::Integer,
            Expression::Double(_) => ExpressionType::Double,
        }
    }
}

/// The tag of an [`Expression`], used in function profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Function,
    Identifier,
    String,
    Integer,
    Double,
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpressionType::Function => "function",
            ExpressionType::Identifier => "id",
            ExpressionType::String => "str",
            ExpressionType::Integer => "int",
            ExpressionType::Double => "double",
        };
        f.write_str(s)
    }
}
