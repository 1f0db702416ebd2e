//! The function table consulted by the parser.
//!
//! Each [`Function`] declares a profile: an ordered list of [`FunctionType`]
//! entries, each naming the expression type it accepts and how many
//! arguments of that type. The parser matches call arguments against the
//! profile, so a rule only ever sees arguments of the declared types.

use std::fmt;
use std::sync::OnceLock;

use log::debug;

use crate::parser::{Expression, ExpressionType};

/// How many arguments a profile entry accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Exactly one argument. Not supported by the parser yet.
    Exact,
    /// Zero or more arguments, as long as they keep matching.
    AnyCount,
    /// Between `min` and `max` arguments. Not supported by the parser yet.
    Range { min: usize, max: usize },
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Exact => write!(f, "exact"),
            Quantity::AnyCount => write!(f, "any-count"),
            Quantity::Range { min, max } => write!(f, "range {min}..={max}"),
        }
    }
}

/// One entry of a function's argument profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionType {
    pub expected: ExpressionType,
    pub quantity: Quantity,
}

impl FunctionType {
    pub const fn any(expected: ExpressionType) -> Self {
        Self {
            expected,
            quantity: Quantity::AnyCount,
        }
    }
}

/// Maps the already type-checked arguments of a call to its result.
pub type Rule = fn(&[Expression]) -> Expression;

#[derive(Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub profile: &'static [FunctionType],
    pub rule: Rule,
}

impl Function {
    pub fn apply(&self, arguments: &[Expression]) -> Expression {
        (self.rule)(arguments)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

// Functions are identified by name and profile; rules are not comparable.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.profile == other.profile
    }
}

/// An append-only registry of functions, looked up by exact name.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: Vec<Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in functions.
    pub fn builtin() -> &'static FunctionTable {
        static BUILTINS: OnceLock<FunctionTable> = OnceLock::new();
        BUILTINS.get_or_init(|| {
            let mut table = FunctionTable::new();
            table.register(PLUS);
            table
        })
    }

    pub fn register(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// Find a function by name. The first registered match wins.
    pub fn lookup(&self, name: &str) -> Option<&Function> {
        let found = self.functions.iter().find(|f| f.name == name);
        debug!(
            "Function lookup '{}': {}",
            name,
            if found.is_some() { "found" } else { "missing" }
        );
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// `(+ double...)`: the sum of all arguments, as a double.
pub const PLUS: Function = Function {
    name: "+",
    profile: &[FunctionType::any(ExpressionType::Double)],
    rule: sum,
};

fn sum(arguments: &[Expression]) -> Expression {
    let total: f64 = arguments
        .iter()
        .map(|argument| match argument {
            Expression::Double(value) => *value,
            other => unreachable!("'+' was given a {} argument", other.expression_type()),
        })
        .sum();
    Expression::Double(total)
}
