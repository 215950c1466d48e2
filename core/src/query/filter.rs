//! Filter expressions in the Directus filter-rules format.
//!
//! A `Filter` is an immutable tree. Leaves compare one field against an
//! operand; `And`/`Or`/`Not` combine subtrees. Constructors never mutate,
//! they return new nodes. Nothing here checks field names or operand types
//! against a schema; the server rejects what it cannot apply.
//!
//! Wire shape:
//!
//! ```text
//! leaf   {"<field>": {"<operator>": <operand>}}
//! and    {"_and": [<child>, ...]}
//! or     {"_or":  [<child>, ...]}
//! not    {"_not": <child>}
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Comparison operator of a leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Between,
    NotBetween,
    Null,
    NotNull,
    Contains,
    NotContains,
    IContains,
    StartsWith,
    EndsWith,
    Empty,
    NotEmpty,
    /// Any operator this enum does not name, sent verbatim.
    Custom(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "_eq",
            Operator::Neq => "_neq",
            Operator::Lt => "_lt",
            Operator::Lte => "_lte",
            Operator::Gt => "_gt",
            Operator::Gte => "_gte",
            Operator::In => "_in",
            Operator::NotIn => "_nin",
            Operator::Between => "_between",
            Operator::NotBetween => "_nbetween",
            Operator::Null => "_null",
            Operator::NotNull => "_nnull",
            Operator::Contains => "_contains",
            Operator::NotContains => "_ncontains",
            Operator::IContains => "_icontains",
            Operator::StartsWith => "_starts_with",
            Operator::EndsWith => "_ends_with",
            Operator::Empty => "_empty",
            Operator::NotEmpty => "_nempty",
            Operator::Custom(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "_eq" => Operator::Eq,
            "_neq" => Operator::Neq,
            "_lt" => Operator::Lt,
            "_lte" => Operator::Lte,
            "_gt" => Operator::Gt,
            "_gte" => Operator::Gte,
            "_in" => Operator::In,
            "_nin" => Operator::NotIn,
            "_between" => Operator::Between,
            "_nbetween" => Operator::NotBetween,
            "_null" => Operator::Null,
            "_nnull" => Operator::NotNull,
            "_contains" => Operator::Contains,
            "_ncontains" => Operator::NotContains,
            "_icontains" => Operator::IContains,
            "_starts_with" => Operator::StartsWith,
            "_ends_with" => Operator::EndsWith,
            "_empty" => Operator::Empty,
            "_nempty" => Operator::NotEmpty,
            other => Operator::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        field: String,
        operator: Operator,
        operand: Value,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn compare(field: impl Into<String>, operator: impl Into<Operator>, operand: impl Into<Value>) -> Self {
        Filter::Compare {
            field: field.into(),
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    pub fn not_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Neq, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Contains, value)
    }

    /// `_in` with the values in the order given. An empty list is sent as
    /// `[]`; the server decides what that matches.
    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::compare(field, Operator::In, collect_operands(values))
    }

    pub fn not_in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::compare(field, Operator::NotIn, collect_operands(values))
    }

    /// Inclusive range; the operand is always the pair `[lo, hi]`.
    pub fn between(field: impl Into<String>, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        Self::compare(field, Operator::Between, Value::Array(vec![lo.into(), hi.into()]))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::compare(field, Operator::Null, true)
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::compare(field, Operator::NotNull, true)
    }

    /// Conjunction. With no children this encodes to `{}`, i.e. no
    /// constraint at all.
    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(children.into_iter().collect())
    }

    /// Disjunction. With no children this encodes to `{}`.
    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(children.into_iter().collect())
    }

    pub fn not(child: Filter) -> Self {
        Filter::Not(Box::new(child))
    }

    /// True when the tree constrains nothing: a combinator whose children
    /// are all empty, or the negation of one.
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::And(children) | Filter::Or(children) => children.iter().all(Filter::is_empty),
            Filter::Not(child) => child.is_empty(),
            Filter::Compare { .. } => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Filter::Compare {
                field,
                operator,
                operand,
            } => {
                let mut condition = Map::new();
                condition.insert(operator.as_str().to_string(), operand.clone());
                let mut node = Map::new();
                node.insert(field.clone(), Value::Object(condition));
                Value::Object(node)
            }
            Filter::And(children) => combinator("_and", children),
            Filter::Or(children) => combinator("_or", children),
            Filter::Not(child) => json!({ "_not": child.to_value() }),
        }
    }
}

fn collect_operands<I, V>(values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Value::Array(values.into_iter().map(Into::into).collect())
}

fn combinator(key: &str, children: &[Filter]) -> Value {
    if children.is_empty() {
        return Value::Object(Map::new());
    }
    let encoded: Vec<Value> = children.iter().map(Filter::to_value).collect();
    let mut node = Map::new();
    node.insert(key.to_string(), Value::Array(encoded));
    Value::Object(node)
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
