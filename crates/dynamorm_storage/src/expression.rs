//! Condition expressions guarding writes.
//!
//! A [`Condition`] is a small predicate tree over top-level attributes.
//! [`Condition::build`] renders it into the store's expression syntax with
//! placeholder maps, producing an [`Expression`] that can be sent on the wire
//! or evaluated locally against an item.
//!
//! Rendering rules:
//! - attribute names become `#0`, `#1`, ... in first-use order; a name that
//!   appears twice reuses its placeholder
//! - values become `:0`, `:1`, ... in first-use order
//! - every operand of `AND`/`OR` is parenthesised
//!
//! ```
//! use dynamorm_storage::Condition;
//!
//! let expr = Condition::attribute_exists("PK")
//!     .and(Condition::equal("UserId", "001"))
//!     .build();
//! assert_eq!(expr.expression(), "(attribute_exists (#0)) AND (#1 = :0)");
//! ```

use dynamorm_codec::{AttributeValue, Item};
use serde::Serialize;
use std::collections::BTreeMap;

/// Comparison operator used by [`Condition::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
}

impl Comparator {
    const fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "<>",
        }
    }
}

/// A boolean predicate over an item's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The attribute is present on the item.
    AttributeExists(String),
    /// The attribute is absent from the item (or the item does not exist).
    AttributeNotExists(String),
    /// The attribute is present and compares to the value.
    Compare {
        /// Attribute name.
        name: String,
        /// Operator.
        comparator: Comparator,
        /// Right-hand operand.
        value: AttributeValue,
    },
    /// All operands hold.
    And(Vec<Condition>),
    /// At least one operand holds.
    Or(Vec<Condition>),
    /// The operand does not hold.
    Not(Box<Condition>),
}

impl Condition {
    /// `attribute_exists (name)`
    pub fn attribute_exists(name: impl Into<String>) -> Self {
        Condition::AttributeExists(name.into())
    }

    /// `attribute_not_exists (name)`
    pub fn attribute_not_exists(name: impl Into<String>) -> Self {
        Condition::AttributeNotExists(name.into())
    }

    /// `name = :value`
    pub fn equal(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Condition::Compare {
            name: name.into(),
            comparator: Comparator::Equal,
            value: value.into(),
        }
    }

    /// `name <> :value`
    pub fn not_equal(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Condition::Compare {
            name: name.into(),
            comparator: Comparator::NotEqual,
            value: value.into(),
        }
    }

    /// Conjoins `other` onto this condition, flattening nested `AND`s.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut operands) => {
                operands.push(other);
                Condition::And(operands)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Disjoins `other` onto this condition, flattening nested `OR`s.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut operands) => {
                operands.push(other);
                Condition::Or(operands)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    /// Negates this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Conjoins every condition in `conditions`.
    ///
    /// A single condition is returned as-is rather than wrapped in a
    /// one-operand `AND`. Returns `None` for an empty input.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Option<Self> {
        let mut conditions: Vec<Condition> = conditions.into_iter().collect();
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Condition::And(conditions)),
        }
    }

    /// Renders this condition into a store expression.
    #[must_use]
    pub fn build(self) -> Expression {
        let mut renderer = Renderer::default();
        let text = renderer.render(&self);
        Expression {
            condition: self,
            text,
            names: renderer.names,
            values: renderer.values,
        }
    }

    /// Evaluates this condition against an item state.
    ///
    /// `None` means the item does not exist, which behaves like an item with
    /// no attributes. Numbers compare by value, not by spelling.
    #[must_use]
    pub fn evaluate(&self, item: Option<&Item>) -> bool {
        match self {
            Condition::AttributeExists(name) => attribute(item, name).is_some(),
            Condition::AttributeNotExists(name) => attribute(item, name).is_none(),
            Condition::Compare {
                name,
                comparator,
                value,
            } => match (attribute(item, name), comparator) {
                (Some(actual), Comparator::Equal) => actual.same_as(value),
                (Some(actual), Comparator::NotEqual) => !actual.same_as(value),
                (None, _) => false,
            },
            Condition::And(operands) => operands.iter().all(|c| c.evaluate(item)),
            Condition::Or(operands) => operands.iter().any(|c| c.evaluate(item)),
            Condition::Not(operand) => !operand.evaluate(item),
        }
    }
}

fn attribute<'a>(item: Option<&'a Item>, name: &str) -> Option<&'a AttributeValue> {
    item.and_then(|i| i.get(name))
}

#[derive(Default)]
struct Renderer {
    aliases: Vec<String>,
    names: BTreeMap<String, String>,
    values: BTreeMap<String, AttributeValue>,
}

impl Renderer {
    fn name(&mut self, name: &str) -> String {
        if let Some(index) = self.aliases.iter().position(|n| n == name) {
            return format!("#{index}");
        }
        let placeholder = format!("#{}", self.aliases.len());
        self.aliases.push(name.to_string());
        self.names.insert(placeholder.clone(), name.to_string());
        placeholder
    }

    fn value(&mut self, value: &AttributeValue) -> String {
        let placeholder = format!(":{}", self.values.len());
        self.values.insert(placeholder.clone(), value.clone());
        placeholder
    }

    fn render(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::AttributeExists(name) => {
                format!("attribute_exists ({})", self.name(name))
            }
            Condition::AttributeNotExists(name) => {
                format!("attribute_not_exists ({})", self.name(name))
            }
            Condition::Compare {
                name,
                comparator,
                value,
            } => {
                let name = self.name(name);
                let value = self.value(value);
                format!("{name} {} {value}", comparator.symbol())
            }
            Condition::And(operands) => self.join(operands, " AND "),
            Condition::Or(operands) => self.join(operands, " OR "),
            Condition::Not(operand) => format!("NOT ({})", self.render(operand)),
        }
    }

    fn join(&mut self, operands: &[Condition], separator: &str) -> String {
        operands
            .iter()
            .map(|c| format!("({})", self.render(c)))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A rendered condition expression with its placeholder maps.
///
/// Serializes in the store's request shape (`ConditionExpression`,
/// `ExpressionAttributeNames`, `ExpressionAttributeValues`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    #[serde(skip)]
    condition: Condition,
    #[serde(rename = "ConditionExpression")]
    text: String,
    #[serde(rename = "ExpressionAttributeNames")]
    names: BTreeMap<String, String>,
    #[serde(
        rename = "ExpressionAttributeValues",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    values: BTreeMap<String, AttributeValue>,
}

impl Expression {
    /// The predicate this expression was built from.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The rendered expression text.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.text
    }

    /// Name placeholders (`#n`) mapped to attribute names.
    #[must_use]
    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    /// Value placeholders (`:n`) mapped to values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, AttributeValue> {
        &self.values
    }

    /// Evaluates the expression against an item state.
    #[must_use]
    pub fn evaluate(&self, item: Option<&Item>) -> bool {
        self.condition.evaluate(item)
    }
}

impl From<Condition> for Expression {
    fn from(condition: Condition) -> Self {
        condition.build()
    }
}
