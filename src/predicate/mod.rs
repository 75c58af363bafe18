//! Filter expression tree: leaf conditions and AND/OR groups

pub mod frame;
pub mod operator;
pub mod value;

use recursion::CollapsibleExt;
use serde::{Deserialize, Serialize};

pub use self::frame::PredicateFrame;
pub use self::operator::{CompareOperator, Comparison, GroupOperator, TextFunction};
pub use self::value::Literal;

/// A node in the filter tree, either a single condition or a boolean group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Predicate {
    Condition(Condition),
    Group(Group),
}

/// Leaf predicate: a property and, once a builder has run, its comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub property: String,
    pub comparison: Option<Comparison>,
}

impl Condition {
    pub fn new(property: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            property: property.into(),
            comparison: Some(comparison),
        }
    }

    /// A condition without a comparison renders empty and never matches
    pub fn is_initialized(&self) -> bool {
        self.comparison.is_some()
    }
}

/// Internal predicate joining its children with a single connective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub operator: GroupOperator,
    pub children: Vec<Predicate>,
}

impl Group {
    pub fn new(operator: GroupOperator, children: Vec<Predicate>) -> Self {
        Self { operator, children }
    }
}

/// Predicates handed to [`Predicate::join`]. `None` entries are dropped on
/// conversion, so an empty set of operands turns the join into a no-op.
/// The number of entries the caller supplied, `None` included, is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operands {
    predicates: Vec<Predicate>,
    supplied: usize,
}

impl Operands {
    fn from_options(entries: impl IntoIterator<Item = Option<Predicate>>) -> Self {
        let mut supplied = 0;
        let predicates = entries
            .into_iter()
            .inspect(|_| supplied += 1)
            .flatten()
            .collect();
        Operands { predicates, supplied }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Entries supplied before `None`s were dropped
    pub fn supplied(&self) -> usize {
        self.supplied
    }

    pub fn into_vec(self) -> Vec<Predicate> {
        self.predicates
    }
}

impl From<Predicate> for Operands {
    fn from(p: Predicate) -> Self {
        Operands::from_options([Some(p)])
    }
}

impl From<Option<Predicate>> for Operands {
    fn from(p: Option<Predicate>) -> Self {
        Operands::from_options([p])
    }
}

impl From<Vec<Predicate>> for Operands {
    fn from(ps: Vec<Predicate>) -> Self {
        Operands {
            supplied: ps.len(),
            predicates: ps,
        }
    }
}

impl From<Vec<Option<Predicate>>> for Operands {
    fn from(ps: Vec<Option<Predicate>>) -> Self {
        Operands::from_options(ps)
    }
}

impl<const N: usize> From<[Predicate; N]> for Operands {
    fn from(ps: [Predicate; N]) -> Self {
        Operands::from(Vec::from(ps))
    }
}

impl FromIterator<Predicate> for Operands {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Operands::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Predicate {
    /// Start a condition on `property`; a comparison builder completes it
    pub fn new(property: impl Into<String>) -> Self {
        Predicate::Condition(Condition {
            property: property.into(),
            comparison: None,
        })
    }

    /// Build a fresh group from `predicates`. Returns `None` only for an
    /// empty input. When every entry was `None` the result is an
    /// uninitialized condition.
    pub fn join_all(
        predicates: impl Into<Operands>,
        operator: Option<GroupOperator>,
    ) -> Option<Predicate> {
        let operands = predicates.into();
        if operands.supplied() == 0 {
            return None;
        }
        Some(Predicate::new(String::new()).join(operands, operator))
    }

    fn compare(mut self, operator: CompareOperator, value: Literal) -> Self {
        self.set_comparison(Comparison::Compare { operator, value });
        self
    }

    fn text(mut self, function: TextFunction, value: String) -> Self {
        self.set_comparison(Comparison::Text { function, value });
        self
    }

    fn set_comparison(&mut self, comparison: Comparison) {
        if let Predicate::Condition(c) = self {
            c.comparison = Some(comparison);
        }
    }

    pub fn equals(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Eq, value.into())
    }

    pub fn not_equal_to(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Ne, value.into())
    }

    pub fn greater_than(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Gt, value.into())
    }

    pub fn greater_than_or_equal_to(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Ge, value.into())
    }

    pub fn less_than(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Lt, value.into())
    }

    pub fn less_than_or_equal_to(self, value: impl Into<Literal>) -> Self {
        self.compare(CompareOperator::Le, value.into())
    }

    pub fn contains(self, value: impl Into<String>) -> Self {
        self.text(TextFunction::Contains, value.into())
    }

    pub fn starts_with(self, value: impl Into<String>) -> Self {
        self.text(TextFunction::StartsWith, value.into())
    }

    pub fn ends_with(self, value: impl Into<String>) -> Self {
        self.text(TextFunction::EndsWith, value.into())
    }

    /// Rebind a condition's property, keeping its comparison. No-op on groups.
    pub fn set_property(&mut self, property: impl Into<String>) -> &mut Self {
        if let Predicate::Condition(c) = self {
            c.property = property.into();
        }
        self
    }

    /// Join `other` onto this predicate, turning it into (or growing) a group.
    ///
    /// - an initialized condition becomes the group's first child
    /// - an uninitialized condition is dropped
    /// - a group keeps its children and appends the operands
    ///
    /// Without an explicit `operator` the group keeps its current connective,
    /// or uses `and` when it is new. With no operands the predicate is
    /// returned unchanged.
    pub fn join(mut self, other: impl Into<Operands>, operator: Option<GroupOperator>) -> Self {
        self.join_in_place(other, operator);
        self
    }

    /// In-place form of [`Predicate::join`]
    pub fn join_in_place(
        &mut self,
        other: impl Into<Operands>,
        operator: Option<GroupOperator>,
    ) -> &mut Self {
        let operands = other.into();
        if operands.is_empty() {
            return self;
        }

        // placeholder while the old shape is moved out
        let placeholder = Predicate::Group(Group::new(GroupOperator::And, Vec::new()));
        let current = std::mem::replace(self, placeholder);

        let group = match current {
            Predicate::Group(mut g) => {
                g.operator = operator.unwrap_or(g.operator);
                g.children.extend(operands.into_vec());
                g
            }
            Predicate::Condition(c) => {
                let mut children = Vec::new();
                if c.is_initialized() {
                    children.push(Predicate::Condition(c));
                }
                children.extend(operands.into_vec());
                Group::new(operator.unwrap_or_default(), children)
            }
        };

        *self = Predicate::Group(group);
        self
    }

    pub fn and(self, other: impl Into<Operands>) -> Self {
        self.join(other, Some(GroupOperator::And))
    }

    pub fn or(self, other: impl Into<Operands>) -> Self {
        self.join(other, Some(GroupOperator::Or))
    }

    pub fn and_in_place(&mut self, other: impl Into<Operands>) -> &mut Self {
        self.join_in_place(other, Some(GroupOperator::And))
    }

    pub fn or_in_place(&mut self, other: impl Into<Operands>) -> &mut Self {
        self.join_in_place(other, Some(GroupOperator::Or))
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Predicate::Condition(c) => Some(c),
            Predicate::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Predicate::Group(g) => Some(g),
            Predicate::Condition(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Predicate::Group(_))
    }

    pub fn property(&self) -> Option<&str> {
        self.as_condition().map(|c| c.property.as_str())
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.as_condition().and_then(|c| c.comparison.as_ref())
    }

    pub fn group_operator(&self) -> Option<GroupOperator> {
        self.as_group().map(|g| g.operator)
    }

    /// Children of a group; empty for a condition
    pub fn children(&self) -> &[Predicate] {
        match self {
            Predicate::Group(g) => &g.children,
            Predicate::Condition(_) => &[],
        }
    }

    /// Number of nested group levels, zero for a lone condition
    pub fn depth(&self) -> usize {
        self.collapse_frames(|frame| match frame {
            PredicateFrame::Condition(_) => 0,
            PredicateFrame::Group(_, depths) => 1 + depths.into_iter().max().unwrap_or(0),
        })
    }

    /// Number of leaf conditions in the tree
    pub fn condition_count(&self) -> usize {
        self.collapse_frames(|frame| match frame {
            PredicateFrame::Condition(_) => 1,
            PredicateFrame::Group(_, counts) => counts.into_iter().sum(),
        })
    }
}
