use recursion::{Collapsible, MappableFrame, PartiallyApplied};

use super::{Condition, GroupOperator, Predicate};

/// short-lived single layer of a borrowed predicate tree, used for expressing
/// folds (rendering, depth, counting) without recursing on the call stack
pub enum PredicateFrame<'a, X> {
    Condition(&'a Condition),
    Group(GroupOperator, Vec<X>),
}

impl<'a> MappableFrame for PredicateFrame<'a, PartiallyApplied> {
    type Frame<X> = PredicateFrame<'a, X>;

    fn map_frame<A, B>(input: Self::Frame<A>, f: impl FnMut(A) -> B) -> Self::Frame<B> {
        match input {
            PredicateFrame::Condition(c) => PredicateFrame::Condition(c),
            PredicateFrame::Group(op, xs) => PredicateFrame::Group(op, xs.into_iter().map(f).collect()),
        }
    }
}

impl<'a> Collapsible for &'a Predicate {
    type FrameToken = PredicateFrame<'a, PartiallyApplied>;

    fn into_frame(self) -> PredicateFrame<'a, Self> {
        match self {
            Predicate::Condition(c) => PredicateFrame::Condition(c),
            Predicate::Group(g) => PredicateFrame::Group(g.operator, g.children.iter().collect()),
        }
    }
}
