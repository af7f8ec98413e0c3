//! The closed operator set a `Graph` is built out of (C3).

use std::sync::Arc;

use crate::join::Joiner;
use crate::mapper::Mapper;
use crate::reduce::Reducer;
use crate::source::Source;

/// A lazy transducer: consumes a row sequence (plus, for `Join`, an
/// auxiliary sequence from an embedded sub-graph) and produces a row
/// sequence. Closed on purpose, per the design note: "the operator set
/// is closed and small, prefer a sum type to open-class extension".
#[derive(Clone)]
pub enum Operator {
    /// Must be the first operator in a graph, and the only one allowed
    /// to appear there.
    Source(Source),
    Map(Arc<dyn Mapper>),
    Reduce { reducer: Arc<dyn Reducer>, keys: Vec<String> },
    Sort { keys: Vec<String> },
    /// The right-hand row sequence comes from the matching entry in the
    /// graph's `join_graphs`, in declaration order.
    Join { joiner: Arc<dyn Joiner>, keys: Vec<String> },
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Source(s) => f.debug_tuple("Source").field(s).finish(),
            Operator::Map(_) => f.debug_tuple("Map").finish(),
            Operator::Reduce { keys, .. } => f.debug_struct("Reduce").field("keys", keys).finish(),
            Operator::Sort { keys } => f.debug_struct("Sort").field("keys", keys).finish(),
            Operator::Join { keys, .. } => f.debug_struct("Join").field("keys", keys).finish(),
        }
    }
}
