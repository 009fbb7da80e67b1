//! Soft conditions reported while walking a table.

use std::fmt;

/// A condition worth reporting that does not stop processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A non-state record precedes the first weld and belongs to no tube.
    ObjectBeforeFirstWeld { dist: i64, code: i64 },
    /// A dent without a usable depth.
    ZeroDepthDent { object_id: String, dist: i64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectBeforeFirstWeld { dist, code } => {
                write!(f, "object before first weld: type {code} at dist {dist}")
            }
            Self::ZeroDepthDent { object_id, dist } => {
                write!(f, "zero depth dent: id '{object_id}' dist {dist}")
            }
        }
    }
}

/// Logs `warning` and appends it to `sink` when one was supplied.
pub fn report(sink: Option<&mut Vec<Warning>>, warning: Warning) {
    tracing::warn!("{warning}");
    if let Some(sink) = sink {
        sink.push(warning);
    }
}
