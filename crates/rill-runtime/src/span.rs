//! Byte-offset source spans
//!
//! Every token and AST node carries a span so faults can point back at the
//! exact place in the program text where things went wrong.

use serde::{Deserialize, Serialize};

/// A half-open byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A placeholder span for synthesized nodes
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(2, 5);
        let b = Span::new(8, 12);
        assert_eq!(a.merge(b), Span::new(2, 12));
        assert_eq!(b.merge(a), Span::new(2, 12));
    }

    #[test]
    fn test_span_merge_overlapping() {
        let a = Span::new(0, 10);
        let b = Span::new(4, 6);
        assert_eq!(a.merge(b), Span::new(0, 10));
    }
}
