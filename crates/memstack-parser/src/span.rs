//! Byte spans into the source text.

use std::ops::Range;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Start offset (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A value together with the span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    value: T,
    span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn inner(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let a = Span::new(4..8);
        let b = Span::new(10..12);

        let joined = a.union(b);
        assert_eq!(joined.start(), 4);
        assert_eq!(joined.end(), 12);
        assert_eq!(joined.len(), 8);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let span = Span::new(5..3);
        assert!(span.is_empty());
        assert_eq!(span.start(), 5);
    }
}
