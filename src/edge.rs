//! A module for working with weighted edges.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// The cost of traversing a link.
pub type Weight = u32;

/// A weighted pair of vertices representing a network link. Edges don't have a direction, despite
/// the `source`-`target` nomenclature used.
///
/// An edge is identified by its endpoints alone: two edges joining the same pair of vertices are
/// equal regardless of their weights, which keeps a graph built from them simple.
#[derive(Clone, Debug, Eq)]
pub struct Edge<T> {
    source: T,
    target: T,
    weight: Weight,
}

impl<T> Edge<T> {
    /// Creates a new edge of the given weight between two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    ///
    /// let edge = Edge::new("Router", "Switch1", 5);
    /// assert_eq!(edge, Edge::new("Switch1", "Router", 5));
    /// ```
    pub fn new(source: T, target: T, weight: Weight) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the first vertex forming the edge.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the second vertex forming the edge.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns the cost of the link.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    ///
    /// let edge = Edge::new("Switch2", "Server2", 10);
    /// assert_eq!(edge.weight(), 10);
    /// ```
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Returns whether the edge contains the given vertex.
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == vertex || self.target() == vertex
    }

    /// Returns the endpoint at the other end of the edge from `vertex`, or `None` if `vertex`
    /// isn't one of its endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b", 1);
    ///
    /// assert_eq!(edge.opposite(&"a"), Some(&"b"));
    /// assert_eq!(edge.opposite(&"b"), Some(&"a"));
    /// assert_eq!(edge.opposite(&"c"), None);
    /// ```
    pub fn opposite(&self, vertex: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        if self.source() == vertex {
            Some(self.target())
        } else if self.target() == vertex {
            Some(self.source())
        } else {
            None
        }
    }

    /// Returns whether both endpoints are the same vertex.
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = (&self.source, &self.target);

        // The weight is left out so the hash agrees with `PartialEq`. Ordering the endpoints makes
        // the hash of (a, b) the same as the hash of (b, a).
        match a.cmp(b) {
            Ordering::Greater => {
                b.hash(state);
                a.hash(state);
            }
            _ => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Edge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} ({})", self.source, self.target, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let (source, target) = ("a", "b");

        assert_eq!(
            Edge::new(source, target, 3),
            Edge {
                source,
                target,
                weight: 3
            }
        )
    }

    #[test]
    fn weight() {
        assert_eq!(Edge::new("Router", "Switch2", 8).weight(), 8);
    }

    #[test]
    fn contains() {
        let (a, b) = ("a", "b");
        let edge = Edge::new(a, b, 1);

        assert!(edge.contains(&a));
        assert!(edge.contains(&b));
        assert!(!edge.contains(&"c"));
    }

    #[test]
    fn opposite() {
        let edge = Edge::new("Switch1", "Faculty", 3);

        assert_eq!(edge.opposite(&"Switch1"), Some(&"Faculty"));
        assert_eq!(edge.opposite(&"Faculty"), Some(&"Switch1"));
        assert_eq!(edge.opposite(&"Admin"), None);
    }

    #[test]
    fn is_loop() {
        assert!(Edge::new("a", "a", 1).is_loop());
        assert!(!Edge::new("a", "b", 1).is_loop());
    }

    //
    // Trait implementations
    //

    #[test]
    fn partial_eq() {
        let (a, b) = ("a", "b");

        assert_eq!(Edge::new(a, b, 1), Edge::new(b, a, 1));
        // Identity is the endpoint pair, not the weight.
        assert_eq!(Edge::new(a, b, 1), Edge::new(a, b, 7));
        assert_ne!(Edge::new(a, b, 1), Edge::new(a, "c", 1));
    }

    #[test]
    fn hash() {
        use std::collections::hash_map::DefaultHasher;

        let (a, b) = ("a", "b");

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();

        let k1 = Edge::new(a, b, 2);
        let k2 = Edge::new(b, a, 9);

        k1.hash(&mut h1);
        k2.hash(&mut h2);

        // Verify k1 == k2 => hash(k1) == hash(k2).
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn display() {
        assert_eq!(
            Edge::new("Router", "Switch1", 5).to_string(),
            "Router -- Switch1 (5)"
        );
    }
}
