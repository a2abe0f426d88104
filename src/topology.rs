//! The fixed school network.

use crate::{
    edge::{Edge, Weight},
    graph::Graph,
};

/// Title shown above the full network view.
pub const SCHOOL_TITLE: &str = "Enhanced SCES School Network Topology";

/// Every device in the school network.
pub const SCHOOL_NODES: [&str; 14] = [
    "Router",
    "Switch1",
    "Switch2",
    "Faculty",
    "Admin",
    "Staff",
    "Students",
    "Lab1",
    "Lab2",
    "Library",
    "Auditorium",
    "IT",
    "Server1",
    "Server2",
];

/// The physical links between devices and their cost.
pub const SCHOOL_LINKS: [(&str, &str, Weight); 14] = [
    ("Router", "Switch1", 5),
    ("Router", "Switch2", 8),
    ("Switch1", "Faculty", 3),
    ("Switch1", "Admin", 4),
    ("Switch1", "Staff", 2),
    ("Switch1", "IT", 5),
    ("Switch1", "Library", 7),
    ("Switch2", "Students", 6),
    ("Switch2", "Lab1", 4),
    ("Switch2", "Lab2", 4),
    ("Switch2", "Auditorium", 6),
    ("Switch2", "Server1", 8),
    ("Switch2", "Server2", 10),
    // Cross-link between the two distribution switches.
    ("Switch1", "Switch2", 12),
];

/// Builds the school network graph.
pub fn school() -> Graph<String> {
    let mut graph = Graph::new();

    for node in SCHOOL_NODES {
        graph.insert_vertex(node.to_string());
    }

    for (source, target, weight) in SCHOOL_LINKS {
        graph.insert(Edge::new(source.to_string(), target.to_string(), weight));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_shape() {
        let graph = school();

        assert_eq!(graph.vertex_count(), SCHOOL_NODES.len());
        assert_eq!(graph.edge_count(), SCHOOL_LINKS.len());
    }

    #[test]
    fn school_links_are_known_nodes() {
        for (source, target, weight) in SCHOOL_LINKS {
            assert!(SCHOOL_NODES.contains(&source), "{source}");
            assert!(SCHOOL_NODES.contains(&target), "{target}");
            assert!(weight > 0);
        }
    }

    #[test]
    fn school_is_connected() {
        let mut graph = school();

        assert!(graph.is_connected());
        assert!(graph.algebraic_connectivity() > 0.0);
    }

    #[test]
    fn school_weights() {
        let graph = school();

        assert_eq!(graph.weight("Switch1", "Switch2"), Some(12));
        assert_eq!(graph.weight("Server2", "Switch2"), Some(10));
        assert_eq!(graph.weight("Router", "Faculty"), None);
        assert_eq!(graph.weight("Router", "Gym"), None);
    }
}
