//! Text rendering of a network, shown in place of a drawn figure.

use std::{fmt, hash::Hash};

use itertools::Itertools;
use nalgebra::DMatrix;

use crate::{
    edge::{Edge, Weight},
    graph::Graph,
};

/// A snapshot of a graph ready for display.
///
/// Computing the matrices needs mutable access to the graph's cache, so everything is gathered up
/// front and `Display` only formats.
#[derive(Clone, Debug)]
pub struct View {
    title: String,
    vertex_count: usize,
    edge_count: usize,
    density: f64,
    algebraic_connectivity: f64,
    /// Each vertex with its degree and `(neighbour, weight)` links.
    rows: Vec<(String, u32, Vec<(String, Weight)>)>,
    adjacency_matrix: DMatrix<f64>,
}

impl View {
    /// Captures the current state of `graph` under `title`.
    pub fn new<T>(title: impl Into<String>, graph: &mut Graph<T>) -> Self
    where
        Edge<T>: Eq + Hash,
        T: Clone + Eq + Hash + Ord + fmt::Debug + fmt::Display,
    {
        let degrees = graph.degree_centrality();
        let rows = graph
            .vertices()
            .map(|vertex| {
                let links: Vec<(String, Weight)> = graph
                    .neighbours(vertex)
                    .into_iter()
                    .map(|(neighbour, weight)| (neighbour.to_string(), weight))
                    .collect();
                let degree = degrees.get(vertex).copied().unwrap_or(0);
                (vertex.to_string(), degree, links)
            })
            .collect();

        Self {
            title: title.into(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            density: graph.density(),
            algebraic_connectivity: graph.algebraic_connectivity(),
            rows,
            adjacency_matrix: graph.adjacency_matrix(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        writeln!(
            f,
            "{} nodes, {} links, density {:.3}, algebraic connectivity {:.3}",
            self.vertex_count, self.edge_count, self.density, self.algebraic_connectivity
        )?;
        writeln!(f)?;

        let width = self
            .rows
            .iter()
            .map(|(name, _, _)| name.len())
            .max()
            .unwrap_or(0);

        for (name, degree, links) in &self.rows {
            let links = if links.is_empty() {
                "(isolated)".to_string()
            } else {
                links
                    .iter()
                    .map(|(neighbour, weight)| format!("{neighbour} ({weight})"))
                    .join(", ")
            };
            writeln!(f, "  {name:<width$} [{degree}] {links}")?;
        }

        // Rows and columns of the matrix follow the node order above.
        write!(f, "\nLink weights:{}", self.adjacency_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;

    #[test]
    fn school_view() {
        let mut graph = topology::school();
        let view = View::new(topology::SCHOOL_TITLE, &mut graph);
        let rendered = view.to_string();

        assert!(rendered.starts_with("Enhanced SCES School Network Topology\n"));
        assert!(rendered.contains("14 nodes, 14 links"));
        assert!(rendered.contains("Router     [2] Switch1 (5), Switch2 (8)"));
        assert!(rendered.contains("Faculty    [1] Switch1 (3)"));
        assert!(rendered.contains("Link weights:"));
    }

    #[test]
    fn isolated_nodes() {
        let mut graph = topology::school().without_vertices(&["Switch1"]);
        let rendered = View::new("after", &mut graph).to_string();

        assert!(rendered.contains("Faculty    [0] (isolated)"));
        assert!(rendered.contains("13 nodes, 7 links"));
        assert!(rendered.contains("algebraic connectivity 0.000"));
    }

    #[test]
    fn empty_graph() {
        let mut graph: Graph<String> = Graph::new();
        let rendered = View::new("empty", &mut graph).to_string();

        assert!(rendered.contains("0 nodes, 0 links, density 0.000"));
    }
}
