//! Queries over a named network: routing, criticality and failure simulation.

use std::fmt;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    graph::{Graph, Path},
    topology,
};

/// Reasons a path query can't be answered. The messages are meant to be shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Error: One or both nodes '{from}' and '{to}' do not exist in the network.")]
    UnknownNode { from: String, to: String },
    #[error("No path exists between {from} and {to}.")]
    NoPath { from: String, to: String },
}

/// The cheapest route found between two nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    from: String,
    to: String,
    path: Path<String>,
}

impl Route {
    pub fn path(&self) -> &Path<String> {
        &self.path
    }

    /// Total cost of the route.
    pub fn weight(&self) -> u64 {
        self.path.weight()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shortest path from {} to {}: [{}] with total weight {}",
            self.from,
            self.to,
            self.path.vertices().iter().join(", "),
            self.path.weight()
        )
    }
}

/// The node carrying the most shortest paths.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalNode {
    pub name: String,
    pub score: f64,
}

impl fmt::Display for CriticalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Critical node: {} (betweenness centrality {:.4})",
            self.name, self.score
        )
    }
}

/// Outcome of taking a set of nodes offline.
#[derive(Clone, Debug)]
pub struct FailureReport {
    /// Nodes that were in the network and have been taken out, in request order.
    pub removed: Vec<String>,
    /// Requested names that aren't part of the network.
    pub ignored: Vec<String>,
    /// What is left of the network, grouped by reachability.
    pub components: Vec<Vec<String>>,
    graph: Graph<String>,
}

impl FailureReport {
    /// Whether every surviving node can still reach every other one.
    pub fn is_connected(&self) -> bool {
        self.components.len() <= 1
    }

    /// The network with the failed nodes removed.
    pub fn graph(&self) -> &Graph<String> {
        &self.graph
    }

    pub fn into_graph(self) -> Graph<String> {
        self.graph
    }

    /// A title for displaying the failed network.
    pub fn title(&self) -> String {
        if self.removed.is_empty() {
            "Network with no failed nodes".to_string()
        } else {
            format!("Network after failure of {}", self.removed.join(", "))
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.removed.is_empty() {
            writeln!(f, "No nodes removed.")?;
        } else {
            writeln!(f, "Removed nodes: {}", self.removed.join(", "))?;
        }

        if !self.ignored.is_empty() {
            writeln!(f, "Ignored unknown nodes: {}", self.ignored.join(", "))?;
        }

        if self.is_connected() {
            write!(f, "The network remains connected.")
        } else {
            write!(
                f,
                "The network is disconnected into {} components.",
                self.components.len()
            )
        }
    }
}

/// A network of named nodes and the queries run against it.
///
/// The underlying graph is never modified by a query, failure simulations work on a copy.
#[derive(Clone, Debug)]
pub struct Network {
    graph: Graph<String>,
    normalize: bool,
}

impl Network {
    /// Wraps a graph, betweenness scores are normalized by default.
    pub fn from_graph(graph: Graph<String>) -> Self {
        Self {
            graph,
            normalize: true,
        }
    }

    /// The fixed school network.
    pub fn school() -> Self {
        Self::from_graph(topology::school())
    }

    /// Chooses between normalized and raw betweenness scores for [`Network::critical_node`].
    pub fn with_normalized_betweenness(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn graph(&self) -> &Graph<String> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph<String> {
        &mut self.graph
    }

    /// Finds the cheapest route between two nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::network::Network;
    ///
    /// let mut network = Network::school();
    /// let route = network.shortest_path("Router", "Switch1").unwrap();
    ///
    /// assert_eq!(route.weight(), 5);
    /// assert!(network.shortest_path("Router", "Cafeteria").is_err());
    /// ```
    pub fn shortest_path(&mut self, from: &str, to: &str) -> Result<Route, QueryError> {
        if !self.graph.contains_vertex(from) || !self.graph.contains_vertex(to) {
            debug!(from, to, "path query on unknown node");
            return Err(QueryError::UnknownNode {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let path = self
            .graph
            .shortest_path(from, to)
            .ok_or_else(|| QueryError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        debug!(from, to, weight = path.weight(), hops = path.hops(), "path found");

        Ok(Route {
            from: from.to_string(),
            to: to.to_string(),
            path,
        })
    }

    /// Returns the node with the highest betweenness centrality, ties going to the smallest name.
    /// An empty network has no critical node.
    pub fn critical_node(&mut self) -> Option<CriticalNode> {
        let critical = self
            .graph
            .betweenness_centrality(self.normalize)
            .into_iter()
            .min_by(|(a, a_score), (b, b_score)| b_score.total_cmp(a_score).then_with(|| a.cmp(b)))
            .map(|(name, score)| CriticalNode { name, score })?;

        debug!(
            node = %critical.name,
            score = critical.score,
            normalized = self.normalize,
            "critical node"
        );

        Some(critical)
    }

    /// Takes the given nodes offline in a copy of the network and checks what is still reachable.
    /// Names that aren't in the network are ignored.
    pub fn simulate_failures(&self, nodes: &[&str]) -> FailureReport {
        let (removed, ignored): (Vec<&str>, Vec<&str>) = nodes
            .iter()
            .copied()
            .unique()
            .partition(|node| self.graph.contains_vertex(*node));

        let mut graph = self.graph.without_vertices(&removed[..]);
        let components = graph.connected_components();

        info!(
            removed = ?removed,
            ignored = ?ignored,
            components = components.len(),
            "simulated node failures"
        );

        FailureReport {
            removed: removed.into_iter().map(String::from).collect(),
            ignored: ignored.into_iter().map(String::from).collect(),
            components,
            graph,
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::school()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn adjacent_path_is_edge_weight() {
        let mut network = Network::school();

        for (source, target, weight) in topology::SCHOOL_LINKS {
            // Even the Switch1-Switch2 cross-link beats the detour through the router.
            let route = network.shortest_path(source, target).unwrap();
            assert_eq!(route.weight(), u64::from(weight), "{source} - {target}");
            assert_eq!(route.path().hops(), 1);
        }
    }

    #[test]
    fn path_across_switches() {
        let mut network = Network::school();
        let route = network.shortest_path("Faculty", "Students").unwrap();

        assert_eq!(
            route.path().vertices(),
            names(&["Faculty", "Switch1", "Switch2", "Students"])
        );
        assert_eq!(route.weight(), 21);
        assert_eq!(
            route.to_string(),
            "Shortest path from Faculty to Students: [Faculty, Switch1, Switch2, Students] with total weight 21"
        );
    }

    #[test]
    fn path_to_self() {
        let mut network = Network::school();
        let route = network.shortest_path("Lab1", "Lab1").unwrap();

        assert_eq!(route.weight(), 0);
        assert_eq!(route.path().vertices(), names(&["Lab1"]));
    }

    #[test]
    fn unknown_node() {
        let mut network = Network::school();

        let err = network.shortest_path("Router", "Gym").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownNode {
                from: "Router".to_string(),
                to: "Gym".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "Error: One or both nodes 'Router' and 'Gym' do not exist in the network."
        );

        // Names are case sensitive.
        assert!(network.shortest_path("router", "Switch1").is_err());
    }

    #[test]
    fn no_path() {
        let mut graph = Graph::new();
        graph.insert(Edge::new("a".to_string(), "b".to_string(), 1));
        graph.insert_vertex("c".to_string());
        let mut network = Network::from_graph(graph);

        let err = network.shortest_path("a", "c").unwrap_err();
        assert_eq!(err.to_string(), "No path exists between a and c.");
    }

    #[test]
    fn critical_node() {
        let mut network = Network::school();
        let critical = network.critical_node().unwrap();

        assert_eq!(critical.name, "Switch2");
        assert!((critical.score - 57.0 / 78.0).abs() < 1e-12);
        assert_eq!(
            critical.to_string(),
            "Critical node: Switch2 (betweenness centrality 0.7308)"
        );
    }

    #[test]
    fn critical_node_raw() {
        let mut network = Network::school().with_normalized_betweenness(false);
        let critical = network.critical_node().unwrap();

        assert_eq!(critical.name, "Switch2");
        assert_eq!(critical.score, 57.0);
    }

    #[test]
    fn critical_node_ties_pick_smallest_name() {
        // A square: every corner scores the same.
        let mut graph = Graph::new();
        for (a, b) in [("d", "a"), ("a", "b"), ("b", "c"), ("c", "d")] {
            graph.insert(Edge::new(a.to_string(), b.to_string(), 1));
        }

        let critical = Network::from_graph(graph).critical_node().unwrap();
        assert_eq!(critical.name, "a");
    }

    #[test]
    fn critical_node_empty() {
        assert_eq!(Network::from_graph(Graph::new()).critical_node(), None);
    }

    #[test]
    fn cut_node_disconnects() {
        let network = Network::school();
        let report = network.simulate_failures(&["Switch1"]);

        assert!(!report.is_connected());
        assert_eq!(report.removed, names(&["Switch1"]));
        assert!(report.ignored.is_empty());
        // The five leaves of Switch1 are cut off one by one, the rest stays together.
        assert_eq!(report.components.len(), 6);
        assert_eq!(
            report.to_string(),
            "Removed nodes: Switch1\nThe network is disconnected into 6 components."
        );

        // The source network is untouched.
        assert!(network.graph().contains_vertex("Switch1"));
        assert_eq!(network.graph().edge_count(), 14);
    }

    #[test]
    fn leaf_failure_stays_connected() {
        let report = Network::school().simulate_failures(&["Lab1"]);

        assert!(report.is_connected());
        assert_eq!(report.graph().vertex_count(), 13);
        assert_eq!(report.graph().edge_count(), 13);
    }

    #[test]
    fn router_failure_uses_cross_link() {
        let report = Network::school().simulate_failures(&["Router"]);

        assert!(report.is_connected());
    }

    #[test]
    fn unknown_failures_are_ignored() {
        let report = Network::school().simulate_failures(&["Gym", "Lab2", "Lab2"]);

        assert_eq!(report.removed, names(&["Lab2"]));
        assert_eq!(report.ignored, names(&["Gym"]));
        assert!(report.is_connected());
        assert_eq!(report.title(), "Network after failure of Lab2");
        assert_eq!(
            report.to_string(),
            "Removed nodes: Lab2\nIgnored unknown nodes: Gym\nThe network remains connected."
        );
    }

    #[test]
    fn no_failures() {
        let report = Network::school().simulate_failures(&[]);

        assert!(report.removed.is_empty());
        assert!(report.is_connected());
        assert_eq!(report.into_graph().vertex_count(), 14);
    }
}
