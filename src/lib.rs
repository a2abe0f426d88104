//! Campusnet is a small toolkit for analysing a weighted school network topology: finding the
//! cheapest route between two devices, the device most paths depend on, and what happens to
//! connectivity when devices fail.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure which is built from
//! weighted [`Edge`](edge::Edge) instances. The [`Network`](network::Network) facade wraps a
//! graph of named nodes and answers queries in user-facing terms.
//!
//! ```rust
//! use campusnet::edge::Edge;
//! use campusnet::graph::Graph;
//! use campusnet::network::Network;
//!
//! // Construct a graph by hand, IDs can be any type that is `Clone + Eq + Hash + Ord`.
//! let mut graph = Graph::new();
//! graph.insert(Edge::new("gateway", "core", 2));
//! graph.insert(Edge::new("core", "lab", 3));
//!
//! let path = graph.shortest_path("gateway", "lab").unwrap();
//! assert_eq!(path.weight(), 5);
//!
//! // Or query the built-in school network.
//! let mut network = Network::school();
//!
//! let critical = network.critical_node().unwrap();
//! assert_eq!(critical.name, "Switch2");
//!
//! let report = network.simulate_failures(&["Switch1"]);
//! assert!(!report.is_connected());
//! ```

mod betweenness;
pub mod config;
pub mod edge;
pub mod graph;
pub mod logging;
pub mod menu;
pub mod network;
pub mod render;
pub mod topology;
