//! A module for working with weighted graphs.

use std::{
    borrow::Borrow,
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, VecDeque},
    fmt::Debug,
    hash::Hash,
    ops::Sub,
};

use itertools::Itertools;
use nalgebra::{DMatrix, SymmetricEigen};

use crate::{
    betweenness::compute_betweenness,
    edge::{Edge, Weight},
};

/// Per-vertex lists of `(neighbour index, weight)` pairs, ordered by neighbour index.
pub(crate) type Adjacency = Vec<Vec<(usize, Weight)>>;

/// A route through the graph, from its first vertex to its last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<T> {
    vertices: Vec<T>,
    weight: u64,
}

impl<T> Path<T> {
    /// The vertices visited, source first.
    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    /// The sum of the weights of the edges traversed.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// The number of edges traversed.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// An undirected, weighted graph.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    /// The vertices in the graph, including ones without any edges.
    vertices: BTreeSet<T>,
    /// The edges in the graph.
    edges: HashSet<Edge<T>>,
    /// A mapping of vertices to their indices to be used when constructing the various matrices
    /// representing the graph.
    ///
    /// The use of a `BTreeMap` means we need the `Ord` bound on `T`. The sorted collection keeps
    /// the order stable between computations, which also makes path tie-breaking deterministic.
    index: Option<BTreeMap<T, usize>>,
    /// Cache the degree matrix when possible.
    degree_matrix: Option<DMatrix<f64>>,
    /// Cache the weighted adjacency matrix when possible.
    adjacency_matrix: Option<DMatrix<f64>>,
    /// Cache the laplacian matrix when possible.
    laplacian_matrix: Option<DMatrix<f64>>,
}

impl<T> Default for Graph<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T>
where
    Edge<T>: Eq + Hash,
    T: Clone + Eq + Hash + Ord + Debug,
{
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::graph::Graph;
    ///
    /// let graph: Graph<&str> = Graph::new();
    /// ```
    pub fn new() -> Self {
        Self {
            vertices: Default::default(),
            edges: Default::default(),
            index: None,
            degree_matrix: None,
            adjacency_matrix: None,
            laplacian_matrix: None,
        }
    }

    /// Returns the vertices, in sorted order.
    pub fn vertices(&self) -> impl Iterator<Item = &T> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> &HashSet<Edge<T>> {
        &self.edges
    }

    /// Inserts a vertex into the graph, returns whether it was new.
    pub fn insert_vertex(&mut self, vertex: T) -> bool {
        let is_inserted = self.vertices.insert(vertex);

        if is_inserted && self.index.is_some() {
            self.clear_cache()
        }

        is_inserted
    }

    /// Inserts an edge into the graph, along with any of its endpoints not yet present.
    ///
    /// Self-loops and zero-weight edges are rejected, as are edges joining an already connected
    /// pair of vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// assert!(graph.insert(Edge::new("a", "b", 2)));
    /// assert!(!graph.insert(Edge::new("b", "a", 3)));
    /// assert!(!graph.insert(Edge::new("c", "c", 1)));
    /// assert!(!graph.insert(Edge::new("c", "d", 0)));
    /// ```
    pub fn insert(&mut self, edge: Edge<T>) -> bool {
        if edge.is_loop() || edge.weight() == 0 || self.edges.contains(&edge) {
            return false;
        }

        self.vertices.insert(edge.source().clone());
        self.vertices.insert(edge.target().clone());
        self.edges.insert(edge);

        // Delete the cached objects because we can't reliably update them from the new connection
        // alone.
        if self.index.is_some() {
            self.clear_cache()
        }

        true
    }

    /// Removes an edge from the set and returns whether it was present in the set. The endpoints
    /// stay in the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 1));
    ///
    /// assert_eq!(graph.remove(&Edge::new("a", "b", 1)), true);
    /// assert_eq!(graph.remove(&Edge::new("a", "c", 1)), false);
    /// assert_eq!(graph.vertex_count(), 2);
    /// ```
    pub fn remove(&mut self, edge: &Edge<T>) -> bool {
        let is_removed = self.edges.remove(edge);

        if is_removed && self.index.is_some() {
            self.clear_cache()
        }

        is_removed
    }

    /// Removes a vertex and every edge touching it, returns whether the vertex was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 1));
    /// graph.insert(Edge::new("b", "c", 1));
    ///
    /// assert!(graph.remove_vertex("b"));
    /// assert!(!graph.remove_vertex("b"));
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert_eq!(graph.edge_count(), 0);
    /// ```
    pub fn remove_vertex<Q>(&mut self, vertex: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.vertices.remove(vertex) {
            return false;
        }

        self.edges.retain(|edge| !edge_touches(edge, vertex));

        if self.index.is_some() {
            self.clear_cache()
        }

        true
    }

    /// Checks if the graph contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains(edge)
    }

    /// Checks if the graph contains a vertex.
    pub fn contains_vertex<Q>(&self, vertex: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.vertices.contains(vertex)
    }

    /// Returns the weight of the edge between `a` and `b`, if they are adjacent.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 4));
    ///
    /// assert_eq!(graph.weight("b", "a"), Some(4));
    /// assert_eq!(graph.weight("a", "c"), None);
    /// ```
    pub fn weight<Q>(&self, a: &Q, b: &Q) -> Option<Weight>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let a = self.vertices.get(a)?;
        let b = self.vertices.get(b)?;

        // Edge identity ignores the weight, any placeholder will do for the lookup.
        self.edges
            .get(&Edge::new(a.clone(), b.clone(), 0))
            .map(Edge::weight)
    }

    /// Returns the vertices adjacent to `vertex` with the weight of the connecting edge, sorted
    /// by vertex.
    pub fn neighbours(&self, vertex: &T) -> Vec<(T, Weight)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                edge.opposite(vertex)
                    .map(|other| (other.clone(), edge.weight()))
            })
            .sorted()
            .collect()
    }

    /// Returns the vertex count of the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 1));
    /// graph.insert_vertex("c");
    ///
    /// assert_eq!(graph.vertex_count(), 3);
    /// ```
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges. Graphs with fewer than two vertices have a density of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    ///
    /// graph.insert(Edge::new("a", "b", 1));
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// graph.insert(Edge::new("a", "c", 1));
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let vc = self.vertex_count() as f64;
        let ec = self.edge_count() as f64;

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        if pec == 0.0 {
            return 0.0;
        }

        ec / pec
    }

    /// Constructs the weighted adjacency matrix for this graph, rows and columns follow the sorted
    /// order of the vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 5));
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 5.0;
    ///              5.0, 0.0]
    /// );
    /// ```
    pub fn adjacency_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.adjacency_matrix.clone() {
            return matrix;
        }

        let index = self
            .index
            .get_or_insert_with(|| index_vertices(&self.vertices));
        let n = index.len();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        // The graph is undirected so the matrix is symmetric.
        for edge in &self.edges {
            let (i, j) = (index[edge.source()], index[edge.target()]);
            let weight = f64::from(edge.weight());

            matrix[(i, j)] = weight;
            matrix[(j, i)] = weight;
        }

        // Cache the matrix.
        self.adjacency_matrix = Some(matrix.clone());

        matrix
    }

    /// Constructs the degree matrix for this graph, the diagonal holds the number of links of
    /// each vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 5));
    /// assert_eq!(
    ///     graph.degree_matrix(),
    ///     dmatrix![1.0, 0.0;
    ///              0.0, 1.0]
    /// );
    /// ```
    pub fn degree_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.degree_matrix.clone() {
            return matrix;
        }

        let adjacency_matrix = self.adjacency_matrix();

        let n = adjacency_matrix.nrows();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        for (i, row) in adjacency_matrix.row_iter().enumerate() {
            // Weights are strictly positive, so the non-zero entries are the links.
            matrix[(i, i)] = row.iter().filter(|weight| **weight > 0.0).count() as f64;
        }

        // Cache the matrix.
        self.degree_matrix = Some(matrix.clone());

        matrix
    }

    /// Constructs the (unweighted) laplacian matrix for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 5));
    /// assert_eq!(
    ///     graph.laplacian_matrix(),
    ///     dmatrix![1.0, -1.0;
    ///              -1.0, 1.0]
    /// );
    /// ```
    pub fn laplacian_matrix(&mut self) -> DMatrix<f64> {
        // Check the cache.
        if let Some(matrix) = self.laplacian_matrix.clone() {
            return matrix;
        }

        let degree_matrix = self.degree_matrix();
        let connections = self
            .adjacency_matrix()
            .map(|weight| if weight > 0.0 { 1.0 } else { 0.0 });

        let matrix = degree_matrix.sub(&connections);

        // Cache the matrix.
        self.laplacian_matrix = Some(matrix.clone());

        matrix
    }

    /// Returns a mapping of vertices to their degree centrality (number of connections) in the
    /// graph.
    pub fn degree_centrality(&mut self) -> HashMap<T, u32> {
        let degree_matrix = self.degree_matrix();

        self.index()
            .keys()
            .zip(degree_matrix.diagonal().iter())
            .map(|(vertex, dc)| (vertex.clone(), *dc as u32))
            .collect()
    }

    /// Returns the algebraic connectivity of the graph: the second-smallest eigenvalue of the
    /// laplacian. It is zero (up to rounding) exactly when the graph is disconnected.
    pub fn algebraic_connectivity(&mut self) -> f64 {
        let laplacian_matrix = self.laplacian_matrix();

        // At least two vertices are needed for a second eigenvalue.
        if laplacian_matrix.nrows() < 2 {
            return 0.0;
        }

        SymmetricEigen::new(laplacian_matrix)
            .eigenvalues
            .iter()
            .copied()
            .sorted_by(f64::total_cmp)
            .nth(1)
            // The laplacian is positive semi-definite, anything below zero is rounding.
            .map_or(0.0, |eigenvalue| eigenvalue.max(0.0))
    }

    /// Finds the cheapest path between two vertices with Dijkstra's algorithm.
    ///
    /// Returns `None` if either vertex is missing or the two aren't connected. When several paths
    /// share the lowest weight, the one found first in vertex order is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 1));
    /// graph.insert(Edge::new("b", "c", 1));
    /// graph.insert(Edge::new("a", "c", 5));
    ///
    /// let path = graph.shortest_path("a", "c").unwrap();
    /// assert_eq!(path.vertices(), ["a", "b", "c"]);
    /// assert_eq!(path.weight(), 2);
    /// ```
    pub fn shortest_path<Q>(&mut self, source: &Q, target: &Q) -> Option<Path<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.index();
        let (s, t) = (*index.get(source)?, *index.get(target)?);
        let vertices: Vec<T> = index.keys().cloned().collect();

        let best = dijkstra(s, Some(t), &self.adjacency_list());
        let (weight, _) = best[t]?;

        // Walk the previous hops back from the target.
        let mut hops = vec![t];
        let mut current = t;
        while let Some((_, Some(previous))) = best[current] {
            hops.push(previous);
            current = previous;
        }

        Some(Path {
            vertices: hops.into_iter().rev().map(|i| vertices[i].clone()).collect(),
            weight,
        })
    }

    /// Returns a mapping of vertices to their betweenness centrality, with paths measured by
    /// edge weight.
    ///
    /// Raw scores count each unordered pair of vertices once. With `normalize` they are divided by
    /// the number of pairs that exclude the vertex, `(n - 1)(n - 2) / 2`.
    pub fn betweenness_centrality(&mut self, normalize: bool) -> HashMap<T, f64> {
        // B(v) = sum (shortest paths between s and t through v / total num of shortest paths
        // between s and t)
        let adjacency = self.adjacency_list();
        let betweenness = compute_betweenness(&adjacency, normalize);

        self.index()
            .keys()
            .cloned()
            .zip(betweenness)
            .collect()
    }

    /// Returns the connected components, each sorted, ordered by their smallest vertex.
    pub fn connected_components(&mut self) -> Vec<Vec<T>> {
        let adjacency = self.adjacency_list();
        let vertices: Vec<T> = self.index().keys().cloned().collect();

        let mut visited = vec![false; adjacency.len()];
        let mut components = Vec::new();

        for start in 0..adjacency.len() {
            if visited[start] {
                continue;
            }

            visited[start] = true;
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);

            while let Some(v) = queue.pop_front() {
                for &(w, _) in &adjacency[v] {
                    if !visited[w] {
                        visited[w] = true;
                        component.push(w);
                        queue.push_back(w);
                    }
                }
            }

            components.push(
                component
                    .into_iter()
                    .sorted()
                    .map(|i| vertices[i].clone())
                    .collect(),
            );
        }

        components
    }

    /// Returns whether every vertex can reach every other one. The empty graph is connected.
    ///
    /// # Examples
    ///
    /// ```
    /// use campusnet::edge::Edge;
    /// use campusnet::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.insert(Edge::new("a", "b", 1));
    /// assert!(graph.is_connected());
    ///
    /// graph.insert_vertex("c");
    /// assert!(!graph.is_connected());
    /// ```
    pub fn is_connected(&mut self) -> bool {
        self.connected_components().len() <= 1
    }

    /// Returns a copy of the graph with the given vertices and their edges removed. Vertices not
    /// in the graph are skipped; `self` is left untouched.
    pub fn without_vertices<Q>(&self, vertices: &[&Q]) -> Self
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut graph = self.clone();
        for vertex in vertices {
            graph.remove_vertex(*vertex);
        }

        graph
    }

    //
    // Private
    //

    /// Clears the computed state.
    ///
    /// This should be called every time the vertices or edges are mutated since the cached state
    /// won't correspond to the new graph.
    fn clear_cache(&mut self) {
        self.index = None;
        self.degree_matrix = None;
        self.adjacency_matrix = None;
        self.laplacian_matrix = None;
    }

    /// Returns the index of vertices, generating it first if needed.
    ///
    /// The index is sorted by `T`'s implementation of `Ord`.
    fn index(&mut self) -> &BTreeMap<T, usize> {
        self.index
            .get_or_insert_with(|| index_vertices(&self.vertices))
    }

    /// Builds the indexed adjacency list used by the path algorithms.
    fn adjacency_list(&mut self) -> Adjacency {
        let mut adjacency: Adjacency = vec![Vec::new(); self.vertices.len()];

        let index = self
            .index
            .get_or_insert_with(|| index_vertices(&self.vertices));

        for edge in &self.edges {
            let (i, j) = (index[edge.source()], index[edge.target()]);
            adjacency[i].push((j, edge.weight()));
            adjacency[j].push((i, edge.weight()));
        }

        // Edges come out of a hash set, sort so traversal order is reproducible.
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }

        adjacency
    }
}

//
// Helpers
//

/// Numbers the vertices in their sorted order.
fn index_vertices<T: Clone + Ord>(vertices: &BTreeSet<T>) -> BTreeMap<T, usize> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, vertex)| (vertex.clone(), i))
        .collect()
}

/// Returns whether either endpoint of `edge` is `vertex`.
fn edge_touches<T, Q>(edge: &Edge<T>, vertex: &Q) -> bool
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    Borrow::<Q>::borrow(edge.source()) == vertex || Borrow::<Q>::borrow(edge.target()) == vertex
}

/// The cheapest way from `source` to every reachable vertex, as `(distance, previous hop)`.
///
/// The search stops early once `target` is settled. A vertex keeps the first predecessor that
/// reached it at its final distance.
fn dijkstra(
    source: usize,
    target: Option<usize>,
    adjacency: &Adjacency,
) -> Vec<Option<(u64, Option<usize>)>> {
    let num_nodes = adjacency.len();

    let mut best: Vec<Option<(u64, Option<usize>)>> = vec![None; num_nodes];
    let mut settled = vec![false; num_nodes];
    let mut heap = BinaryHeap::new();

    best[source] = Some((0, None));
    heap.push(Reverse((0u64, source)));

    while let Some(Reverse((d, v))) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;

        if Some(v) == target {
            break;
        }

        for &(w, weight) in &adjacency[v] {
            let candidate = d + u64::from(weight);
            if best[w].map_or(true, |(current, _)| candidate < current) {
                best[w] = Some((candidate, Some(v)));
                heap.push(Reverse((candidate, w)));
            }
        }
    }

    best
}
