//! A module for computing betweenness centrality on weighted graphs.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::graph::Adjacency;

/// This is Ulrik Brandes's "A Faster Algorithm for Betweenness Centrality"
/// http://snap.stanford.edu/class/cs224w-readings/brandes01centrality.pdf
/// with the breadth-first search swapped for Dijkstra, as described in section 4 for weighted
/// graphs.
///
/// Accumulates the dependencies of `source` on every other vertex into `betweenness_count`.
fn betweenness_for_node(source: usize, adjacency: &Adjacency, betweenness_count: &mut [f64]) {
    let num_nodes = adjacency.len();

    let mut sigma: Vec<f64> = vec![0.0; num_nodes];
    let mut distance: Vec<Option<u64>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut settled: Vec<bool> = vec![false; num_nodes];
    let mut delta: Vec<f64> = vec![0.0; num_nodes];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
    let mut stack: Vec<usize> = Vec::with_capacity(num_nodes);

    sigma[source] = 1.0;
    distance[source] = Some(0);
    heap.push(Reverse((0, source)));

    while let Some(Reverse((d, v))) = heap.pop() {
        // Stale heap entry, the vertex was already settled at a shorter distance.
        if settled[v] {
            continue;
        }
        settled[v] = true;
        stack.push(v);

        for &(w, weight) in &adjacency[v] {
            let candidate = d + u64::from(weight);

            match distance[w] {
                Some(current) if candidate > current => {}
                Some(current) if candidate == current => {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
                _ => {
                    distance[w] = Some(candidate);
                    sigma[w] = sigma[v];
                    predecessors[w] = vec![v];
                    heap.push(Reverse((candidate, w)));
                }
            }
        }
    }

    // Vertices are popped in order of non-increasing distance from the source.
    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            betweenness_count[w] += delta[w];
        }
    }
}

/// Computes the betweenness of every vertex in the adjacency list, in index order.
///
/// Each unordered pair of vertices is visited from both ends, so raw counts are halved. When
/// `normalize` is set the counts are instead divided by the number of pairs not involving the
/// vertex, `(n - 1)(n - 2) / 2`.
pub fn compute_betweenness(adjacency: &Adjacency, normalize: bool) -> Vec<f64> {
    let num_nodes = adjacency.len();

    let mut betweenness_count: Vec<f64> = vec![0.0; num_nodes];

    for source in 0..num_nodes {
        betweenness_for_node(source, adjacency, &mut betweenness_count);
    }

    let divisor: f64 = if normalize && num_nodes > 2 {
        ((num_nodes - 1) * (num_nodes - 2)) as f64
    } else {
        2.0
    };

    betweenness_count
        .into_iter()
        .map(|count| count / divisor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Weight;

    // Builds an undirected adjacency list from `(a, b, weight)` triples.
    fn adjacency_from(num_nodes: usize, edges: &[(usize, usize, Weight)]) -> Adjacency {
        let mut adjacency = vec![Vec::new(); num_nodes];
        for &(a, b, weight) in edges {
            adjacency[a].push((b, weight));
            adjacency[b].push((a, weight));
        }
        adjacency
    }

    #[test]
    fn line() {
        // a - b - c - d
        let adjacency = adjacency_from(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);

        assert_eq!(
            compute_betweenness(&adjacency, false),
            vec![0.0, 2.0, 2.0, 0.0]
        );
        assert_eq!(
            compute_betweenness(&adjacency, true),
            vec![0.0, 2.0 / 3.0, 2.0 / 3.0, 0.0]
        );
    }

    #[test]
    fn star() {
        // Hub 0 with three leaves: every leaf pair goes through the hub.
        let adjacency = adjacency_from(4, &[(0, 1, 2), (0, 2, 3), (0, 3, 4)]);

        assert_eq!(
            compute_betweenness(&adjacency, false),
            vec![3.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(
            compute_betweenness(&adjacency, true),
            vec![1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn weights_reroute_paths() {
        // Triangle where the direct 0-2 link is more expensive than going through 1.
        let adjacency = adjacency_from(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 5)]);
        assert_eq!(compute_betweenness(&adjacency, false), vec![0.0, 1.0, 0.0]);

        // Make the direct link cheap again and 1 stops being between.
        let adjacency = adjacency_from(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        assert_eq!(compute_betweenness(&adjacency, false), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn split_between_equal_paths() {
        // Square a-b-c-d-a, two equally short routes between opposite corners.
        let adjacency = adjacency_from(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]);

        assert_eq!(
            compute_betweenness(&adjacency, false),
            vec![0.5, 0.5, 0.5, 0.5]
        );
    }

    #[test]
    fn disconnected() {
        let adjacency = adjacency_from(5, &[(0, 1, 1), (1, 2, 1), (3, 4, 1)]);

        assert_eq!(
            compute_betweenness(&adjacency, false),
            vec![0.0, 1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn empty() {
        assert!(compute_betweenness(&Vec::new(), true).is_empty());
    }
}
