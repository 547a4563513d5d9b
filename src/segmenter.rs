//! Minimum-cost segmentation of a password into pattern instances.
//!
//! Code-unit positions `0..=n` are the nodes of a DAG; every pattern
//! instance is an edge from `position` to `position + length`, and every
//! position also has a single-unit edge priced by its character class. Nodes are settled in
//! increasing order, so one forward pass yields the shortest path.

use serde::{Deserialize, Serialize};

use crate::patterns::PatternInstance;

/// The chosen tiling of a password and its total cost.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Segmentation {
    pub entropy: f64,
    pub segments: Vec<PatternInstance>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    cost: f64,
    /// Edge that reached this node with `cost`; `None` only at the origin.
    via: Option<PatternInstance>,
}

/// Picks the cheapest gap-free tiling of `units` from `patterns`.
///
/// Relaxation only replaces on a strictly lower cost. At each position the
/// supplied instances are tried longest first, keeping their given order on
/// equal length, and the single-unit edge comes last, so the earlier
/// candidate wins every exact tie.
pub fn segment(units: &[u16], patterns: &[PatternInstance]) -> Segmentation {
    let n = units.len();
    if n == 0 {
        return Segmentation::default();
    }

    let mut by_position: Vec<Vec<PatternInstance>> = vec![Vec::new(); n];
    for p in patterns {
        if p.length > 0 && p.end() <= n {
            by_position[p.position].push(*p);
        }
    }
    for bucket in &mut by_position {
        bucket.sort_by(|a, b| b.length.cmp(&a.length));
    }

    let mut nodes: Vec<Option<Node>> = vec![None; n + 1];
    nodes[0] = Some(Node { cost: 0.0, via: None });

    for (pos, &unit) in units.iter().enumerate() {
        let Some(from) = nodes[pos] else {
            continue;
        };

        let fallback = PatternInstance::single_unit(pos, unit);
        for edge in by_position[pos].iter().chain(std::iter::once(&fallback)) {
            let cost = from.cost + edge.cost;
            let improves = nodes[edge.end()].is_none_or(|node| cost < node.cost);
            if improves {
                nodes[edge.end()] = Some(Node {
                    cost,
                    via: Some(*edge),
                });
            }
        }
    }

    let mut segments = Vec::new();
    let mut at = n;
    while let Some(edge) = nodes[at].and_then(|node| node.via) {
        segments.push(edge);
        at = edge.position;
    }
    segments.reverse();

    Segmentation {
        entropy: nodes[n].map_or(0.0, |node| node.cost.max(0.0)),
        segments,
    }
}
