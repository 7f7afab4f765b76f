//! Bottleneck assignment: the smallest threshold t such that a perfect
//! matching exists using only entries ≤ t.
//!
//! The optimum is always one of the matrix entries, so the search runs over
//! the sorted distinct entries and tests each probe with Hopcroft-Karp.

use ndarray::Array2;
use std::collections::VecDeque;

/// Minimal achievable maximum entry over all perfect assignments
pub(crate) fn solve(distances: &Array2<f64>) -> f64 {
    let n = distances.nrows();
    if n == 0 {
        return 0.0;
    }

    let mut candidates: Vec<f64> = distances.iter().copied().collect();
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    // every entry allowed at the largest candidate, so hi is feasible
    let (mut lo, mut hi) = (0usize, candidates.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if has_perfect_matching(distances, candidates[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    candidates[lo]
}

fn has_perfect_matching(distances: &Array2<f64>, threshold: f64) -> bool {
    let n = distances.nrows();
    let adjacency: Vec<Vec<usize>> = distances
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(_, &d)| d <= threshold)
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    if adjacency.iter().any(Vec::is_empty) {
        return false;
    }
    HopcroftKarp::new(&adjacency, n).max_matching() == n
}

const UNREACHED: usize = usize::MAX;

/// Maximum bipartite matching, left vertices = rows, right = columns
struct HopcroftKarp<'a> {
    adjacency: &'a [Vec<usize>],
    match_left: Vec<Option<usize>>,
    match_right: Vec<Option<usize>>,
    layer: Vec<usize>,
}

impl<'a> HopcroftKarp<'a> {
    fn new(adjacency: &'a [Vec<usize>], n_right: usize) -> Self {
        let n_left = adjacency.len();
        Self {
            adjacency,
            match_left: vec![None; n_left],
            match_right: vec![None; n_right],
            layer: vec![UNREACHED; n_left],
        }
    }

    fn max_matching(mut self) -> usize {
        let mut size = 0;
        while self.bfs() {
            for u in 0..self.adjacency.len() {
                if self.match_left[u].is_none() && self.dfs(u) {
                    size += 1;
                }
            }
        }
        size
    }

    /// Layer the graph from free left vertices; true if a free right
    /// vertex is reachable.
    fn bfs(&mut self) -> bool {
        let mut queue = VecDeque::new();
        for (u, m) in self.match_left.iter().enumerate() {
            if m.is_none() {
                self.layer[u] = 0;
                queue.push_back(u);
            } else {
                self.layer[u] = UNREACHED;
            }
        }

        let mut found = false;
        while let Some(u) = queue.pop_front() {
            for &v in &self.adjacency[u] {
                match self.match_right[v] {
                    None => found = true,
                    Some(w) if self.layer[w] == UNREACHED => {
                        self.layer[w] = self.layer[u] + 1;
                        queue.push_back(w);
                    }
                    Some(_) => {}
                }
            }
        }
        found
    }

    fn dfs(&mut self, u: usize) -> bool {
        let adjacency = self.adjacency;
        for &v in &adjacency[u] {
            let augment = match self.match_right[v] {
                None => true,
                Some(w) => self.layer[w] == self.layer[u] + 1 && self.dfs(w),
            };
            if augment {
                self.match_left[u] = Some(v);
                self.match_right[v] = Some(u);
                return true;
            }
        }
        self.layer[u] = UNREACHED;
        false
    }
}
