//! Minimum-cost perfect assignment on a square matrix.
//!
//! Shortest augmenting paths with row/column potentials, O(n³). Rows are
//! inserted one at a time; each insertion grows an alternating tree by
//! Dijkstra-like relaxation over reduced costs until a free column is hit.

use ndarray::Array2;

/// Returns `assignment[row] = col` minimizing Σ cost[row, col].
///
/// Costs must be finite.
pub(crate) fn solve(cost: &Array2<f64>) -> Vec<usize> {
    let n = cost.nrows();
    debug_assert_eq!(n, cost.ncols());
    if n == 0 {
        return Vec::new();
    }

    // 1-indexed; column 0 is a virtual root
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0usize;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[[i0 - 1, j - 1]] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            assert!(j1 != 0, "assignment costs must be finite");

            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // flip the augmenting path
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        assignment[owner[j] - 1] = j - 1;
    }
    assignment
}
