//! Coalescing of skeleton parts into maximal continuous lines
//!
//! Parts join only where their endpoints are exactly equal, and only at
//! nodes where exactly two part-ends meet. Junction nodes (three or more
//! incident ends) are preserved so pruning can still see branch structure.

use geo::{Coord, LineString};
use ribbonline_core::LinearGeometry;
use std::collections::HashMap;

type NodeKey = (u64, u64);

fn node_key(c: Coord<f64>) -> NodeKey {
    (c.x.to_bits(), c.y.to_bits())
}

/// Merge the parts of a skeleton wherever endpoints coincide.
///
/// A single-line skeleton passes through unchanged. Merging an
/// already-merged skeleton is a no-op: after one pass every remaining
/// shared node has degree other than two.
pub fn merge(skeleton: LinearGeometry) -> LinearGeometry {
    match skeleton {
        single @ LinearGeometry::Single(_) => single,
        LinearGeometry::Multi(mls) => {
            let parts: Vec<LineString<f64>> =
                mls.0.into_iter().filter(|ls| ls.0.len() >= 2).collect();
            LinearGeometry::from_parts(merge_parts(parts))
        }
    }
}

fn merge_parts(parts: Vec<LineString<f64>>) -> Vec<LineString<f64>> {
    // How many part-ends touch each node, and which parts they belong to.
    let mut degree: HashMap<NodeKey, usize> = HashMap::new();
    let mut ends_at: HashMap<NodeKey, Vec<usize>> = HashMap::new();

    for (i, part) in parts.iter().enumerate() {
        let [first, .., last] = part.0.as_slice() else {
            continue;
        };
        for &c in [*first, *last].iter() {
            let key = node_key(c);
            *degree.entry(key).or_insert(0) += 1;
            ends_at.entry(key).or_default().push(i);
        }
    }

    let joinable = |key: &NodeKey| degree.get(key) == Some(&2);

    let mut used = vec![false; parts.len()];
    let mut merged = Vec::new();

    for start in 0..parts.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain: Vec<Coord<f64>> = parts[start].0.clone();

        // Grow forwards from the chain tail, then backwards from the head.
        for forwards in [true, false] {
            loop {
                let node = if forwards {
                    match chain.last() {
                        Some(&c) => c,
                        None => break,
                    }
                } else {
                    match chain.first() {
                        Some(&c) => c,
                        None => break,
                    }
                };
                let key = node_key(node);
                if !joinable(&key) {
                    break;
                }

                let next = ends_at
                    .get(&key)
                    .and_then(|ids| ids.iter().copied().find(|&i| !used[i]));
                let Some(next) = next else {
                    // The other end at this node belongs to the chain itself
                    // (a closed loop); stop rather than self-join.
                    break;
                };
                used[next] = true;

                let mut coords = parts[next].0.clone();
                if forwards {
                    if coords.first().map(|&c| node_key(c)) != Some(key) {
                        coords.reverse();
                    }
                    chain.extend(coords.into_iter().skip(1));
                } else {
                    if coords.last().map(|&c| node_key(c)) != Some(key) {
                        coords.reverse();
                    }
                    coords.extend(chain.iter().copied().skip(1));
                    chain = coords;
                }
            }
        }

        merged.push(LineString::new(chain));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiLineString;

    fn multi(parts: Vec<Vec<(f64, f64)>>) -> LinearGeometry {
        LinearGeometry::Multi(MultiLineString::new(
            parts.into_iter().map(LineString::from).collect(),
        ))
    }

    #[test]
    fn chain_of_two_collapses_to_single() {
        let merged = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(1.0, 0.0), (2.0, 0.0)],
        ]));
        match merged {
            LinearGeometry::Single(ls) => {
                assert_eq!(ls.0.len(), 3);
                assert_eq!(ls.0[0], Coord { x: 0.0, y: 0.0 });
                assert_eq!(ls.0[2], Coord { x: 2.0, y: 0.0 });
            }
            other => panic!("expected Single, got {:?}", other),
        }
    }

    #[test]
    fn reversed_part_is_flipped_before_joining() {
        let merged = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(2.0, 0.0), (1.0, 0.0)],
        ]));
        match merged {
            LinearGeometry::Single(ls) => assert_eq!(ls.0.len(), 3),
            other => panic!("expected Single, got {:?}", other),
        }
    }

    #[test]
    fn junction_of_three_stays_split() {
        // Three parts meeting at (1, 0): degree 3, nothing merges.
        let merged = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(1.0, 0.0), (2.0, 0.0)],
            vec![(1.0, 0.0), (1.0, 5.0)],
        ]));
        assert_eq!(merged.num_parts(), 3);
    }

    #[test]
    fn disjoint_parts_pass_through() {
        let merged = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(5.0, 5.0), (6.0, 5.0)],
        ]));
        assert_eq!(merged.num_parts(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(1.0, 0.0), (2.0, 0.0)],
            vec![(2.0, 0.0), (2.0, 1.0)],
            vec![(9.0, 9.0), (8.0, 8.0)],
        ]));
        let twice = merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn single_line_is_identity() {
        let line = LinearGeometry::Single(LineString::from(vec![(0.0, 0.0), (3.0, 4.0)]));
        assert_eq!(merge(line.clone()), line);
    }

    #[test]
    fn near_miss_endpoints_do_not_join() {
        // Joins require exact coordinate equality.
        let merged = merge(multi(vec![
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![(1.0 + 1e-9, 0.0), (2.0, 0.0)],
        ]));
        assert_eq!(merged.num_parts(), 2);
    }
}
