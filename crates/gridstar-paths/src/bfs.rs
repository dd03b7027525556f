use std::collections::{HashMap, VecDeque};

use gridstar_core::Cell;

use crate::traits::Pather;

/// Compute a breadth-first distance map from `source`.
///
/// Each step has cost 1. Expansion stops when the distance would exceed
/// `max_dist`. The source itself is included at distance 0.
pub fn bfs_map<P: Pather>(pather: &P, source: Cell, max_dist: i32) -> HashMap<Cell, i32> {
    traverse(pather, source, max_dist, None)
}

/// Unweighted shortest-path length from `from` to `to`, or `None` if `to`
/// is unreachable.
pub fn bfs_distance<P: Pather>(pather: &P, from: Cell, to: Cell) -> Option<i32> {
    traverse(pather, from, i32::MAX, Some(to)).get(&to).copied()
}

/// Shared breadth-first walk. Stops as soon as `target` gets a distance.
fn traverse<P: Pather>(
    pather: &P,
    source: Cell,
    max_dist: i32,
    target: Option<Cell>,
) -> HashMap<Cell, i32> {
    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    let mut nbuf = Vec::with_capacity(4);

    dist.insert(source, 0);
    if target == Some(source) {
        return dist;
    }
    queue.push_back((source, 0));

    while let Some((c, d)) = queue.pop_front() {
        let nd = d + 1;
        if nd > max_dist {
            continue;
        }
        nbuf.clear();
        pather.neighbors(c, &mut nbuf);
        for &n in nbuf.iter() {
            if dist.contains_key(&n) {
                continue;
            }
            dist.insert(n, nd);
            if target == Some(n) {
                return dist;
            }
            queue.push_back((n, nd));
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstar_core::GridMap;

    #[test]
    fn distance_around_wall() {
        let m = GridMap::parse(
            "\
S#..
.#.#
...G",
        )
        .unwrap();
        assert_eq!(bfs_distance(&m, m.start(), m.goal()), Some(5));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let m = GridMap::parse("S.G").unwrap();
        assert_eq!(bfs_distance(&m, m.goal(), m.goal()), Some(0));
    }

    #[test]
    fn early_stop_matches_full_map() {
        let m = GridMap::parse(
            "\
S.#...
..#.#.
....#G",
        )
        .unwrap();
        let full = bfs_map(&m, m.start(), i32::MAX);
        for c in m.bounds() {
            assert_eq!(bfs_distance(&m, m.start(), c), full.get(&c).copied());
        }
    }

    #[test]
    fn distance_unreachable() {
        let m = GridMap::parse("S#G").unwrap();
        assert_eq!(bfs_distance(&m, m.start(), m.goal()), None);
    }

    #[test]
    fn map_respects_max_dist() {
        let m = GridMap::parse(
            "\
S...
....
...G",
        )
        .unwrap();
        let d = bfs_map(&m, m.start(), 2);
        assert_eq!(d.len(), 6);
        assert_eq!(d[&Cell::new(0, 0)], 0);
        assert_eq!(d[&Cell::new(1, 1)], 2);
        assert!(!d.contains_key(&Cell::new(3, 0)));
        let full = bfs_map(&m, m.start(), i32::MAX);
        assert_eq!(full.len(), 12);
        assert_eq!(full[&m.goal()], 5);
    }
}
