use std::collections::{HashMap, HashSet};

use resval_core::{Resolution, ResolutionId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Visited,
}

/// Ids of every record lying on a parent-reference cycle, deduplicated, in
/// discovery order.
///
/// Each record has at most one outgoing edge (its parent), so the DFS from a
/// root is a single walk. The walk is iterative; its path doubles as the DFS
/// stack. A parent that resolves to no record ends the walk. When a parent id
/// is shared by several records the first one wins.
pub fn find_cycles(records: &[Resolution]) -> Vec<ResolutionId> {
    let mut index: HashMap<&ResolutionId, usize> = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        index.entry(&r.id).or_insert(i);
    }
    let parent_of = |i: usize| records[i].parent().and_then(|p| index.get(p).copied());

    let mut marks = vec![Mark::Unvisited; records.len()];
    let mut seen: HashSet<usize> = HashSet::new();
    let mut on_cycle: Vec<ResolutionId> = Vec::new();
    let mut path: Vec<usize> = Vec::new();

    for root in 0..records.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        path.clear();
        let mut cur = Some(root);
        while let Some(i) = cur {
            match marks[i] {
                Mark::Visited => break,
                Mark::InProgress => {
                    // Back edge: everything on the path from `i` onward is the cycle.
                    if let Some(pos) = path.iter().position(|&p| p == i) {
                        for &p in &path[pos..] {
                            if seen.insert(p) {
                                on_cycle.push(records[p].id.clone());
                            }
                        }
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[i] = Mark::InProgress;
                    path.push(i);
                    cur = parent_of(i);
                }
            }
        }
        for &p in &path {
            marks[p] = Mark::Visited;
        }
    }

    on_cycle
}
