//! Cross-reference checks that run once the whole document has been walked:
//! identifier uniqueness, condition reference resolution and dependency cycles.

use super::path::FieldPath;
use super::structural::{Owner, SolutionIndex};
use crate::error::{Violation, ViolationKind};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Reports every repeated id after its first occurrence.
pub(super) fn check_unique(
    entries: &[(String, FieldPath)],
    what: &str,
    violations: &mut Vec<Violation>,
) {
    let mut first_seen: AHashMap<&str, &FieldPath> = AHashMap::new();
    for (id, path) in entries {
        match first_seen.get(id.as_str()) {
            Some(first) => violations.push(Violation::new(
                ViolationKind::Uniqueness,
                path.clone(),
                format!("duplicate {} '{}' (first declared at {})", what, id, first),
            )),
            None => {
                first_seen.insert(id, path);
            }
        }
    }
}

/// Runs uniqueness, reference and cycle checks for one solution.
pub(super) fn check_solution(
    solution: &SolutionIndex,
    detect_cycles: bool,
    violations: &mut Vec<Violation>,
) {
    check_unique(&solution.scripts, "script id", violations);

    let attribute_ids: Vec<(String, FieldPath)> = solution
        .attributes
        .iter()
        .map(|a| (a.id.clone(), a.path.field("id")))
        .collect();
    check_unique(&attribute_ids, "attribute id", violations);

    // First declaration wins; duplicates were reported above.
    let mut lookup: AHashMap<&str, usize> = AHashMap::new();
    for (i, attribute) in solution.attributes.iter().enumerate() {
        lookup.entry(attribute.id.as_str()).or_insert(i);
    }

    let solution_label = solution.id.as_deref().unwrap_or("<unnamed>");
    let mut group_refs: AHashMap<usize, Vec<usize>> = AHashMap::new();
    let mut own_refs: AHashMap<usize, Vec<usize>> = AHashMap::new();

    for reference in &solution.references {
        let Some(&target) = lookup.get(reference.attribute_id.as_str()) else {
            violations.push(Violation::new(
                ViolationKind::Referential,
                reference.path.clone(),
                format!(
                    "attributeId '{}' does not match any attribute of solution '{}'",
                    reference.attribute_id, solution_label
                ),
            ));
            continue;
        };

        match reference.owner {
            Owner::Attribute(owner) => {
                if solution.attributes[owner].id == reference.attribute_id {
                    violations.push(Violation::new(
                        ViolationKind::Referential,
                        reference.path.clone(),
                        format!(
                            "condition refers to its own attribute '{}'",
                            reference.attribute_id
                        ),
                    ));
                    continue;
                }
                own_refs.entry(owner).or_default().push(target);
            }
            Owner::Group(group) => {
                if solution.attributes[target].group == Some(group) {
                    violations.push(Violation::new(
                        ViolationKind::Referential,
                        reference.path.clone(),
                        format!(
                            "group condition refers to attribute '{}' declared inside the group at {}",
                            reference.attribute_id, solution.groups[group].path
                        ),
                    ));
                    continue;
                }
                group_refs.entry(group).or_default().push(target);
            }
        }
    }

    if !detect_cycles {
        return;
    }

    // An attribute depends on what its own conditions and its group's conditions read.
    let edges: Vec<Vec<usize>> = solution
        .attributes
        .iter()
        .enumerate()
        .map(|(i, attribute)| {
            let own = own_refs.get(&i).into_iter().flatten();
            let inherited = attribute
                .group
                .and_then(|g| group_refs.get(&g))
                .into_iter()
                .flatten();
            own.chain(inherited).copied().unique().collect()
        })
        .collect();

    for cycle in find_cycles(&edges) {
        let first = cycle[0];
        let names = cycle
            .iter()
            .chain(std::iter::once(&first))
            .map(|&i| solution.attributes[i].id.as_str())
            .join(" -> ");
        violations.push(Violation::new(
            ViolationKind::Referential,
            solution.attributes[first].path.field("conditions"),
            format!("conditions form a dependency cycle: {}", names),
        ));
    }
}

/// Finds dependency cycles with a depth-first search. Each cycle is reported once,
/// starting from the member declared first.
fn find_cycles(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; edges.len()];
    let mut found = Vec::new();
    let mut seen = AHashSet::new();
    // (node, index of the next edge to follow); kept on the heap so long chains are fine.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..edges.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let Some(&next) = edges[node].get(cursor) else {
                marks[node] = Mark::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;

            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::InProgress;
                    stack.push((next, 0));
                }
                Mark::InProgress => {
                    let Some(start) = stack.iter().position(|&(n, _)| n == next) else {
                        continue;
                    };
                    let mut cycle: Vec<usize> = stack[start..].iter().map(|&(n, _)| n).collect();
                    let min_pos = cycle.iter().position_min().unwrap_or(0);
                    cycle.rotate_left(min_pos);
                    if seen.insert(cycle.clone()) {
                        found.push(cycle);
                    }
                }
                Mark::Done => {}
            }
        }
    }
    found
}
