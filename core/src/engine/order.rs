//! Topological ordering
//!
//! Used twice: to sync object kinds so that whatever an object binds to is written before it,
//! and to reject template links that would close a cycle.

use std::{
	collections::{BTreeMap, BTreeSet, VecDeque},
	fmt::Display,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
	#[error("circular dependency between: {0}")]
	CircularDependency(String),

	#[error("nothing to order")]
	Empty,
}

/// Orders `nodes` so that every node comes after everything it depends on
///
/// Each entry is `(node, dependencies)`. Dependencies that are not listed as nodes themselves are
/// still ordered. Independent nodes come out in ascending order, so the result is deterministic.
///
/// ```ignore
/// let order = compute_order([
///     ("trigger_prototype", vec!["item_prototype"]),
///     ("item_prototype", vec!["discovery_rule"]),
///     ("discovery_rule", vec![]),
/// ])?;
/// // order = ["discovery_rule", "item_prototype", "trigger_prototype"]
/// ```
pub fn compute_order<T, I>(nodes: I) -> Result<Vec<T>, OrderError>
where
	T: Copy + Ord + Display,
	I: IntoIterator<Item = (T, Vec<T>)>,
{
	let mut graph: BTreeMap<T, Vec<T>> = BTreeMap::new();
	let mut in_degree: BTreeMap<T, usize> = BTreeMap::new();

	for (node, dependencies) in nodes {
		in_degree.entry(node).or_insert(0);

		for dependency in dependencies {
			// Edge: dependency -> node (dependency must come first)
			graph.entry(dependency).or_default().push(node);
			*in_degree.entry(node).or_insert(0) += 1;
			in_degree.entry(dependency).or_insert(0);
		}
	}

	if in_degree.is_empty() {
		return Err(OrderError::Empty);
	}

	// Kahn's algorithm
	let mut queue: VecDeque<T> = in_degree
		.iter()
		.filter(|(_, &degree)| degree == 0)
		.map(|(&node, _)| node)
		.collect();

	let mut result = Vec::with_capacity(in_degree.len());
	let mut remaining = in_degree.clone();

	while let Some(node) = queue.pop_front() {
		result.push(node);

		if let Some(dependents) = graph.get(&node) {
			let mut ready = BTreeSet::new();
			for dependent in dependents {
				if let Some(degree) = remaining.get_mut(dependent) {
					*degree -= 1;
					if *degree == 0 {
						ready.insert(*dependent);
					}
				}
			}
			queue.extend(ready);
		}
	}

	if result.len() != in_degree.len() {
		let sorted: BTreeSet<T> = result.iter().copied().collect();
		let unsorted: Vec<String> = in_degree
			.keys()
			.filter(|node| !sorted.contains(*node))
			.map(ToString::to_string)
			.collect();

		return Err(OrderError::CircularDependency(unsorted.join(", ")));
	}

	Ok(result)
}
