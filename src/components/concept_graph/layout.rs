//! Left-to-right layered placement for the hierarchical layout mode.

/// Horizontal distance between consecutive ranks.
pub const LEVEL_SEPARATION: f64 = 170.0;
/// Vertical distance between neighbors within a rank.
pub const NODE_SPACING: f64 = 140.0;

/// Compute positions for `node_count` nodes given directed `edges` over
/// node indices. Ranks come from longest-path layering, order within a
/// rank from one barycenter sweep against the previous rank.
pub fn layered_positions(node_count: usize, edges: &[(usize, usize)]) -> Vec<(f32, f32)> {
	if node_count == 0 {
		return Vec::new();
	}
	let ranks = assign_ranks(node_count, edges);
	let order = rank_order(node_count, edges, &ranks);

	let mut positions = vec![(0.0, 0.0); node_count];
	for column in &order {
		for (row, &node) in column.iter().enumerate() {
			let x = ranks[node] as f64 * LEVEL_SEPARATION;
			let y = (row as f64 - (column.len() as f64 - 1.0) / 2.0) * NODE_SPACING;
			positions[node] = (x as f32, y as f32);
		}
	}
	positions
}

/// Longest-path layering: sources get rank 0, every other node one past
/// its deepest predecessor. Kahn traversal; nodes left unvisited by a
/// cycle fall back to one rank past the deepest ranked node.
fn assign_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
	let mut successors = vec![Vec::new(); node_count];
	let mut in_degree = vec![0usize; node_count];
	for &(from, to) in edges {
		if from == to {
			continue;
		}
		successors[from].push(to);
		in_degree[to] += 1;
	}

	let mut queue: Vec<usize> = (0..node_count).filter(|&v| in_degree[v] == 0).collect();
	let mut ranks = vec![0usize; node_count];
	let mut visited = vec![false; node_count];
	let mut head = 0;
	while head < queue.len() {
		let node = queue[head];
		head += 1;
		visited[node] = true;
		for &next in &successors[node] {
			ranks[next] = ranks[next].max(ranks[node] + 1);
			in_degree[next] -= 1;
			if in_degree[next] == 0 {
				queue.push(next);
			}
		}
	}

	if head < node_count {
		let deepest = ranks
			.iter()
			.zip(&visited)
			.filter(|&(_, &v)| v)
			.map(|(&r, _)| r)
			.max()
			.unwrap_or(0);
		for node in 0..node_count {
			if !visited[node] {
				ranks[node] = deepest + 1;
			}
		}
	}
	ranks
}

/// Bucket nodes per rank, then reorder each rank by the barycenter of its
/// predecessors in the previous rank. Ties keep dataset order.
fn rank_order(node_count: usize, edges: &[(usize, usize)], ranks: &[usize]) -> Vec<Vec<usize>> {
	let max_rank = ranks.iter().copied().max().unwrap_or(0);
	let mut columns = vec![Vec::new(); max_rank + 1];
	for node in 0..node_count {
		columns[ranks[node]].push(node);
	}

	let mut predecessors = vec![Vec::new(); node_count];
	for &(from, to) in edges {
		predecessors[to].push(from);
	}

	for rank in 1..columns.len() {
		let prev = columns[rank - 1].clone();
		let mut scored: Vec<(usize, f64)> = columns[rank]
			.iter()
			.map(|&node| {
				let spots: Vec<f64> = predecessors[node]
					.iter()
					.filter_map(|p| prev.iter().position(|&q| q == *p))
					.map(|i| i as f64)
					.collect();
				let score = if spots.is_empty() {
					f64::MAX
				} else {
					spots.iter().sum::<f64>() / spots.len() as f64
				};
				(node, score)
			})
			.collect();
		scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
		columns[rank] = scored.into_iter().map(|(node, _)| node).collect();
	}
	columns
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chain_ranks_left_to_right() {
		let positions = layered_positions(3, &[(0, 1), (1, 2)]);
		assert_eq!(positions[0].0, 0.0);
		assert_eq!(positions[1].0, LEVEL_SEPARATION as f32);
		assert_eq!(positions[2].0, (2.0 * LEVEL_SEPARATION) as f32);
		// single node per rank sits on the axis
		assert!(positions.iter().all(|p| p.1 == 0.0));
	}

	#[test]
	fn diamond_shares_a_rank() {
		let positions = layered_positions(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
		assert_eq!(positions[1].0, positions[2].0);
		assert_eq!(positions[3].0, (2.0 * LEVEL_SEPARATION) as f32);
		// the shared rank spreads vertically around the axis
		assert_eq!(positions[1].1, -positions[2].1);
		assert!((positions[1].1.abs() - (NODE_SPACING / 2.0) as f32).abs() < 1e-3);
	}

	#[test]
	fn longest_path_wins() {
		// 0 -> 1 -> 2 and 0 -> 2: node 2 sits at rank 2, not 1.
		let positions = layered_positions(3, &[(0, 1), (1, 2), (0, 2)]);
		assert_eq!(positions[2].0, (2.0 * LEVEL_SEPARATION) as f32);
	}

	#[test]
	fn cycle_nodes_get_a_rank() {
		let positions = layered_positions(3, &[(0, 1), (1, 2), (2, 1)]);
		assert_eq!(positions.len(), 3);
		// the cycle pair lands one past the deepest acyclic rank
		assert_eq!(positions[1].0, positions[2].0);
		assert_eq!(positions[1].0, LEVEL_SEPARATION as f32);
	}

	#[test]
	fn self_loop_is_ignored() {
		let positions = layered_positions(2, &[(0, 0), (0, 1)]);
		assert_eq!(positions[0].0, 0.0);
		assert_eq!(positions[1].0, LEVEL_SEPARATION as f32);
	}

	#[test]
	fn barycenter_follows_predecessors() {
		// Rank 0: 0, 1. Rank 1: 2 (child of 1), 3 (child of 0).
		// After the sweep, 3 should come before 2.
		let positions = layered_positions(4, &[(0, 3), (1, 2)]);
		assert!(positions[3].1 < positions[2].1);
	}

	#[test]
	fn empty_graph() {
		assert!(layered_positions(0, &[]).is_empty());
	}
}
