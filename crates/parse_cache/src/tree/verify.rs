//! Structural self-check for [`ParseCacheTree`].

use super::{NodeId, ParseCacheTree};
use crate::{CacheError, Result};

impl<S> ParseCacheTree<S> {
	/// Walks every chain and checks containment, ordering, link symmetry and
	/// that no arena slot is unreachable.
	///
	/// Reports the first violation found.
	pub fn verify(&self) -> Result<()> {
		let mut pending: Vec<(Option<NodeId>, Option<NodeId>)> = vec![(None, self.head)];
		let mut reached = 0usize;

		while let Some((parent, head)) = pending.pop() {
			let bounds = parent.map(|p| {
				let node = self.at(p);
				(node.start_line, node.end_line)
			});
			let mut prev: Option<NodeId> = None;
			let mut cursor = head;

			while let Some(id) = cursor {
				let Some(node) = self.get(id) else {
					return Err(corrupt(format!("link to dead {id}")));
				};
				reached += 1;
				if reached > self.nodes.len() {
					return Err(corrupt(format!("cycle through {id}")));
				}
				if node.end_line < node.start_line {
					return Err(corrupt(format!("{id} has inverted range {}..={}", node.start_line, node.end_line)));
				}
				if node.parent != parent {
					return Err(corrupt(format!("{id} parent link is {:?}, expected {parent:?}", node.parent)));
				}
				if node.prev != prev {
					return Err(corrupt(format!("{id} prev link is {:?}, expected {prev:?}", node.prev)));
				}
				if let Some((start, end)) = bounds
					&& (node.start_line < start || node.end_line > end)
				{
					return Err(corrupt(format!("{id} escapes its parent range {start}..={end}")));
				}
				if let Some(prev) = prev {
					let before = self.at(prev);
					if before.end_line >= node.start_line {
						return Err(corrupt(format!("{prev} and {id} overlap or are out of order")));
					}
				}

				if node.first_child.is_some() {
					pending.push((Some(id), node.first_child));
				}
				prev = Some(id);
				cursor = node.next;
			}
		}

		if reached != self.nodes.len() {
			return Err(corrupt(format!("{} of {} nodes unreachable", self.nodes.len() - reached, self.nodes.len())));
		}
		Ok(())
	}
}

fn corrupt(message: String) -> CacheError {
	CacheError::Corrupt(message)
}
