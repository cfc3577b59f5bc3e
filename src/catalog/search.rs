//! Fuzzy lookup over the catalog tree for the search bar.

use crate::config::SearchConfig;

use super::types::{TreeNode, flatten};

/// Flattened view of the forest, built once per catalog load.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
	entries: Vec<Entry>,
}

#[derive(Clone, Debug)]
struct Entry {
	fields: Vec<String>,
}

impl SearchIndex {
	/// Indexes name, description and code of every node in pre-order.
	pub fn build(forest: &[TreeNode]) -> Self {
		let entries = flatten(forest)
			.into_iter()
			.map(|node| Entry {
				fields: [Some(&node.name), node.description.as_ref(), node.code.as_ref()]
					.into_iter()
					.flatten()
					.map(|field| field.to_lowercase())
					.collect(),
			})
			.collect();
		Self { entries }
	}

	/// Positions (pre-order) of the best matches, best first.
	pub fn search(&self, query: &str, config: &SearchConfig) -> Vec<usize> {
		let query = query.trim().to_lowercase();
		if query.chars().count() < config.min_query_len {
			return Vec::new();
		}

		let mut scored: Vec<(usize, f64)> = self
			.entries
			.iter()
			.enumerate()
			.filter_map(|(i, entry)| {
				let score = entry
					.fields
					.iter()
					.map(|field| field_score(&query, field))
					.fold(0.0, f64::max);
				(score >= config.threshold).then_some((i, score))
			})
			.collect();

		// Stable sort keeps pre-order among equal scores.
		scored.sort_by(|a, b| b.1.total_cmp(&a.1));
		scored.truncate(config.limit);
		scored.into_iter().map(|(i, _)| i).collect()
	}
}

fn field_score(query: &str, field: &str) -> f64 {
	if field == query {
		return 1.0;
	}
	if field.contains(query) {
		return 0.99;
	}
	field
		.split_whitespace()
		.map(|word| strsim::jaro_winkler(query, word))
		.fold(strsim::jaro_winkler(query, field), f64::max)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::types::NodeType;

	fn forest() -> Vec<TreeNode> {
		vec![
			TreeNode::new("dept-cs", "Department of Computer Science", NodeType::Department)
				.with_child(
					TreeNode::new("course-ai-intro", "Introduction to AI", NodeType::Course)
						.with_description("Fundamental concepts of artificial intelligence."),
				)
				.with_child(TreeNode::new("course-robotics", "Robotics", NodeType::Course)),
		]
	}

	#[test]
	fn short_queries_return_nothing() {
		let index = SearchIndex::build(&forest());
		assert!(index.search("r", &SearchConfig::default()).is_empty());
		assert!(index.search("  ", &SearchConfig::default()).is_empty());
	}

	#[test]
	fn exact_name_ranks_first() {
		let index = SearchIndex::build(&forest());
		let hits = index.search("ROBOTICS", &SearchConfig::default());
		assert_eq!(hits.first(), Some(&2));
	}

	#[test]
	fn matches_descriptions_and_typos() {
		let index = SearchIndex::build(&forest());
		assert_eq!(index.search("artificial", &SearchConfig::default()), vec![1]);
		assert_eq!(index.search("robotcs", &SearchConfig::default()), vec![2]);
	}

	#[test]
	fn results_are_bounded() {
		let forest: Vec<TreeNode> = (0..25)
			.map(|i| TreeNode::new(format!("course-{i}"), format!("Course {i}"), NodeType::Course))
			.collect();
		let index = SearchIndex::build(&forest);
		let config = SearchConfig::default();
		assert_eq!(index.search("course", &config).len(), config.limit);
	}
}
