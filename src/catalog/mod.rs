//! The academic catalog: an immutable forest of entities plus a flat
//! relationship list over the same id namespace.

use std::collections::HashSet;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::config::SearchConfig;

mod ids;
mod search;
mod types;

use types::RawTreeNode;

pub use ids::{CANONICAL_PREFIXES, CanonicalId, IdIndex};
pub use search::SearchIndex;
pub use types::{
	AdmissionInfo, CareerOutcomes, CourseFormat, CourseMetadata, CourseRecord, FacultyMetadata,
	FacultyRecord, NodeMetadata, NodeType, ProgramMetadata, ProgramRecord, Relationship,
	RelationshipMetadata, RelationshipType, TreeNode, find, flatten,
};

const BUILTIN_CATALOG: &str = include_str!("catalog.json");

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// The document is not valid catalog JSON.
	#[error("invalid catalog document: {0}")]
	Parse(#[from] serde_json::Error),
	/// An id appears twice where it must be unique.
	#[error("duplicate entity id `{0}`")]
	DuplicateId(String),
	/// Metadata does not fit the node's type.
	#[error("metadata of `{id}` does not fit a {node_type} node: {reason}")]
	Metadata {
		/// Offending node.
		id: String,
		/// Its declared type.
		node_type: NodeType,
		/// What went wrong.
		reason: String,
	},
}

#[derive(Deserialize)]
struct CatalogDocument {
	forest: Vec<RawTreeNode>,
	#[serde(default)]
	courses: Vec<CourseRecord>,
	#[serde(default)]
	faculty: Vec<FacultyRecord>,
	#[serde(default)]
	programs: Vec<ProgramRecord>,
	#[serde(default)]
	relationships: Vec<Relationship>,
}

/// Loaded catalog with its lookup indexes.
#[derive(Clone, Debug)]
pub struct Catalog {
	forest: Vec<TreeNode>,
	courses: Vec<CourseRecord>,
	faculty: Vec<FacultyRecord>,
	programs: Vec<ProgramRecord>,
	relationships: Vec<Relationship>,
	ids: IdIndex,
	search: SearchIndex,
}

impl Catalog {
	/// Validates the parts and builds the indexes.
	pub fn new(
		forest: Vec<TreeNode>,
		courses: Vec<CourseRecord>,
		faculty: Vec<FacultyRecord>,
		programs: Vec<ProgramRecord>,
		relationships: Vec<Relationship>,
	) -> Result<Self, CatalogError> {
		let mut seen = HashSet::new();
		for node in flatten(&forest) {
			if !seen.insert(node.id.as_str()) {
				return Err(CatalogError::DuplicateId(node.id.clone()));
			}
		}

		let mut seen = HashSet::new();
		let flat_ids = courses
			.iter()
			.map(|c| &c.id)
			.chain(faculty.iter().map(|f| &f.id))
			.chain(programs.iter().map(|p| &p.id));
		for id in flat_ids {
			if !seen.insert(id.as_str()) {
				return Err(CatalogError::DuplicateId(id.clone()));
			}
		}

		let ids = IdIndex::build(&courses, &faculty, &programs);
		let search = SearchIndex::build(&forest);
		Ok(Self {
			forest,
			courses,
			faculty,
			programs,
			relationships,
			ids,
			search,
		})
	}

	/// Parses and validates a catalog document.
	pub fn from_json(json: &str) -> Result<Self, CatalogError> {
		let doc: CatalogDocument = serde_json::from_str(json)?;
		let forest = doc
			.forest
			.into_iter()
			.map(TreeNode::try_from)
			.collect::<Result<Vec<_>, _>>()?;
		let catalog = Self::new(forest, doc.courses, doc.faculty, doc.programs, doc.relationships)?;
		info!(
			"catalog loaded: {} roots, {} entities, {} relationships",
			catalog.forest.len(),
			flatten(&catalog.forest).len(),
			catalog.relationships.len()
		);
		Ok(catalog)
	}

	/// The catalog shipped with the application.
	pub fn builtin() -> Result<Self, CatalogError> {
		Self::from_json(BUILTIN_CATALOG)
	}

	/// Root nodes of the tree.
	pub fn forest(&self) -> &[TreeNode] {
		&self.forest
	}

	/// All relationships, in document order.
	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	/// Flat course list.
	pub fn courses(&self) -> &[CourseRecord] {
		&self.courses
	}

	/// Flat faculty list.
	pub fn faculty(&self) -> &[FacultyRecord] {
		&self.faculty
	}

	/// Flat program list.
	pub fn programs(&self) -> &[ProgramRecord] {
		&self.programs
	}

	/// Tree node by id.
	pub fn node(&self, id: &str) -> Option<&TreeNode> {
		find(&self.forest, id)
	}

	/// See [`IdIndex::normalize`].
	pub fn normalize(&self, raw: &str) -> CanonicalId {
		self.ids.normalize(raw)
	}

	/// See [`IdIndex::describe`].
	pub fn describe(&self, id: &CanonicalId, raw: &str) -> TreeNode {
		self.ids
			.describe(id, raw, &self.courses, &self.faculty, &self.programs)
	}

	/// Fuzzy search over name, description and code.
	pub fn search(&self, query: &str, config: &SearchConfig) -> Vec<&TreeNode> {
		let hits = self.search.search(query, config);
		let nodes = flatten(&self.forest);
		hits.into_iter().filter_map(|i| nodes.get(i).copied()).collect()
	}
}
