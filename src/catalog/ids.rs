//! Canonical id resolution.
//!
//! Relationship endpoints and tree ids use inconsistent conventions: some are
//! prefixed (`course-`, `fac-`, `prog-`), some are bare slugs, some are display
//! names. [`IdIndex`] reconciles them against the flat entity lists.

use std::collections::HashMap;
use std::fmt;

use super::types::{CourseRecord, FacultyRecord, NodeType, ProgramRecord, TreeNode};

/// Prefixes that mark an id as already canonical.
pub const CANONICAL_PREFIXES: [&str; 3] = ["course-", "fac-", "prog-"];

/// Outcome of normalizing a raw id.
///
/// An `Unresolved` guess only ever equals the same guess, never a `Resolved`
/// id with the same spelling.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalId {
	/// Already prefixed, or matched against a flat entity list.
	Resolved(String),
	/// Fallback guess in the course namespace.
	Unresolved(String),
}

impl CanonicalId {
	/// The id string, resolved or guessed.
	pub fn as_str(&self) -> &str {
		match self {
			CanonicalId::Resolved(id) | CanonicalId::Unresolved(id) => id,
		}
	}

	/// True for ids that came from the catalog rather than the fallback.
	pub fn is_resolved(&self) -> bool {
		matches!(self, CanonicalId::Resolved(_))
	}

	/// Key for DOM ids and lookups. Guesses get a `guess-` prefix, which no
	/// resolved id carries.
	pub fn dom_key(&self) -> String {
		match self {
			CanonicalId::Resolved(id) => id.clone(),
			CanonicalId::Unresolved(id) => format!("guess-{id}"),
		}
	}
}

impl fmt::Display for CanonicalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityRef {
	Course(usize),
	Faculty(usize),
	Program(usize),
}

/// Lookup tables built once per catalog load.
#[derive(Clone, Debug, Default)]
pub struct IdIndex {
	by_alias: HashMap<String, String>,
	by_id: HashMap<String, EntityRef>,
}

impl IdIndex {
	/// Indexes courses, then faculty, then programs. Earlier entries win on
	/// alias collisions.
	pub fn build(courses: &[CourseRecord], faculty: &[FacultyRecord], programs: &[ProgramRecord]) -> Self {
		let mut index = IdIndex::default();
		for (i, course) in courses.iter().enumerate() {
			index.insert(&course.id, &course.title, "course-", EntityRef::Course(i));
		}
		for (i, member) in faculty.iter().enumerate() {
			index.insert(&member.id, &member.name, "fac-", EntityRef::Faculty(i));
		}
		for (i, program) in programs.iter().enumerate() {
			index.insert(&program.id, &program.name, "prog-", EntityRef::Program(i));
		}
		index
	}

	fn insert(&mut self, id: &str, display: &str, prefix: &str, entity: EntityRef) {
		let slug = id.replacen(prefix, "", 1).to_lowercase();
		for alias in [display.to_lowercase(), slug.replace('-', " "), slug] {
			self.by_alias.entry(alias).or_insert_with(|| id.to_string());
		}
		self.by_id.entry(id.to_string()).or_insert(entity);
	}

	/// Maps a raw id, slug or display name to its canonical id.
	pub fn normalize(&self, raw: &str) -> CanonicalId {
		if CANONICAL_PREFIXES.iter().any(|p| raw.starts_with(p)) {
			return CanonicalId::Resolved(raw.to_string());
		}
		if let Some(id) = self.by_alias.get(&raw.to_lowercase()) {
			return CanonicalId::Resolved(id.clone());
		}
		let guess = raw
			.to_lowercase()
			.split_whitespace()
			.collect::<Vec<_>>()
			.join("-");
		CanonicalId::Unresolved(format!("course-{guess}"))
	}

	/// Display node for an entity reached through a relationship.
	///
	/// `raw` is the endpoint as written in the relationship list; it names
	/// the fallback node when the id is not in any flat list.
	pub fn describe(
		&self,
		id: &CanonicalId,
		raw: &str,
		courses: &[CourseRecord],
		faculty: &[FacultyRecord],
		programs: &[ProgramRecord],
	) -> TreeNode {
		let entity = match id {
			CanonicalId::Resolved(id) => self.by_id.get(id).copied(),
			CanonicalId::Unresolved(_) => None,
		};
		match entity {
			Some(EntityRef::Course(i)) => {
				let course = &courses[i];
				TreeNode::new(&course.id, &course.title, NodeType::Course)
					.with_description(&course.description)
			}
			Some(EntityRef::Faculty(i)) => {
				let member = &faculty[i];
				TreeNode::new(&member.id, &member.name, NodeType::Faculty).with_description(format!(
					"{} - {}",
					member.title,
					member.research_areas.join(", ")
				))
			}
			Some(EntityRef::Program(i)) => {
				let program = &programs[i];
				TreeNode::new(&program.id, &program.name, NodeType::Program)
					.with_description(&program.description)
			}
			None => TreeNode::new(raw, fallback_name(raw), NodeType::Course)
				.with_description("No description available"),
		}
	}
}

fn fallback_name(raw: &str) -> String {
	let stripped = CANONICAL_PREFIXES
		.iter()
		.find_map(|p| raw.strip_prefix(p))
		.unwrap_or(raw);
	stripped.replace('-', " ")
}
