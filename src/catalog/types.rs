use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::CatalogError;

/// The fixed catalog taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// A college, the usual root of the forest.
	College,
	/// A department or grouping section inside a college.
	Department,
	/// A degree program or concentration.
	Program,
	/// A single course.
	Course,
	/// A faculty member.
	Faculty,
}

impl NodeType {
	/// Every node type, in hierarchy order.
	pub const ALL: [NodeType; 5] = [
		NodeType::College,
		NodeType::Department,
		NodeType::Program,
		NodeType::Course,
		NodeType::Faculty,
	];

	/// Lower-case wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::College => "college",
			NodeType::Department => "department",
			NodeType::Program => "program",
			NodeType::Course => "course",
			NodeType::Faculty => "faculty",
		}
	}

	/// Short badge label used by tree rows and the selection summary.
	pub fn label(self) -> &'static str {
		match self {
			NodeType::College => "College",
			NodeType::Department => "Dept",
			NodeType::Program => "Program",
			NodeType::Course => "Course",
			NodeType::Faculty => "Faculty",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Delivery format of a course.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum CourseFormat {
	/// Taught on campus.
	#[serde(rename = "In-Person")]
	InPerson,
	/// Mixed on campus and remote.
	Hybrid,
	/// Fully remote.
	Online,
}

impl CourseFormat {
	/// Display form, as written in the catalog.
	pub fn label(self) -> &'static str {
		match self {
			CourseFormat::InPerson => "In-Person",
			CourseFormat::Hybrid => "Hybrid",
			CourseFormat::Online => "Online",
		}
	}
}

/// Metadata carried by course nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CourseMetadata {
	/// Instructor ids.
	pub faculty: Vec<String>,
	/// Teaching assistant ids.
	pub teaching_assistants: Vec<String>,
	/// Prerequisite course ids.
	pub prerequisites: Vec<String>,
	/// Related course ids.
	pub related_courses: Vec<String>,
	/// Hosting lab id.
	pub lab: Option<String>,
	/// Credit hours.
	pub credit_hours: Option<u32>,
	/// Terms in which the course runs.
	pub terms_offered: Vec<String>,
	/// Typical enrolment.
	pub typical_class_size: Option<u32>,
	/// Delivery format.
	pub format: Option<CourseFormat>,
	/// Average grade.
	#[serde(rename = "avgGPA")]
	pub avg_gpa: Option<f64>,
	/// Pass rate, as displayed.
	pub success_rate: Option<String>,
	/// Syllabus topics.
	pub topics: Vec<String>,
}

/// Graduate outcomes of a program.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerOutcomes {
	/// Typical roles.
	pub roles: Vec<String>,
	/// Typical employers.
	pub companies: Vec<String>,
	/// Average starting salary.
	pub average_salary: u32,
	/// Employment rate, as displayed.
	pub employment_rate: String,
}

/// Admission requirements of a program.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionInfo {
	/// Minimum GPA.
	pub gpa_requirement: f64,
	/// Required background.
	pub prerequisites: Vec<String>,
	/// Application deadline per term.
	pub deadlines: BTreeMap<String, String>,
}

/// Metadata carried by program nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProgramMetadata {
	/// Credit hours to graduate.
	pub credit_hours: Option<u32>,
	/// Nominal duration.
	pub duration: Option<String>,
	/// Annual tuition.
	pub tuition: Option<u32>,
	/// Graduate outcomes.
	pub career_outcomes: Option<CareerOutcomes>,
	/// Admission requirements.
	pub admission_info: Option<AdmissionInfo>,
}

/// Metadata carried by faculty nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FacultyMetadata {
	/// Research areas.
	pub research_areas: Vec<String>,
	/// Course ids taught.
	pub course_ids: Vec<String>,
	/// Program ids affiliated with.
	pub program_ids: Vec<String>,
}

/// Type-specific node payload. The variant always agrees with the owning
/// node's [`NodeType`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeMetadata {
	/// Payload of a [`NodeType::Course`] node.
	Course(CourseMetadata),
	/// Payload of a [`NodeType::Program`] node.
	Program(ProgramMetadata),
	/// Payload of a [`NodeType::Faculty`] node.
	Faculty(FacultyMetadata),
}

impl NodeMetadata {
	fn from_value(id: &str, node_type: NodeType, value: Value) -> Result<Self, CatalogError> {
		let mismatch = |source: serde_json::Error| CatalogError::Metadata {
			id: id.to_string(),
			node_type,
			reason: source.to_string(),
		};
		match node_type {
			NodeType::Course => serde_json::from_value(value)
				.map(NodeMetadata::Course)
				.map_err(mismatch),
			NodeType::Program => serde_json::from_value(value)
				.map(NodeMetadata::Program)
				.map_err(mismatch),
			NodeType::Faculty => serde_json::from_value(value)
				.map(NodeMetadata::Faculty)
				.map_err(mismatch),
			NodeType::College | NodeType::Department => Err(CatalogError::Metadata {
				id: id.to_string(),
				node_type,
				reason: "this node type carries no metadata".into(),
			}),
		}
	}
}

/// A tree node as written in the document, metadata still untyped.
#[derive(Deserialize)]
pub(crate) struct RawTreeNode {
	id: String,
	name: String,
	#[serde(rename = "type")]
	node_type: NodeType,
	description: Option<String>,
	code: Option<String>,
	#[serde(default)]
	children: Vec<RawTreeNode>,
	metadata: Option<Value>,
}

/// One catalog entity and the subtree it owns.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
	/// Unique id within the catalog namespace.
	pub id: String,
	/// Display label.
	pub name: String,
	/// Taxonomy position.
	pub node_type: NodeType,
	/// Optional display description.
	pub description: Option<String>,
	/// Optional display code (e.g. `ITCS 3152`).
	pub code: Option<String>,
	/// Owned children, in display order.
	pub children: Vec<TreeNode>,
	/// Type-specific payload.
	pub metadata: Option<NodeMetadata>,
}

impl TryFrom<RawTreeNode> for TreeNode {
	type Error = CatalogError;

	fn try_from(raw: RawTreeNode) -> Result<Self, Self::Error> {
		let metadata = raw
			.metadata
			.map(|value| NodeMetadata::from_value(&raw.id, raw.node_type, value))
			.transpose()?;
		let children = raw
			.children
			.into_iter()
			.map(TreeNode::try_from)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(TreeNode {
			id: raw.id,
			name: raw.name,
			node_type: raw.node_type,
			description: raw.description,
			code: raw.code,
			children,
			metadata,
		})
	}
}

impl TreeNode {
	/// A leaf node with no optional fields.
	pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			node_type,
			description: None,
			code: None,
			children: Vec::new(),
			metadata: None,
		}
	}

	/// Adds a child.
	pub fn with_child(mut self, child: TreeNode) -> Self {
		self.children.push(child);
		self
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// True when the node owns at least one child.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// All descendants in pre-order, excluding `self`.
	pub fn descendants(&self) -> Vec<&TreeNode> {
		let mut out = Vec::new();
		collect_preorder(&self.children, &mut out);
		out
	}

	/// Copy of this node without its subtree.
	pub fn detached(&self) -> TreeNode {
		TreeNode {
			id: self.id.clone(),
			name: self.name.clone(),
			node_type: self.node_type,
			description: self.description.clone(),
			code: self.code.clone(),
			children: Vec::new(),
			metadata: self.metadata.clone(),
		}
	}
}

/// Every node of `forest` in pre-order.
pub fn flatten(forest: &[TreeNode]) -> Vec<&TreeNode> {
	let mut out = Vec::new();
	collect_preorder(forest, &mut out);
	out
}

/// First node with `id`, searching in pre-order.
pub fn find<'a>(forest: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
	forest.iter().find_map(|node| {
		if node.id == id {
			Some(node)
		} else {
			find(&node.children, id)
		}
	})
}

fn collect_preorder<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
	for node in nodes {
		out.push(node);
		collect_preorder(&node.children, out);
	}
}

/// Kind of a catalog relationship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
	/// Faculty teaches a course.
	Teaches,
	/// Faculty taught a course in the past.
	TaughtPreviously,
	/// Source course is required before the target course.
	Prerequisite,
	/// Overlapping material.
	RelatedContent,
	/// Members of the same lab.
	SameLab,
	/// Research collaboration.
	Collaborates,
	/// Academic advising.
	Advises,
	/// Research activity.
	Researches,
	/// Inverse of advising.
	AdvisedBy,
	/// Teaching assistant duty.
	TeachesAsTa,
	/// Mentorship.
	Mentors,
	/// Joint research.
	ResearchesWith,
	/// Interchangeable course path.
	AlternativePath,
}

impl RelationshipType {
	/// Every relationship type, in legend order.
	pub const ALL: [RelationshipType; 13] = [
		RelationshipType::Teaches,
		RelationshipType::TaughtPreviously,
		RelationshipType::Prerequisite,
		RelationshipType::RelatedContent,
		RelationshipType::SameLab,
		RelationshipType::Collaborates,
		RelationshipType::Advises,
		RelationshipType::Researches,
		RelationshipType::AdvisedBy,
		RelationshipType::TeachesAsTa,
		RelationshipType::Mentors,
		RelationshipType::ResearchesWith,
		RelationshipType::AlternativePath,
	];

	/// Wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			RelationshipType::Teaches => "teaches",
			RelationshipType::TaughtPreviously => "taught_previously",
			RelationshipType::Prerequisite => "prerequisite",
			RelationshipType::RelatedContent => "related_content",
			RelationshipType::SameLab => "same_lab",
			RelationshipType::Collaborates => "collaborates",
			RelationshipType::Advises => "advises",
			RelationshipType::Researches => "researches",
			RelationshipType::AdvisedBy => "advised_by",
			RelationshipType::TeachesAsTa => "teaches_as_ta",
			RelationshipType::Mentors => "mentors",
			RelationshipType::ResearchesWith => "researches_with",
			RelationshipType::AlternativePath => "alternative_path",
		}
	}

	/// Human label for legends and tooltips.
	pub fn label(self) -> String {
		self.as_str().replace('_', " ")
	}

	/// Only asymmetric relationships get an arrowhead.
	pub fn is_directed(self) -> bool {
		matches!(self, RelationshipType::Prerequisite)
	}
}

impl fmt::Display for RelationshipType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Optional annotations on a relationship.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelationshipMetadata {
	/// Weight in `0..=1`.
	pub strength: Option<f64>,
	/// Free text.
	pub description: Option<String>,
	/// Year the relationship started.
	pub year: Option<u32>,
}

/// Directed edge between two raw entity ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Relationship {
	/// Raw source id; may need normalization.
	pub source: String,
	/// Raw target id; may need normalization.
	pub target: String,
	/// Relationship kind.
	#[serde(rename = "type")]
	pub kind: RelationshipType,
	/// Optional annotations.
	pub metadata: Option<RelationshipMetadata>,
}

impl Relationship {
	/// Builds a relationship without metadata.
	pub fn new(source: impl Into<String>, target: impl Into<String>, kind: RelationshipType) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind,
			metadata: None,
		}
	}

	/// `{source}-{target}-{type}` over the raw ids.
	pub fn key(&self) -> String {
		format!("{}-{}-{}", self.source, self.target, self.kind)
	}

	/// Strength, defaulting to 1. Zero and negative weights also count as 1.
	pub fn strength(&self) -> f64 {
		self.metadata
			.as_ref()
			.and_then(|m| m.strength)
			.filter(|s| *s > 0.0)
			.unwrap_or(1.0)
	}

	/// True when both relationships join the same endpoints in the same direction.
	pub fn same_endpoints(&self, other: &Relationship) -> bool {
		self.source == other.source && self.target == other.target
	}
}

/// Course entry of the flat entity list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
	/// Canonical `course-` id.
	pub id: String,
	/// Catalog code.
	pub code: String,
	/// Display title.
	pub title: String,
	/// Description.
	pub description: String,
	/// Credit hours.
	pub credits: u32,
	/// Prerequisite codes.
	#[serde(default)]
	pub prerequisites: Vec<String>,
	/// Instructor ids.
	#[serde(default)]
	pub faculty_ids: Vec<String>,
}

/// Faculty entry of the flat entity list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyRecord {
	/// Canonical `fac-` id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Academic title.
	pub title: String,
	/// Research areas.
	#[serde(default)]
	pub research_areas: Vec<String>,
	/// Course ids taught.
	#[serde(default)]
	pub course_ids: Vec<String>,
	/// Program ids affiliated with.
	#[serde(default)]
	pub program_ids: Vec<String>,
}

/// Program entry of the flat entity list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
	/// Canonical `prog-` id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Description.
	pub description: String,
	/// Offered tracks.
	#[serde(default)]
	pub tracks: Vec<String>,
	/// Faculty ids.
	#[serde(default)]
	pub faculty_ids: Vec<String>,
	/// Course ids.
	#[serde(default)]
	pub course_ids: Vec<String>,
}
