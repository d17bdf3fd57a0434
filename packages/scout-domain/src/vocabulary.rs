use std::fmt::{Display, Formatter};

/// Object types stored in `search_index.object_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
	Crm,
	Pmo,
	Training,
	Purchase,
}
impl EntityType {
	pub const ALL: [Self; 4] = [Self::Crm, Self::Pmo, Self::Training, Self::Purchase];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Crm => "CRM",
			Self::Pmo => "PMO",
			Self::Training => "Training",
			Self::Purchase => "Purchase",
		}
	}

	/// Resolves a canonical name or a source-language synonym, case-insensitively.
	pub fn from_term(term: &str) -> Option<Self> {
		let term = term.trim().to_lowercase();

		ENTITY_TERMS.iter().find(|(synonym, _)| *synonym == term).map(|(_, entity)| *entity)
	}
}
impl Display for EntityType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

const ENTITY_TERMS: &[(&str, EntityType)] = &[
	("crm", EntityType::Crm),
	("customer", EntityType::Crm),
	("customers", EntityType::Crm),
	("pelanggan", EntityType::Crm),
	("klien", EntityType::Crm),
	("client", EntityType::Crm),
	("pmo", EntityType::Pmo),
	("project", EntityType::Pmo),
	("projects", EntityType::Pmo),
	("proyek", EntityType::Pmo),
	("konstruksi", EntityType::Pmo),
	("training", EntityType::Training),
	("trainings", EntityType::Training),
	("pelatihan", EntityType::Training),
	("kursus", EntityType::Training),
	("purchase", EntityType::Purchase),
	("purchases", EntityType::Purchase),
	("pembelian", EntityType::Purchase),
	("beli", EntityType::Purchase),
];

/// Statuses the index is known to carry. Listed for the extraction prompt.
pub const STATUSES: &[&str] = &[
	"Pending",
	"Approved",
	"In Progress",
	"In Planning",
	"Completed",
	"New",
	"Qualified",
	"Won",
	"Proposal",
	"Negotiation",
	"active",
	"prospect",
	"In Review",
];

/// Departments the index is known to carry. Listed for the extraction prompt.
pub const DEPARTMENTS: &[&str] = &["Sales", "IT", "HR", "PMO", "Finance", "Procurement", "Facilities"];

const STATUS_SYNONYMS: &[(&str, &str)] = &[
	("selesai", "completed"),
	("tertunda", "pending"),
	("ditolak", "rejected"),
	("berjalan", "progress"),
	("disetujui", "approved"),
];

/// Maps a status synonym to its canonical English term; anything else is returned trimmed.
pub fn canonical_status(value: &str) -> String {
	let trimmed = value.trim();
	let lowered = trimmed.to_lowercase();

	STATUS_SYNONYMS
		.iter()
		.find(|(synonym, _)| *synonym == lowered)
		.map(|(_, canonical)| canonical.to_string())
		.unwrap_or_else(|| trimmed.to_string())
}

/// True when `term` resolves to the same canonical status as `status`, ignoring case.
pub fn is_same_status(term: &str, status: &str) -> bool {
	canonical_status(term).to_lowercase() == canonical_status(status).to_lowercase()
}

/// Rendered vocabulary and translation rules for the extraction prompt.
pub fn prompt_vocabulary() -> String {
	let entities: Vec<&str> = EntityType::ALL.iter().map(|entity| entity.as_str()).collect();
	let mut out = String::new();

	out.push_str(&format!("Available entity types: {}\n", entities.join(", ")));
	out.push_str(&format!("Available statuses: {}\n", STATUSES.join(", ")));
	out.push_str(&format!("Available departments: {}\n", DEPARTMENTS.join(", ")));
	out.push_str("Entity type synonyms:");

	for entity in EntityType::ALL {
		let synonyms: Vec<&str> = ENTITY_TERMS
			.iter()
			.filter(|(_, candidate)| *candidate == entity)
			.map(|(synonym, _)| *synonym)
			.collect();

		out.push_str(&format!(" {} → {};", synonyms.join("/"), entity.as_str()));
	}

	out.push_str("\nStatus synonyms:");

	for (synonym, canonical) in STATUS_SYNONYMS {
		out.push_str(&format!(" {synonym} → {canonical};"));
	}

	out.push('\n');

	out
}
