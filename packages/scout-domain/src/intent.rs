use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::vocabulary::{self, EntityType};

/// Structured reading of a free-text query.
///
/// `entity_types` is the authoritative filter. `entity_type` is accepted on input for older
/// producers and, after [`SearchIntent::normalize`], mirrors `entity_types` when exactly one type
/// is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
	#[serde(default, deserialize_with = "null_as_default")]
	pub entity_type: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub entity_types: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub keywords: Vec<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub status_filter: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub department_filter: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub owner_filter: Option<String>,
	/// Comparator followed by an integer, e.g. `">1000000"`.
	#[serde(default, deserialize_with = "null_as_default")]
	pub amount_filter: Option<String>,
}
impl SearchIntent {
	/// Keyword-only intent used whenever the language model cannot answer.
	pub fn fallback(query: &str) -> Self {
		Self {
			keywords: query.to_lowercase().split_whitespace().map(str::to_string).collect(),
			..Default::default()
		}
	}

	/// Folds model output into the canonical shape.
	///
	/// Entity types resolve to canonical names (unknown ones are dropped), status synonyms map to
	/// their English term, blank filters become `None`, and keywords are NFKC-normalized,
	/// lowercased, and deduplicated. Stop words are removed, as are keywords that repeat a captured
	/// entity type or the captured status. Other vocabulary words stay as content keywords.
	pub fn normalize(self, stop_words: &[String]) -> Self {
		let mut entity_types: Vec<EntityType> = Vec::new();

		for raw in self.entity_type.iter().chain(self.entity_types.iter()) {
			if let Some(entity) = EntityType::from_term(raw)
				&& !entity_types.contains(&entity)
			{
				entity_types.push(entity);
			}
		}

		let status_filter =
			non_blank(self.status_filter).map(|status| vocabulary::canonical_status(&status));
		let mut keywords: Vec<String> = Vec::with_capacity(self.keywords.len());

		for raw in &self.keywords {
			let keyword = normalize_keyword(raw);

			if keyword.is_empty()
				|| keywords.contains(&keyword)
				|| stop_words.iter().any(|word| *word == keyword)
				|| EntityType::from_term(&keyword)
					.is_some_and(|entity| entity_types.contains(&entity))
				|| status_filter
					.as_deref()
					.is_some_and(|status| vocabulary::is_same_status(&keyword, status))
			{
				continue;
			}

			keywords.push(keyword);
		}

		let entity_type = match entity_types.as_slice() {
			[only] => Some(only.as_str().to_string()),
			_ => None,
		};

		Self {
			entity_type,
			entity_types: entity_types.iter().map(|entity| entity.as_str().to_string()).collect(),
			keywords,
			status_filter,
			department_filter: non_blank(self.department_filter),
			owner_filter: non_blank(self.owner_filter),
			amount_filter: non_blank(self.amount_filter),
		}
	}

	pub fn has_filters(&self) -> bool {
		!self.entity_types.is_empty()
			|| self.entity_type.is_some()
			|| self.status_filter.is_some()
			|| self.department_filter.is_some()
			|| self.owner_filter.is_some()
			|| self.amount_filter.is_some()
	}
}

fn normalize_keyword(raw: &str) -> String {
	raw.trim().nfkc().collect::<String>().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
