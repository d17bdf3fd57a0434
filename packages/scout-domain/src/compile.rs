use regex::Regex;

use crate::intent::SearchIntent;

/// Value bound to one `$n` placeholder of a [`CompiledPredicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
	Text(String),
	TextList(Vec<String>),
	Integer(i64),
}

/// Conjunction of SQL clause fragments over `search_index` with their bound values.
///
/// Fragments reference values only through `$1..$n`, numbered in `params` order. User or model
/// text never appears in a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPredicate {
	clauses: Vec<String>,
	params: Vec<BoundValue>,
}
impl CompiledPredicate {
	pub fn clauses(&self) -> &[String] {
		&self.clauses
	}

	pub fn params(&self) -> &[BoundValue] {
		&self.params
	}

	pub fn is_match_all(&self) -> bool {
		self.clauses.is_empty()
	}

	/// `WHERE` body; `TRUE` when no clause applies.
	pub fn where_sql(&self) -> String {
		if self.clauses.is_empty() {
			return "TRUE".to_string();
		}

		self.clauses.join(" AND ")
	}

	/// Number of the next free placeholder, for callers appending their own parameters.
	pub fn next_placeholder(&self) -> usize {
		self.params.len() + 1
	}

	fn bind(&mut self, value: BoundValue) -> String {
		self.params.push(value);

		format!("${}", self.params.len())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
	Lt,
	Le,
	Gt,
	Ge,
	Eq,
}
impl Comparator {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Lt => "<",
			Self::Le => "<=",
			Self::Gt => ">",
			Self::Ge => ">=",
			Self::Eq => "=",
		}
	}

	fn parse(token: &str) -> Option<Self> {
		match token {
			"<" => Some(Self::Lt),
			"<=" => Some(Self::Le),
			">" => Some(Self::Gt),
			">=" => Some(Self::Ge),
			"=" => Some(Self::Eq),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFilter {
	pub comparator: Comparator,
	pub operand: i64,
}

/// Parses a leading comparator token followed by an integer, e.g. `">= 5000000"`.
///
/// Anything else (`"about 5000"`, `"=>10"`, an operand that overflows `i64`) yields `None`.
/// Text after the integer is ignored.
pub fn parse_amount_filter(expr: &str) -> Option<AmountFilter> {
	let re = Regex::new(r"^\s*([<>=]+)\s*(\d+)").ok()?;
	let captures = re.captures(expr)?;
	let comparator = Comparator::parse(captures.get(1)?.as_str())?;
	let operand = captures.get(2)?.as_str().parse().ok()?;

	Some(AmountFilter { comparator, operand })
}

/// Compiles an intent into a parameterized predicate. Pure; the same intent always yields the
/// same clauses and parameters.
pub fn compile(intent: &SearchIntent) -> CompiledPredicate {
	let mut predicate = CompiledPredicate::default();
	let entity_types = entity_types(intent);

	match entity_types.as_slice() {
		[] => {},
		[only] => {
			let placeholder = predicate.bind(BoundValue::Text(only.clone()));

			predicate.clauses.push(format!("object_type = {placeholder}"));
		},
		_ => {
			let placeholder = predicate.bind(BoundValue::TextList(entity_types));

			predicate.clauses.push(format!("object_type = ANY({placeholder})"));
		},
	}

	for (column, value) in [
		("status", &intent.status_filter),
		("department", &intent.department_filter),
		("owner_name", &intent.owner_filter),
	] {
		if let Some(value) = value.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
			let placeholder = predicate.bind(BoundValue::Text(contains_pattern(value)));

			predicate.clauses.push(format!("{column} ILIKE {placeholder}"));
		}
	}

	if let Some(filter) = intent.amount_filter.as_deref().and_then(parse_amount_filter) {
		let placeholder = predicate.bind(BoundValue::Integer(filter.operand));

		predicate.clauses.push(format!("amount {} {placeholder}", filter.comparator.as_sql()));
	}

	for keyword in &intent.keywords {
		let keyword = keyword.trim();

		if keyword.is_empty() {
			continue;
		}

		let placeholder = predicate.bind(BoundValue::Text(contains_pattern(keyword)));

		predicate.clauses.push(format!(
			"(title ILIKE {placeholder} OR description ILIKE {placeholder} OR search_text ILIKE {placeholder})"
		));
	}

	predicate
}

fn entity_types(intent: &SearchIntent) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for value in intent.entity_types.iter().chain(intent.entity_type.iter()) {
		let value = value.trim();

		if !value.is_empty() && !out.iter().any(|existing| existing == value) {
			out.push(value.to_string());
		}
	}

	out
}

/// `%value%` with LIKE metacharacters escaped, so the value matches literally.
fn contains_pattern(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);

	out.push('%');

	for ch in value.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn placeholders(predicate: &CompiledPredicate) -> Vec<usize> {
		let re = Regex::new(r"\$(\d+)").expect("placeholder regex");
		let mut found: Vec<usize> = predicate
			.clauses()
			.iter()
			.flat_map(|clause| {
				re.captures_iter(clause)
					.map(|captures| captures[1].parse::<usize>().expect("placeholder index"))
					.collect::<Vec<_>>()
			})
			.collect();

		found.sort_unstable();
		found.dedup();

		found
	}

	#[test]
	fn empty_intent_matches_all() {
		let predicate = compile(&SearchIntent::default());

		assert!(predicate.is_match_all());
		assert_eq!(predicate.where_sql(), "TRUE");
		assert_eq!(predicate.next_placeholder(), 1);
	}

	#[test]
	fn each_filter_contributes_one_clause() {
		let intent = SearchIntent {
			entity_types: vec!["Purchase".to_string()],
			status_filter: Some("pending".to_string()),
			department_filter: Some("IT".to_string()),
			owner_filter: Some("Budi".to_string()),
			amount_filter: Some(">1000000".to_string()),
			keywords: vec!["laptop".to_string()],
			..Default::default()
		};
		let predicate = compile(&intent);

		assert_eq!(
			predicate.clauses(),
			[
				"object_type = $1",
				"status ILIKE $2",
				"department ILIKE $3",
				"owner_name ILIKE $4",
				"amount > $5",
				"(title ILIKE $6 OR description ILIKE $6 OR search_text ILIKE $6)",
			]
		);
		assert_eq!(
			predicate.params(),
			[
				BoundValue::Text("Purchase".to_string()),
				BoundValue::Text("%pending%".to_string()),
				BoundValue::Text("%IT%".to_string()),
				BoundValue::Text("%Budi%".to_string()),
				BoundValue::Integer(1_000_000),
				BoundValue::Text("%laptop%".to_string()),
			]
		);
	}

	#[test]
	fn several_entity_types_use_set_membership() {
		let intent = SearchIntent {
			entity_types: vec!["CRM".to_string(), "PMO".to_string()],
			..Default::default()
		};
		let predicate = compile(&intent);

		assert_eq!(predicate.clauses(), ["object_type = ANY($1)"]);
		assert_eq!(
			predicate.params(),
			[BoundValue::TextList(vec!["CRM".to_string(), "PMO".to_string()])]
		);
	}

	#[test]
	fn keywords_are_anded_across_groups() {
		let intent = SearchIntent {
			keywords: vec!["office".to_string(), "equipment".to_string()],
			..Default::default()
		};
		let predicate = compile(&intent);

		assert_eq!(
			predicate.where_sql(),
			"(title ILIKE $1 OR description ILIKE $1 OR search_text ILIKE $1) AND \
			 (title ILIKE $2 OR description ILIKE $2 OR search_text ILIKE $2)"
		);
	}

	#[test]
	fn compile_is_deterministic() {
		let intent = SearchIntent {
			entity_types: vec!["Training".to_string(), "Purchase".to_string()],
			status_filter: Some("approved".to_string()),
			amount_filter: Some("<=250000".to_string()),
			keywords: vec!["aws".to_string(), "cloud".to_string()],
			..Default::default()
		};

		assert_eq!(compile(&intent), compile(&intent));
	}

	#[test]
	fn placeholder_count_matches_params() {
		let intent = SearchIntent {
			entity_types: vec!["CRM".to_string(), "PMO".to_string()],
			status_filter: Some("won".to_string()),
			owner_filter: Some("Jane".to_string()),
			amount_filter: Some(">= 10".to_string()),
			keywords: vec!["cloud".to_string(), "aws".to_string(), "bank".to_string()],
			..Default::default()
		};
		let predicate = compile(&intent);
		let found = placeholders(&predicate);

		assert_eq!(found, (1..=predicate.params().len()).collect::<Vec<_>>());
		assert_eq!(predicate.next_placeholder(), predicate.params().len() + 1);
	}

	#[test]
	fn unparseable_amount_emits_no_clause() {
		for expr in ["about 5000", "5000", "=>10", "<", "> lots", "<99999999999999999999"] {
			let intent = SearchIntent { amount_filter: Some(expr.to_string()), ..Default::default() };
			let predicate = compile(&intent);

			assert!(predicate.is_match_all(), "expected no clause for {expr:?}");
		}
	}

	#[test]
	fn parses_every_comparator() {
		for (expr, comparator, operand) in [
			("<8000000", Comparator::Lt, 8_000_000),
			("<= 5", Comparator::Le, 5),
			(">1", Comparator::Gt, 1),
			(" >=  42 IDR", Comparator::Ge, 42),
			("=0", Comparator::Eq, 0),
		] {
			assert_eq!(parse_amount_filter(expr), Some(AmountFilter { comparator, operand }));
		}
	}

	#[test]
	fn like_metacharacters_are_escaped() {
		let intent = SearchIntent { keywords: vec!["100%_off\\".to_string()], ..Default::default() };
		let predicate = compile(&intent);

		assert_eq!(predicate.params(), [BoundValue::Text("%100\\%\\_off\\\\%".to_string())]);
	}

	#[test]
	fn hostile_text_stays_out_of_sql() {
		let hostile = "x' OR 1=1; DROP TABLE search_index; --";
		let intent = SearchIntent {
			status_filter: Some(hostile.to_string()),
			keywords: vec![hostile.to_string()],
			..Default::default()
		};
		let predicate = compile(&intent);

		assert!(!predicate.where_sql().contains("DROP"));
		assert_eq!(predicate.params().len(), 2);
	}
}
