//! Weighted lexical index with "plain" query semantics.
//!
//! Mirrors what PostgreSQL does with `setweight(to_tsvector(..))` and `plainto_tsquery(..)`:
//! text is normalized, split into words, stop-words are dropped and the rest is stemmed. Every
//! query term must be present for a document to match. The in-process rank is an approximation
//! of `ts_rank`, bounded to `[0, 1]`.

use std::collections::{BTreeMap, HashSet};

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use lift_config::LexicalWeights;

const STOP_WORDS: &[&str] = &[
	"a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
	"as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
	"by", "can", "did", "do", "does", "doing", "don", "down", "during", "each", "few", "for",
	"from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
	"him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
	"me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
	"only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
	"should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
	"themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
	"under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
	"who", "whom", "why", "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

/// Weight tier of a lexical token, highest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
	/// Workout name.
	A,
	/// Description.
	B,
	/// Secondary-muscle list.
	C,
	/// Target, body part and equipment combined.
	D,
}
impl Tier {
	pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

	pub fn weight(self, weights: &LexicalWeights) -> f32 {
		match self {
			Self::A => weights.a,
			Self::B => weights.b,
			Self::C => weights.c,
			Self::D => weights.d,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::A => "A",
			Self::B => "B",
			Self::C => "C",
			Self::D => "D",
		}
	}
}

/// Source text of one workout, already split into tiers.
///
/// This is the input of the indexing step that runs on every workout write. The Postgres store
/// feeds the four strings to `setweight(to_tsvector(..))`; the memory store builds a
/// [`LexicalIndex`] from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexicalDocument {
	pub name: String,
	pub description: String,
	pub muscles: String,
	pub categorical: String,
}
impl LexicalDocument {
	pub fn from_fields(
		name: &str,
		description: Option<&str>,
		secondary_muscles: &[String],
		target: Option<&str>,
		body_part: Option<&str>,
		equipment: Option<&str>,
	) -> Self {
		let categorical = [target, body_part, equipment]
			.into_iter()
			.map(|value| value.unwrap_or(""))
			.collect::<Vec<_>>()
			.join(" ");

		Self {
			name: name.to_string(),
			description: description.unwrap_or("").to_string(),
			muscles: secondary_muscles.join(" "),
			categorical,
		}
	}

	pub fn tier_text(&self, tier: Tier) -> &str {
		match tier {
			Tier::A => &self.name,
			Tier::B => &self.description,
			Tier::C => &self.muscles,
			Tier::D => &self.categorical,
		}
	}
}

/// Parsed "plain" query: stemmed, stop-word free, de-duplicated terms that are ANDed together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlainQuery {
	terms: Vec<String>,
}
impl PlainQuery {
	pub fn parse(query: &str) -> Self {
		let mut seen = HashSet::new();
		let terms = tokenize(query).into_iter().filter(|term| seen.insert(term.clone())).collect();

		Self { terms }
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	/// A query made only of stop-words or punctuation has no terms and matches nothing.
	pub fn is_empty(&self) -> bool {
		self.terms.is_empty()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LexicalIndex {
	terms: BTreeMap<String, Vec<Tier>>,
}
impl LexicalIndex {
	pub fn build(doc: &LexicalDocument) -> Self {
		let mut terms: BTreeMap<String, Vec<Tier>> = BTreeMap::new();

		for tier in Tier::ALL {
			for term in tokenize(doc.tier_text(tier)) {
				terms.entry(term).or_default().push(tier);
			}
		}

		Self { terms }
	}

	pub fn tiers_of(&self, term: &str) -> Option<&[Tier]> {
		self.terms.get(term).map(Vec::as_slice)
	}

	pub fn matches(&self, query: &PlainQuery) -> bool {
		!query.is_empty() && query.terms.iter().all(|term| self.terms.contains_key(term))
	}

	/// Mean over query terms of `1 - prod(1 - w)` across every occurrence of the term.
	pub fn rank(&self, query: &PlainQuery, weights: &LexicalWeights) -> f32 {
		if !self.matches(query) {
			return 0.0;
		}

		let total: f32 = query
			.terms
			.iter()
			.map(|term| {
				let miss = self.terms.get(term).map_or(1.0, |tiers| {
					tiers.iter().fold(1.0_f32, |acc, tier| acc * (1.0 - tier.weight(weights)))
				});

				1.0 - miss
			})
			.sum();

		total / query.terms.len() as f32
	}
}

pub fn is_stop_word(word: &str) -> bool {
	STOP_WORDS.binary_search(&word).is_ok()
}

pub fn tokenize(text: &str) -> Vec<String> {
	let normalized: String = text.nfkc().collect::<String>().to_lowercase();

	normalized
		.unicode_words()
		.filter(|word| !is_stop_word(word))
		.map(stem)
		.filter(|term| !term.is_empty())
		.collect()
}

/// Light English suffix stripping. Applied identically to documents and queries.
pub fn stem(word: &str) -> String {
	if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
		return word.to_string();
	}
	if let Some(base) = word.strip_suffix("ies") {
		return format!("{base}y");
	}
	if let Some(base) = word.strip_suffix("sses") {
		return format!("{base}ss");
	}

	for suffix in ["ches", "shes", "xes", "zes"] {
		if word.ends_with(suffix) {
			return word[..word.len() - 2].to_string();
		}
	}
	for suffix in ["ing", "ed"] {
		if let Some(base) = word.strip_suffix(suffix)
			&& base.chars().count() >= 3
		{
			return undouble(base);
		}
	}

	if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
	{
		return word[..word.len() - 1].to_string();
	}

	word.to_string()
}

fn undouble(base: &str) -> String {
	let mut chars = base.chars().rev();

	match (chars.next(), chars.next()) {
		(Some(last), Some(prev))
			if last == prev && !matches!(last, 'l' | 's' | 'z' | 'a' | 'e' | 'i' | 'o' | 'u') =>
			base[..base.len() - last.len_utf8()].to_string(),
		_ => base.to_string(),
	}
}
