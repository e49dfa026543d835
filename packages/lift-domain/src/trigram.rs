//! Trigram similarity with `pg_trgm` semantics.
//!
//! Words are maximal runs of alphanumeric characters, lower-cased, padded with two leading
//! blanks and one trailing blank. Similarity is the Jaccard index of the two trigram sets.

use std::collections::BTreeSet;

pub fn trigrams(text: &str) -> BTreeSet<[char; 3]> {
	let mut out = BTreeSet::new();

	for word in text.split(|ch: char| !ch.is_alphanumeric()).filter(|word| !word.is_empty()) {
		let padded: Vec<char> = [' ', ' ']
			.into_iter()
			.chain(word.chars().flat_map(char::to_lowercase))
			.chain([' '])
			.collect();

		for window in padded.windows(3) {
			out.insert([window[0], window[1], window[2]]);
		}
	}

	out
}

/// Returns a score in `[0, 1]`; zero when either side has no words.
pub fn similarity(left: &str, right: &str) -> f32 {
	let left = trigrams(left);
	let right = trigrams(right);

	if left.is_empty() || right.is_empty() {
		return 0.0;
	}

	let shared = left.intersection(&right).count();
	let union = left.len() + right.len() - shared;

	shared as f32 / union as f32
}

/// Best of the name and description scores, as used by the fuzzy fallback.
pub fn best_field_similarity(query: &str, name: &str, description: Option<&str>) -> f32 {
	let name_score = similarity(name, query);
	let description_score = description.map_or(0.0, |text| similarity(text, query));

	name_score.max(description_score)
}

#[cfg(test)]
mod tests {
	use super::trigrams;

	#[test]
	fn short_words_are_padded() {
		let grams = trigrams("a");

		assert_eq!(grams.len(), 2);
		assert!(grams.contains(&[' ', ' ', 'a']));
		assert!(grams.contains(&[' ', 'a', ' ']));
	}

	#[test]
	fn punctuation_splits_words() {
		assert_eq!(trigrams("push-up"), trigrams("push up"));
	}
}
