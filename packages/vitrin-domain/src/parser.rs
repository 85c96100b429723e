//! Query segmentation.
//!
//! Splits a raw query into quoted exact phrases, numeric-with-unit tokens,
//! alphanumeric code tokens and plain words. The resulting [`QueryPlan`] is
//! immutable and deduplicated per category; token order is not significant.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

static QUOTED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("quoted-phrase regex is valid"));
// Digits, optional decimal fraction, optional trailing unit letters from
// either script ("500мл", "1.5l", "3,5 кг").
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\d+([.,]\d+)?\s*[a-zA-Zа-яА-ЯёЁ]*$").expect("numeric-token regex is valid")
});
static CODE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("code-token regex is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
	pub original: String,
	pub exact_phrases: HashSet<String>,
	pub numeric_tokens: HashSet<String>,
	pub code_tokens: HashSet<String>,
	pub plain_words: HashSet<String>,
	pub normalized: String,
}

impl QueryPlan {
	pub fn is_empty(&self) -> bool {
		self.exact_phrases.is_empty() && self.normalized.is_empty()
	}
}

pub fn parse(query: &str) -> QueryPlan {
	let mut plan = QueryPlan { original: query.to_string(), ..QueryPlan::default() };

	// Quoted phrases come out first and are never re-tokenized.
	let mut working = query.to_string();
	for capture in QUOTED.captures_iter(query) {
		let phrase = capture[1].trim();
		if !phrase.is_empty() {
			plan.exact_phrases.insert(phrase.to_string());
		}
	}
	working = QUOTED.replace_all(&working, " ").into_owned();

	plan.normalized = working.split_whitespace().collect::<Vec<_>>().join(" ");

	let normalized = plan.normalized.clone();
	for token in normalized
		.split(|ch: char| ch.is_whitespace() || matches!(ch, '-' | '_' | ',' | ';' | '.'))
		.filter(|token| !token.is_empty())
	{
		classify(token, &mut plan);
	}

	plan
}

/// Priority order matters: numeric beats code beats plain word.
fn classify(token: &str, plan: &mut QueryPlan) {
	if NUMERIC.is_match(token) {
		plan.numeric_tokens.insert(token.to_string());
	} else if token.len() >= 3
		&& CODE.is_match(token)
		&& token.chars().any(|ch| ch.is_ascii_digit())
	{
		plan.code_tokens.insert(token.to_string());
	} else {
		plan.plain_words.insert(token.to_string());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_input_yields_empty_plan() {
		let plan = parse("");
		assert!(plan.exact_phrases.is_empty());
		assert!(plan.numeric_tokens.is_empty());
		assert!(plan.code_tokens.is_empty());
		assert!(plan.plain_words.is_empty());
		assert_eq!(plan.normalized, "");
		assert!(plan.is_empty());
	}

	#[test]
	fn quoted_phrases_are_extracted_and_not_retokenized() {
		let plan = parse(r#"молоко "деревенское 3.2%" свежее"#);
		assert!(plan.exact_phrases.contains("деревенское 3.2%"));
		assert!(plan.plain_words.contains("молоко"));
		assert!(plan.plain_words.contains("свежее"));
		// Nothing from inside the quotes leaks into the token categories.
		assert!(!plan.plain_words.contains("деревенское"));
		assert!(plan.numeric_tokens.is_empty());
	}

	#[test]
	fn whitespace_runs_collapse_in_normalized() {
		let plan = parse("  молоко    свежее ");
		assert_eq!(plan.normalized, "молоко свежее");
	}

	#[test]
	fn numeric_tokens_capture_units_from_both_scripts() {
		let plan = parse("вода 500мл 1l");
		assert!(plan.numeric_tokens.contains("500мл"));
		assert!(plan.numeric_tokens.contains("1l"));
		assert!(plan.plain_words.contains("вода"));
	}

	#[test]
	fn code_tokens_need_a_digit_and_min_length() {
		let plan = parse("abc123 ab1 xyz");
		assert!(plan.code_tokens.contains("abc123"));
		assert!(plan.code_tokens.contains("ab1"));
		assert!(plan.plain_words.contains("xyz"));
	}

	#[test]
	fn separators_split_without_empty_tokens() {
		let plan = parse("a--b__c,,d;;e");
		for word in ["a", "b", "c", "d", "e"] {
			assert!(plan.plain_words.contains(word), "missing {word}");
		}
		assert_eq!(plan.plain_words.len(), 5);
	}

	#[test]
	fn categories_partition_tokens() {
		let plan = parse("сок 200г sku42 яблочный");
		let total =
			plan.numeric_tokens.len() + plan.code_tokens.len() + plan.plain_words.len();
		assert_eq!(total, 4);
		assert!(plan.numeric_tokens.contains("200г"));
		assert!(plan.code_tokens.contains("sku42"));
	}

	#[test]
	fn duplicate_tokens_collapse() {
		let plan = parse("молоко молоко молоко");
		assert_eq!(plan.plain_words.len(), 1);
	}

	#[test]
	fn pure_number_is_numeric() {
		let plan = parse("123");
		assert!(plan.numeric_tokens.contains("123"));
		assert!(plan.code_tokens.is_empty());
	}
}
