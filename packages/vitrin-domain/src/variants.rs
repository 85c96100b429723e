//! Query-variant generation for recall widening.
//!
//! A raw query is expanded into alternate spellings that compensate for a
//! keyboard left in the wrong layout and for queries typed in the other
//! script. All transforms are deterministic character-table substitutions.

/// Latin QWERTY key → Cyrillic ЙЦУКЕН key on the same physical position.
const LAYOUT_PAIRS: [(char, char); 33] = [
	('q', 'й'),
	('w', 'ц'),
	('e', 'у'),
	('r', 'к'),
	('t', 'е'),
	('y', 'н'),
	('u', 'г'),
	('i', 'ш'),
	('o', 'щ'),
	('p', 'з'),
	('[', 'х'),
	(']', 'ъ'),
	('a', 'ф'),
	('s', 'ы'),
	('d', 'в'),
	('f', 'а'),
	('g', 'п'),
	('h', 'р'),
	('j', 'о'),
	('k', 'л'),
	('l', 'д'),
	(';', 'ж'),
	('\'', 'э'),
	('z', 'я'),
	('x', 'ч'),
	('c', 'с'),
	('v', 'м'),
	('b', 'и'),
	('n', 'т'),
	('m', 'ь'),
	(',', 'б'),
	('.', 'ю'),
	('`', 'ё'),
];

/// Cyrillic → Latin phonetic table. Multi-character outputs are allowed;
/// hard and soft signs drop out entirely.
const TRANSLIT: [(char, &str); 33] = [
	('а', "a"),
	('б', "b"),
	('в', "v"),
	('г', "g"),
	('д', "d"),
	('е', "e"),
	('ё', "e"),
	('ж', "zh"),
	('з', "z"),
	('и', "i"),
	('й', "y"),
	('к', "k"),
	('л', "l"),
	('м', "m"),
	('н', "n"),
	('о', "o"),
	('п', "p"),
	('р', "r"),
	('с', "s"),
	('т', "t"),
	('у', "u"),
	('ф', "f"),
	('х', "h"),
	('ц', "ts"),
	('ч', "ch"),
	('ш', "sh"),
	('щ', "shch"),
	('ъ', ""),
	('ы', "y"),
	('ь', ""),
	('э', "e"),
	('ю', "yu"),
	('я', "ya"),
];

/// Latin → Cyrillic reverse table. Lossy: several Latin letters collapse
/// onto one Cyrillic letter (`h`/`x`, `y`, `c`).
const REVERSE_TRANSLIT: [(char, &str); 26] = [
	('a', "а"),
	('b', "б"),
	('c', "ц"),
	('d', "д"),
	('e', "е"),
	('f', "ф"),
	('g', "г"),
	('h', "х"),
	('i', "и"),
	('j', "ж"),
	('k', "к"),
	('l', "л"),
	('m', "м"),
	('n', "н"),
	('o', "о"),
	('p', "п"),
	('q', "к"),
	('r', "р"),
	('s', "с"),
	('t', "т"),
	('u', "у"),
	('v', "в"),
	('w', "в"),
	('x', "кс"),
	('y', "ы"),
	('z', "з"),
];

/// Expands a query into alternate spellings. The original query is always
/// the first element; each transform's output is appended only when it
/// differs from everything already collected (exact, case-sensitive
/// comparison). Deterministic: same input, same sequence.
pub fn generate(query: &str) -> Vec<String> {
	let mut variants = vec![query.to_string()];

	for candidate in [
		layout_swap(query),
		transliterate(query),
		reverse_transliterate(query),
		stripped(query),
	] {
		if !variants.contains(&candidate) {
			variants.push(candidate);
		}
	}

	variants
}

/// Re-types the query as if the keyboard had been in the other layout.
/// Applies Latin→Cyrillic first; when that changes nothing, tries the
/// reverse direction.
fn layout_swap(query: &str) -> String {
	let forward = swap_chars(query, |ch| {
		LAYOUT_PAIRS.iter().find(|(latin, _)| *latin == ch).map(|(_, cyr)| *cyr)
	});

	if forward != query {
		return forward;
	}

	swap_chars(query, |ch| {
		LAYOUT_PAIRS.iter().find(|(_, cyr)| *cyr == ch).map(|(latin, _)| *latin)
	})
}

fn swap_chars(query: &str, lookup: impl Fn(char) -> Option<char>) -> String {
	let mut out = String::with_capacity(query.len());

	for ch in query.chars() {
		let lower = ch.to_lowercase().next().unwrap_or(ch);

		match lookup(lower) {
			Some(mapped) if ch.is_uppercase() => out.extend(mapped.to_uppercase()),
			Some(mapped) => out.push(mapped),
			None => out.push(ch),
		}
	}

	out
}

fn transliterate(query: &str) -> String {
	let mut out = String::with_capacity(query.len());

	for ch in query.to_lowercase().chars() {
		match TRANSLIT.iter().find(|(cyr, _)| *cyr == ch) {
			Some((_, latin)) => out.push_str(latin),
			None => out.push(ch),
		}
	}

	out
}

fn reverse_transliterate(query: &str) -> String {
	let mut out = String::with_capacity(query.len());

	for ch in query.to_lowercase().chars() {
		match REVERSE_TRANSLIT.iter().find(|(latin, _)| *latin == ch) {
			Some((_, cyr)) => out.push_str(cyr),
			None => out.push(ch),
		}
	}

	out
}

/// Drops everything outside the ASCII-alphanumeric + Cyrillic + space
/// allow-list.
fn stripped(query: &str) -> String {
	query
		.chars()
		.filter(|ch| {
			ch.is_ascii_alphanumeric()
				|| ('а'..='я').contains(ch)
				|| ('А'..='Я').contains(ch)
				|| *ch == 'ё' || *ch == 'Ё'
				|| *ch == ' '
		})
		.collect()
}
