/// Boolean AND operator of the backend's full-text query syntax.
pub const QUERY_AND_SEPARATOR: &str = " & ";

/// Normalizes a free-text query into the backend's boolean full-text syntax:
/// lowercase, every character that is not a letter, digit, or whitespace
/// becomes a space, and the resulting tokens are joined with the AND operator.
/// All-punctuation input yields the empty string; the backend's response to an
/// empty query is passed through unmodified.
pub fn normalize_query(raw: &str) -> String {
	let mut normalized = String::with_capacity(raw.len());

	for ch in raw.chars() {
		if ch.is_alphanumeric() {
			normalized.extend(ch.to_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	normalized.split_whitespace().collect::<Vec<_>>().join(QUERY_AND_SEPARATOR)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_punctuation_and_joins_with_and() {
		assert_eq!(normalize_query("Funny Cat!! meme??"), "funny & cat & meme");
	}

	#[test]
	fn all_punctuation_yields_empty_query() {
		assert_eq!(normalize_query("???"), "");
	}

	#[test]
	fn collapses_runs_of_separators() {
		assert_eq!(normalize_query("  a -- b  "), "a & b");
	}

	#[test]
	fn keeps_digits() {
		assert_eq!(normalize_query("top 10 frogs"), "top & 10 & frogs");
	}
}
