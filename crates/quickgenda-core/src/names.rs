//! Chairperson name normalization for image lookup.
//!
//! A raw chairperson token looks like `"Prof. Dr. John Smith|CEO"`: the
//! part before the first `|` is the name, the rest is a role. Titles are
//! stripped and the clean name is expanded into filename variants so that
//! `john_smith.jpg`, `John-Smith.png` and `JOHN SMITH.tif` all match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Prefix titles, most specific first. Each is applied once, in order.
static PREFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^Prof\.?\s+Dr\.?\s+Med\.?\s+",
        r"(?i)^Prof\.?\s+Dr\.?\s+",
        r"(?i)^Assoc\.?\s+Prof\.?\s+",
        r"(?i)^Associate\s+Prof\.?\s+",
        r"(?i)^Prof\.?\s+",
        r"(?i)^Dr\.?\s+",
        r"(?i)^Mr\.?\s+",
        r"(?i)^Mrs\.?\s+",
        r"(?i)^Ms\.?\s+",
        r"(?i)^Miss\.?\s+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid prefix pattern"))
    .collect()
});

static SUFFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)\s+MD\.?$", r"(?i)\s+Ph\.?D\.?$", r"(?i)\s+M\.?D\.?$"]
        .iter()
        .map(|p| Regex::new(p).expect("valid suffix pattern"))
        .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid pattern"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\S*").expect("valid pattern"));

/// Name part of a raw chairperson token, without titles.
///
/// ```rust
/// use quickgenda_core::names::extract_clean_name;
///
/// assert_eq!(extract_clean_name("Prof. Dr. Med. Jane Doe|Chair"), "Jane Doe");
/// ```
pub fn extract_clean_name(raw: &str) -> String {
    let name_only = raw.split('|').next().unwrap_or_default();
    strip_titles(name_only.trim())
}

/// Remove academic and professional prefixes and medical suffixes.
pub fn strip_titles(name: &str) -> String {
    let mut clean = name.to_string();
    for pattern in PREFIX_PATTERNS.iter() {
        clean = pattern.replace(&clean, "").into_owned();
    }
    for pattern in SUFFIX_PATTERNS.iter() {
        clean = pattern.replace(&clean, "").into_owned();
    }
    clean.trim().to_string()
}

/// Capitalize the first character of every word, lowercase the rest.
pub fn title_case(name: &str) -> String {
    WORD.replace_all(name, |caps: &Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        let mut out = String::with_capacity(word.len());
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
        out
    })
    .into_owned()
}

/// Deduplicated filename stems for an avatar image, in search order.
pub fn name_variants(clean_name: &str) -> Vec<String> {
    if clean_name.is_empty() {
        return Vec::new();
    }

    let lower = clean_name.to_lowercase();
    let titled = title_case(clean_name);

    let candidates = [
        clean_name.to_string(),
        lower.clone(),
        clean_name.to_uppercase(),
        WHITESPACE.replace_all(&lower, "").into_owned(),
        WHITESPACE.replace_all(&lower, "_").into_owned(),
        WHITESPACE.replace_all(&lower, "-").into_owned(),
        titled.clone(),
        WHITESPACE.replace_all(&titled, "_").into_owned(),
        WHITESPACE.replace_all(&titled, "-").into_owned(),
    ];

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Filename stems for a flag image: twelve combinations per name variant.
pub fn flag_variants(clean_name: &str) -> Vec<String> {
    name_variants(clean_name)
        .iter()
        .flat_map(|name| {
            [
                format!("flag-{name}"),
                format!("{name}-flag"),
                format!("flag_{name}"),
                format!("{name}_flag"),
                format!("flag{name}"),
                format!("{name}flag"),
                format!("flag {name}"),
                format!("{name} flag"),
                format!("Flag {name}"),
                format!("{name} Flag"),
                format!("FLAG {name}"),
                format!("{name} FLAG"),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        assert_eq!(extract_clean_name("Prof. Dr. Med. Jane Doe"), "Jane Doe");
        assert_eq!(extract_clean_name("Prof. Dr. Jane Doe"), "Jane Doe");
        assert_eq!(extract_clean_name("Prof Jane Doe"), "Jane Doe");
        assert_eq!(extract_clean_name("Assoc. Prof. Lee Park"), "Lee Park");
        assert_eq!(extract_clean_name("Associate Prof. Lee Park"), "Lee Park");
    }

    #[test]
    fn test_prefixes_are_case_insensitive() {
        assert_eq!(extract_clean_name("dr. ann smith"), "ann smith");
        assert_eq!(extract_clean_name("MRS Ann Smith"), "Ann Smith");
        assert_eq!(extract_clean_name("Miss. Ann Smith"), "Ann Smith");
    }

    #[test]
    fn test_prefix_needs_trailing_whitespace() {
        assert_eq!(extract_clean_name("Drake Bell"), "Drake Bell");
        assert_eq!(extract_clean_name("Msiska Phiri"), "Msiska Phiri");
    }

    #[test]
    fn test_prefix_then_delimiter_keeps_prefix() {
        assert_eq!(extract_clean_name("Dr. |Chair"), "Dr.");
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(extract_clean_name("John Smith MD"), "John Smith");
        assert_eq!(extract_clean_name("John Smith PhD"), "John Smith");
        assert_eq!(extract_clean_name("John Smith Ph.D."), "John Smith");
        assert_eq!(extract_clean_name("Dr. John Smith M.D."), "John Smith");
    }

    #[test]
    fn test_role_suffix_is_dropped() {
        assert_eq!(extract_clean_name("Dr. A|CEO"), "A");
        assert_eq!(extract_clean_name("  Dr. B  | CTO | Board"), "B");
        assert_eq!(extract_clean_name(""), "");
    }

    #[test]
    fn test_double_pipe_versus_single_pipe() {
        let tokens = crate::text::split_chairs("Dr. A|CEO||Dr. B|CTO");
        assert_eq!(tokens, vec!["Dr. A|CEO", "Dr. B|CTO"]);
        let names: Vec<String> = tokens.iter().map(|t| extract_clean_name(t)).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jANE o'NEIL"), "Jane O'neil");
        assert_eq!(title_case("anna-maria  lopez"), "Anna-maria  Lopez");
    }

    #[test]
    fn test_name_variants_order_and_dedup() {
        let v = name_variants("Jane Doe");
        assert_eq!(
            v,
            vec![
                "Jane Doe",
                "jane doe",
                "JANE DOE",
                "janedoe",
                "jane_doe",
                "jane-doe",
                "Jane_Doe",
                "Jane-Doe",
            ]
        );
    }

    #[test]
    fn test_name_variants_single_lowercase_word() {
        let v = name_variants("madonna");
        assert_eq!(v, vec!["madonna", "MADONNA", "Madonna"]);
        assert!(name_variants("").is_empty());
    }

    #[test]
    fn test_flag_variants() {
        let flags = flag_variants("madonna");
        assert_eq!(flags.len(), 3 * 12);
        assert_eq!(flags[0], "flag-madonna");
        assert_eq!(flags[1], "madonna-flag");
        assert_eq!(flags[6], "flag madonna");
        assert_eq!(flags[11], "madonna FLAG");
        assert!(flags.contains(&"Flag Madonna".to_string()));
    }
}
