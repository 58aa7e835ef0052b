//! Text-to-value conversions for scraped fields.
//!
//! Every function here is total: malformed or missing input yields `None`,
//! never an error or a panic.

use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20|21)\d{2}").unwrap());
static RANK_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static BASED_ON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)based on\s+([\d,.]+)\s+user").unwrap());
static USER_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([\d,.]+)\s+user").unwrap());
static COMPACT_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*([KMB])").unwrap());

/// First year between 1900 and 2199 found anywhere in the text.
pub fn normalize_year(text: Option<&str>) -> Option<i32> {
    let text = text?;
    YEAR_RE
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses the trimmed text as a decimal number. A lone decimal comma is
/// accepted ("8,5").
pub fn normalize_rating(text: Option<&str>) -> Option<f64> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        trimmed.replace(',', ".").parse().ok()?
    } else {
        trimmed.parse().ok()?
    };
    value.is_finite().then_some(value)
}

/// Keeps only the digits of the text ("1,234,567 ratings" -> 1234567).
pub fn normalize_votes(text: Option<&str>) -> Option<u64> {
    let digits: String = text?.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Collapses whitespace and strips a leading rank such as "12. ".
pub fn clean_title(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let title = RANK_PREFIX_RE.replace(&collapsed, "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Narrows a rating tooltip like "9.2 based on 1,600,000 user ratings" to
/// the vote figure, so the rating digits do not end up in the count. Falls
/// back to any "N user" figure, then to the whole text.
pub fn votes_phrase(tooltip: &str) -> &str {
    [&*BASED_ON_RE, &*USER_COUNT_RE]
        .iter()
        .find_map(|re| re.captures(tooltip).and_then(|c| c.get(1)))
        .map_or(tooltip, |m| m.as_str())
}

/// Expands compact counts such as "(3.1M)" or "950K" into plain digits.
/// Text without a magnitude suffix is returned unchanged.
pub fn expand_compact_count(text: &str) -> Option<String> {
    let Some(caps) = COMPACT_COUNT_RE.captures(text) else {
        return Some(text.to_string());
    };
    let value: f64 = caps[1].parse().ok()?;
    let multiplier = match caps[2].to_ascii_uppercase().as_str() {
        "K" => 1_000.0,
        "M" => 1_000_000.0,
        _ => 1_000_000_000.0,
    };
    Some(format!("{}", (value * multiplier).round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_found_in_surrounding_text() {
        assert_eq!(normalize_year(Some("1994")), Some(1994));
        assert_eq!(normalize_year(Some("(1994)")), Some(1994));
        assert_eq!(normalize_year(Some("Released 1994, re-cut 2004")), Some(1994));
        assert_eq!(normalize_year(Some("2003–2011 TV Series")), Some(2003));
    }

    #[test]
    fn year_absent_for_unusable_input() {
        assert_eq!(normalize_year(Some("N/A")), None);
        assert_eq!(normalize_year(Some("")), None);
        assert_eq!(normalize_year(None), None);
        assert_eq!(normalize_year(Some("1850")), None);
        assert_eq!(normalize_year(Some("2h 22m")), None);
    }

    #[test]
    fn rating_parses_trimmed_decimal() {
        assert_eq!(normalize_rating(Some("  8.5 ")), Some(8.5));
        assert_eq!(normalize_rating(Some("9")), Some(9.0));
        assert_eq!(normalize_rating(Some("8,5")), Some(8.5));
    }

    #[test]
    fn rating_absent_for_malformed_input() {
        assert_eq!(normalize_rating(Some("n/a")), None);
        assert_eq!(normalize_rating(Some("")), None);
        assert_eq!(normalize_rating(Some("   ")), None);
        assert_eq!(normalize_rating(None), None);
        assert_eq!(normalize_rating(Some("NaN")), None);
        assert_eq!(normalize_rating(Some("1,234,5")), None);
    }

    #[test]
    fn votes_strip_separators_and_labels() {
        assert_eq!(normalize_votes(Some("1,234,567 ratings")), Some(1_234_567));
        assert_eq!(normalize_votes(Some("2.9M")), Some(29));
        assert_eq!(normalize_votes(Some("no votes")), None);
        assert_eq!(normalize_votes(Some("")), None);
        assert_eq!(normalize_votes(None), None);
    }

    #[test]
    fn votes_absent_on_overflow() {
        assert_eq!(normalize_votes(Some("99999999999999999999999")), None);
    }

    #[test]
    fn titles_lose_rank_prefix() {
        assert_eq!(
            clean_title("1. The Shawshank Redemption").as_deref(),
            Some("The Shawshank Redemption")
        );
        assert_eq!(clean_title("  12.\n  Heat ").as_deref(), Some("Heat"));
        assert_eq!(clean_title("2001: A Space Odyssey").as_deref(), Some("2001: A Space Odyssey"));
        assert_eq!(clean_title("   "), None);
    }

    #[test]
    fn tooltip_narrowed_to_vote_figure() {
        assert_eq!(votes_phrase("9.2 based on 1,600,000 user ratings"), "1,600,000");
        assert_eq!(votes_phrase("1,234 votes"), "1,234 votes");
        assert_eq!(votes_phrase("9.2 with 1,600 user ratings"), "1,600");
        assert_eq!(
            normalize_votes(Some(votes_phrase("9.2 with 1,600 user ratings"))),
            Some(1_600)
        );
        assert_eq!(
            normalize_votes(Some(votes_phrase("9.2 based on 1,600,000 user ratings"))),
            Some(1_600_000)
        );
    }

    #[test]
    fn compact_counts_expand() {
        assert_eq!(expand_compact_count("(3.1M)").as_deref(), Some("3100000"));
        assert_eq!(expand_compact_count("950K").as_deref(), Some("950000"));
        assert_eq!(expand_compact_count("1,234").as_deref(), Some("1,234"));
    }
}
