use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use flashpoint_common::{Event, Origin};

use crate::sources::RawRecord;

/// Map a raw adapter record into the common event schema.
///
/// Returns None when the record has no usable title after cleanup, or when
/// the adapter supplied a keyword set and neither title nor description
/// matches it. Timestamp parse failures never drop the record: the
/// aggregation call's start time is substituted instead.
pub fn normalize(
    raw: RawRecord,
    origin: Origin,
    keywords: &[String],
    fallback: DateTime<Utc>,
) -> Option<Event> {
    let title = clean_text(&raw.title);
    if title.is_empty() {
        return None;
    }
    let description = raw
        .description
        .as_deref()
        .map(clean_text)
        .filter(|d| !d.is_empty());

    if !keywords.is_empty() {
        let haystack = format!(
            "{} {}",
            title.to_lowercase(),
            description.as_deref().unwrap_or("").to_lowercase()
        );
        if !keywords.iter().any(|k| haystack.contains(&k.to_lowercase())) {
            return None;
        }
    }

    let timestamp_ms = raw
        .published
        .as_deref()
        .and_then(|p| parse_timestamp(origin, p.trim()))
        .unwrap_or_else(|| fallback.timestamp_millis());

    Some(Event {
        id: format!("{origin}-{}", raw.url),
        title,
        title_original: None,
        title_translated: None,
        description,
        url: raw.url,
        source: origin,
        timestamp_ms,
    })
}

/// Unescape entities, strip residual markup, collapse pipe separators to
/// whitespace, and collapse runs of whitespace.
pub fn clean_text(s: &str) -> String {
    let unescaped = unescape_entities(s);
    let tag_re = Regex::new(r"<[^>]+>").expect("valid regex");
    let stripped = tag_re.replace_all(&unescaped, "");
    stripped
        .replace('|', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn unescape_entities(s: &str) -> String {
    let mut out = s
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ");

    let numeric_re = Regex::new(r"&#(\d+);").expect("valid regex");
    out = numeric_re
        .replace_all(&out, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned();

    // Last, so freshly produced entities are not double-unescaped
    out.replace("&amp;", "&")
}

/// Parse an origin-specific date string into epoch millis.
/// GDELT uses a compact `YYYYMMDDTHHMMSSZ` form; the RSS origins use
/// RFC 2822 pubDate strings.
pub fn parse_timestamp(origin: Origin, raw: &str) -> Option<i64> {
    match origin {
        Origin::Gdelt => NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ")
            .ok()
            .map(|dt| dt.and_utc().timestamp_millis()),
        Origin::Reuters | Origin::Bbc => DateTime::parse_from_rfc2822(raw)
            .ok()
            .map(|dt| dt.timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(title: &str) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            url: "https://example.com/x".to_string(),
            description: None,
            published: None,
        }
    }

    fn fallback() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap()
    }

    #[test]
    fn cleans_entities_markup_and_pipes() {
        let ev = normalize(
            raw("Iran &amp; Israel | <b>latest</b>&#8230;"),
            Origin::Bbc,
            &[],
            fallback(),
        )
        .unwrap();
        assert_eq!(ev.title, "Iran & Israel latest…");
        assert_eq!(ev.id, "bbc-https://example.com/x");
    }

    #[test]
    fn unparsable_date_falls_back_to_call_start() {
        let mut record = raw("Oil markets steady");
        record.published = Some("not a date".to_string());
        let ev = normalize(record, Origin::Reuters, &[], fallback()).unwrap();
        assert_eq!(ev.timestamp_ms, fallback().timestamp_millis());
    }

    #[test]
    fn parses_rfc2822_and_compact_dates() {
        let rss = parse_timestamp(Origin::Bbc, "Sun, 23 Aug 2026 10:00:00 GMT").unwrap();
        let compact = parse_timestamp(Origin::Gdelt, "20260823T100000Z").unwrap();
        assert_eq!(rss, compact);
    }

    #[test]
    fn keyword_filter_checks_title_and_description() {
        let keywords = vec!["iran".to_string(), "oil".to_string()];

        let hit_title = normalize(raw("Iran talks resume"), Origin::Reuters, &keywords, fallback());
        assert!(hit_title.is_some());

        let mut by_desc = raw("Markets wobble");
        by_desc.description = Some("Brent oil climbs".to_string());
        assert!(normalize(by_desc, Origin::Reuters, &keywords, fallback()).is_some());

        let miss = normalize(raw("Football results"), Origin::Reuters, &keywords, fallback());
        assert!(miss.is_none());
    }

    #[test]
    fn empty_keyword_set_accepts_everything() {
        assert!(normalize(raw("Anything at all"), Origin::Gdelt, &[], fallback()).is_some());
    }

    #[test]
    fn empty_title_after_cleanup_is_dropped() {
        assert!(normalize(raw(" <i> </i> | "), Origin::Bbc, &[], fallback()).is_none());
    }
}
