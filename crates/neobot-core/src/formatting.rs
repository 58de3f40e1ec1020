//! Plain-text rendering of object records and reply-size helpers.

use crate::{domain::ObjectRecord, i18n::Locale, size::classify, Result};

/// Render one record as a multi-line summary.
///
/// Velocity and distance are parsed here; a malformed value fails the whole
/// record rather than rendering a partial summary.
pub fn present(record: &ObjectRecord, locale: Locale) -> Result<String> {
    let s = locale.strings();
    let avg = record.average_diameter();
    let velocity = record.relative_velocity_kph()?;
    let distance = record.miss_distance_km()?;

    Ok(format!(
        "☄️ {name}\n\
{size_line}: {avg:.1} {m} ({label})\n\
{velocity_line}: {velocity} {kph}\n\
{distance_line}: {distance} {km}\n\
{hazard_line}: {hazard}\n",
        name = record.name,
        size_line = s.size_line,
        m = s.meters,
        label = classify(avg).label(locale),
        velocity_line = s.velocity_line,
        velocity = format_thousands(velocity),
        kph = s.kph,
        distance_line = s.distance_line,
        distance = format_thousands(distance),
        km = s.km,
        hazard_line = s.hazard_line,
        hazard = if record.hazardous { s.yes } else { s.no },
    ))
}

/// Render records separated by a blank line. Returns an empty string for no records.
pub fn present_all(records: &[ObjectRecord], locale: Locale) -> Result<String> {
    let parts = records
        .iter()
        .map(|r| present(r, locale))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("\n"))
}

/// Round to an integer and group digits by thousands: `12345.678` → `12,346`.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) if rest.bytes().any(|b| b != b'0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Length as Telegram counts it: UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Split text into chunks of at most `limit` UTF-16 units, preferring line breaks.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(2);
    if utf16_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0usize;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);
        if chunk_len + line_len > limit && !chunk.is_empty() {
            out.push(std::mem::take(&mut chunk));
            chunk_len = 0;
        }

        let mut rest = line;
        while utf16_len(rest) > limit {
            let (head, tail) = split_utf16_prefix(rest, limit);
            out.push(head.to_string());
            rest = tail;
        }
        chunk.push_str(rest);
        chunk_len += utf16_len(rest);
    }

    if !chunk.is_empty() {
        out.push(chunk);
    }
    out.retain(|c| !c.trim().is_empty());
    out
}

/// Cut to at most `max_units` UTF-16 units, ending with an ellipsis when cut.
pub fn truncate_utf16(s: &str, max_units: usize) -> String {
    if utf16_len(s) <= max_units {
        return s.to_string();
    }
    // The ellipsis is one unit.
    let (head, _) = split_utf16_prefix(s, max_units.saturating_sub(1));
    let mut out = head.to_string();
    out.push('…');
    out
}

/// Longest prefix of at most `max_units` UTF-16 units, never splitting a char.
fn split_utf16_prefix(s: &str, max_units: usize) -> (&str, &str) {
    let mut units = 0usize;
    for (i, ch) in s.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return s.split_at(i);
        }
    }
    (s, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CloseApproach;

    fn record(velocity: &str, distance: &str) -> ObjectRecord {
        ObjectRecord {
            name: "2025 AB".to_string(),
            diameter_min_m: 40.0,
            diameter_max_m: 60.0,
            hazardous: false,
            close_approaches: vec![CloseApproach {
                date: Some("2025-01-01".to_string()),
                relative_velocity_kph: velocity.to_string(),
                miss_distance_km: distance.to_string(),
            }],
        }
    }

    #[test]
    fn renders_record_summary() {
        let text = present(&record("12345.678", "987654.321"), Locale::En).unwrap();
        assert_eq!(
            text,
            "☄️ 2025 AB\n\
📏 Size: 50.0 m (stadium-sized)\n\
🚀 Velocity: 12,346 km/h\n\
🌍 Distance: 987,654 km\n\
⚠️ Hazardous: No\n"
        );
    }

    #[test]
    fn renders_russian_summary() {
        let mut rec = record("1000", "2000");
        rec.hazardous = true;
        let text = present(&rec, Locale::Ru).unwrap();
        assert!(text.contains("📏 Размер: 50.0 м (как футбольное поле ⚽)"));
        assert!(text.contains("⚠️ Опасный: Да"));
        assert!(text.contains("🚀 Скорость: 1,000 км/ч"));
    }

    #[test]
    fn malformed_velocity_propagates() {
        assert!(present(&record("fast", "1"), Locale::En).is_err());
        let recs = vec![record("1", "1"), record("1", "n/a")];
        assert!(present_all(&recs, Locale::En).is_err());
    }

    #[test]
    fn joins_with_blank_line() {
        let recs = vec![record("1", "1"), record("2", "2")];
        let text = present_all(&recs, Locale::En).unwrap();
        assert_eq!(text.matches("☄️").count(), 2);
        assert!(text.contains("No\n\n☄️"));
        assert_eq!(present_all(&[], Locale::En).unwrap(), "");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(-1234.0), "-1,234");
        assert_eq!(format_thousands(-0.2), "0");
    }

    #[test]
    fn fifty_metres_is_stadium_sized() {
        // The upper bound of each bucket is exclusive, so 50 m leaves "building".
        let text = present(&record("1", "1"), Locale::En).unwrap();
        assert!(text.contains("(stadium-sized)"));
        assert!(!text.contains("building"));
    }

    #[test]
    fn splits_at_line_boundaries_under_limit() {
        let line = "x".repeat(30);
        let text = vec![line.as_str(); 10].join("\n");
        let chunks = split_message(&text, 100);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| utf16_len(c) <= 100));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn hard_splits_overlong_line_on_char_boundary() {
        let text = "я".repeat(100);
        let chunks = split_message(&text, 15);
        assert!(chunks.iter().all(|c| utf16_len(c) <= 15));
        assert_eq!(chunks[0].chars().count(), 15);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn astral_chars_count_double() {
        assert_eq!(utf16_len("🌌"), 2);
        assert_eq!(utf16_len("я"), 1);

        let text = "🌌".repeat(10);
        let chunks = split_message(&text, 5);
        assert!(chunks.iter().all(|c| utf16_len(c) <= 5));
        assert_eq!(chunks[0], "🌌🌌");
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn short_text_is_single_chunk() {
        assert_eq!(split_message("hi", 4096), vec!["hi".to_string()]);
    }

    #[test]
    fn truncates_by_utf16_units() {
        assert_eq!(truncate_utf16("abcdef", 10), "abcdef");
        assert_eq!(truncate_utf16("abcdef", 4), "abc…");
        assert_eq!(truncate_utf16("ёёёёё", 3).chars().count(), 3);

        let caption = format!("🌌 Nebula\n\n{}", "x".repeat(2000));
        let cut = truncate_utf16(&caption, 1024);
        assert_eq!(utf16_len(&cut), 1024);
        assert!(cut.starts_with("🌌 Nebula"));
        assert!(cut.ends_with('…'));

        // Never splits a surrogate pair.
        assert_eq!(truncate_utf16("a🌌b", 3), "a…");
    }
}
