//! WebVTT caption parsing.

use super::TranscriptSegment;
use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

/// Parse a WebVTT document into ordered caption segments.
///
/// Drops the header, NOTE/STYLE blocks, cue identifiers and inline timing
/// tags. Auto-generated captions repeat the previous line at the top of each
/// cue; repeated lines are emitted once.
pub fn parse_vtt(vtt: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut last_line = String::new();
    let mut cue: Option<(f64, f64)> = None;
    let mut skipping_block = false;

    for raw in vtt.lines() {
        let line = raw.trim();

        if line.is_empty() {
            cue = None;
            skipping_block = false;
            continue;
        }
        if skipping_block {
            continue;
        }
        if line.starts_with("WEBVTT")
            || line.starts_with("NOTE")
            || line.starts_with("STYLE")
            || line.starts_with("REGION")
        {
            skipping_block = true;
            continue;
        }
        if line.contains("-->") {
            cue = parse_timing(line);
            continue;
        }

        // Header metadata ("Kind: captions") and cue ids sit outside a cue.
        let Some((start, end)) = cue else {
            continue;
        };

        let text = clean_line(line);
        if text.is_empty() || text == last_line {
            continue;
        }

        last_line = text.clone();
        segments.push(TranscriptSegment::new(start, end, text));
    }

    segments
}

fn clean_line(line: &str) -> String {
    let stripped = tag_pattern().replace_all(line, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_timing(line: &str) -> Option<(f64, f64)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// Parse `HH:MM:SS.mmm` or `MM:SS.mmm` into seconds.
fn parse_timestamp(ts: &str) -> Option<f64> {
    let parts: Vec<&str> = ts.split(':').collect();
    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (h.parse::<f64>().ok()?, m.parse::<f64>().ok()?, *s),
        [m, s] => (0.0, m.parse::<f64>().ok()?, *s),
        _ => return None,
    };
    let s = s.replace(',', ".").parse::<f64>().ok()?;
    Some(h * 3600.0 + m * 60.0 + s)
}
