//! Sheet classification: which sheets carry real program weeks

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

/// A sheet selected as the authoritative copy of one program week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSelection {
    pub name: String,
    pub week: u32,
}

/// Select the sheets that represent actual program weeks.
///
/// A sheet qualifies when its name carries both a week-number token and a
/// master marker, case-insensitively. Scratch, summary and archival
/// sheets match neither and are excluded. When several sheets claim the
/// same week, all of them are kept (dropping one would lose data), but
/// the one whose name most specifically reads as the master copy is
/// ordered first ("Week 2 Master" before "Week 2 Master old copy");
/// remaining ties go to workbook order. Weeks follow the workbook order
/// of their first matching sheet.
///
/// An empty result means the workbook has no program data; the caller
/// turns that into [`ExtractError::NoProgramSheets`].
pub fn classify_sheets(
    names: &[String],
    config: &ExtractorConfig,
) -> Result<Vec<SheetSelection>, ExtractError> {
    let week_re = RegexBuilder::new(&config.week_pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractError::InvalidPattern {
            pattern: config.week_pattern.clone(),
            source,
        })?;

    struct Candidate {
        index: usize,
        name: String,
        week: u32,
        score: u8,
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let Some((week, week_span)) = week_match(&week_re, name) else {
            continue;
        };
        let Some(score) = master_score(name, week_span, &config.master_markers) else {
            continue;
        };
        candidates.push(Candidate {
            index,
            name: name.clone(),
            week,
            score,
        });
    }

    // Weeks in first-appearance order; within a week the most specific
    // master name first, then workbook order.
    let mut first_seen: HashMap<u32, usize> = HashMap::new();
    for candidate in &candidates {
        first_seen.entry(candidate.week).or_insert(candidate.index);
    }
    candidates.sort_by(|a, b| {
        first_seen[&a.week]
            .cmp(&first_seen[&b.week])
            .then(b.score.cmp(&a.score))
            .then(a.index.cmp(&b.index))
    });

    Ok(candidates
        .into_iter()
        .map(|c| SheetSelection {
            name: c.name,
            week: c.week,
        })
        .collect())
}

/// Parsed week number plus the byte span of the full week-token match in
/// the sheet name.
fn week_match(week_re: &Regex, name: &str) -> Option<(u32, std::ops::Range<usize>)> {
    let caps = week_re.captures(name)?;
    let week = caps.get(1)?.as_str().parse().ok()?;
    Some((week, caps.get(0)?.range()))
}

/// Specificity of the master indication, `None` when the name carries no
/// marker at all. A name that is exactly the week token plus a marker
/// (modulo separators) scores above one that merely contains the marker.
/// The check removes the matched week-token span rather than rebuilding
/// it from the parsed number, so zero-padded names like "Week 03 Master"
/// keep full specificity.
fn master_score(name: &str, week_span: std::ops::Range<usize>, markers: &[String]) -> Option<u8> {
    let normalized = normalize(name);
    let without_week = normalize(&format!(
        "{} {}",
        &name[..week_span.start],
        &name[week_span.end..]
    ));
    for marker in markers {
        let marker = marker.to_lowercase();
        if !normalized
            .split(' ')
            .any(|word| word == marker)
        {
            continue;
        }
        if without_week == marker {
            return Some(2);
        }
        return Some(1);
    }
    None
}

fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out.trim().to_string()
}
