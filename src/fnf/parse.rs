//! Fault-tolerant reading of a chart from its JSON text.
//!
//! The text goes through [`extract_root_object`] first, then `serde_json` builds a
//! [`Value`] which is walked by hand so that every anomaly below the structural level
//! becomes a [`ChartWarning`] instead of an error.

use itertools::Itertools;
use serde_json::{Map, Value};

use super::{ChartWarning, FnfChart, FnfOutput, RawNote, Section, extract::extract_root_object};
use crate::error::MalformedChart;

/// Parses a chart from the text of its file.
///
/// # Errors
///
/// Fails when no JSON object can be recovered, when it is not valid JSON, or when
/// `song` or `song.notes` is missing.
///
/// # Examples
///
/// ```
/// use fnf2osu::fnf::parse_chart;
///
/// let source = r#"{"song": {"speed": 2, "notes": [
///     {"mustHitSection": true, "sectionNotes": [[100, "2", 50, "extra"], ["bad", 2, 50]]}
/// ]}}"#;
/// let output = parse_chart(source).unwrap();
/// let notes = &output.chart.sections[0].notes;
/// assert_eq!(notes.len(), 1);
/// assert_eq!(notes[0].lane, 2);
/// assert_eq!(output.warnings.len(), 1);
/// ```
pub fn parse_chart(source: &str) -> Result<FnfOutput, MalformedChart> {
    let object = extract_root_object(source)?;
    let value: Value =
        serde_json::from_str(object).map_err(|err| MalformedChart::InvalidJson(err.to_string()))?;

    let mut warnings = Vec::new();
    let chart = parse_chart_value(&value, &mut warnings)?;
    Ok(FnfOutput { chart, warnings })
}

fn parse_chart_value(
    value: &Value,
    warnings: &mut Vec<ChartWarning>,
) -> Result<FnfChart, MalformedChart> {
    let root = value
        .as_object()
        .ok_or(MalformedChart::MissingField("song"))?;
    let song = root
        .get("song")
        .and_then(Value::as_object)
        .ok_or(MalformedChart::MissingField("song"))?;
    let notes = song
        .get("notes")
        .and_then(Value::as_array)
        .ok_or(MalformedChart::MissingField("song.notes"))?;

    let speed = song.get("speed").and_then(coerce_number).unwrap_or_else(|| {
        warnings.push(ChartWarning::MissingScrollSpeed);
        1.0
    });

    let sections = notes
        .iter()
        .enumerate()
        .filter_map(|(index, section)| parse_section(index, section, warnings))
        .collect();

    Ok(FnfChart {
        bpm: root.get("bpm").and_then(coerce_number),
        song_bpm: song.get("bpm").and_then(coerce_number),
        speed,
        sections,
    })
}

fn parse_section(
    index: usize,
    value: &Value,
    warnings: &mut Vec<ChartWarning>,
) -> Option<Section> {
    let Some(object) = value.as_object() else {
        warnings.push(ChartWarning::InvalidSection { section: index });
        return None;
    };

    let must_hit = object
        .get("mustHitSection")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| {
            warnings.push(ChartWarning::MissingMustHit { section: index });
            false
        });

    Some(Section {
        must_hit,
        bpm: parse_section_bpm(index, object, warnings),
        notes: parse_section_notes(index, object, warnings),
    })
}

fn parse_section_bpm(
    index: usize,
    object: &Map<String, Value>,
    warnings: &mut Vec<ChartWarning>,
) -> Option<f64> {
    match object.get("bpm") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let bpm = coerce_number(value);
            if bpm.is_none() {
                warnings.push(ChartWarning::InvalidSectionBpm { section: index });
            }
            bpm
        }
    }
}

fn parse_section_notes(
    index: usize,
    object: &Map<String, Value>,
    warnings: &mut Vec<ChartWarning>,
) -> Vec<RawNote> {
    let Some(entries) = object.get("sectionNotes").and_then(Value::as_array) else {
        warnings.push(ChartWarning::MissingSectionNotes { section: index });
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(note, entry)| match parse_note(entry) {
            Ok(raw) => Some(raw),
            Err(defect) => {
                warnings.push(defect.at(index, note));
                None
            }
        })
        .collect()
}

/// Why a note entry was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteDefect {
    TooFewNumbers,
    NegativeLane,
}

impl NoteDefect {
    const fn at(self, section: usize, note: usize) -> ChartWarning {
        match self {
            Self::TooFewNumbers => ChartWarning::MalformedNote { section, note },
            Self::NegativeLane => ChartWarning::NegativeLane { section, note },
        }
    }
}

/// Reads `[offset, lane, duration, ...]` after dropping non-numeric fields.
fn parse_note(entry: &Value) -> Result<RawNote, NoteDefect> {
    let (offset, lane, duration) = entry
        .as_array()
        .and_then(|fields| {
            fields
                .iter()
                .filter_map(coerce_number)
                .take(3)
                .collect_tuple()
        })
        .ok_or(NoteDefect::TooFewNumbers)?;

    let lane = lane.trunc();
    if lane < 0.0 {
        return Err(NoteDefect::NegativeLane);
    }

    Ok(RawNote {
        offset,
        lane: lane as i64,
        duration,
    })
}

/// Interprets a JSON scalar as a finite number the way chart tools do.
///
/// Numbers and numeric strings are accepted, booleans count as `1` and `0`. Everything
/// else, including `NaN` and infinities spelled as strings, is rejected.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse().ok()?,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}
