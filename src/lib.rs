//! Converter of Friday Night Funkin' charts into osu!mania map-sets.
//!
//! The conversion runs through these stages:
//!
//! 1. [`fnf::extract`] recovers the JSON object of a chart file surrounded by junk,
//! 2. [`fnf::parse`] reads it into a typed [`fnf::FnfChart`], repairing what it can and
//!    reporting it as [`fnf::ChartWarning`]s,
//! 3. [`layout`] selects whose notes are converted and places them in output columns,
//! 4. [`timeline`] orders and repairs the BPM changes,
//! 5. [`overlap`] removes notes overlapping in a column,
//! 6. [`osu`] renders the `.osu` beatmap text,
//! 7. [`export`] bundles the beatmaps of a [`mapset::Mapset`] with the audio and
//!    background into an `.osz` archive.
//!
//! # Example
//!
//! ```
//! use fnf2osu::prelude::*;
//!
//! let source = r#"{"song": {"bpm": 100, "speed": 1.8, "notes": [
//!     {"mustHitSection": true, "sectionNotes": [[0, 0, 0], [600, 2, 300], [600, 5, 0]]}
//! ]}}"#;
//! let FnfOutput { chart, warnings } = parse_chart(source).unwrap();
//! assert!(warnings.is_empty());
//!
//! let layout = Layout::new(KeyCount::new(4).unwrap(), Arrangement::SoloA);
//! let notes = resolve_overlaps(&layout.notes(&chart), layout.columns(), 2);
//! assert_eq!(notes, vec![Note::tap(0, 0), Note::new(600, 2, 300)]);
//!
//! let base_bpm = chart.default_bpm(None, 120.0);
//! let timeline = normalize(&chart.bpm_points(None, base_bpm).unwrap(), base_bpm);
//! assert_eq!(timeline, vec![BpmPoint::new(0, 100.0)]);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the configuration and map-set types, and
//!   [`config::ConvertConfig::from_json_str`].
//! - `diagnostics`: rendering of chart errors with `ariadne`, see [`diagnostics`].

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod fnf;
pub mod layout;
pub mod mapset;
pub mod note;
pub mod osu;
pub mod overlap;
pub mod prelude;
pub mod timeline;
pub mod util;
