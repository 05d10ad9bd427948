use std::{fs, path::PathBuf};

use fnf2osu::prelude::*;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/files")
        .join(name)
}

fn metadata() -> MapsetMetadata {
    MapsetMetadata {
        title: "Test Song".to_string(),
        artist: Some("Kawai Sprite".to_string()),
        creator: "mapper".to_string(),
        tags: "fnf".to_string(),
        audio: vec![AudioTrack::new("Inst.ogg", 100)],
        ..MapsetMetadata::default()
    }
}

fn section<'a>(text: &'a str, header: &str) -> Vec<&'a str> {
    text.split(header)
        .nth(1)
        .unwrap_or_default()
        .lines()
        .skip(1)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn test_resolve_noisy_chart() {
    let chart = Chart::new(fixture("noisy.json"), Layout::from_mode_code(41).unwrap());
    let resolved = chart
        .resolve(&metadata(), &ConvertConfig::default())
        .unwrap();

    assert_eq!(resolved.base_bpm, 150.0);
    assert_eq!(resolved.scroll_speed, 2.1);
    assert_eq!(resolved.notes.len(), 6);
    assert_eq!(resolved.warnings.len(), 2);
    assert_eq!(
        resolved.timeline,
        vec![BpmPoint::new(0, 150.0), BpmPoint::new(3200, 180.0)]
    );
}

#[test]
fn test_emit_noisy_chart() {
    let metadata = metadata();
    let chart = Chart::new(fixture("noisy.json"), Layout::from_mode_code(41).unwrap());
    let resolved = chart.resolve(&metadata, &ConvertConfig::default()).unwrap();
    let text = write_beatmap(
        &metadata,
        &resolved,
        "Hard",
        &metadata.creator,
        &ConvertConfig::default(),
    )
    .unwrap();

    assert!(text.contains("\nArtist:Kawai Sprite\n"));
    assert!(text.contains("\nSliderMultiplier:2.1\n"));

    let timing = section(&text, "[TimingPoints]");
    assert_eq!(timing.len(), 2 * resolved.timeline.len());
    assert_eq!(timing[0], "0,400,4,1,0,50,1,0");
    assert_eq!(timing[1], "0,-100,4,1,0,50,0,0");
    assert!(timing[2].starts_with("3200,333.33"));
    assert!(timing[2].ends_with(",4,1,0,50,1,0"));
    assert_eq!(timing[3], "3200,-120,4,1,0,50,0,0");

    assert_eq!(
        section(&text, "[HitObjects]"),
        vec![
            "0,192,0,5,0,1:0:0:50:",
            "264,192,800,128,0,1000:1:0:0:50:",
            "0,192,1600,1,0,1:0:0:50:",
            "396,192,2000,128,0,2390:1:0:0:50:",
            "396,192,2399,1,0,1:0:0:50:",
            "264,192,3200,1,0,1:0:0:50:",
        ]
    );
}

#[test]
fn test_audio_offset_moves_everything() {
    let metadata = MapsetMetadata {
        audio_offset_ms: 50,
        ..metadata()
    };
    let chart = Chart::new(fixture("noisy.json"), Layout::from_mode_code(42).unwrap());
    let resolved = chart.resolve(&metadata, &ConvertConfig::default()).unwrap();
    let text = write_beatmap(&metadata, &resolved, "B", "me", &ConvertConfig::default()).unwrap();

    assert_eq!(section(&text, "[TimingPoints]")[0], "-50,400,4,1,0,50,1,0");
    assert_eq!(
        section(&text, "[HitObjects]"),
        vec!["132,192,350,5,0,1:0:0:50:", "396,192,2350,1,0,1:0:0:50:"]
    );
}

#[test]
fn test_bpm_override_and_legacy_positions() {
    let metadata = MapsetMetadata {
        bpm_override: Some(75.0),
        ..metadata()
    };
    let config = ConvertConfig {
        hit_position: HitPosition::Legacy,
        ..ConvertConfig::default()
    };
    let chart = Chart::new(fixture("noisy.json"), Layout::from_mode_code(44).unwrap());
    let resolved = chart.resolve(&metadata, &config).unwrap();
    assert_eq!(resolved.timeline, vec![BpmPoint::new(0, 75.0)]);

    let text = write_beatmap(&metadata, &resolved, "Co-op", "me", &config).unwrap();
    assert!(text.contains("\nCircleSize:8\n"));
    assert_eq!(
        section(&text, "[TimingPoints]"),
        vec!["0,800,4,1,0,50,1,0", "0,-100,4,1,0,50,0,0"]
    );
    assert_eq!(section(&text, "[HitObjects]")[0], "288,192,0,5,0,1:0:0:50:");
}

#[test]
fn test_legacy_positions_reject_wide_layouts() {
    let config = ConvertConfig {
        hit_position: HitPosition::Legacy,
        ..ConvertConfig::default()
    };
    let chart = Chart::new(fixture("noisy.json"), Layout::from_mode_code(64).unwrap());
    let resolved = chart.resolve(&metadata(), &config).unwrap();
    assert_eq!(
        write_beatmap(&metadata(), &resolved, "Wide", "me", &config),
        Err(ConfigError::NoLegacyTable(12))
    );
}

#[test]
fn test_chart_errors() {
    let layout = Layout::from_mode_code(41).unwrap();
    let err = Chart::new(fixture("no_notes.json"), layout)
        .resolve(&metadata(), &ConvertConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MalformedInput {
            source: MalformedChart::NoNotes,
            ..
        }
    ));

    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"song\": {\"notes\": [").unwrap();
    let err = Chart::new(&broken, layout).load().unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MalformedInput {
            source: MalformedChart::Extract(_),
            ..
        }
    ));
}

#[test]
fn test_utf16_chart_is_decoded() {
    let source = include_str!("files/noisy.json");
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(source.encode_utf16().flat_map(u16::to_le_bytes));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("utf16.json");
    fs::write(&path, bytes).unwrap();

    let output = Chart::new(&path, Layout::from_mode_code(41).unwrap())
        .load()
        .unwrap();
    assert_eq!(output.chart.sections.len(), 4);
}

#[test]
fn test_file_name() {
    assert_eq!(
        beatmap_file_name(&metadata(), "Hard", "mapper"),
        "Kawai Sprite - Test Song (mapper) [Hard].osu"
    );
}

#[test]
fn test_resolve_reads_the_file_each_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.json");
    let chart = Chart::new(&path, Layout::from_mode_code(41).unwrap());
    let config = ConvertConfig::default();

    fs::write(
        &path,
        r#"{"song": {"speed": 1, "notes": [{"mustHitSection": true, "sectionNotes": [[0, 0, 0]]}]}}"#,
    )
    .unwrap();
    let first = chart.resolve(&metadata(), &config).unwrap();
    assert_eq!(first.notes, vec![Note::tap(0, 0)]);

    fs::write(
        &path,
        r#"{"song": {"speed": 3, "notes": [{"mustHitSection": true, "sectionNotes": [[0, 0, 0], [500, 2, 0]]}]}}"#,
    )
    .unwrap();
    let second = chart.resolve(&metadata(), &config).unwrap();
    assert_eq!(second.notes, vec![Note::tap(0, 0), Note::tap(500, 2)]);
    assert_eq!(second.scroll_speed, 3.0);
}
