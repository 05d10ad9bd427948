use fnf2osu::prelude::*;
use pretty_assertions::assert_eq;

fn resolved_notes(code: u8) -> Vec<Note> {
    let chart = parse_chart(include_str!("files/noisy.json")).unwrap().chart;
    let layout = Layout::from_mode_code(code).unwrap();
    resolve_overlaps(&layout.notes(&chart), layout.columns(), 2)
}

#[test]
fn test_solo_player_a() {
    assert_eq!(
        resolved_notes(41),
        vec![
            Note::tap(0, 0),
            Note::new(800, 2, 200),
            Note::tap(1600, 0),
            Note::new(2000, 3, 390),
            Note::tap(2399, 3),
            Note::tap(3200, 2),
        ]
    );
}

#[test]
fn test_solo_player_b() {
    assert_eq!(
        resolved_notes(42),
        vec![Note::tap(400, 1), Note::tap(2400, 3)]
    );
}

#[test]
fn test_sync_merges_players() {
    assert_eq!(
        resolved_notes(43),
        vec![
            Note::tap(0, 0),
            Note::tap(400, 1),
            Note::new(800, 2, 200),
            Note::tap(1600, 0),
            Note::new(2000, 3, 390),
            Note::tap(2399, 3),
            Note::tap(3200, 2),
        ]
    );
}

#[test]
fn test_coop_normal_puts_player_a_right() {
    assert_eq!(
        resolved_notes(44),
        vec![
            Note::tap(0, 4),
            Note::tap(400, 1),
            Note::new(800, 6, 200),
            Note::tap(1600, 4),
            Note::new(2000, 7, 390),
            Note::tap(2399, 7),
            Note::tap(2400, 3),
            Note::tap(3200, 6),
        ]
    );
}

#[test]
fn test_coop_swapped_puts_player_a_left() {
    let notes = resolved_notes(45);
    assert_eq!(notes.len(), 8);
    assert!(notes.contains(&Note::tap(0, 0)));
    assert!(notes.contains(&Note::tap(400, 5)));
    assert!(notes.contains(&Note::tap(2400, 7)));
}

#[test]
fn test_columns_stay_in_layout() {
    let chart = parse_chart(include_str!("files/noisy.json")).unwrap().chart;
    for keys in KeyCount::MIN..=KeyCount::MAX {
        for digit in 1..=5 {
            let layout = Layout::from_mode_code(keys * 10 + digit).unwrap();
            assert!(
                layout
                    .notes(&chart)
                    .iter()
                    .all(|note| note.column < layout.columns()),
                "{layout}"
            );
        }
    }
}

#[test]
fn test_sync_keeps_duplicates_for_the_resolver() {
    let source = r#"{"song": {"speed": 1, "notes": [
        {"mustHitSection": true, "sectionNotes": [[100, 1, 0], [100, 5, 0]]}
    ]}}"#;
    let chart = parse_chart(source).unwrap().chart;
    let layout = Layout::from_mode_code(43).unwrap();

    let mapped = layout.notes(&chart);
    assert_eq!(mapped.len(), 2);
    assert_eq!(mapped, vec![Note::tap(100, 1), Note::tap(100, 1)]);
    assert_eq!(
        resolve_overlaps(&mapped, layout.columns(), 2),
        vec![Note::tap(100, 1)]
    );
}

#[test]
fn test_huge_offsets_do_not_overflow() {
    let source = r#"{"song": {"speed": 1, "notes": [
        {"mustHitSection": true, "sectionNotes": [[1e19, 0, 100], [0, 1, 0]]}
    ]}}"#;
    let chart = parse_chart(source).unwrap().chart;
    let layout = Layout::from_mode_code(41).unwrap();
    assert_eq!(
        resolve_overlaps(&layout.notes(&chart), layout.columns(), 2),
        vec![Note::tap(0, 1), Note::tap(i64::MAX, 0)]
    );
}
