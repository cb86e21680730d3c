//! Property tests: random replace sequences against a flat-string model.

use codeview_buffer::{LineBuffer, Position, TextRange, TextStorage};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Replace {
        from: (usize, usize),
        to: (usize, usize),
        text: String,
    },
    Snapshot,
    Clean,
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("a"),
            Just("bc"),
            Just("\n"),
            Just("é"),
            Just("😀"),
            Just("e\u{301}"),
            Just(" "),
        ],
        0..6,
    )
    .prop_map(|parts| parts.concat())
}

fn operation_strategy() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(
        prop_oneof![
            8 => ((0usize..40, 0usize..40), (0usize..40, 0usize..40), text_strategy())
                .prop_map(|(from, to, text)| Operation::Replace { from, to, text }),
            1 => Just(Operation::Snapshot),
            1 => Just(Operation::Clean),
        ],
        0..60,
    )
}

/// Maps arbitrary seeds onto a valid position.
fn position(lines: &LineBuffer, seed: (usize, usize)) -> Position {
    let line = seed.0 % lines.line_count();
    lines.clamp_to_nearest_valid(Position::new(line, seed.1))
}

/// Flat byte offset of a valid position in the exported text.
fn flat_offset(lines: &LineBuffer, position: Position) -> usize {
    lines
        .lines()
        .take(position.line)
        .map(|l| l.len() + 1)
        .sum::<usize>()
        + position.byte
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 200, ..ProptestConfig::default() })]

    #[test]
    fn prop_replace_matches_flat_model(operations in operation_strategy()) {
        let mut storage = TextStorage::from_text("fn main() {\n    body\n}");
        let mut model = storage.lines().export();
        let mut snapshots = Vec::new();

        for op in operations {
            match op {
                Operation::Replace { from, to, text } => {
                    let lines = storage.lines().clone();
                    let range = TextRange::between(position(&lines, from), position(&lines, to));
                    let start = flat_offset(&lines, range.lower());
                    let end = flat_offset(&lines, range.upper());

                    let inserted = storage.replace(range, &text);
                    model.replace_range(start..end, &text);

                    prop_assert_eq!(inserted.lower(), range.lower());
                    prop_assert_eq!(flat_offset(storage.lines(), inserted.upper()), start + text.len());
                }
                Operation::Snapshot => snapshots.push((storage.lines().clone(), model.clone())),
                Operation::Clean => storage.clean_change_log(),
            }

            prop_assert!(storage.line_count() >= 1);
            prop_assert_eq!(storage.lines().export(), model.clone());
            prop_assert!(storage.lines().is_valid_position(storage.caret()));
            prop_assert!(storage.lines().is_valid_range(storage.selection()));
        }

        storage.assert_consistent();
        // Earlier snapshots are unaffected by later edits
        for (lines, text) in snapshots {
            prop_assert_eq!(lines.export(), text);
        }
    }

    #[test]
    fn prop_change_log_replays_to_live_buffer(operations in operation_strategy()) {
        let mut storage = TextStorage::from_text("alpha\nbeta");
        let mut shadow = storage.lines().to_strings();

        for op in operations {
            match op {
                Operation::Replace { from, to, text } => {
                    let lines = storage.lines();
                    let range = TextRange::between(position(lines, from), position(lines, to));
                    storage.replace(range, &text);
                }
                Operation::Clean => {
                    for entry in storage.change_log().points() {
                        entry.apply_to_lines(&mut shadow);
                    }
                    storage.clean_change_log();
                    prop_assert_eq!(&shadow, &storage.lines().to_strings());
                }
                Operation::Snapshot => {}
            }
        }

        let keys: Vec<u64> = storage.change_log().points().iter().map(|e| e.key()).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        for entry in storage.change_log().points() {
            entry.apply_to_lines(&mut shadow);
        }
        prop_assert_eq!(shadow, storage.lines().to_strings());
    }

    #[test]
    fn prop_neighbors_stay_valid(text in text_strategy(), seed in (0usize..10, 0usize..20)) {
        let storage = TextStorage::from_text(&text);
        let lines = storage.lines();
        let p = position(lines, seed);
        let left = lines.left_neighbor(p);
        let right = lines.right_neighbor(p);
        prop_assert!(lines.is_valid_position(left));
        prop_assert!(lines.is_valid_position(right));
        prop_assert!(left <= p && p <= right);
    }
}
