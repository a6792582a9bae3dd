//! Property-based tests for command plan parsing.
//!
//! These tests use proptest to generate random plans and verify that the
//! structured and flat text input forms stay equivalent under all inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::plan::{CommandPlan, KNOWN_OPERATIONS};
    use proptest::prelude::*;
    use serde_json::Value;

    /// One generated plan entry: (name, args, disabled, marker-at-suffix).
    type Entry = (&'static str, Vec<String>, bool, bool);

    fn entry_strategy() -> impl Strategy<Value = Entry> {
        (
            prop::sample::select(KNOWN_OPERATIONS.to_vec()),
            prop::collection::vec("[A-Z]{2,5}", 0..3),
            any::<bool>(),
            any::<bool>(),
        )
    }

    fn plan_strategy() -> impl Strategy<Value = Vec<Entry>> {
        prop::collection::vec(entry_strategy(), 0..6)
    }

    fn marked_name(entry: &Entry) -> String {
        let (name, _, disabled, suffix) = entry;
        if !disabled {
            (*name).to_string()
        } else if *suffix {
            format!("{name}_")
        } else {
            format!("_{name}")
        }
    }

    /// Renders entries as the structured JSON `commands` value.
    fn render_value(entries: &[Entry]) -> Value {
        Value::Array(
            entries
                .iter()
                .map(|entry| {
                    let name = marked_name(entry);
                    if entry.1.is_empty() {
                        Value::String(name)
                    } else {
                        let mut words = vec![Value::String(name)];
                        words.extend(entry.1.iter().cloned().map(Value::String));
                        Value::Array(words)
                    }
                })
                .collect(),
        )
    }

    /// Renders entries as the flat `--commands` text form.
    fn render_text(entries: &[Entry], separator: &str) -> String {
        entries
            .iter()
            .map(|entry| {
                let name = marked_name(entry);
                if entry.1.is_empty() {
                    name
                } else {
                    format!("[{name}, {}]", entry.1.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    // ============================================================================
    // Input-form equivalence
    // ============================================================================

    proptest! {
        /// Property: the structured and flat text forms of the same plan
        /// normalize to identical request sequences
        #[test]
        fn structured_and_text_forms_are_equivalent(entries in plan_strategy()) {
            let structured = CommandPlan::from_value(&render_value(&entries)).unwrap();
            let flat = CommandPlan::from_text(&render_text(&entries, ", ")).unwrap();
            prop_assert_eq!(structured, flat);
        }

        /// Property: separator spacing never changes the parse
        #[test]
        fn separator_spacing_is_irrelevant(
            entries in plan_strategy(),
            separator in prop::sample::select(vec![",", ", ", " ,", " , ", ",  "]),
        ) {
            let tight = CommandPlan::from_text(&render_text(&entries, ",")).unwrap();
            let spaced = CommandPlan::from_text(&render_text(&entries, separator)).unwrap();
            prop_assert_eq!(tight, spaced);
        }

        /// Property: extra empty segments are skipped without changing the plan
        #[test]
        fn empty_segments_are_skipped(entries in plan_strategy()) {
            let text = render_text(&entries, ", ");
            let padded = format!(",,{text},,");
            let plain = CommandPlan::from_text(&text).unwrap();
            let parsed = CommandPlan::from_text(&padded).unwrap();
            prop_assert_eq!(plain, parsed);
        }
    }

    // ============================================================================
    // Normalization invariants
    // ============================================================================

    proptest! {
        /// Property: every generated entry survives parsing, in order, with
        /// the marker stripped from the name
        #[test]
        fn entries_survive_in_order(entries in plan_strategy()) {
            let plan = CommandPlan::from_value(&render_value(&entries)).unwrap();
            prop_assert_eq!(plan.len(), entries.len());
            for (request, entry) in plan.iter().zip(&entries) {
                prop_assert_eq!(request.name.as_str(), entry.0);
                prop_assert_eq!(&request.args, &entry.1);
                prop_assert_eq!(request.enabled, !entry.2);
            }
        }

        /// Property: the variant accessor returns exactly the first argument
        #[test]
        fn variant_is_first_argument(entries in plan_strategy()) {
            let plan = CommandPlan::from_value(&render_value(&entries)).unwrap();
            for (request, entry) in plan.iter().zip(&entries) {
                prop_assert_eq!(request.variant(), entry.1.first().map(String::as_str));
            }
        }

        /// Property: re-rendering a parsed plan and parsing again is a fixpoint
        #[test]
        fn reparse_is_a_fixpoint(entries in plan_strategy()) {
            let first = CommandPlan::from_value(&render_value(&entries)).unwrap();
            let rendered = first
                .iter()
                .map(|request| {
                    let name = if request.enabled {
                        request.name.clone()
                    } else {
                        format!("_{}", request.name)
                    };
                    if request.args.is_empty() {
                        name
                    } else {
                        format!("[{name}, {}]", request.args.join(", "))
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let second = CommandPlan::from_text(&rendered).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
