//! Property-based tests for stub rendering
//!
//! Covers placeholder substitution and blank-line collapsing over
//! generated templates.

use proptest::prelude::*;
use sdkgen_core::StubParams;
use sdkgen_core::stub::{collapse_blank_lines, substitute};

// Strategy: brace-free text, so the only placeholders are the ones we insert
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .;()\n]{0,40}"
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,8}"
}

// Strategy: template built from text segments and placeholders
fn arb_template(keys: Vec<String>) -> impl Strategy<Value = String> {
    prop::collection::vec((arb_text(), prop::sample::select(keys)), 0..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(text, key)| format!("{text}{{{{{key}}}}}"))
            .collect()
    })
}

fn arb_keys_and_template() -> impl Strategy<Value = (Vec<String>, String)> {
    prop::collection::vec(arb_key(), 1..5)
        .prop_flat_map(|keys| (Just(keys.clone()), arb_template(keys)))
}

proptest! {
    /// Property: placeholders without a supplied value are left untouched
    #[test]
    fn proptest_render_absent_keys_untouched((_keys, template) in arb_keys_and_template()) {
        let rendered = substitute(&template, &StubParams::new());

        prop_assert_eq!(rendered, template);
    }

    /// Property: every supplied key leaves no `{{key}}` token behind
    #[test]
    fn proptest_render_supplied_keys_fully_replaced(
        (keys, template) in arb_keys_and_template(),
        value in "[a-z0-9 ]{0,12}",
    ) {
        let params: StubParams = keys.iter().map(|k| (k.as_str(), value.as_str())).collect();

        let rendered = substitute(&template, &params);

        for key in &keys {
            let token = format!("{{{{{key}}}}}");
            prop_assert!(!rendered.contains(&token), "{} survived in {:?}", token, rendered);
        }
    }

    /// Property: a substituted value is never rendered a second time
    #[test]
    fn proptest_render_values_not_rescanned(key in arb_key(), other in arb_key()) {
        prop_assume!(key != other);
        let value = format!("{{{{{other}}}}}");
        let params = StubParams::new()
            .with(key.as_str(), value.as_str())
            .with(other.as_str(), "X");

        let rendered = substitute(&format!("<{{{{{key}}}}}>"), &params);

        prop_assert_eq!(rendered, format!("<{value}>"));
    }

    /// Property: N >= 2 blank lines become exactly one, N <= 1 is unchanged
    #[test]
    fn proptest_collapse_blank_runs(
        before in "[a-z]{1,10}",
        after in "[a-z]{1,10}",
        blanks in 0usize..6,
    ) {
        let input = format!("{before}\n{}{after}\n", "\n".repeat(blanks));

        let collapsed = collapse_blank_lines(&input);

        let expected_blanks = blanks.min(1);
        prop_assert_eq!(collapsed, format!("{before}\n{}{after}\n", "\n".repeat(expected_blanks)));
    }

    /// Property: collapsing is idempotent
    #[test]
    fn proptest_collapse_idempotent(text in "[a-z \n]{0,80}") {
        let once = collapse_blank_lines(&text);

        prop_assert_eq!(collapse_blank_lines(&once), once);
    }
}
