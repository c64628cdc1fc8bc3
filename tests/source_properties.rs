// tests/source_properties.rs

use proptest::prelude::*;

use threadme::source::{JobSource, JobTotal};
use threadme::template::materialize;

proptest! {
    #[test]
    fn count_source_yields_every_index_once_in_order(n in 0u64..500) {
        let src = JobSource::count(n);
        prop_assert_eq!(src.total(), JobTotal::Finite(n));

        let items: Vec<_> = src.collect();
        prop_assert_eq!(items.len() as u64, n);
        for (pos, item) in items.iter().enumerate() {
            prop_assert_eq!(item.index, pos as u64);
            prop_assert_eq!(item.line.clone(), Some(pos.to_string()));
        }
    }

    #[test]
    fn line_source_preserves_lines_and_positions(
        lines in proptest::collection::vec("[a-zA-Z0-9 _.-]{0,12}", 0..40)
    ) {
        let items: Vec<_> = JobSource::lines(lines.clone()).collect();
        prop_assert_eq!(items.len(), lines.len());
        for (pos, (item, line)) in items.iter().zip(&lines).enumerate() {
            prop_assert_eq!(item.index, pos as u64);
            prop_assert_eq!(item.line.as_deref(), Some(line.as_str()));
        }
    }

    #[test]
    fn templates_without_placeholders_are_unchanged(
        template in "[^{}]{0,40}",
        index in any::<u64>(),
        line in proptest::option::of("[a-z]{0,8}"),
    ) {
        prop_assert_eq!(materialize(&template, index, line.as_deref()), template);
    }

    #[test]
    fn no_placeholder_survives_when_a_line_exists(
        prefix in "[a-z ]{0,10}",
        index in any::<u64>(),
        line in "[a-z0-9]{0,8}",
    ) {
        let template = format!("{prefix}{{{{N}}}} {{{{LINE}}}}{prefix}{{{{LINE}}}}");
        let cmd = materialize(&template, index, Some(&line));
        prop_assert!(!cmd.contains("{{N}}"));
        prop_assert!(!cmd.contains("{{LINE}}"));
        prop_assert_eq!(cmd, format!("{prefix}{index} {line}{prefix}{line}"));
    }
}
