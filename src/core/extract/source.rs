use crate::config::MarkerConfig;
use crate::core::{
    call_site::{CallMatch, CallSiteMatcher},
    data::{LocalizableString, SourceText},
    diagnostics::Diagnostics,
};

/// Walks a source buffer and resolves every marker call site in source order.
///
/// Several marker names can be active at once; their occurrences are merged so
/// the output order is always the order of appearance in the file.
#[derive(Debug, Clone)]
pub struct SourceExtractor {
    matchers: Vec<CallSiteMatcher>,
}

impl SourceExtractor {
    pub fn new(matchers: Vec<CallSiteMatcher>) -> Self {
        Self { matchers }
    }

    /// Extractor for `markers`, each treating `static_receivers` as plain-call receivers.
    pub fn for_markers<M, R>(markers: &[M], static_receivers: &[R]) -> Self
    where
        M: AsRef<str>,
        R: AsRef<str>,
    {
        let matchers = markers
            .iter()
            .map(|name| {
                CallSiteMatcher::new(name.as_ref()).with_static_receivers(static_receivers)
            })
            .collect();
        Self::new(matchers)
    }

    /// Extractor for the configured marker methods and their call shapes.
    pub fn from_config(markers: &MarkerConfig) -> Self {
        let matchers = Self::for_markers(&markers.methods, &markers.static_receivers)
            .matchers
            .into_iter()
            .map(|matcher| {
                let shapes = markers.shapes_for(matcher.name());
                matcher.with_shapes(shapes)
            })
            .collect();
        Self::new(matchers)
    }

    pub fn extract_str(&self, text: &str, diagnostics: &mut Diagnostics) -> Vec<LocalizableString> {
        self.extract(&SourceText::new(text), diagnostics)
    }

    pub fn extract(
        &self,
        source: &SourceText,
        diagnostics: &mut Diagnostics,
    ) -> Vec<LocalizableString> {
        let mut records = Vec::new();
        let mut cursor = 0;

        // Every iteration moves the cursor strictly forward.
        while let Some((index, matcher)) = self.next_occurrence(source, cursor) {
            let result = matcher.match_at(source, index);
            cursor = match result {
                CallMatch::Matched { end, .. } => {
                    records.extend(result.records());
                    end.max(index + matcher.name_len())
                }
                CallMatch::Rejected => index + matcher.name_len(),
                CallMatch::Malformed { at } => {
                    diagnostics.warning(format!(
                        "line {}: unterminated string literal in call to {}",
                        source.line_of(at) + 1,
                        matcher.name()
                    ));
                    index + matcher.name_len()
                }
            };
        }

        records
    }

    fn next_occurrence(&self, source: &SourceText, from: usize) -> Option<(usize, &CallSiteMatcher)> {
        self.matchers
            .iter()
            .filter_map(|matcher| matcher.find_from(source, from).map(|index| (index, matcher)))
            .min_by_key(|(index, _)| *index)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn extractor() -> SourceExtractor {
        SourceExtractor::for_markers(&["Localize"], &["Localizer"])
    }

    fn extract(text: &str) -> Vec<LocalizableString> {
        let mut diagnostics = Diagnostics::new();
        extractor().extract_str(text, &mut diagnostics)
    }

    fn record(text: &str, context: &str) -> LocalizableString {
        LocalizableString::new(text, context).unwrap()
    }

    #[test]
    fn test_about_dialog() {
        let source = r#"
            public AboutDialog()
            {
                Text = "About".Localize();
                if (addCredits)
                {
                    Version v = GetVersion();
                    credits.Add(string.Format("Example Tools (version {0}), by the tools team," +
                        " with thanks to everyone who reported bugs." +
                        " Copyright © 2014 Example Corp".Localize("{0} is the version number"), v));

                    // A commented-out copy must not be extracted.
                    //credits.Add(string.Format("Example Tools (version {0}), by the tools team," +
                    //    " with thanks to everyone who reported bugs." +
                    //    " Copyright © 2014 Example Corp".Localize("{0} is the version number"), v));
                }
            }"#;
        assert_eq!(
            extract(source),
            vec![
                record("About", ""),
                record(
                    "Example Tools (version {0}), by the tools team, with thanks to everyone \
                     who reported bugs. Copyright © 2014 Example Corp",
                    "{0} is the version number"
                ),
            ]
        );
    }

    #[test]
    fn test_default_marker_shapes() {
        let extractor = SourceExtractor::from_config(&MarkerConfig::default());
        let source = r#"
            [LocalizedDescription("Shows the grid")]
            [LocalizedName("Grid")]
            public bool ShowGrid { get; set; }

            Property(typeof(Sphere), "Radius", category, "Distance from the center");
            Property("Visible");
            LocalizedName("Grid", "ignored");"#;
        let mut diagnostics = Diagnostics::new();
        assert_eq!(
            extractor.extract_str(source, &mut diagnostics),
            vec![
                record("Shows the grid", ""),
                record("Grid", ""),
                record("Radius", ""),
                record("Distance from the center", ""),
                record("Visible", ""),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_extension_call_with_context() {
        for (text, context) in [("Save", "menu item"), ("Open file", "toolbar tooltip")] {
            let source = format!(r#"var x = "{}".Localize("{}");"#, text, context);
            assert_eq!(extract(&source), vec![record(text, context)]);
        }
    }

    #[test]
    fn test_mixed_call_styles_in_order() {
        let source = r#"
            a = Localize("first");
            b = "second".Localize();
            c = Localizer.Localize("third", "ctx");
            d = Localize("fourth" +
                         " and more");"#;
        assert_eq!(
            extract(source),
            vec![
                record("first", ""),
                record("second", ""),
                record("third", "ctx"),
                record("fourth and more", ""),
            ]
        );
    }

    #[test]
    fn test_multiple_markers_merge_in_source_order() {
        let extractor = SourceExtractor::for_markers(&["Localize", "Tr"], &[] as &[&str]);
        let mut diagnostics = Diagnostics::new();
        let records = extractor.extract_str(
            r#"Tr("one"); "two".Localize(); Tr("three", "ctx");"#,
            &mut diagnostics,
        );
        assert_eq!(
            records,
            vec![record("one", ""), record("two", ""), record("three", "ctx")]
        );
    }

    #[test]
    fn test_literal_containing_marker_name() {
        let records = extract(r#"Localize("Call Localize(\"x\") here")"#);
        assert_eq!(records, vec![record(r#"Call Localize("x") here"#, "")]);
    }

    #[test]
    fn test_empty_text_is_dropped() {
        assert_eq!(extract(r#""".Localize(); Localize("", "ctx");"#), vec![]);
    }

    #[test]
    fn test_empty_context_is_kept() {
        assert_eq!(extract(r#"Localize("text", "")"#), vec![record("text", "")]);
    }

    #[test]
    fn test_unterminated_literal_is_reported_and_scanning_continues() {
        let source = "x = Localize(\"broken);\ny = \"fine\".Localize();\nz = Localize(\"open);";
        let mut diagnostics = Diagnostics::new();
        let records = extractor().extract_str(source, &mut diagnostics);

        assert_eq!(records, vec![record("fine", "")]);
        assert_eq!(diagnostics.entries().len(), 1);
        assert_eq!(
            diagnostics.entries()[0].message,
            "line 3: unterminated string literal in call to Localize"
        );
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let source = r#""a".Localize(); Localize("b", "c");"#;
        let extractor = extractor();
        let mut diagnostics = Diagnostics::new();
        let first = extractor.extract_str(source, &mut diagnostics);
        let second = extractor.extract_str(source, &mut diagnostics);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
