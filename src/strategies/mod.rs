//! Page-layout specific extractors.
//!
//! Each strategy recognises one known listing layout and turns it into
//! [`Record`]s. Strategies are independent: none of them shares selectors
//! with another, and none of them fails. A layout that is not present simply
//! yields no records.

pub mod chart_table;
pub mod lister_list;
pub mod summary_list;

use scraper::{ElementRef, Selector};

use crate::document::Document;
use crate::types::Record;

pub use chart_table::ChartTableStrategy;
pub use lister_list::ListerListStrategy;
pub use summary_list::SummaryListStrategy;

/// Core trait that every listing layout implements
pub trait ExtractionStrategy: Send + Sync {
    /// Stable identifier used in logs and CLI output
    fn name(&self) -> &'static str;

    /// Extracts every titled item of this layout, in document order.
    fn extract(&self, document: &Document) -> Vec<Record>;
}

/// All strategies in the fixed order the pipeline tries them.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(ChartTableStrategy),
        Box::new(ListerListStrategy),
        Box::new(SummaryListStrategy),
    ]
}

/// Element text with whitespace runs collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant matching `selector`.
pub(crate) fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Text of the first descendant matching `selector`, if it has any.
pub(crate) fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    first(element, selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Substring match on the `class` attribute, so multi-token values such as
/// `"lister-item mode-advanced"` still match `"lister-item"`.
pub(crate) fn class_contains(element: ElementRef<'_>, token: &str) -> bool {
    element
        .value()
        .attr("class")
        .map_or(false, |class| class.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::get_strategy_names;

    #[test]
    fn strategies_follow_priority_order() {
        let names: Vec<_> = default_strategies().iter().map(|s| s.name()).collect();
        assert_eq!(names, get_strategy_names());
    }

    #[test]
    fn empty_document_matches_nothing() {
        let document = Document::parse("<html><body><p>Nothing here</p></body></html>");
        for strategy in default_strategies() {
            assert!(strategy.extract(&document).is_empty(), "{}", strategy.name());
        }
    }

    #[test]
    fn text_helpers_collapse_whitespace() {
        let document = Document::parse(
            r#"<div class="outer box"><span>  The
                 Godfather </span><b></b></div>"#,
        );
        let div = Selector::parse("div").unwrap();
        let span = Selector::parse("span").unwrap();
        let bold = Selector::parse("b").unwrap();
        let root = document.html().select(&div).next().unwrap();
        assert_eq!(first_text(root, &span).as_deref(), Some("The Godfather"));
        assert_eq!(first_text(root, &bold), None);
        assert!(class_contains(root, "box"));
        assert!(class_contains(root, "out"));
        assert!(!class_contains(root, "inner"));
    }
}
