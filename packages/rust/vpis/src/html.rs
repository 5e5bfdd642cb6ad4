//! Course names from the HTML course-listing page.
//!
//! The page has no semantic markup for course titles; they are the text of
//! `<span>` elements carrying the inline style `white-space:nowrap;`.

use scraper::{Html, Selector};

/// Inline style that marks a course-title span, compared with whitespace removed.
const COURSE_STYLE: &str = "white-space:nowrap";

/// Extract raw course names in document order. Empty spans are skipped.
pub fn extract_course_names(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let span_sel = Selector::parse("span[style]").unwrap();

    doc.select(&span_sel)
        .filter(|el| {
            el.value()
                .attr("style")
                .is_some_and(is_course_style)
        })
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

fn is_course_style(style: &str) -> bool {
    let compact: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.trim_end_matches(';') == COURSE_STYLE
}
