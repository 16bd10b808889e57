// src/bulletin/extract.rs
//
// The bulletin page is an HTML wrapper around one big <pre> block that
// holds the actual tabular data. We only want that block's inner text.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PRE: Lazy<Selector> = Lazy::new(|| Selector::parse("pre").expect("valid selector"));

/// Return the text content of the first `<pre>` block in `html`.
///
/// A page without a `<pre>` block yields an empty string, not an error;
/// downstream parsing on empty input produces zero records.
pub fn preformatted_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    match doc.select(&PRE).next() {
        Some(pre) => pre.text().collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_inner_text_of_first_pre() {
        let html = "<html><body><h1>Son Depremler</h1>\
                    <pre>line one\nline two</pre>\
                    <pre>ignored</pre></body></html>";
        assert_eq!(preformatted_text(html), "line one\nline two");
    }

    #[test]
    fn missing_pre_yields_empty_string() {
        let html = "<html><body><p>bakım çalışması</p></body></html>";
        assert_eq!(preformatted_text(html), "");
    }
}
