//! Markdown to styled HTML rendering for upload.

use pulldown_cmark::{html, Options, Parser};

/// Corporate table styling injected into every rendered document: red
/// repeated header row, bordered data cells, left/middle alignment.
const TABLE_CSS: &str = "\
table { border-collapse: collapse; width: 100%; margin-bottom: 20px; }
th {
    background-color: #F00000;
    color: #FFFFFF;
    font-weight: bold;
    text-align: left;
    vertical-align: middle;
    padding: 8px;
    border: 1px solid #999999;
}
td {
    background-color: transparent;
    color: #000000;
    text-align: left;
    vertical-align: middle;
    padding: 8px;
    border: 1px solid #999999;
}
";

/// Renders markdown to a complete HTML document with the corporate
/// stylesheet. `extra_css` is layered before the table styling so the
/// built-in rules win on conflicts.
#[must_use]
pub fn render_document(markdown: &str, extra_css: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut body = String::new();
    html::push_html(&mut body, parser);

    format!(
        "<html>\n<head>\n<style>\n{extra_css}\n{TABLE_CSS}</style>\n</head>\n<body>{body}</body>\n</html>\n"
    )
}
