//! Defines the page [`Template`]. A template is plain HTML with one
//! `@@CONTENTS` marker line; the converted content of a page (or the
//! generated contents listing) is inserted in place of that line. Tags in the
//! template are resolved later along with the tags of the page itself (see
//! [`crate::tags`]).

use crate::catalog::PageCatalog;
use std::path::Path;

/// The line a page's content is inserted at, compared trimmed and
/// case-insensitively.
pub const CONTENTS_MARKER: &str = "@@CONTENTS";

/// Used when no template is given or the given one can't be read.
const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta http-equiv="X-UA-Compatible" content="IE=edge">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>@@TITLE</title>
    <style>
      html { padding: 10px 10px 200px; }
      body {
        margin: 0 auto; max-width: 768px; line-height: 1.6em;
        padding: 0.5em; font-family: sans-serif;
      }
      p { font-size: 16px; }
      th, td { border: #ccc 1px solid; padding: 0.2em; }
      .page-nav { display: flex; justify-content: space-between; margin: 2em 0; }
      .page-nav-next { margin-left: auto; }
    </style>
  </head>
  <body>
    <div id="page">

          <article>
@@CONTENTS
          </article>

          @@PAGE-NAV

    </div> <!-- Page -->
  </body>
</html>"#;

/// A template split into lines, line terminators removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
}

impl Default for Template {
    fn default() -> Self {
        Template::parse(DEFAULT_TEMPLATE)
    }
}

impl Template {
    pub fn parse(text: &str) -> Template {
        Template {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    /// Loads the template at `path`. A missing or unreadable file isn't an
    /// error: the built-in template is used instead.
    pub fn load(path: Option<&Path>) -> Template {
        let template = match path {
            None => Template::default(),
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => {
                    tracing::debug!(template = %path.display(), "Loaded template");
                    Template::parse(&text)
                }
                Err(e) => {
                    tracing::warn!(
                        template = %path.display(),
                        error = %e,
                        "Template not readable, using the default instead"
                    );
                    Template::default()
                }
            },
        };
        if !template.has_marker() {
            tracing::warn!(
                "Template has no {} line; page content will be dropped",
                CONTENTS_MARKER
            );
        }
        template
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn has_marker(&self) -> bool {
        self.lines.iter().any(|line| is_marker(line))
    }

    /// Copies the template, replacing the marker line with `content`, one
    /// output line per content line. Without a marker the template comes back
    /// unchanged and `content` is dropped.
    pub fn apply(&self, content: &[String]) -> Vec<String> {
        let mut output = Vec::with_capacity(self.lines.len() + content.len());
        for line in &self.lines {
            if is_marker(line) {
                output.extend(content.iter().cloned());
            } else {
                output.push(line.clone());
            }
        }
        output
    }
}

fn is_marker(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(CONTENTS_MARKER)
}

/// Generates the content of the contents page: a list of links to every page,
/// in the catalog's current order.
pub fn index_listing(catalog: &PageCatalog) -> Vec<String> {
    let mut lines = Vec::with_capacity(catalog.len() + 3);
    lines.push(String::from("<h2>Contents</h2>"));
    lines.push(String::from("<ul>"));
    for page in catalog {
        lines.push(format!(
            "<li><a href='{}'>{}</a></li>",
            page.link(),
            page.title()
        ));
    }
    lines.push(String::from("</ul>"));
    lines
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_strips_line_terminators() {
        let template = Template::parse("<html>\r\n<body>\n</body>\n");
        assert_eq!(strings(&["<html>", "<body>", "</body>"]), template.lines());
    }

    #[test]
    fn test_apply_inserts_each_content_line() {
        let template = Template::parse("<body>\n  @@contents  \n</body>");
        let output = template.apply(&strings(&["<p>one</p>", "<p>two</p>"]));
        assert_eq!(
            strings(&["<body>", "<p>one</p>", "<p>two</p>", "</body>"]),
            output,
        );
    }

    #[test]
    fn test_apply_without_marker_drops_content() {
        let template = Template::parse("<body>\n<p>@@CONTENTS here</p>\n</body>");
        assert!(!template.has_marker());
        let output = template.apply(&strings(&["<p>x</p>"]));
        assert_eq!(template.lines(), output.as_slice());
    }

    #[test]
    fn test_apply_empty_template() {
        let template = Template::parse("");
        assert!(template.apply(&strings(&["<p>x</p>"])).is_empty());
    }

    #[test]
    fn test_default_template_has_marker_and_title() {
        let template = Template::default();
        assert!(template.has_marker());
        assert!(template.lines().iter().any(|l| l.contains("<title>@@TITLE</title>")));
    }

    #[test]
    fn test_load_missing_template_falls_back_to_default() {
        let template = Template::load(Some(Path::new("/definitely/not/here.html")));
        assert_eq!(Template::default(), template);
    }

    #[test]
    fn test_load_reads_template_file() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<main>\n@@CONTENTS\n</main>\n")?;
        let template = Template::load(Some(&path));
        assert_eq!(strings(&["<main>", "@@CONTENTS", "</main>"]), template.lines());
        Ok(())
    }

    #[test]
    fn test_index_listing_follows_catalog_order() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        catalog.add_titled(Path::new("/src/b.txt"), "Banana");
        catalog.add_titled(Path::new("/src/a.txt"), "Apple");
        catalog.sort_by_title();
        assert_eq!(
            strings(&[
                "<h2>Contents</h2>",
                "<ul>",
                "<li><a href='a.html'>Apple</a></li>",
                "<li><a href='b.html'>Banana</a></li>",
                "</ul>",
            ]),
            index_listing(&catalog),
        );
    }
}
