//! Resolves the `@@NAME` tags of a rendered page.
//!
//! A tag is referenced as `@@NAME` and declared as `@@NAME:"replacement"`,
//! where `NAME` is made of letters, digits, `-` and `_` and compares
//! case-insensitively. Declarations may appear anywhere in the template or the
//! page, before or after the references they supply, so resolution runs in two
//! passes:
//!
//! 1. [`harvest`] finds every declaration, records it, and removes it from its
//!    line. The declarations of the system tags `@@DATE` and `@@PAGE-NAV` are
//!    reduced to the bare tag instead, so the value shows where they were
//!    declared.
//! 2. [`substitute`] replaces every reference in a single left-to-right pass
//!    per line. Replacement text isn't rescanned, and a reference to a tag
//!    that is neither declared nor a system tag is left as it is.
//!
//! References match whole names only: `@@CSS` doesn't match the start of
//! `@@CSS-DARK`.

use crate::build::BuildContext;
use crate::catalog::{Adjacent, PageCatalog};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// Replaced with the page title.
pub const TITLE: &str = "TITLE";

/// Replaced with the build date. A declaration's value is a `strftime`
/// format.
pub const DATE: &str = "DATE";

/// Replaced with links to the previous and next pages.
pub const PAGE_NAV: &str = "PAGE-NAV";

/// Format used for `@@DATE` when no declaration gives one, e.g.
/// `05 March 2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%d %B %Y";

/// A tag, optionally followed by a quoted declaration value. The name is
/// greedy, so it always spans the whole identifier.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@@([A-Za-z0-9_-]+)(?::"([^"]*)")?"#).expect("tag pattern is valid")
});

/// Resolves the tags of the pages of one run. Holds what every page shares:
/// the build time and the catalog the navigation is computed from.
pub struct TagResolver<'a> {
    catalog: &'a PageCatalog,
    now: NaiveDateTime,
}

impl<'a> TagResolver<'a> {
    pub fn new(ctx: &BuildContext, catalog: &'a PageCatalog) -> TagResolver<'a> {
        TagResolver {
            catalog,
            now: ctx.now,
        }
    }

    /// Resolves the tags in `lines`, the templated output of the page at
    /// `current`. `title` is used for `@@TITLE` unless the page declares its
    /// own.
    pub fn resolve(&self, lines: &[String], current: &Path, title: &str) -> Vec<String> {
        let (lines, declarations) = harvest(lines, title);
        let system = SystemTags {
            title,
            date: self.date(declarations.date_format.as_deref()),
            navigation: navigation(self.catalog.adjacent_to(current)),
        };
        substitute(&lines, &declarations, &system)
    }

    fn date(&self, format: Option<&str>) -> String {
        if let Some(format) = format {
            match format_date(&self.now, format) {
                Some(date) => return date,
                None => tracing::warn!(format, "Invalid @@DATE format, using the default"),
            }
        }
        format_date(&self.now, DEFAULT_DATE_FORMAT).unwrap_or_default()
    }
}

/// The tag values collected by [`harvest`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Declared names (upper-cased) and their values in order of first
    /// declaration. A name declared again takes the later value.
    values: Vec<(String, String)>,

    /// The format given by the last `@@DATE` declaration with a non-empty
    /// value.
    date_format: Option<String>,
}

impl Declarations {
    fn declare(&mut self, name: String, value: String) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The values of the system tags for one page.
struct SystemTags<'a> {
    title: &'a str,
    date: String,
    navigation: String,
}

/// First pass: records every declaration and removes it from its line.
///
/// * `@@PAGE-NAV:"..."` is reduced to `@@PAGE-NAV`; the value is ignored.
/// * `@@DATE:"format"` is reduced to `@@DATE` and sets the date format.
/// * `@@TITLE:"text"` sets the title (`title` when the text is empty) and is
///   removed.
/// * any other declaration sets its tag to the trimmed text and is removed.
pub fn harvest(lines: &[String], title: &str) -> (Vec<String>, Declarations) {
    let mut declarations = Declarations::default();
    let lines: Vec<String> = lines
        .iter()
        .map(|line| {
            TAG_PATTERN
                .replace_all(line, |caps: &Captures| {
                    let Some(value) = caps.get(2) else {
                        return caps[0].to_owned();
                    };
                    let name = caps[1].to_ascii_uppercase();
                    let value = value.as_str();
                    match name.as_str() {
                        PAGE_NAV => format!("@@{}", &caps[1]),
                        DATE => {
                            if !value.is_empty() {
                                declarations.date_format = Some(value.to_owned());
                            }
                            format!("@@{}", &caps[1])
                        }
                        TITLE => {
                            let title = match value.is_empty() {
                                true => title,
                                false => value,
                            };
                            declarations.declare(name, title.to_owned());
                            String::new()
                        }
                        _ => {
                            declarations.declare(name, value.trim().to_owned());
                            String::new()
                        }
                    }
                })
                .into_owned()
        })
        .collect();
    (lines, declarations)
}

/// Second pass: replaces every reference with its declared value or system
/// value. Undeclared tags without a system meaning are left untouched.
fn substitute(lines: &[String], declarations: &Declarations, system: &SystemTags) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            TAG_PATTERN
                .replace_all(line, |caps: &Captures| -> String {
                    let name = &caps[1];
                    if let Some(value) = declarations.get(name) {
                        return value.to_owned();
                    }
                    match name.to_ascii_uppercase().as_str() {
                        TITLE => system.title.to_owned(),
                        DATE => system.date.clone(),
                        PAGE_NAV => system.navigation.clone(),
                        _ => caps[0].to_owned(),
                    }
                })
                .into_owned()
        })
        .collect()
}

/// Formats `now`, or returns `None` if `format` isn't a usable `strftime`
/// format.
fn format_date(now: &NaiveDateTime, format: &str) -> Option<String> {
    use std::fmt::Write;

    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    // Fields a naive date can't supply (e.g. `%z`) fail here rather than
    // panicking in `to_string`.
    let mut out = String::new();
    write!(out, "{}", now.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

/// Builds the `@@PAGE-NAV` fragment: a back link to the previous page and a
/// next link to the following one, each left out when there is no such page.
fn navigation(adjacent: Adjacent) -> String {
    let mut nav = String::from(r#"<nav class="page-nav">"#);
    if let Some(previous) = adjacent.previous {
        nav.push_str(&format!(
            r#"<a class="page-nav-back" href="{}">&laquo; {}</a>"#,
            previous.link(),
            previous.title(),
        ));
    }
    if let Some(next) = adjacent.next {
        nav.push_str(&format!(
            r#"<a class="page-nav-next" href="{}">{} &raquo;</a>"#,
            next.link(),
            next.title(),
        ));
    }
    nav.push_str("</nav>");
    nav
}
