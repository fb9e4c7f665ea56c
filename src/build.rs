//! Exports the [`build_site`] function which stitches together the high-level
//! steps of a run: resolving paths ([`crate::config`]), discovering sources
//! ([`crate::discover`]), filling and sorting the [`PageCatalog`], and running
//! every page through the [`Pipeline`].
//!
//! Each page goes through the same states, one page fully finished before the
//! next starts:
//!
//! 1. Loaded: the source lines are read.
//! 2. Converted: the [`Converter`] turns them into HTML lines.
//! 3. Templated: the [`Template`] is wrapped around them.
//! 4. Resolved: the [`TagResolver`] replaces the tags.
//! 5. Written: the result goes to the page's target path.
//!
//! The contents page skips the conversion; its content is the
//! [`index_listing`] of the catalog.

use crate::catalog::PageCatalog;
use crate::config::{self, Config};
use crate::discover::discover;
use crate::markup::{Converter, MarkdownConverter};
use crate::page::Page;
use crate::tags::TagResolver;
use crate::template::{index_listing, Template};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The file name of the contents page.
pub const INDEX_FILE_NAME: &str = "index.html";

/// What every page of a run shares. Built once per run and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildContext {
    /// The directory pages are written to.
    pub target_dir: PathBuf,

    /// The title of the contents page.
    pub site_title: String,

    /// The build time `@@DATE` is resolved from, so every page of a run shows
    /// the same date.
    pub now: NaiveDateTime,
}

/// Counts what a run wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub index: bool,
}

/// Renders the pages of a [`PageCatalog`]. The catalog must be complete and
/// sorted before the pipeline is created, since navigation is resolved
/// against its order.
pub struct Pipeline<'a> {
    ctx: &'a BuildContext,
    catalog: &'a PageCatalog,
    template: &'a Template,
    converter: &'a dyn Converter,
    tags: TagResolver<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        catalog: &'a PageCatalog,
        template: &'a Template,
        converter: &'a dyn Converter,
    ) -> Pipeline<'a> {
        Pipeline {
            ctx,
            catalog,
            template,
            converter,
            tags: TagResolver::new(ctx, catalog),
        }
    }

    /// Writes the contents page (when `contents` is set) and then every page
    /// in catalog order. The first failure stops the run.
    pub fn build_all(&self, contents: bool) -> Result<BuildSummary> {
        let mut summary = BuildSummary::default();
        if contents {
            self.build_index()?;
            summary.index = true;
        }
        for page in self.catalog {
            self.build_page(page)?;
            summary.pages += 1;
        }
        Ok(summary)
    }

    /// Renders one page from its source file to its target file.
    pub fn build_page(&self, page: &Page) -> Result<()> {
        tracing::info!(source = %page.source_path().display(), "Processing");
        let source = load_lines(page.source_path())?;
        let content = self.converter.convert(&source);
        let templated = self.template.apply(&content);
        let resolved = self
            .tags
            .resolve(&templated, page.source_path(), page.title());
        write_page(page.target_path(), &resolved)
    }

    /// Renders the contents page into `{target_dir}/index.html`. That path
    /// also stands in for its source; it isn't in the catalog, so its
    /// navigation links are empty.
    pub fn build_index(&self) -> Result<()> {
        let target = self.ctx.target_dir.join(INDEX_FILE_NAME);
        tracing::info!(page = %target.display(), "Writing contents page");
        let templated = self.template.apply(&index_listing(self.catalog));
        let resolved = self
            .tags
            .resolve(&templated, &target, &self.ctx.site_title);
        write_page(&target, &resolved)
    }
}

/// Builds the site described by a [`Config`]: saves the configuration if
/// asked to, resolves paths, discovers and catalogs the sources, and renders
/// every page with the markdown converter.
pub fn build_site(config: &Config) -> Result<BuildSummary> {
    if let Some(save) = &config.save {
        config.save(save)?;
        tracing::info!(path = %save.display(), "Saved configuration");
    }

    let paths = config.resolve()?;
    let sources = discover(&paths.source)?;
    if sources.is_empty() {
        return Err(Error::NoDocuments(paths.source));
    }
    paths.create_target()?;

    let template = Template::load(config.template.as_deref());

    let mut catalog = PageCatalog::new(&paths.target);
    for source in &sources {
        catalog.add(source).map_err(|err| Error::Read {
            path: source.clone(),
            err,
        })?;
    }
    catalog.sort(config.sort);

    let ctx = BuildContext {
        target_dir: paths.target,
        site_title: paths.site_title,
        now: chrono::Local::now().naive_local(),
    };
    let summary =
        Pipeline::new(&ctx, &catalog, &template, &MarkdownConverter).build_all(config.contents)?;
    tracing::info!(
        pages = summary.pages,
        index = summary.index,
        output = %ctx.target_dir.display(),
        "Build complete"
    );
    Ok(summary)
}

/// Reads the lines of a source document. Bytes that aren't valid UTF-8 are
/// replaced rather than failing the page.
fn load_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_owned)
        .collect())
}

/// Writes `lines` to `path`, joined with newlines. If writing them in one go
/// fails, the page is written again line by line before giving up.
pub fn write_page(path: &Path, lines: &[String]) -> Result<()> {
    write_page_with(path, lines, |path, contents| std::fs::write(path, contents))
}

/// [`write_page`] with the bulk write supplied by the caller.
fn write_page_with<F>(path: &Path, lines: &[String], write_all: F) -> Result<()>
where
    F: FnOnce(&Path, &str) -> io::Result<()>,
{
    if let Err(e) = write_all(path, &lines.join("\n")) {
        tracing::warn!(
            page = %path.display(),
            error = %e,
            "Writing page failed, retrying line by line"
        );
        write_lines(path, lines).map_err(|err| Error::Write {
            path: path.to_owned(),
            err,
        })?;
    }
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            w.write_all(b"\n")?;
        }
        w.write_all(line.as_bytes())?;
    }
    w.flush()
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Configuration problems stop a run
/// before anything is written; read and write problems stop it at the page
/// that failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned for configuration problems, e.g. a missing source path.
    #[error(transparent)]
    Config(#[from] config::Error),

    /// Returned when the source path holds no documents.
    #[error("No source documents found in '{}'", .0.display())]
    NoDocuments(PathBuf),

    /// Returned for errors walking the source directory.
    #[error("Discovering source documents: {0}")]
    Discover(#[from] walkdir::Error),

    /// Returned when a source document can't be read.
    #[error("Reading '{}': {err}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: io::Error,
    },

    /// Returned when a page can't be written, even line by line.
    #[error("Writing '{}': {err}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
}
