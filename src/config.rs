//! Defines the run [`Config`] record, its JSON sidecar format, and the logic
//! for resolving the source and target paths of a run.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The name of the directory created under a source directory when no target
/// is given.
const DEFAULT_TARGET_DIRECTORY: &str = "html";

/// How the catalog is ordered before anything is written. The order drives
/// both the contents page and the previous/next navigation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Keep the order in which the files were discovered.
    #[default]
    Unsorted,

    /// Order by page title.
    Title,

    /// Order by full source path.
    File,
}

/// Every option of a run. This is what the command line produces and what a
/// saved sidecar file holds, so a saved run can be replayed as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The source directory or single source file. Defaults to the current
    /// directory.
    pub source: Option<PathBuf>,

    /// The directory pages are written to. See [`Config::resolve`] for the
    /// defaults.
    pub target: Option<PathBuf>,

    /// The HTML template wrapped around every page.
    pub template: Option<PathBuf>,

    /// Lists each file as it is processed.
    pub verbose: bool,

    /// Generates an `index.html` contents page.
    pub contents: bool,

    pub sort: SortMode,

    /// Where to save this configuration before building.
    #[serde(skip_serializing)]
    pub save: Option<PathBuf>,
}

impl Config {
    /// Loads a configuration previously written by [`Config::save`].
    pub fn load(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| Error::Json {
            path: path.to_owned(),
            err,
        })
    }

    /// Writes the configuration to `path` as pretty-printed JSON. The `save`
    /// field itself is left out so replaying the file does not save again.
    pub fn save(&self, path: &Path) -> Result<()> {
        let open_err = |err| Error::Open {
            path: path.to_owned(),
            err,
        };
        let mut w = BufWriter::new(File::create(path).map_err(open_err)?);
        serde_json::to_writer_pretty(&mut w, self).map_err(|err| Error::Json {
            path: path.to_owned(),
            err,
        })?;
        w.write_all(b"\n").map_err(open_err)?;
        w.flush().map_err(open_err)
    }

    /// Resolves the source and target paths of the run and derives the site
    /// title. Nothing is created on disk; see [`ResolvedPaths::create_target`].
    ///
    /// * a missing source is an error;
    /// * without a target, a directory source is rendered into
    ///   `{source}/html` and a file source next to itself.
    pub fn resolve(&self) -> Result<ResolvedPaths> {
        let source = match &self.source {
            Some(source) => absolute(source)?,
            None => std::env::current_dir().map_err(Error::CurrentDir)?,
        };
        if !source.exists() {
            return Err(Error::SourceNotFound(source));
        }

        let source_is_dir = source.is_dir();
        let site_title = if source_is_dir {
            source.file_name()
        } else {
            source.file_stem()
        }
        .map(|name| title_case(&name.to_string_lossy()))
        .unwrap_or_default();

        let target = match &self.target {
            Some(target) => absolute(target)?,
            None if source_is_dir => source.join(DEFAULT_TARGET_DIRECTORY),
            None => source
                .parent()
                .map(Path::to_owned)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        Ok(ResolvedPaths {
            source,
            target,
            site_title,
        })
    }
}

/// The output of [`Config::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Absolute source directory or file.
    pub source: PathBuf,

    /// Absolute target directory. It may not exist yet.
    pub target: PathBuf,

    /// Title derived from the source name, used for the contents page.
    pub site_title: String,
}

impl ResolvedPaths {
    /// Creates the target directory and any missing parents.
    pub fn create_target(&self) -> Result<()> {
        std::fs::create_dir_all(&self.target).map_err(|err| Error::CreateTarget {
            path: self.target.clone(),
            err,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_owned())
    } else {
        Ok(std::env::current_dir()
            .map_err(Error::CurrentDir)?
            .join(path))
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest, the
/// way a directory name like `my_notes` becomes `My_Notes`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

/// Represents the result of a configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a configuration error. None of these let a build start.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the source path does not exist.
    #[error("Path not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Returned when the current directory can't be determined.
    #[error("Getting current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Returned when the target directory can't be created.
    #[error("Creating target directory '{}': {err}", path.display())]
    CreateTarget {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned for I/O problems opening or writing a configuration file.
    #[error("Opening configuration file '{}': {err}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// Returned when a configuration file isn't valid JSON.
    #[error("Parsing configuration file '{}': {err}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        err: serde_json::Error,
    },
}
