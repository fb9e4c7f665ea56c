//! Finds the source documents of a run.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of the files picked up from a source directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["txt"];

/// Returns the source documents under `source`. A directory yields its direct
/// children with a recognised extension, sorted by file name; a file yields
/// itself whatever its extension.
pub fn discover(source: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    if !source.is_dir() {
        return Ok(vec![source.to_owned()]);
    }

    let mut files = Vec::new();
    for result in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = result?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_source_file(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => SOURCE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_discover_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("b.txt"), "B")?;
        std::fs::write(dir.path().join("a.TXT"), "A")?;
        std::fs::write(dir.path().join("notes.md"), "skipped")?;
        std::fs::create_dir(dir.path().join("html"))?;
        std::fs::write(dir.path().join("html").join("c.txt"), "nested")?;

        assert_eq!(
            vec![dir.path().join("a.TXT"), dir.path().join("b.txt")],
            discover(dir.path())?,
        );
        Ok(())
    }

    #[test]
    fn test_discover_single_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("readme.text");
        std::fs::write(&file, "Readme")?;
        assert_eq!(vec![file.clone()], discover(&file)?);
        Ok(())
    }

    #[test]
    fn test_discover_empty_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(discover(dir.path())?.is_empty());
        Ok(())
    }
}
