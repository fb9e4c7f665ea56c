//! Defines the [`Page`] type: one source document and the HTML file it is
//! rendered to.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// The extension given to every rendered page.
pub const HTML_EXTENSION: &str = "html";

/// Represents one source document. The target path and link are derived from
/// the source path and the target directory when the page is created and
/// never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    source_path: PathBuf,
    target_path: PathBuf,
    title: String,
    link: String,
}

impl Page {
    /// Creates a [`Page`] for `source_path`, reading the file only as far as
    /// its first non-blank line, which becomes the title.
    pub fn new(source_path: &Path, target_dir: &Path) -> io::Result<Page> {
        let title = first_non_blank_line(BufReader::new(File::open(source_path)?))?;
        Ok(Page::with_title(source_path, target_dir, title))
    }

    /// Creates a [`Page`] with an already known title. Nothing is read from
    /// disk.
    pub fn with_title(source_path: &Path, target_dir: &Path, title: String) -> Page {
        let target_path = target_path(source_path, target_dir);
        let link = target_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Page {
            source_path: source_path.to_owned(),
            target_path,
            title,
            link,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The target file's name, used as the `href` of links between pages.
    pub fn link(&self) -> &str {
        &self.link
    }
}

/// Maps `{dir}/{stem}.{ext}` to `{target_dir}/{stem}.html`.
pub fn target_path(source_path: &Path, target_dir: &Path) -> PathBuf {
    // `with_extension` would clobber a dotted stem like `v1.2-notes`.
    let stem = source_path.file_stem().unwrap_or(source_path.as_os_str());
    let mut file_name = stem.to_owned();
    file_name.push(".");
    file_name.push(HTML_EXTENSION);
    target_dir.join(file_name)
}

/// Bytes that aren't valid UTF-8 are replaced, so a title can always be read.
fn first_non_blank_line<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(String::new());
        }
        let decoded = String::from_utf8_lossy(&line);
        let trimmed = decoded.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_owned());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_title_is_first_non_blank_line() -> io::Result<()> {
        let input = "\n   \n  Banana split  \nsecond line\n";
        assert_eq!("Banana split", first_non_blank_line(input.as_bytes())?);
        Ok(())
    }

    #[test]
    fn test_title_of_latin1_file_is_decoded_lossily() -> io::Result<()> {
        let input: &[u8] = b"\r\n  Caf\xe9 cr\xe8me\r\nmore\n";
        assert_eq!("Caf\u{fffd} cr\u{fffd}me", first_non_blank_line(input)?);
        Ok(())
    }

    #[test]
    fn test_title_of_blank_file_is_empty() -> io::Result<()> {
        assert_eq!("", first_non_blank_line("\n\n \t\n".as_bytes())?);
        Ok(())
    }

    #[test]
    fn test_target_path_and_link() {
        let page = Page::with_title(
            Path::new("/src/notes/fruit.txt"),
            Path::new("/out"),
            String::from("Fruit"),
        );
        assert_eq!(Path::new("/out/fruit.html"), page.target_path());
        assert_eq!("fruit.html", page.link());
        assert_eq!("Fruit", page.title());
    }

    #[test]
    fn test_target_path_keeps_dotted_stem() {
        assert_eq!(
            PathBuf::from("/out/v1.2-notes.html"),
            target_path(Path::new("/src/v1.2-notes.txt"), Path::new("/out")),
        );
    }

    #[test]
    fn test_new_reads_title_from_disk() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("apple.txt");
        std::fs::write(&source, "\n\nApple\n\nApples are red.\n")?;
        let page = Page::new(&source, &dir.path().join("html"))?;
        assert_eq!("Apple", page.title());
        assert_eq!(dir.path().join("html").join("apple.html"), page.target_path());
        Ok(())
    }
}
