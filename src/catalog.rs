//! Defines the [`PageCatalog`], the ordered set of [`Page`]s built in one run.
//! The catalog's current order is what the contents page lists and what the
//! previous/next navigation follows, so it must be sorted before any page is
//! written.

use crate::config::SortMode;
use crate::page::Page;
use std::io;
use std::path::{Path, PathBuf};

/// The ordered collection of [`Page`]s for a run.
#[derive(Debug)]
pub struct PageCatalog {
    target_dir: PathBuf,
    pages: Vec<Page>,
}

/// The pages on either side of a page in the catalog's current order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Adjacent<'a> {
    pub previous: Option<&'a Page>,
    pub next: Option<&'a Page>,
}

impl PageCatalog {
    /// Creates an empty catalog whose pages will be rendered into
    /// `target_dir`.
    pub fn new(target_dir: &Path) -> PageCatalog {
        PageCatalog {
            target_dir: target_dir.to_owned(),
            pages: Vec::new(),
        }
    }

    /// Reads the title of `source_path` and appends a new [`Page`] for it.
    pub fn add(&mut self, source_path: &Path) -> io::Result<&Page> {
        let page = Page::new(source_path, &self.target_dir)?;
        Ok(self.push(page))
    }

    /// Appends a [`Page`] whose title is already known.
    pub fn add_titled(&mut self, source_path: &Path, title: &str) -> &Page {
        let page = Page::with_title(source_path, &self.target_dir, title.to_owned());
        self.push(page)
    }

    fn push(&mut self, page: Page) -> &Page {
        self.pages.push(page);
        &self.pages[self.pages.len() - 1]
    }

    /// Reorders the pages by title. Pages with equal titles keep their
    /// relative order.
    pub fn sort_by_title(&mut self) {
        self.pages.sort_by(|a, b| a.title().cmp(b.title()));
    }

    /// Reorders the pages by full source path.
    pub fn sort_by_file(&mut self) {
        self.pages.sort_by(|a, b| a.source_path().cmp(b.source_path()));
    }

    pub fn sort(&mut self, mode: SortMode) {
        match mode {
            SortMode::Unsorted => {}
            SortMode::Title => self.sort_by_title(),
            SortMode::File => self.sort_by_file(),
        }
    }

    /// Returns the pages before and after `source_path` in the current
    /// order. A path that isn't in the catalog has neither.
    pub fn adjacent_to(&self, source_path: &Path) -> Adjacent<'_> {
        match self.position(source_path) {
            None => Adjacent::default(),
            Some(i) => Adjacent {
                previous: match i < 1 {
                    true => None,
                    false => self.pages.get(i - 1),
                },
                next: self.pages.get(i + 1),
            },
        }
    }

    fn position(&self, source_path: &Path) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.source_path() == source_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<'a> IntoIterator for &'a PageCatalog {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fruit_catalog() -> PageCatalog {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        catalog.add_titled(Path::new("/src/B.txt"), "Banana");
        catalog.add_titled(Path::new("/src/A.txt"), "Apple");
        catalog.add_titled(Path::new("/src/C.txt"), "Cherry");
        catalog
    }

    fn titles(catalog: &PageCatalog) -> Vec<&str> {
        catalog.iter().map(Page::title).collect()
    }

    fn title_of(page: Option<&Page>) -> Option<&str> {
        page.map(Page::title)
    }

    #[test]
    fn test_unsorted_keeps_discovery_order() {
        let mut catalog = fruit_catalog();
        catalog.sort(SortMode::Unsorted);
        assert_eq!(vec!["Banana", "Apple", "Cherry"], titles(&catalog));
    }

    #[test]
    fn test_sort_by_title_then_adjacency() {
        let mut catalog = fruit_catalog();
        catalog.sort_by_title();
        assert_eq!(vec!["Apple", "Banana", "Cherry"], titles(&catalog));

        let adjacent = catalog.adjacent_to(Path::new("/src/B.txt"));
        assert_eq!(Some("Apple"), title_of(adjacent.previous));
        assert_eq!(Some("Cherry"), title_of(adjacent.next));
    }

    #[test]
    fn test_adjacency_follows_discovery_order_when_unsorted() {
        let catalog = fruit_catalog();
        let adjacent = catalog.adjacent_to(Path::new("/src/A.txt"));
        assert_eq!(Some("Banana"), title_of(adjacent.previous));
        assert_eq!(Some("Cherry"), title_of(adjacent.next));
    }

    #[test]
    fn test_sort_by_file() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        catalog.add_titled(Path::new("/src/b/zeta.txt"), "First");
        catalog.add_titled(Path::new("/src/a/omega.txt"), "Second");
        catalog.add_titled(Path::new("/src/a/alpha.txt"), "Third");
        catalog.sort(SortMode::File);
        assert_eq!(vec!["Third", "Second", "First"], titles(&catalog));
    }

    #[test]
    fn test_sort_by_title_is_stable_for_equal_titles() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        catalog.add_titled(Path::new("/src/2.txt"), "Same");
        catalog.add_titled(Path::new("/src/1.txt"), "Same");
        catalog.add_titled(Path::new("/src/0.txt"), "Alpha");
        catalog.sort_by_title();
        let order: Vec<&Path> = catalog.iter().map(Page::source_path).collect();
        assert_eq!(
            vec![
                Path::new("/src/0.txt"),
                Path::new("/src/2.txt"),
                Path::new("/src/1.txt"),
            ],
            order,
        );
    }

    #[test]
    fn test_adjacency_boundaries() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        let paths: Vec<PathBuf> = (0..5)
            .map(|i| PathBuf::from(format!("/src/{}.txt", i)))
            .collect();
        for (i, path) in paths.iter().enumerate() {
            catalog.add_titled(path, &format!("Page {}", i));
        }

        let first = catalog.adjacent_to(&paths[0]);
        assert!(first.previous.is_none());
        assert_eq!(Some("Page 1"), title_of(first.next));

        let last = catalog.adjacent_to(&paths[4]);
        assert_eq!(Some("Page 3"), title_of(last.previous));
        assert!(last.next.is_none());

        for path in &paths[1..4] {
            let adjacent = catalog.adjacent_to(path);
            assert!(adjacent.previous.is_some() && adjacent.next.is_some());
        }
    }

    #[test]
    fn test_single_page_has_no_neighbours() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        catalog.add_titled(Path::new("/src/only.txt"), "Only");
        assert_eq!(Adjacent::default(), catalog.adjacent_to(Path::new("/src/only.txt")));
    }

    #[test]
    fn test_unknown_page_has_no_neighbours() {
        let catalog = fruit_catalog();
        assert_eq!(Adjacent::default(), catalog.adjacent_to(Path::new("/src/index")));
    }

    #[test]
    fn test_add_derives_target_from_catalog_directory() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let source = dir.path().join("kiwi.txt");
        std::fs::write(&source, "Kiwi\n\nA small fruit.\n")?;

        let mut catalog = PageCatalog::new(&dir.path().join("html"));
        let page = catalog.add(&source)?;
        assert_eq!("Kiwi", page.title());
        assert_eq!(dir.path().join("html").join("kiwi.html"), page.target_path());
        assert_eq!(1, catalog.len());
        Ok(())
    }

    #[test]
    fn test_add_missing_file_fails() {
        let mut catalog = PageCatalog::new(Path::new("/out"));
        assert!(catalog.add(Path::new("/definitely/not/here.txt")).is_err());
        assert!(catalog.is_empty());
    }
}
