//! Books and the registry that groups clippings by (title, author).

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};
use serde::{Deserialize, Serialize};

use super::{BookId, ClippingId};

/// All clippings sharing an exact (title, author) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Clippings in ingestion order.
    pub clippings: Vec<ClippingId>,
    /// Number of clippings in this book that are not soft-deleted.
    pub live_count: usize,
}

impl Book {
    fn new(id: BookId, title: &str, author: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            clippings: Vec::new(),
            live_count: 0,
        }
    }
}

/// Find-or-create lookup of books keyed by exact title and author.
///
/// No normalization is applied: titles differing only in punctuation or
/// whitespace are different books.
#[derive(Debug, Clone, Default)]
pub struct BookRegistry {
    // Insertion position doubles as the book id.
    books: IndexMap<(String, String), Book>,
}

/// Borrowed lookup key for the registry.
struct TitleAuthor<'a>(&'a str, &'a str);

impl Hash for TitleAuthor<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0, self.1).hash(state);
    }
}

impl Equivalent<(String, String)> for TitleAuthor<'_> {
    fn equivalent(&self, key: &(String, String)) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

impl BookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of the book with this exact title and author, registering
    /// a new book the first time the pair is seen.
    pub fn find_or_create(&mut self, title: &str, author: &str) -> BookId {
        if let Some(id) = self.find(title, author) {
            return id;
        }

        let id = BookId(self.books.len() as u64);
        self.books.insert(
            (title.to_string(), author.to_string()),
            Book::new(id, title, author),
        );
        id
    }

    /// Look up a book without creating it.
    pub fn find(&self, title: &str, author: &str) -> Option<BookId> {
        self.books.get(&TitleAuthor(title, author)).map(|book| book.id)
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.get_index(id.index()).map(|(_, book)| book)
    }

    pub(crate) fn get_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_index_mut(id.index()).map(|(_, book)| book)
    }

    /// Books in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Books ordered by title for display. The registry itself is untouched.
    pub fn list_sorted(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| compare_titles(a, b));
        books
    }

    pub(crate) fn clear(&mut self) {
        self.books.clear();
    }
}

/// Case-insensitive title order, falling back to the raw title and then to
/// creation order so the result is total and stable.
fn compare_titles(a: &Book, b: &Book) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_or_create_reuses_exact_match() {
        let mut registry = BookRegistry::new();
        let a = registry.find_or_create("Dune", "Frank Herbert");
        let b = registry.find_or_create("Dune", "Frank Herbert");

        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_no_normalization() {
        let mut registry = BookRegistry::new();
        let a = registry.find_or_create("Dune", "Frank Herbert");
        let b = registry.find_or_create("Dune ", "Frank Herbert");
        let c = registry.find_or_create("Dune", "Herbert, Frank");

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_list_sorted_does_not_reorder_registry() {
        let mut registry = BookRegistry::new();
        registry.find_or_create("zen and the Art", "Pirsig");
        registry.find_or_create("Anathem", "Stephenson");
        registry.find_or_create("middlemarch", "Eliot");

        let sorted: Vec<&str> = registry.list_sorted().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(sorted, vec!["Anathem", "middlemarch", "zen and the Art"]);

        let created: Vec<&str> = registry.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(created, vec!["zen and the Art", "Anathem", "middlemarch"]);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut registry = BookRegistry::new();
        assert_eq!(registry.find_or_create("A", "x"), BookId(0));
        assert_eq!(registry.find_or_create("B", "x"), BookId(1));
        assert_eq!(registry.find("A", "x"), Some(BookId(0)));
        assert_eq!(registry.find("C", "x"), None);
    }
}
