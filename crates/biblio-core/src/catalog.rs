//! # Book Catalog Cache
//!
//! The client's ordered copy of the backend's book list.
//!
//! ```text
//! GET /libros/ ──► replace_all(list)      (after every create/update too)
//! DELETE ok    ──► remove_by_id(id)       (only after the backend agreed)
//! search box   ──► filter(term)           (lazy, order preserved)
//! ```

use crate::types::{Book, BookId};

/// Cached, searchable book list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole cache with `books`, keeping their order.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    /// Removes the first book with `id` and returns it.
    ///
    /// Absent ids leave the cache untouched.
    pub fn remove_by_id(&mut self, id: BookId) -> Option<Book> {
        let index = self.books.iter().position(|b| b.id == id)?;
        Some(self.books.remove(index))
    }

    /// Books whose title or author contains `term`, ignoring case.
    ///
    /// The term is used as typed, spaces included; an empty term
    /// matches every book.
    pub fn filter<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Book> + 'a {
        let needle = term.to_lowercase();
        self.books.iter().filter(move |book| matches(book, &needle))
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }
}

fn matches(book: &Book, needle: &str) -> bool {
    needle.is_empty()
        || book.title.to_lowercase().contains(needle)
        || book.author.to_lowercase().contains(needle)
}

impl From<Vec<Book>> for BookCatalog {
    fn from(books: Vec<Book>) -> Self {
        BookCatalog { books }
    }
}

impl<'a> IntoIterator for &'a BookCatalog {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;
    use proptest::prelude::*;

    fn book(id: BookId, title: &str, author: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            price: Price::from_cents(1000),
        }
    }

    fn sample() -> BookCatalog {
        BookCatalog::from(vec![
            book(1, "Ficciones", "Jorge Luis Borges"),
            book(2, "Rayuela", "Julio Cortázar"),
            book(3, "El Aleph", "Jorge Luis Borges"),
        ])
    }

    fn ids<'a>(books: impl Iterator<Item = &'a Book>) -> Vec<BookId> {
        books.map(|b| b.id).collect()
    }

    #[test]
    fn test_filter_matches_title_or_author_ignoring_case() {
        let catalog = sample();
        assert_eq!(ids(catalog.filter("BORGES")), vec![1, 3]);
        assert_eq!(ids(catalog.filter("rayu")), vec![2]);
        assert_eq!(ids(catalog.filter("cortázar")), vec![2]);
        assert_eq!(ids(catalog.filter("nothing")), Vec::<BookId>::new());
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let catalog = sample();
        assert_eq!(ids(catalog.filter("")), vec![1, 2, 3]);
    }

    #[test]
    fn test_whitespace_term_is_not_trimmed() {
        let catalog = sample();
        assert_eq!(ids(catalog.filter("  ")), Vec::<BookId>::new());
        assert_eq!(ids(catalog.filter("el a")), vec![3]);
        assert_eq!(ids(catalog.filter(" borges")), vec![1, 3]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut catalog = sample();
        let removed = catalog.remove_by_id(2).unwrap();
        assert_eq!(removed.title, "Rayuela");
        assert_eq!(ids(catalog.iter()), vec![1, 3]);

        assert!(catalog.remove_by_id(42).is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove_duplicate_id_removes_one() {
        let mut catalog = BookCatalog::from(vec![book(1, "A", "X"), book(1, "B", "Y")]);
        catalog.remove_by_id(1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().title, "B");
    }

    #[test]
    fn test_replace_all() {
        let mut catalog = sample();
        catalog.replace_all(vec![book(9, "Nuevo", "Autor")]);
        assert_eq!(ids(catalog.iter()), vec![9]);

        catalog.replace_all(Vec::new());
        assert!(catalog.is_empty());
    }

    fn any_catalog() -> impl Strategy<Value = BookCatalog> {
        prop::collection::vec(("[a-zA-Z ]{1,12}", "[a-zA-Z ]{1,12}"), 0..20).prop_map(|pairs| {
            let books: Vec<Book> = pairs
                .into_iter()
                .enumerate()
                .map(|(i, (t, a))| book(i as BookId, &t, &a))
                .collect();
            BookCatalog::from(books)
        })
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(catalog in any_catalog(), term in "[a-zA-Z]{0,3}") {
            let once = BookCatalog::from(catalog.filter(&term).cloned().collect::<Vec<_>>());
            let twice: Vec<Book> = once.filter(&term).cloned().collect();
            prop_assert_eq!(once.iter().cloned().collect::<Vec<_>>(), twice);
        }

        #[test]
        fn remove_by_id_removes_at_most_one(catalog in any_catalog(), id in 0i64..25) {
            let mut after = catalog.clone();
            let removed = after.remove_by_id(id);
            let expected = if catalog.get(id).is_some() { 1 } else { 0 };
            prop_assert_eq!(catalog.len() - after.len(), expected);
            prop_assert_eq!(removed.is_some(), expected == 1);
        }
    }
}
