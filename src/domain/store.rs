//! Session-scoped collection of liked books.

use super::models::Book;

/// Ordered, identifier-unique list of books the user has liked.
///
/// The store is owned by the application and handed to views by reference;
/// `add` and `remove` are its only mutations. Both are total: neither can fail.
///
/// # Examples
///
/// ```
/// use bookswipe::domain::{Book, LikedBooks, VolumeMetadata};
///
/// let mut liked = LikedBooks::default();
/// let book = Book::from_metadata("111", &VolumeMetadata::default());
/// assert!(liked.add(book.clone()));
/// assert!(!liked.add(book));
/// assert_eq!(liked.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LikedBooks {
    books: Vec<Book>,
}

impl LikedBooks {
    /// Appends `book` unless a book with the same id is already present.
    ///
    /// Returns `true` if the book was inserted.
    pub fn add(&mut self, book: Book) -> bool {
        if self.contains(&book.id) {
            return false;
        }
        self.books.push(book);
        true
    }

    /// Removes the book with the given id. Returns `true` if one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.books.len();
        self.books.retain(|book| book.id != id);
        self.books.len() != before
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.books.iter().any(|book| book.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            image_url: String::new(),
            caption: String::new(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let liked = LikedBooks::default();
        assert!(liked.is_empty());
        assert_eq!(liked.len(), 0);
        assert!(liked.get(0).is_none());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut liked = LikedBooks::default();
        liked.add(book("3", "c"));
        liked.add(book("1", "a"));
        liked.add(book("2", "b"));
        let ids: Vec<&str> = liked.books().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_duplicate_add_keeps_first() {
        let mut liked = LikedBooks::default();
        assert!(liked.add(book("X", "first")));
        assert!(!liked.add(book("X", "second")));
        assert!(!liked.add(book("X", "third")));

        assert_eq!(liked.len(), 1);
        assert_eq!(liked.get(0).unwrap().title, "first");
    }

    #[test]
    fn test_like_twice_then_remove() {
        let mut liked = LikedBooks::default();
        let a = book("111", "A");
        liked.add(a.clone());
        liked.add(a);
        assert_eq!(liked.books().iter().filter(|b| b.id == "111").count(), 1);

        assert!(liked.remove("111"));
        assert!(liked.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut liked = LikedBooks::default();
        liked.add(book("1", "a"));

        assert!(!liked.remove("2"));
        assert_eq!(liked.len(), 1);
        assert!(liked.contains("1"));
    }

    #[test]
    fn test_remove_only_target() {
        let mut liked = LikedBooks::default();
        for id in ["1", "2", "3"] {
            liked.add(book(id, id));
        }
        liked.remove("2");
        assert!(!liked.contains("2"));
        assert!(liked.contains("1"));
        assert!(liked.contains("3"));
    }
}
