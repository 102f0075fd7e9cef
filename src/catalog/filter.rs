//! Catalog search, filtering and sorting.
//!
//! Everything here is a linear pass over the full book list. Results are
//! always recomputed from the unfiltered source and sorting is stable, so
//! books that compare equal keep their catalog order.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::book::{Availability, Book, CatalogQuery, SortOrder};

/// Filter and sort settings of the catalog page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// A book passes when any of its tags is selected; empty selects all
    pub genres: Vec<String>,
    pub availability: Availability,
    pub sort: SortOrder,
    /// Lowercased free-text query
    pub text: Option<String>,
}

impl From<&CatalogQuery> for CatalogFilter {
    fn from(query: &CatalogQuery) -> Self {
        Self {
            genres: query.selected_genres(),
            availability: query.availability.unwrap_or_default(),
            sort: query.sort.unwrap_or_default(),
            text: query
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_lowercase),
        }
    }
}

impl CatalogFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if !self.genres.is_empty() && !book.genre.iter().any(|g| self.genres.contains(g)) {
            return false;
        }

        let availability_ok = match self.availability {
            Availability::All => true,
            Availability::Available => book.available,
            Availability::Unavailable => !book.available,
        };
        if !availability_ok {
            return false;
        }

        match &self.text {
            Some(text) => matches_text(book, text),
            None => true,
        }
    }

    /// Filter `books` and return them in the requested order
    pub fn apply(&self, books: &[Book]) -> Vec<Book> {
        let mut result: Vec<Book> = books.iter().filter(|b| self.matches(b)).cloned().collect();
        sort_books(&mut result, self.sort);
        result
    }
}

/// Case-insensitive substring match on title, author and each genre tag.
/// `text` must already be lowercase.
pub fn matches_text(book: &Book, text: &str) -> bool {
    book.title.to_lowercase().contains(text)
        || book.author.to_lowercase().contains(text)
        || book.genre.iter().any(|g| g.to_lowercase().contains(text))
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_books(books: &mut [Book], order: SortOrder) {
    match order {
        SortOrder::Newest => books.sort_by(|a, b| b.published_year.cmp(&a.published_year)),
        SortOrder::Oldest => books.sort_by(|a, b| a.published_year.cmp(&b.published_year)),
        SortOrder::TitleAsc => books.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortOrder::TitleDesc => books.sort_by(|a, b| compare_titles(&b.title, &a.title)),
    }
}

/// Distinct genre tags in first-seen order
pub fn genres(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    books
        .iter()
        .flat_map(|b| b.genre.iter())
        .filter(|g| seen.insert(g.as_str()))
        .cloned()
        .collect()
}

/// Most recently published books
pub fn recently_added(books: &[Book], count: usize) -> Vec<Book> {
    let mut result = books.to_vec();
    sort_books(&mut result, SortOrder::Newest);
    result.truncate(count);
    result
}

/// Books with the most copies currently out on loan
pub fn popular(books: &[Book], count: usize) -> Vec<Book> {
    let mut result = books.to_vec();
    result.sort_by_key(|b| std::cmp::Reverse(b.total_copies - b.available_copies));
    result.truncate(count);
    result
}
