//! Bundled sample catalog and the lending records shown on the dashboard.
//!
//! Lending records are never persisted; they reference books by title and are
//! resolved against the live catalog when the dashboard is built.

use chrono::NaiveDate;

use crate::models::{
    book::NewBookRow,
    lending::{BorrowStatus, ReservationStatus},
};

#[allow(clippy::too_many_arguments)]
fn book(
    title: &str,
    author: &str,
    cover: &str,
    description: &str,
    genre: &[&str],
    published_year: i32,
    total_copies: i32,
    available_copies: i32,
) -> NewBookRow {
    NewBookRow {
        title: title.to_string(),
        author: author.to_string(),
        cover_image: Some(format!(
            "https://images.unsplash.com/{}?auto=format&fit=crop&q=80&w=500",
            cover
        )),
        description: Some(description.to_string()),
        genre: genre.iter().map(|g| g.to_string()).collect(),
        published_year: Some(published_year),
        total_copies,
        available_copies,
    }
}

/// Sample catalog loaded into an empty store on startup
pub fn sample_books() -> Vec<NewBookRow> {
    vec![
        book(
            "Introduction to Computer Science",
            "John Smith",
            "photo-1581291518633-83b4ebd1d83e",
            "A comprehensive introduction to the field of computer science, covering fundamental concepts and principles.",
            &["Computer Science", "Education"],
            2022, 10, 5,
        ),
        book(
            "Engineering Mathematics",
            "Sarah Johnson",
            "photo-1513475382585-d06e58bcb0e0",
            "This book covers essential mathematical concepts for engineering students.",
            &["Mathematics", "Engineering"],
            2020, 8, 0,
        ),
        book(
            "Data Structures and Algorithms",
            "Michael Lee",
            "photo-1515879218367-8466d910aaa4",
            "Learn about various data structures and algorithms essential for computer programming.",
            &["Computer Science", "Programming"],
            2021, 12, 3,
        ),
        book(
            "Principles of Economics",
            "Emily Chen",
            "photo-1554224155-6726b3ff858f",
            "An introductory text on economic principles and theories.",
            &["Economics", "Business"],
            2019, 15, 7,
        ),
        book(
            "Advanced Programming in Python",
            "David Wilson",
            "photo-1526379879527-8559ecfcaec0",
            "A comprehensive guide to advanced programming techniques in Python.",
            &["Programming", "Computer Science"],
            2021, 10, 2,
        ),
        book(
            "Fundamentals of Physics",
            "Robert Brown",
            "photo-1532012197267-da84d127e765",
            "An essential textbook covering the fundamentals of physics for undergraduate students.",
            &["Physics", "Science"],
            2018, 20, 15,
        ),
        book(
            "Introduction to Artificial Intelligence",
            "Jennifer Adams",
            "photo-1620712943543-bcc4688e7485",
            "Learn the fundamentals of artificial intelligence and machine learning.",
            &["Computer Science", "AI"],
            2023, 8, 4,
        ),
        book(
            "Organic Chemistry",
            "Thomas Lee",
            "photo-1532634993-15f421e42ec0",
            "A comprehensive guide to understanding organic chemistry principles and reactions.",
            &["Chemistry", "Science"],
            2020, 12, 0,
        ),
        book(
            "Calculus: Early Transcendentals",
            "James Stewart",
            "photo-1509228468518-180dd4864904",
            "A comprehensive guide to calculus covering limits, derivatives, integrals, and more.",
            &["Mathematics", "Education"],
            2019, 25, 10,
        ),
        book(
            "Digital Marketing Strategies",
            "Lisa Wong",
            "photo-1563986768494-4dee2763ff3f",
            "Learn modern digital marketing techniques and strategies for business growth.",
            &["Marketing", "Business"],
            2022, 15, 8,
        ),
        book(
            "Human Anatomy and Physiology",
            "Elizabeth Harris",
            "photo-1530497610245-94d3c16cda28",
            "A detailed exploration of human anatomy and physiological systems.",
            &["Biology", "Medicine"],
            2020, 18, 5,
        ),
        book(
            "Introduction to Psychology",
            "Mark Thompson",
            "photo-1576094502599-6763da102ea7",
            "A comprehensive introduction to the principles of psychology and human behavior.",
            &["Psychology", "Social Science"],
            2021, 20, 12,
        ),
    ]
}

/// Borrow record as stored in the fixtures
#[derive(Debug, Clone)]
pub struct LoanFixture {
    pub title: &'static str,
    pub author: &'static str,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: BorrowStatus,
}

#[derive(Debug, Clone)]
pub struct ReservationFixture {
    pub title: &'static str,
    pub author: &'static str,
    pub reservation_date: NaiveDate,
    pub status: ReservationStatus,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn current_loans() -> Vec<LoanFixture> {
    vec![
        LoanFixture {
            title: "Introduction to Computer Science",
            author: "John Smith",
            issue_date: date(2023, 5, 1),
            due_date: date(2023, 5, 15),
            return_date: None,
            status: BorrowStatus::Borrowed,
        },
        LoanFixture {
            title: "Engineering Mathematics",
            author: "Sarah Johnson",
            issue_date: date(2023, 5, 5),
            due_date: date(2023, 5, 19),
            return_date: None,
            status: BorrowStatus::Overdue,
        },
    ]
}

pub fn reservations() -> Vec<ReservationFixture> {
    vec![ReservationFixture {
        title: "Data Structures and Algorithms",
        author: "Michael Lee",
        reservation_date: date(2023, 5, 10),
        status: ReservationStatus::Pending,
    }]
}

pub fn loan_history() -> Vec<LoanFixture> {
    vec![LoanFixture {
        title: "Principles of Economics",
        author: "Emily Chen",
        issue_date: date(2023, 4, 1),
        due_date: date(2023, 4, 15),
        return_date: Some(date(2023, 4, 15)),
        status: BorrowStatus::Returned,
    }]
}

/// Sample catalog as API books, in fixture order
#[cfg(test)]
pub fn sample_books_for_tests() -> Vec<crate::models::Book> {
    use crate::models::Book;
    use uuid::Uuid;

    sample_books()
        .into_iter()
        .enumerate()
        .map(|(i, row)| Book {
            id: Uuid::from_u128(i as u128 + 1),
            title: row.title,
            author: row.author,
            cover_image: row.cover_image.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            genre: row.genre,
            published_year: row.published_year.unwrap_or_default(),
            available: row.available_copies > 0,
            total_copies: row.total_copies,
            available_copies: row.available_copies,
        })
        .collect()
}
