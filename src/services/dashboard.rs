//! Reader dashboard and lending acknowledgements.
//!
//! Lending records come from the bundled fixtures and are resolved against the
//! live catalog. Borrow, reserve and return requests are acknowledged but not
//! stored.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    catalog::fixtures::{self, LoanFixture, ReservationFixture},
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        lending::{BookRef, BorrowRecord, BorrowStatus, Dashboard, DashboardCounts, Reservation, ReservationStatus},
        profile::UserProfile,
    },
    services::catalog::CatalogService,
};

#[derive(Clone)]
pub struct DashboardService {
    catalog: CatalogService,
    config: CatalogConfig,
}

impl DashboardService {
    pub fn new(catalog: CatalogService, config: CatalogConfig) -> Self {
        Self { catalog, config }
    }

    pub async fn dashboard(&self, profile: UserProfile) -> AppResult<Dashboard> {
        let books = self.catalog.books().await?;

        let borrowed: Vec<BorrowRecord> = fixtures::current_loans()
            .iter()
            .map(|l| loan_record(l, &books))
            .collect();
        let reservations: Vec<Reservation> = fixtures::reservations()
            .iter()
            .map(|r| reservation_record(r, &books))
            .collect();
        let history: Vec<BorrowRecord> = fixtures::loan_history()
            .iter()
            .map(|l| loan_record(l, &books))
            .collect();
        let counts = DashboardCounts::from_records(&borrowed, &reservations, &history);

        Ok(Dashboard {
            profile,
            borrowed,
            reservations,
            history,
            counts,
        })
    }

    /// Acknowledge a borrow; the book must have a copy on the shelf
    pub async fn borrow(&self, user_id: Uuid, book_id: Uuid) -> AppResult<BorrowRecord> {
        let book = self.catalog.get_book(book_id).await?;
        if !book.available {
            return Err(AppError::NotAvailable(format!(
                "\"{}\" has no copies available",
                book.title
            )));
        }

        let today = today();
        tracing::info!(user_id = %user_id, book_id = %book_id, "Borrow requested");
        Ok(BorrowRecord {
            book: BookRef::from(&book),
            issue_date: today,
            due_date: today + Duration::days(self.config.loan_days),
            return_date: None,
            status: BorrowStatus::Borrowed,
        })
    }

    pub async fn reserve(&self, user_id: Uuid, book_id: Uuid) -> AppResult<Reservation> {
        let book = self.catalog.get_book(book_id).await?;
        tracing::info!(user_id = %user_id, book_id = %book_id, "Reservation requested");
        Ok(Reservation {
            book: BookRef::from(&book),
            reservation_date: today(),
            status: ReservationStatus::Pending,
        })
    }

    /// Acknowledge the return of one of the current loans
    pub async fn return_book(&self, user_id: Uuid, book_id: Uuid) -> AppResult<BorrowRecord> {
        let books = self.catalog.books().await?;
        let loan = fixtures::current_loans()
            .iter()
            .map(|l| loan_record(l, &books))
            .find(|r| r.book.id == book_id)
            .ok_or_else(|| AppError::Validation(format!("Book {} is not on loan", book_id)))?;

        tracing::info!(user_id = %user_id, book_id = %book_id, "Return requested");
        Ok(BorrowRecord {
            return_date: Some(today()),
            status: BorrowStatus::Returned,
            ..loan
        })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Catalog entry with this title, or a detached reference when it is gone
fn resolve(title: &str, author: &str, books: &[Book]) -> BookRef {
    books
        .iter()
        .find(|b| b.title == title)
        .map(BookRef::from)
        .unwrap_or_else(|| BookRef {
            id: Uuid::nil(),
            title: title.to_string(),
            author: author.to_string(),
        })
}

fn loan_record(loan: &LoanFixture, books: &[Book]) -> BorrowRecord {
    BorrowRecord {
        book: resolve(loan.title, loan.author, books),
        issue_date: loan.issue_date,
        due_date: loan.due_date,
        return_date: loan.return_date,
        status: loan.status,
    }
}

fn reservation_record(reservation: &ReservationFixture, books: &[Book]) -> Reservation {
    Reservation {
        book: resolve(reservation.title, reservation.author, books),
        reservation_date: reservation.reservation_date,
        status: reservation.status,
    }
}
