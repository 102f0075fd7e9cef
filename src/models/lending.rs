//! Borrow and reservation records shown on the dashboard

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book::Book, profile::UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Overdue,
    Returned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

/// Reference to a catalog entry as displayed in lending lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: Uuid,
    pub title: String,
    pub author: String,
}

impl From<&Book> for BookRef {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecord {
    pub book: BookRef,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: BorrowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub book: BookRef,
    pub reservation_date: NaiveDate,
    pub status: ReservationStatus,
}

/// Counters of the dashboard summary cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DashboardCounts {
    pub borrowed: usize,
    pub overdue: usize,
    pub reserved: usize,
    pub read: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Dashboard {
    pub profile: UserProfile,
    pub borrowed: Vec<BorrowRecord>,
    pub reservations: Vec<Reservation>,
    pub history: Vec<BorrowRecord>,
    pub counts: DashboardCounts,
}

impl DashboardCounts {
    pub fn from_records(
        borrowed: &[BorrowRecord],
        reservations: &[Reservation],
        history: &[BorrowRecord],
    ) -> Self {
        Self {
            borrowed: borrowed.len(),
            overdue: borrowed
                .iter()
                .filter(|r| r.status == BorrowStatus::Overdue)
                .count(),
            reserved: reservations
                .iter()
                .filter(|r| r.status == ReservationStatus::Pending)
                .count(),
            read: history
                .iter()
                .filter(|r| r.status == BorrowStatus::Returned)
                .count(),
        }
    }
}
