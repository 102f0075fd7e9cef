//! Data models for ReadEasyBank

pub mod book;
pub mod contact;
pub mod lending;
pub mod profile;
pub mod session;

// Re-export commonly used types
pub use book::{Availability, Book, BookInput, BookRow, CatalogQuery, NewBookRow, SortOrder};
pub use lending::{BorrowRecord, BorrowStatus, Dashboard, Reservation, ReservationStatus};
pub use profile::{NewProfile, Role, UserProfile};
pub use session::{NavState, SessionClaims, SessionEvent};
