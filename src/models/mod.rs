//! Data models for Libris

pub mod author;
pub mod book;
pub mod loan;
pub mod member;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetails};
pub use loan::{Loan, LoanDetails};
pub use member::{Member, MemberDetails};
pub use user::User;
