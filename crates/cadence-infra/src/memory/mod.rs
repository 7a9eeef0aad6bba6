//! In-memory store - used when no database is configured.
//!
//! Each repository serialises writes behind one async lock, which gives the
//! same single-row atomicity the PostgreSQL implementations get from
//! conditional statements. Data is lost on process restart.

mod posts;
mod profiles;
mod usage;

pub use posts::InMemoryPostRepository;
pub use profiles::InMemoryProfileRepository;
pub use usage::InMemoryUsageRepository;
