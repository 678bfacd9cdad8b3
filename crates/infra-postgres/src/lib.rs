// Jobpost Relay Infrastructure - PostgreSQL Adapter
// Implements: JobPostSource (read-only scan of the jobposts table)

mod connection;
mod error;
mod job_post_source;

pub use connection::{connect, connect_options};
pub use error::map_sqlx_error;
pub use job_post_source::{PgJobPostSource, SELECT_JOB_POSTS};

// Note: sqlx::Error conversion is handled by map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
