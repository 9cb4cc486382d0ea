pub mod genre;
pub mod movie;
