//! Infrastructure layer - database connection and error translation.

pub mod db;
pub mod db_errors;
