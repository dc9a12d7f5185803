//! Conversation ranking: score computation and cursor pagination tokens.

pub mod cursor;
pub mod score;

pub use cursor::Cursor;
