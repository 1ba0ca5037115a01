pub mod chat;
pub mod documents;
pub mod embed;
pub mod health;
pub mod retrieve;
