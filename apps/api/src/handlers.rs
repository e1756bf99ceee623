pub mod admin;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod tasks;
