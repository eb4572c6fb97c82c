pub mod health;
pub mod insights;
