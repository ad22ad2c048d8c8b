pub mod dashboard;
pub mod theme;
