pub mod report;
pub mod survey;
pub mod user;
