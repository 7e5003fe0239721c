pub mod grade;
pub mod list;
pub mod profile;
pub mod search;
pub mod show;
pub mod today;
