pub mod favorites;
pub mod logs;
pub mod process;
pub mod rating;
pub mod setup;
pub mod ui;
pub mod update;
