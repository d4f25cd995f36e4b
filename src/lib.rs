pub mod config;
pub mod lrc;
pub mod sync;
pub mod layout;
pub mod scroll;
pub mod ui;
