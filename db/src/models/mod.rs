pub mod course;
pub mod item_completion;
pub mod module;
pub mod module_item;
pub mod user;
