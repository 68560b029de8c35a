pub mod m202508290001_create_users;
pub mod m202508290002_create_courses;
pub mod m202508290003_create_modules;
pub mod m202508290004_create_module_items;
pub mod m202508290005_create_item_completions;
