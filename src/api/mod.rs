pub mod lists;
pub mod swagger;
pub mod users;
