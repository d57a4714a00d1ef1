pub mod list;
pub mod user;

pub use list::*;
pub use user::*;
