pub mod note;
pub mod user;

pub use note::*;
pub use user::*;
