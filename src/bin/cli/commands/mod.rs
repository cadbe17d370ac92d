pub mod add;
pub mod list;
pub mod reset;
pub mod rm;
