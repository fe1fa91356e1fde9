pub mod index;
pub mod todo;
pub mod weather;
