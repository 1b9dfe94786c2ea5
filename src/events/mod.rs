pub mod input;

pub use input::Action;
