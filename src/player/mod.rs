pub mod controller;
pub mod renderer;
pub mod session;

pub use controller::{parse_skip_seconds, Phase};
pub use session::PlayerSession;
