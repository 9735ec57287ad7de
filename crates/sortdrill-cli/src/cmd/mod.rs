pub mod completions;
pub mod play;
pub mod sim;
pub mod solve;
