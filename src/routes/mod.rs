pub mod counter;
pub mod system;
