mod handler;
mod model;

pub use handler::{badge, get_count, set_count};
pub use model::{CountResponse, SetCountRequest};
