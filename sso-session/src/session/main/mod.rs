mod fetch;
mod session;

pub use fetch::{ensure_success, read_json};
pub use session::{Session, SessionBuilder};
