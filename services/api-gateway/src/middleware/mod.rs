mod error_handling;
mod request_id;

pub use error_handling::*;
pub use request_id::*;
