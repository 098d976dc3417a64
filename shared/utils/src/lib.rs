pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod fields;


pub use self::config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use fields::*;
