pub mod health;
pub mod nomenclature;
pub mod upload;

pub use health::*;
pub use nomenclature::*;
pub use upload::*;
