mod resolve_errors;
mod storage_errors;
mod validation_errors;

pub use resolve_errors::*;
pub use storage_errors::*;
pub use validation_errors::*;
