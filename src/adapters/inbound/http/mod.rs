pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use dto::*;
pub use error::*;
pub use handlers::*;
pub use router::*;
