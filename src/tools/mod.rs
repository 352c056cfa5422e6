pub mod describe;
pub mod filters;
pub mod related;
pub mod search;

pub use describe::*;
pub use filters::*;
pub use related::*;
pub use search::*;
