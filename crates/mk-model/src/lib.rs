mod error;
pub use error::ModelError;

mod params;
pub use params::MakeParams;

mod result;
pub use result::{EXIT_CODE_NONE, MakeResult};
