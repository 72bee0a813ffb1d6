pub mod cache;
pub mod config_manager;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod filler;
pub mod journal;
pub mod text;
pub mod types;
pub mod visitors;

pub use cache::*;
pub use config_manager::*;
pub use envelope::*;
pub use error::*;
pub use fallback::*;
pub use filler::*;
pub use journal::*;
pub use types::*;
pub use visitors::*;
