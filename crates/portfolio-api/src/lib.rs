pub mod ai_handlers;
pub mod analytics_handlers;
pub mod error;
pub mod handlers;
pub mod learning_handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
