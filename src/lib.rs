pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod macros;
pub mod models;
pub mod paths;
pub mod session;
pub mod view;

pub use config::Config;
pub use error::{ConsoleError, Result};
pub use gateway::Gateway;
pub use session::SessionContext;
pub use view::CollectionView;
