pub mod axis;
pub mod config;
pub mod data;
pub mod datasource;
pub mod events;
pub mod hover;
pub mod tooltip;
pub mod viewport;

pub use axis::*;
pub use config::*;
pub use data::*;
pub use datasource::*;
pub use events::*;
pub use hover::*;
pub use tooltip::*;
pub use viewport::*;
