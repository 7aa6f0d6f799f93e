pub mod datasource;
pub mod event;
pub mod guide;
pub mod interval;
pub mod state;

pub use datasource::*;
pub use event::*;
pub use guide::*;
pub use interval::*;
pub use state::*;
