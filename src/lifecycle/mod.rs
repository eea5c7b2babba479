//! Process lifecycle: signal handling and shutdown coordination.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
