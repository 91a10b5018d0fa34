pub mod config;
mod observer;
pub mod tracing;
pub mod wiring;

pub use self::config::resolve_config;
pub use self::tracing::init_tracing_subscriber;
pub use self::wiring::{wire_dependencies, AppServices, ClipboardMode};
