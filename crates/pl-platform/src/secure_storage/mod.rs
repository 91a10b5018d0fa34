mod in_memory;
mod system;

pub use in_memory::InMemorySecureStorage;
pub use system::SystemSecureStorage;
