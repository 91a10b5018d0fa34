mod factory_reset;
mod list_history;

pub use factory_reset::FactoryReset;
pub use list_history::{HistoryItemView, ListHistory, PREVIEW_MAX_CHARS};
