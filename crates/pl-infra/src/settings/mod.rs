//! Plain (unencrypted) user settings kept in the state namespace.

mod exclusion_list;
mod snippet_library;

pub use exclusion_list::{ExclusionList, EXCLUSIONS_STATE_KEY};
pub use snippet_library::{SnippetLibrary, SNIPPETS_STATE_KEY};
