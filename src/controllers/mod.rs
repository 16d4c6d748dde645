/// Screen controllers: intents in, immutable state and one-shot effects out
pub mod detail;
pub mod list;

#[cfg(test)]
pub(crate) mod test_support;

pub use detail::{DetailController, DetailEffect, DetailEvent, DetailUiState};
pub use list::{ListController, ListEffect, ListEvent, ListUiState};
