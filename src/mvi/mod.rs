/// Building blocks of the screen controllers: state cell, intent bus,
/// one-shot effect queue, task scope and stream operators
mod effect;
mod event;
mod flow;
mod scope;
mod state;

pub use effect::EffectQueue;
pub use event::{EventBus, EventStream};
pub use flow::debounce;
pub use scope::Scope;
pub use state::{StateCell, StateStream};
