//! Form state and input values
//!
//! A [`Form`] is the handle a presentation layer holds for one mounted form
//! instance. It owns a [`FormState`] behind a lock, tracks whether the form
//! is still mounted, and marks itself dirty whenever something a view would
//! render has changed.

mod event;
mod state;
mod values;
mod visibility;

pub use event::SubmitEvent;
pub use state::{Form, FormId, FormState};
pub(crate) use state::{Hold, InFlight};
pub use values::{FieldValue, FormValues};
pub use visibility::{InputType, Visibility, toggle};
