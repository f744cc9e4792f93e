//! Presentation adapters
//!
//! A view turns a [`FormState`] snapshot and a [`FormLayout`] into whatever
//! the front end shows. The controller never talks to a view; callers render
//! after each state change (see [`Form::take_dirty`](crate::Form::take_dirty)).

mod layout;
mod text;

pub use layout::{FieldKind, FieldLayout, FormLayout};
pub use text::TextRenderer;

use crate::form::FormState;

/// Something that can display a form.
pub trait FormView {
    /// Render `state` using `layout`.
    fn render(&mut self, state: &FormState, layout: &FormLayout);
}

impl<V: FormView + ?Sized> FormView for &mut V {
    fn render(&mut self, state: &FormState, layout: &FormLayout) {
        (**self).render(state, layout);
    }
}
