//! Activation form submit handler.
//!
//! Mirrors the small script that sits next to the license input on the plugin
//! listing page: it posts the entered key to the local action endpoint and
//! renders the answer. The disabled state of the controls is the only guard
//! against double submission.
//!
//! There is no timeout and no cancellation. If the request never completes,
//! or fails before a response is decoded, the controls stay disabled until
//! the page is reloaded.

mod error;
mod form;

pub use error::{UiError, UiResult};
pub use form::{ActivationForm, FormState};
