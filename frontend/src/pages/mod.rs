//! Page controllers.
//!
//! Each page owns its state and turns a `Msg` into an [`Effect`]. Network
//! calls only happen through [`Effect::Perform`], so a controller that returns
//! anything else has not touched the network.

pub mod guard;
pub mod home;
pub mod login;
pub mod probe;
pub mod profile;
pub mod register;
pub mod tasks;

use std::future::Future;
use std::pin::Pin;

use log::{info, warn};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::AuthToken;

use crate::api::{Api, ApiError};
use crate::route::Route;

pub type Pending<M> = Pin<Box<dyn Future<Output = M>>>;

/// What the shell should do after a controller handled a message.
pub enum Effect<M> {
    None,
    /// In-flight request resolving to the next message.
    Perform(Pending<M>),
    Navigate(Route),
    /// Full-page load of an external URL.
    Redirect(String),
    /// Ask the user; dispatch `on_confirm` only if they accept.
    Confirm { prompt: String, on_confirm: M },
}

impl<M: 'static> Effect<M> {
    pub fn perform(future: impl Future<Output = M> + 'static) -> Self {
        Effect::Perform(Box::pin(future))
    }

    pub fn map<N: 'static>(self, f: impl FnOnce(M) -> N + 'static) -> Effect<N> {
        match self {
            Effect::None => Effect::None,
            Effect::Perform(pending) => Effect::perform(async move { f(pending.await) }),
            Effect::Navigate(route) => Effect::Navigate(route),
            Effect::Redirect(url) => Effect::Redirect(url),
            Effect::Confirm { prompt, on_confirm } => Effect::Confirm {
                prompt,
                on_confirm: f(on_confirm),
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

/// Transient form status: in-flight flag plus the last error or success text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub submitting: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl FormState {
    /// Enters `submitting`. Returns false if a submit is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;
        self.success = None;
        true
    }

    /// Local validation failure; nothing was sent.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.success = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    pub fn succeed(&mut self, message: Option<String>) {
        self.submitting = false;
        self.error = None;
        self.success = message;
    }
}

/// Shared completion step of login and registration.
pub(crate) fn complete_sign_in<M: 'static>(
    api: &Api,
    form: &mut FormState,
    result: Result<AuthToken, ApiError>,
    fallback: &str,
) -> Effect<M> {
    match result {
        Ok(token) => match api.session().store(&token.token) {
            Ok(()) => {
                info!("session established");
                form.succeed(None);
                Effect::Navigate(Route::Tasks)
            }
            Err(err) => {
                warn!("{err}");
                form.fail(err.to_string());
                Effect::None
            }
        },
        Err(err) => {
            warn!("sign-in rejected: {err}");
            form.fail(err.user_message(fallback));
            Effect::None
        }
    }
}

pub(crate) fn feedback<M: 'static>(form: &FormState) -> Node<M> {
    div(
        [class("mb-4")],
        [
            match &form.error {
                Some(error) => p([class("text-red-600")], [text(error)]),
                None => span([], []),
            },
            match &form.success {
                Some(success) => p([class("text-green-600")], [text(success)]),
                None => span([], []),
            },
        ],
    )
}
