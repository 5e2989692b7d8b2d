use log::debug;

use super::Effect;
use crate::route::Route;
use crate::session::SessionStore;

/// A page that may only be shown with a session token present.
pub trait Protected {
    type Msg;

    /// Runs once the session check passed, typically the initial load.
    fn on_session(&mut self) -> Effect<Self::Msg>;
}

/// Mounts a protected page, or redirects to login when there is no token.
pub fn mount_protected<P: Protected>(page: &mut P, session: &dyn SessionStore) -> Effect<P::Msg> {
    if session.is_signed_in() {
        page.on_session()
    } else {
        debug!("no session token, redirecting to login");
        Effect::Navigate(Route::Login)
    }
}
