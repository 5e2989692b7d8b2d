use log::warn;
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use serde_json::Value;
use shared::{Profile, ProfileUpdate};

use super::guard::Protected;
use super::{feedback, Effect, FormState};
use crate::api::{Api, ApiError};
use crate::route::Route;

#[derive(Debug, Clone)]
pub enum Msg {
    Loaded(Result<Profile, ApiError>),
    SetName(String),
    SetEmail(String),
    SetPassword(String),
    SetPasswordConfirmation(String),
    Submit,
    Saved {
        submitted: Profile,
        result: Result<Value, ApiError>,
    },
    GoTo(Route),
}

pub struct ProfilePage {
    api: Api,
    pub loading: bool,
    /// Last values known to be stored on the server.
    pub saved: Profile,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub form: FormState,
}

impl Protected for ProfilePage {
    type Msg = Msg;

    fn on_session(&mut self) -> Effect<Msg> {
        self.loading = true;
        let api = self.api.clone();
        Effect::perform(async move { Msg::Loaded(api.current_user().await) })
    }
}

impl ProfilePage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            loading: false,
            saved: Profile::default(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            form: FormState::default(),
        }
    }

    /// Only changed fields; password fields only when a new one was typed.
    pub fn pending_update(&self) -> ProfileUpdate {
        let changed = |current: &str, saved: &str| (current != saved).then(|| current.to_string());
        let with_password = !self.password.is_empty();
        ProfileUpdate {
            name: changed(&self.name, &self.saved.name),
            email: changed(&self.email, &self.saved.email),
            password: with_password.then(|| self.password.clone()),
            password_confirmation: with_password.then(|| self.password_confirmation.clone()),
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::Loaded(Ok(profile)) => {
                self.loading = false;
                self.name = profile.name.clone();
                self.email = profile.email.clone();
                self.saved = profile;
                Effect::None
            }
            Msg::Loaded(Err(err)) => {
                warn!("profile load failed: {err}");
                self.loading = false;
                self.form.reject("Failed to load profile");
                Effect::None
            }
            Msg::SetName(name) => {
                self.name = name;
                Effect::None
            }
            Msg::SetEmail(email) => {
                self.email = email;
                Effect::None
            }
            Msg::SetPassword(password) => {
                self.password = password;
                Effect::None
            }
            Msg::SetPasswordConfirmation(confirmation) => {
                self.password_confirmation = confirmation;
                Effect::None
            }
            Msg::Submit => self.submit(),
            Msg::Saved { submitted, result } => {
                match result {
                    Ok(_) => {
                        self.saved = submitted;
                        self.password.clear();
                        self.password_confirmation.clear();
                        self.form.succeed(Some("Profile updated successfully".into()));
                    }
                    Err(err) => {
                        warn!("profile update failed: {err}");
                        self.form.fail("Failed to update profile");
                    }
                }
                Effect::None
            }
            Msg::GoTo(route) => Effect::Navigate(route),
        }
    }

    fn submit(&mut self) -> Effect<Msg> {
        if self.form.submitting {
            return Effect::None;
        }
        self.form.error = None;
        self.form.success = None;

        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            self.form.reject("Name and email are required");
            return Effect::None;
        }
        if !self.password.is_empty() && self.password != self.password_confirmation {
            self.form.reject("Passwords do not match");
            return Effect::None;
        }

        let update = self.pending_update();
        if update.is_empty() {
            self.form.succeed(Some("Profile is already up to date".into()));
            return Effect::None;
        }

        self.form.begin();
        let api = self.api.clone();
        let submitted = Profile {
            name: self.name.clone(),
            email: self.email.clone(),
        };
        Effect::perform(async move {
            let result = api.update_profile(&update).await;
            Msg::Saved { submitted, result }
        })
    }

    pub fn view(&self) -> Node<Msg> {
        if self.loading {
            return p([class("p-4")], [text("Loading profile...")]);
        }
        div(
            [class("max-w-xl mx-auto p-6")],
            [
                h1([class("text-2xl font-bold text-[#FF2D20] mb-6")], [text("Update Profile")]),
                feedback(&self.form),
                div(
                    [class("bg-white shadow rounded p-6")],
                    [
                        p([class("font-semibold")], [text("Name")]),
                        input(
                            [value(&self.name), on_input(|event| Msg::SetName(event.value()))],
                            [],
                        ),
                        p([class("font-semibold")], [text("Email")]),
                        input(
                            [
                                r#type("email"),
                                value(&self.email),
                                on_input(|event| Msg::SetEmail(event.value())),
                            ],
                            [],
                        ),
                        p([class("font-semibold")], [text("New Password (optional)")]),
                        input(
                            [
                                r#type("password"),
                                value(&self.password),
                                on_input(|event| Msg::SetPassword(event.value())),
                            ],
                            [],
                        ),
                        p([class("font-semibold")], [text("Confirm Password")]),
                        input(
                            [
                                r#type("password"),
                                value(&self.password_confirmation),
                                on_input(|event| Msg::SetPasswordConfirmation(event.value())),
                            ],
                            [],
                        ),
                        div(
                            [class("flex justify-between")],
                            [
                                button([on_click(|_| Msg::GoTo(Route::Tasks))], [text("Back")]),
                                button(
                                    [on_click(|_| Msg::Submit), disabled(self.form.submitting)],
                                    [text("Update Profile")],
                                ),
                            ],
                        ),
                    ],
                ),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::guard::mount_protected;
    use crate::test_support::{api_with, body_json, resolve, RecordingTransport};
    use serde_json::json;

    async fn loaded_page(transport: &std::rc::Rc<RecordingTransport>) -> ProfilePage {
        transport.respond(200, json!({"id": 1, "name": "Ada", "email": "ada@example.com"}));
        let (api, session) = api_with(transport, Some("tok"));
        let mut page = ProfilePage::new(api);
        let next = resolve(mount_protected(&mut page, session.as_ref())).await;
        page.update(next);
        page
    }

    #[test]
    fn without_session_redirects_to_login() {
        let transport = RecordingTransport::new();
        let (api, session) = api_with(&transport, None);
        let mut page = ProfilePage::new(api);

        let effect = mount_protected(&mut page, session.as_ref());

        assert!(matches!(effect, Effect::Navigate(Route::Login)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn mount_populates_fields() {
        let transport = RecordingTransport::new();
        let page = loaded_page(&transport).await;

        assert!(transport.last_request().unwrap().url.ends_with("/user"));
        assert_eq!(page.name, "Ada");
        assert_eq!(page.email, "ada@example.com");
        assert!(!page.loading);
    }

    #[tokio::test]
    async fn load_failure_shows_error_and_leaves_fields_blank() {
        let transport = RecordingTransport::new();
        transport.respond(500, json!({"message": "boom"}));
        let (api, session) = api_with(&transport, Some("tok"));
        let mut page = ProfilePage::new(api);

        let next = resolve(mount_protected(&mut page, session.as_ref())).await;
        page.update(next);

        assert!(!page.loading);
        assert_eq!(page.form.error.as_deref(), Some("Failed to load profile"));
        assert!(page.name.is_empty());
        assert!(page.email.is_empty());
    }

    #[tokio::test]
    async fn sends_only_changed_fields() {
        let transport = RecordingTransport::new();
        let mut page = loaded_page(&transport).await;
        page.update(Msg::SetName("Ada Lovelace".into()));

        let next = resolve(page.update(Msg::Submit)).await;
        page.update(next);

        assert_eq!(body_json(&transport.last_request().unwrap()), json!({"name": "Ada Lovelace"}));
        assert_eq!(page.form.success.as_deref(), Some("Profile updated successfully"));
        assert_eq!(page.saved.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn new_password_is_sent_with_confirmation_then_cleared() {
        let transport = RecordingTransport::new();
        let mut page = loaded_page(&transport).await;
        page.update(Msg::SetPassword("n3w".into()));
        page.update(Msg::SetPasswordConfirmation("n3w".into()));

        let next = resolve(page.update(Msg::Submit)).await;
        page.update(next);

        assert_eq!(
            body_json(&transport.last_request().unwrap()),
            json!({"password": "n3w", "password_confirmation": "n3w"})
        );
        assert!(page.password.is_empty());
        assert!(page.password_confirmation.is_empty());
    }

    #[tokio::test]
    async fn password_mismatch_is_rejected_locally() {
        let transport = RecordingTransport::new();
        let mut page = loaded_page(&transport).await;
        let before = transport.request_count();
        page.update(Msg::SetPassword("one".into()));
        page.update(Msg::SetPasswordConfirmation("two".into()));

        assert!(page.update(Msg::Submit).is_none());
        assert_eq!(transport.request_count(), before);
        assert_eq!(page.form.error.as_deref(), Some("Passwords do not match"));
    }

    #[tokio::test]
    async fn empty_email_is_rejected_locally() {
        let transport = RecordingTransport::new();
        let mut page = loaded_page(&transport).await;
        let before = transport.request_count();
        page.update(Msg::SetEmail(String::new()));

        assert!(page.update(Msg::Submit).is_none());
        assert_eq!(transport.request_count(), before);
        assert_eq!(page.form.error.as_deref(), Some("Name and email are required"));
    }

    #[tokio::test]
    async fn failed_update_keeps_the_page() {
        let transport = RecordingTransport::new();
        let mut page = loaded_page(&transport).await;
        transport.respond(500, json!({}));
        page.update(Msg::SetEmail("new@example.com".into()));

        let next = resolve(page.update(Msg::Submit)).await;
        let effect = page.update(next);

        assert!(effect.is_none());
        assert_eq!(page.form.error.as_deref(), Some("Failed to update profile"));
        assert_eq!(page.saved.email, "ada@example.com");
    }
}
