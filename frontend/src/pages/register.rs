use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{AuthToken, OAuthProvider, Registration};

use super::login::social_buttons;
use super::{complete_sign_in, feedback, Effect, FormState};
use crate::api::{Api, ApiError};
use crate::route::Route;

#[derive(Debug, Clone)]
pub enum Msg {
    SetName(String),
    SetEmail(String),
    SetPassword(String),
    SetPasswordConfirmation(String),
    Submit,
    Completed(Result<AuthToken, ApiError>),
    SocialLogin(OAuthProvider),
    GoTo(Route),
}

pub struct RegisterPage {
    api: Api,
    pub registration: Registration,
    pub form: FormState,
}

impl RegisterPage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            registration: Registration::default(),
            form: FormState::default(),
        }
    }

    fn validate(&self) -> Result<(), &'static str> {
        let r = &self.registration;
        if r.name.trim().is_empty()
            || r.email.trim().is_empty()
            || r.password.is_empty()
            || r.password_confirmation.is_empty()
        {
            return Err("All fields are required");
        }
        if r.password != r.password_confirmation {
            return Err("Passwords do not match");
        }
        Ok(())
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::SetName(name) => {
                self.registration.name = name;
                Effect::None
            }
            Msg::SetEmail(email) => {
                self.registration.email = email;
                Effect::None
            }
            Msg::SetPassword(password) => {
                self.registration.password = password;
                Effect::None
            }
            Msg::SetPasswordConfirmation(confirmation) => {
                self.registration.password_confirmation = confirmation;
                Effect::None
            }
            Msg::Submit => {
                if let Err(problem) = self.validate() {
                    self.form.reject(problem);
                    return Effect::None;
                }
                if !self.form.begin() {
                    return Effect::None;
                }
                let api = self.api.clone();
                let registration = self.registration.clone();
                Effect::perform(async move { Msg::Completed(api.register(&registration).await) })
            }
            Msg::Completed(result) => {
                complete_sign_in(&self.api, &mut self.form, result, "Registration failed")
            }
            Msg::SocialLogin(provider) => Effect::Redirect(self.api.oauth_url(provider)),
            Msg::GoTo(route) => Effect::Navigate(route),
        }
    }

    pub fn view(&self) -> Node<Msg> {
        let r = &self.registration;
        div(
            [class("max-w-md mx-auto p-6 bg-white shadow rounded")],
            [
                h1([class("text-2xl font-bold text-[#FF2D20] mb-6")], [text("Create Account")]),
                feedback(&self.form),
                input(
                    [
                        placeholder("Name"),
                        value(&r.name),
                        on_input(|event| Msg::SetName(event.value())),
                    ],
                    [],
                ),
                input(
                    [
                        r#type("email"),
                        placeholder("Email"),
                        value(&r.email),
                        on_input(|event| Msg::SetEmail(event.value())),
                    ],
                    [],
                ),
                input(
                    [
                        r#type("password"),
                        placeholder("Password"),
                        value(&r.password),
                        on_input(|event| Msg::SetPassword(event.value())),
                    ],
                    [],
                ),
                input(
                    [
                        r#type("password"),
                        placeholder("Confirm Password"),
                        value(&r.password_confirmation),
                        on_input(|event| Msg::SetPasswordConfirmation(event.value())),
                    ],
                    [],
                ),
                button(
                    [on_click(|_| Msg::Submit), disabled(self.form.submitting)],
                    [text(if self.form.submitting { "Creating Account..." } else { "Sign Up" })],
                ),
                social_buttons(Msg::SocialLogin),
                p(
                    [class("mt-4 text-sm")],
                    [
                        text("Already have an account? "),
                        a(
                            [
                                href(Route::Login.to_path()),
                                on_click(|event| {
                                    event.prevent_default();
                                    Msg::GoTo(Route::Login)
                                }),
                            ],
                            [text("Login")],
                        ),
                    ],
                ),
            ],
        )
    }
}
