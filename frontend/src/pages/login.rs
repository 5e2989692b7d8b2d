use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{AuthToken, Credentials, OAuthProvider};

use super::{complete_sign_in, feedback, Effect, FormState};
use crate::api::{Api, ApiError};
use crate::route::Route;

#[derive(Debug, Clone)]
pub enum Msg {
    SetEmail(String),
    SetPassword(String),
    Submit,
    Completed(Result<AuthToken, ApiError>),
    SocialLogin(OAuthProvider),
    GoTo(Route),
}

pub struct LoginPage {
    api: Api,
    pub credentials: Credentials,
    pub form: FormState,
}

impl LoginPage {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            credentials: Credentials::default(),
            form: FormState::default(),
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::SetEmail(email) => {
                self.credentials.email = email;
                Effect::None
            }
            Msg::SetPassword(password) => {
                self.credentials.password = password;
                Effect::None
            }
            Msg::Submit => {
                if self.credentials.email.trim().is_empty() || self.credentials.password.is_empty() {
                    self.form.reject("Email and password are required");
                    return Effect::None;
                }
                if !self.form.begin() {
                    return Effect::None;
                }
                let api = self.api.clone();
                let credentials = self.credentials.clone();
                Effect::perform(async move { Msg::Completed(api.login(&credentials).await) })
            }
            Msg::Completed(result) => complete_sign_in(&self.api, &mut self.form, result, "Login failed"),
            Msg::SocialLogin(provider) => Effect::Redirect(self.api.oauth_url(provider)),
            Msg::GoTo(route) => Effect::Navigate(route),
        }
    }

    pub fn view(&self) -> Node<Msg> {
        div(
            [class("max-w-md mx-auto p-6 bg-white shadow rounded")],
            [
                h1([class("text-2xl font-bold text-[#FF2D20] mb-6")], [text("Login")]),
                feedback(&self.form),
                input(
                    [
                        r#type("email"),
                        placeholder("Email"),
                        value(&self.credentials.email),
                        on_input(|event| Msg::SetEmail(event.value())),
                    ],
                    [],
                ),
                input(
                    [
                        r#type("password"),
                        placeholder("Password"),
                        value(&self.credentials.password),
                        on_input(|event| Msg::SetPassword(event.value())),
                    ],
                    [],
                ),
                button(
                    [on_click(|_| Msg::Submit), disabled(self.form.submitting)],
                    [text(if self.form.submitting { "Logging in..." } else { "Login" })],
                ),
                social_buttons(Msg::SocialLogin),
                p(
                    [class("mt-4 text-sm")],
                    [
                        text("No account yet? "),
                        a(
                            [
                                href(Route::Register.to_path()),
                                on_click(|event| {
                                    event.prevent_default();
                                    Msg::GoTo(Route::Register)
                                }),
                            ],
                            [text("Sign up")],
                        ),
                    ],
                ),
            ],
        )
    }
}

pub(crate) fn social_buttons<M: 'static>(to_msg: fn(OAuthProvider) -> M) -> Node<M> {
    div(
        [class("mt-4 space-y-2")],
        [OAuthProvider::Google, OAuthProvider::Facebook].map(|provider| {
            button(
                [
                    class("border w-full py-2 rounded"),
                    on_click(move |_| to_msg(provider)),
                ],
                [text(provider.label())],
            )
        }),
    )
}
