use sauron::{
    html::{attributes::*, *},
    prelude::*,
};

use super::Effect;
use crate::route::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub enum Msg {
    GoTo(Route),
}

/// Landing page. Chooses its links from the stored session; no network.
pub struct HomePage {
    pub signed_in: bool,
}

impl HomePage {
    pub fn new(session: &dyn SessionStore) -> Self {
        Self {
            signed_in: session.is_signed_in(),
        }
    }

    /// Links shown in the navigation bar.
    pub fn links(&self) -> Vec<(&'static str, Route)> {
        if self.signed_in {
            vec![("Dashboard", Route::Tasks)]
        } else {
            vec![("Login", Route::Login), ("SignUp", Route::Register)]
        }
    }

    pub fn update(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::GoTo(route) => Effect::Navigate(route),
        }
    }

    pub fn view(&self) -> Node<Msg> {
        div(
            [class("min-h-screen")],
            [
                nav(
                    [class("flex justify-between p-6")],
                    [
                        h1([class("text-2xl font-bold text-[#FF2D20]")], [text("TaskMate")]),
                        div(
                            [class("space-x-4")],
                            self.links().into_iter().map(|(caption, route)| nav_link(caption, route)),
                        ),
                    ],
                ),
                div(
                    [class("text-center py-20")],
                    [
                        h2([class("text-4xl font-bold mb-4")], [text("Organize Your Tasks")]),
                        p(
                            [class("text-gray-600 mb-8")],
                            [text("TaskMate helps you plan, track, and complete your tasks with ease.")],
                        ),
                        nav_link("Start Free", Route::Register),
                    ],
                ),
            ],
        )
    }
}

fn nav_link(caption: &str, route: Route) -> Node<Msg> {
    a(
        [
            href(route.to_path()),
            on_click(move |event| {
                event.prevent_default();
                Msg::GoTo(route)
            }),
        ],
        [text(caption)],
    )
}
