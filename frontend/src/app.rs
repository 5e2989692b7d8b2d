//! Sauron application shell: owns the active page and executes the
//! effects its controller returns.

use js_sys::Promise;
use log::{debug, warn};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, AddEventListenerOptions, Window};

use crate::api::Api;
use crate::pages::guard::mount_protected;
use crate::pages::home::{self, HomePage};
use crate::pages::login::{self, LoginPage};
use crate::pages::probe::{self, ProbePage};
use crate::pages::profile::{self, ProfilePage};
use crate::pages::register::{self, RegisterPage};
use crate::pages::tasks::{self, TasksPage};
use crate::pages::Effect;
use crate::route::Route;
use crate::session::SessionStore;

/// Message addressed to whichever page is currently shown.
#[derive(Debug, Clone)]
pub enum PageMsg {
    Home(home::Msg),
    Login(login::Msg),
    Register(register::Msg),
    Profile(profile::Msg),
    Tasks(tasks::Msg),
    Probe(probe::Msg),
}

#[derive(Debug, Clone)]
pub enum Msg {
    /// Raised by the current page's view.
    Page(PageMsg),
    /// Result of a request started by the page entered as `generation`.
    Settled { generation: u64, msg: PageMsg },
    /// Browser back/forward moved to `path`.
    RouteChanged(String),
}

pub enum Page {
    Home(HomePage),
    Login(LoginPage),
    Register(RegisterPage),
    Profile(ProfilePage),
    Tasks(TasksPage),
    Probe(ProbePage),
}

impl Page {
    pub fn new(route: Route, api: &Api) -> Self {
        match route {
            Route::Home => Page::Home(HomePage::new(api.session())),
            Route::Login => Page::Login(LoginPage::new(api.clone())),
            Route::Register => Page::Register(RegisterPage::new(api.clone())),
            Route::Profile => Page::Profile(ProfilePage::new(api.clone())),
            Route::Tasks => Page::Tasks(TasksPage::new(api.clone())),
            Route::ApiProbe => Page::Probe(ProbePage::new(api.clone())),
        }
    }

    pub fn mount(&mut self, session: &dyn SessionStore) -> Effect<PageMsg> {
        match self {
            Page::Home(_) | Page::Login(_) | Page::Register(_) => Effect::None,
            Page::Profile(page) => mount_protected(page, session).map(PageMsg::Profile),
            Page::Tasks(page) => mount_protected(page, session).map(PageMsg::Tasks),
            Page::Probe(page) => page.mount().map(PageMsg::Probe),
        }
    }

    /// Messages addressed to a different page type are dropped.
    pub fn update(&mut self, msg: PageMsg) -> Effect<PageMsg> {
        match (self, msg) {
            (Page::Home(page), PageMsg::Home(msg)) => page.update(msg).map(PageMsg::Home),
            (Page::Login(page), PageMsg::Login(msg)) => page.update(msg).map(PageMsg::Login),
            (Page::Register(page), PageMsg::Register(msg)) => page.update(msg).map(PageMsg::Register),
            (Page::Profile(page), PageMsg::Profile(msg)) => page.update(msg).map(PageMsg::Profile),
            (Page::Tasks(page), PageMsg::Tasks(msg)) => page.update(msg).map(PageMsg::Tasks),
            (Page::Probe(page), PageMsg::Probe(msg)) => page.update(msg).map(PageMsg::Probe),
            (_, msg) => {
                debug!("dropping stale message {msg:?}");
                Effect::None
            }
        }
    }

    fn view(&self) -> Node<PageMsg> {
        match self {
            Page::Home(page) => page.view().map_msg(PageMsg::Home),
            Page::Login(page) => page.view().map_msg(PageMsg::Login),
            Page::Register(page) => page.view().map_msg(PageMsg::Register),
            Page::Profile(page) => page.view().map_msg(PageMsg::Profile),
            Page::Tasks(page) => page.view().map_msg(PageMsg::Tasks),
            Page::Probe(page) => page.view().map_msg(PageMsg::Probe),
        }
    }
}

pub struct App {
    api: Api,
    route: Route,
    page: Page,
    /// Bumped every time a page is entered; requests tagged with an older
    /// value belong to a page that has been replaced.
    generation: u64,
}

impl App {
    pub fn new(api: Api, route: Route) -> Self {
        let page = Page::new(route, &api);
        Self {
            api,
            route,
            page,
            generation: 0,
        }
    }

    /// Replaces the current page; its state and pending requests are discarded.
    fn switch(&mut self, route: Route) -> Effect<Msg> {
        debug!("entering {}", route.to_path());
        self.generation += 1;
        self.route = route;
        self.page = Page::new(route, &self.api);
        let effect = self.page.mount(self.api.session());
        self.tag(effect)
    }

    fn tag(&self, effect: Effect<PageMsg>) -> Effect<Msg> {
        let generation = self.generation;
        effect.map(move |msg| Msg::Settled { generation, msg })
    }

    fn dispatch(&mut self, msg: Msg) -> Effect<Msg> {
        match msg {
            Msg::Page(msg) => {
                let effect = self.page.update(msg);
                self.tag(effect)
            }
            Msg::Settled { generation, msg } if generation == self.generation => {
                let effect = self.page.update(msg);
                self.tag(effect)
            }
            Msg::Settled { generation, msg } => {
                debug!("dropping result for replaced page (generation {generation}): {msg:?}");
                Effect::None
            }
            Msg::RouteChanged(path) => {
                let route = Route::from_path(&path);
                if route == self.route {
                    Effect::None
                } else {
                    self.switch(route)
                }
            }
        }
    }

    /// Follow-up for a confirmation prompt; a declined prompt does nothing.
    fn answer(&mut self, on_confirm: Msg, accepted: bool) -> Effect<Msg> {
        if accepted {
            self.dispatch(on_confirm)
        } else {
            debug!("confirmation declined");
            Effect::None
        }
    }

    fn run(&mut self, effect: Effect<Msg>) -> Cmd<Msg> {
        match effect {
            Effect::None => Cmd::none(),
            Effect::Perform(pending) => Cmd::new(async move { pending.await }),
            Effect::Navigate(route) => {
                push_history(route);
                let effect = self.switch(route);
                self.run(effect)
            }
            Effect::Redirect(url) => {
                redirect(&url);
                Cmd::none()
            }
            Effect::Confirm { prompt, on_confirm } => {
                let effect = self.answer(on_confirm, confirm(&prompt));
                self.run(effect)
            }
        }
    }
}

impl Application for App {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        let route = self.route;
        let effect = self.switch(route);
        Cmd::batch([self.run(effect), watch_history()])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let rearm = matches!(msg, Msg::RouteChanged(_));
        let effect = self.dispatch(msg);
        let cmd = self.run(effect);
        if rearm {
            Cmd::batch([cmd, watch_history()])
        } else {
            cmd
        }
    }

    fn view(&self) -> Node<Msg> {
        div([class("min-h-screen bg-gray-50")], [self.page.view().map_msg(Msg::Page)])
    }
}

/// Route for the current `location.pathname`.
pub fn current_route() -> Route {
    window()
        .and_then(|w| w.location().pathname().ok())
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Home)
}

/// Resolves with the next `popstate`. Re-armed after each route change.
fn watch_history() -> Cmd<Msg> {
    let Some(window) = window() else {
        warn!("no window, back/forward navigation is not tracked");
        return Cmd::none();
    };
    Cmd::new(async move { Msg::RouteChanged(next_popstate(window).await) })
}

async fn next_popstate(window: Window) -> String {
    let promise = Promise::new(&mut |resolve, _reject| {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "popstate", &resolve, &options,
            )
            .is_err()
        {
            warn!("could not listen for history changes");
        }
    });
    if let Err(err) = JsFuture::from(promise).await {
        warn!("history listener failed: {err:?}");
    }
    window
        .location()
        .pathname()
        .unwrap_or_else(|_| Route::Home.to_path().to_string())
}

fn push_history(route: Route) {
    let Some(history) = window().and_then(|w| w.history().ok()) else {
        return;
    };
    if history
        .push_state_with_url(&JsValue::NULL, "", Some(route.to_path()))
        .is_err()
    {
        warn!("could not push history entry for {}", route.to_path());
    }
}

fn redirect(url: &str) {
    match window() {
        Some(w) => {
            if w.location().set_href(url).is_err() {
                warn!("redirect to {url} failed");
            }
        }
        None => warn!("no window to redirect"),
    }
}

fn confirm(prompt: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(prompt).ok())
        .unwrap_or(false)
}
