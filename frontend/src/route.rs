#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Profile,
    Tasks,
    ApiProbe,
}

impl Route {
    pub fn to_path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
            Route::Tasks => "/tasks",
            Route::ApiProbe => "/test-api",
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/profile" => Route::Profile,
            "/tasks" => Route::Tasks,
            "/test-api" => Route::ApiProbe,
            _ => Route::Home,
        }
    }
}
