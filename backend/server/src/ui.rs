//! UI state kept on the server side of the storefront: open/closed flags for the
//! cart panel and the order confirmation modal, plus the admin sidebar default
//! remembered in the `sidebar_state` cookie.
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const SIDEBAR_COOKIE: &str = "sidebar_state";
pub const SIDEBAR_MAX_AGE: Duration = Duration::days(7);

/// Single open/closed cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Toggle {
    open: bool,
}

pub type CartPanel = Toggle;
pub type Modal = Toggle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Open,
    Close,
    Toggle,
}

impl Toggle {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn apply(&mut self, action: ToggleAction) -> bool {
        match action {
            ToggleAction::Open => self.open(),
            ToggleAction::Close => self.close(),
            ToggleAction::Toggle => self.toggle(),
        }

        self.open
    }
}

/// Sidebar starts expanded unless the cookie says `false`.
pub fn sidebar_open(jar: &CookieJar) -> bool {
    jar.get(SIDEBAR_COOKIE)
        .is_none_or(|cookie| cookie.value() != "false")
}

/// Readable by client scripts, so no `HttpOnly`.
pub fn sidebar_cookie(open: bool) -> Cookie<'static> {
    Cookie::build((SIDEBAR_COOKIE, open.to_string()))
        .path("/")
        .max_age(SIDEBAR_MAX_AGE)
        .same_site(SameSite::Lax)
        .build()
}
