//! Client-side route table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Every page the site can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Route {
    Home,
    VirtualTour,
    Map,
    Archive,
    AudioGuide,
    Calendar,
    Community,
    Future,
    Login,
    Register,
}

impl Route {
    /// The URL path for this route.
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::VirtualTour => "/virtual-tour",
            Route::Map => "/map",
            Route::Archive => "/archive",
            Route::AudioGuide => "/audio-guide",
            Route::Calendar => "/calendar",
            Route::Community => "/community",
            Route::Future => "/future",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Resolves a request path. Query strings, fragments and trailing
    /// slashes are ignored; anything unknown redirects to `Home`.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Route::iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Home)
    }

    /// Name used by the navigation bar to highlight the active page.
    pub fn page_name(self) -> String {
        match self {
            Route::Home => "home".to_string(),
            other => other.path().trim_start_matches('/').to_string(),
        }
    }
}
