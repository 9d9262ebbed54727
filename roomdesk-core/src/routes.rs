use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::access::{self, AccessState, Requirement, ViewPermission};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    SearchHotels,
    HotelDetails { hotel_id: i64 },
    Login,
    Register,
    Favorites,
    Bookings,
    Messages,
    Profile,
    ProfileEdit,
    Users,
    UserDetail { user_id: i64 },
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["search-hotels"] => Route::SearchHotels,
            ["hotels", id] => match id.parse() {
                Ok(hotel_id) => Route::HotelDetails { hotel_id },
                Err(_) => Route::NotFound(path.to_string()),
            },
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["favorites"] => Route::Favorites,
            ["bookings"] => Route::Bookings,
            ["messages"] => Route::Messages,
            ["profile"] => Route::Profile,
            ["profile", "edit"] => Route::ProfileEdit,
            ["users"] => Route::Users,
            ["users", id] => match id.parse() {
                Ok(user_id) => Route::UserDetail { user_id },
                Err(_) => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::SearchHotels => "/search-hotels".to_string(),
            Route::HotelDetails { hotel_id } => format!("/hotels/{hotel_id}"),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Bookings => "/bookings".to_string(),
            Route::Messages => "/messages".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::ProfileEdit => "/profile/edit".to_string(),
            Route::Users => "/users".to_string(),
            Route::UserDetail { user_id } => format!("/users/{user_id}"),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Home
            | Route::About
            | Route::SearchHotels
            | Route::HotelDetails { .. }
            | Route::Login
            | Route::Register
            | Route::NotFound(_) => Requirement::Public,
            Route::Favorites | Route::Bookings | Route::Messages | Route::Profile | Route::ProfileEdit => {
                Requirement::Authenticated
            }
            Route::Users | Route::UserDetail { .. } => Requirement::Admin,
        }
    }
}

/// The page variant to render. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    SearchHotels,
    HotelDetails { hotel_id: i64 },
    Login,
    Register,
    Favorites,
    /// Every booking, with per-room status editing.
    StaffBookings,
    /// The signed-in guest's own bookings, read-only.
    MyBookings,
    Messages { can_reply: bool },
    Profile,
    ProfileEdit,
    Users,
    UserDetail { user_id: i64 },
    NotFound,
}

pub fn resolve_page(route: &Route, access: AccessState) -> Page {
    let granted = match access::resolve(route.requirement(), access) {
        ViewPermission::Login => return Page::Login,
        ViewPermission::Granted(granted) => granted,
    };

    match route {
        Route::Home => Page::Home,
        Route::About => Page::About,
        Route::SearchHotels => Page::SearchHotels,
        Route::HotelDetails { hotel_id } => Page::HotelDetails { hotel_id: *hotel_id },
        Route::Login => Page::Login,
        Route::Register => Page::Register,
        Route::Favorites => Page::Favorites,
        Route::Bookings if granted.is_staff() => Page::StaffBookings,
        Route::Bookings => Page::MyBookings,
        Route::Messages => Page::Messages {
            can_reply: granted.is_staff(),
        },
        Route::Profile => Page::Profile,
        Route::ProfileEdit => Page::ProfileEdit,
        Route::Users => Page::Users,
        Route::UserDetail { user_id } => Page::UserDetail { user_id: *user_id },
        Route::NotFound(_) => Page::NotFound,
    }
}

/// In-memory navigation: current route, optional state handed over by the
/// previous page, and the page resolved for it.
pub struct Navigator {
    session: Arc<Session>,
    route: Route,
    state: Option<Value>,
    access: AccessState,
    page: Page,
}

impl Navigator {
    /// Starts anonymous on the home page until the first navigation resolves.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            route: Route::Home,
            state: None,
            access: AccessState::Anonymous,
            page: Page::Home,
        }
    }

    pub async fn navigate(&mut self, path: &str, state: Option<Value>) -> &Page {
        self.route = Route::parse(path);
        self.state = state;
        self.reevaluate().await
    }

    /// Re-resolve the current route, e.g. after a session event.
    pub async fn reevaluate(&mut self) -> &Page {
        self.access = AccessState::from_snapshot(&self.session.snapshot().await);
        self.page = resolve_page(&self.route, self.access);
        debug!(route = %self.route.path(), access = ?self.access, page = ?self.page, "Resolved page");
        &self.page
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    pub fn access(&self) -> AccessState {
        self.access
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}
