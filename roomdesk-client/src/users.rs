use reqwest::Method;
use roomdesk_core::{ClientError, ClientResult};
use roomdesk_shared::{AdminUserUpdate, ProfileUpdate, Role, User};
use serde::Serialize;

use crate::http::{ApiClient, Auth};

/// Page size used when resolving a single user through the list endpoint.
const USER_LOOKUP_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsersPage {
    pub limit: u32,
    pub page: u32,
}

impl Default for UsersPage {
    fn default() -> Self {
        Self { limit: 10, page: 1 }
    }
}

impl ApiClient {
    pub async fn profile(&self) -> ClientResult<User> {
        self.get("/users/profile", Auth::Bearer).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.call(Method::PUT, "/users/profile", Auth::Bearer, Some(update)).await
    }

    /// Admin only.
    pub async fn users(&self, page: UsersPage) -> ClientResult<Vec<User>> {
        self.get_query("/users/list", Auth::Bearer, &page).await
    }

    /// Admin only. There is no by-id endpoint for full records, so this
    /// scans the first page of the list.
    pub async fn user_by_id(&self, user_id: i64) -> ClientResult<User> {
        let page = UsersPage {
            limit: USER_LOOKUP_LIMIT,
            page: 1,
        };
        self.users(page)
            .await?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ClientError::NotFound("User not found.".to_string()))
    }

    /// Admin only.
    pub async fn update_user(&self, user_id: i64, update: &AdminUserUpdate) -> ClientResult<User> {
        self.call(Method::PUT, &format!("/users/profile/{user_id}"), Auth::Bearer, Some(update))
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") || value.trim().is_empty() {
            RoleFilter::All
        } else {
            RoleFilter::Only(Role::parse(value))
        }
    }

    fn matches(&self, role: &Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => wanted == role,
        }
    }
}

/// Case-insensitive match on names, username and email, plus a role filter.
pub fn filter_users<'a>(users: &'a [User], search: &str, role: &RoleFilter) -> Vec<&'a User> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|u| role.matches(&u.role))
        .filter(|u| {
            needle.is_empty()
                || [&u.firstname, &u.lastname, &u.username, &u.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, first: &str, username: &str, role: Role) -> User {
        User {
            id,
            firstname: first.to_string(),
            lastname: "Silva".to_string(),
            username: username.to_string(),
            about: None,
            email: format!("{username}@example.com"),
            avatarurl: None,
            role,
        }
    }

    #[test]
    fn test_filter_by_text_and_role() {
        let users = vec![
            user(1, "Joana", "joana", Role::User),
            user(2, "Pedro", "frontdesk", Role::Operator),
            user(3, "Marta", "boss", Role::Admin),
        ];

        let ids = |found: Vec<&User>| found.iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids(filter_users(&users, "", &RoleFilter::All)), vec![1, 2, 3]);
        assert_eq!(ids(filter_users(&users, "FRONT", &RoleFilter::All)), vec![2]);
        assert_eq!(ids(filter_users(&users, "silva", &RoleFilter::parse("admin"))), vec![3]);
        assert_eq!(ids(filter_users(&users, "joana", &RoleFilter::parse("operator"))), Vec::<i64>::new());
    }

    #[test]
    fn test_role_filter_parse() {
        assert_eq!(RoleFilter::parse("All"), RoleFilter::All);
        assert_eq!(RoleFilter::parse("Operator"), RoleFilter::Only(Role::Operator));
    }

    #[test]
    fn test_default_page() {
        assert_eq!(UsersPage::default(), UsersPage { limit: 10, page: 1 });
    }
}
