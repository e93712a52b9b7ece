use serde::Deserialize;

/// A GitHub user profile as returned by the `/users/{username}` API.
///
/// Only the fields the finder displays are decoded; everything else in the
/// response body is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
}

/// A single entry from the `/users/{username}/followers` API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Follower {
    pub login: String,
    pub id: u64,
    pub avatar_url: String,
    pub html_url: String,
}
