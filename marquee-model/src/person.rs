//! People: actors, directors and their filmographies.

use serde::{Deserialize, Serialize};

/// Person details as shown on the person page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: String,
    #[serde(default)]
    pub biography: String,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub also_known_as: Vec<String>,
    pub homepage: Option<String>,
}

/// Movies a person appeared in or worked on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonMovieCredits {
    #[serde(default)]
    pub cast: Vec<PersonCastCredit>,
    #[serde(default)]
    pub crew: Vec<PersonCrewCredit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonCastCredit {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub release_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonCrewCredit {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub release_date: String,
}
