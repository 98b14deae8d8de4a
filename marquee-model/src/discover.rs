//! Discover/filter query parameters for the explore page.

use serde::{Deserialize, Serialize};

/// Time window for the trending listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendingWindow {
    #[default]
    Day,
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Sort orders TMDB accepts on the discover endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    PopularityDesc,
    VoteAverageDesc,
    RevenueDesc,
    PrimaryReleaseDateDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
            SortOrder::RevenueDesc => "revenue.desc",
            SortOrder::PrimaryReleaseDateDesc => "primary_release_date.desc",
        }
    }
}

/// Parameterized catalog listing: genre, year, sort order, minimum rating.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverFilters {
    #[serde(default)]
    pub sort_by: SortOrder,
    pub year: Option<u16>,
    #[serde(default)]
    pub with_genres: Vec<u64>,
    pub vote_average_gte: Option<f32>,
    pub with_original_language: Option<String>,
    pub page: Option<u32>,
}
