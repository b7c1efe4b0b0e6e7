//! Platform definitions for aggregated content sources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Feed category a platform is shown under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Trending / hot-search boards
    Hot,
    Tech,
    Finance,
    Social,
    Entertainment,
    Sports,
    Car,
    Favorites,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Hot,
        Category::Tech,
        Category::Finance,
        Category::Social,
        Category::Entertainment,
        Category::Sports,
        Category::Car,
        Category::Favorites,
    ];

    /// Stable lowercase key (used in query strings and cache keys)
    pub fn key(&self) -> &'static str {
        match self {
            Category::Hot => "hot",
            Category::Tech => "tech",
            Category::Finance => "finance",
            Category::Social => "social",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::Car => "car",
            Category::Favorites => "favorites",
        }
    }

    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Hot => "热搜榜",
            Category::Tech => "科技资讯",
            Category::Finance => "财经新闻",
            Category::Social => "社会新闻",
            Category::Entertainment => "娱乐资讯",
            Category::Sports => "体育赛事",
            Category::Car => "汽车资讯",
            Category::Favorites => "收藏",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Static descriptor of one upstream source
///
/// Defined at build time and immutable at runtime. `platform` is the key the
/// registry and the cache are addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub platform: String,
    pub title: String,
    pub category: Category,
    /// Rendering template hint for the front end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Platform {
    pub fn new(platform: &str, title: &str, category: Category) -> Self {
        Self {
            platform: platform.to_string(),
            title: title.to_string(),
            category,
            component: None,
            icon: None,
        }
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }
}
