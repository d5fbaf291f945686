//! Registry of the sort orders the discover listing accepts.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    ReleaseDate,
    Title,
    VoteAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOption {
    #[serde(rename = "release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "title.asc")]
    TitleAsc,
    #[serde(rename = "title.desc")]
    TitleDesc,
    #[serde(rename = "vote_average.asc")]
    VoteAverageAsc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
}

pub const DEFAULT_SORT: SortOption = SortOption::ReleaseDateDesc;

impl SortOption {
    /// Every accepted option, in the order the sort menu lists them.
    pub const ALL: [SortOption; 6] = [
        SortOption::ReleaseDateAsc,
        SortOption::ReleaseDateDesc,
        SortOption::TitleAsc,
        SortOption::TitleDesc,
        SortOption::VoteAverageAsc,
        SortOption::VoteAverageDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::ReleaseDateAsc => "release_date.asc",
            SortOption::ReleaseDateDesc => "release_date.desc",
            SortOption::TitleAsc => "title.asc",
            SortOption::TitleDesc => "title.desc",
            SortOption::VoteAverageAsc => "vote_average.asc",
            SortOption::VoteAverageDesc => "vote_average.desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::ReleaseDateAsc => "Release Date (Oldest First)",
            SortOption::ReleaseDateDesc => "Release Date (Newest First)",
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
            SortOption::VoteAverageAsc => "Rating (Lowest First)",
            SortOption::VoteAverageDesc => "Rating (Highest First)",
        }
    }

    pub fn field(&self) -> SortField {
        match self {
            SortOption::ReleaseDateAsc | SortOption::ReleaseDateDesc => SortField::ReleaseDate,
            SortOption::TitleAsc | SortOption::TitleDesc => SortField::Title,
            SortOption::VoteAverageAsc | SortOption::VoteAverageDesc => SortField::VoteAverage,
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            SortOption::ReleaseDateAsc | SortOption::TitleAsc | SortOption::VoteAverageAsc => {
                SortDirection::Asc
            }
            _ => SortDirection::Desc,
        }
    }
}

impl Default for SortOption {
    fn default() -> Self {
        DEFAULT_SORT
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort option '{0}'")]
pub struct UnknownSortOption(pub String);

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    /// Exact, case-sensitive token match. No trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownSortOption(s.to_string()))
    }
}
