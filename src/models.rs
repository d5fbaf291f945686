use serde::{Deserialize, Deserializer, Serialize};

/// TMDB sends `null` for unknown strings and numbers; read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of a discover or search listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MovieListing {
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieListingItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MovieListingItem {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    pub runtime: Option<u32>,
    /// Zero means not disclosed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    /// Zero means not disclosed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
}

impl MovieDetail {
    /// Whether the detail page has anything for its "additional details" block.
    pub fn has_additional_details(&self) -> bool {
        !self.production_companies.is_empty() || self.budget > 0 || self.revenue > 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_country: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpokenLanguage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub english_name: String,
    pub iso_639_1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}
