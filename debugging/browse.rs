//! Page through a running proxy and print what the listing UI would show.
//! Usage:
//!   cargo run --bin browse -- discover [sort_token] [pages]
//!   cargo run --bin browse -- search <query> [pages]
//!   cargo run --bin browse -- detail <movie_id>
//! Proxy origin comes from CINESCROLL_ORIGIN (default http://localhost:3377, .env supported).

use anyhow::{Context, Result};
use cinescroll::gateway::ApiClient;
use cinescroll::models::MovieDetail;
use cinescroll::pagination::{ListingSource, MovieFeed};
use cinescroll::sorts::{SortOption, DEFAULT_SORT};
use cinescroll::utils::{
    format_money, format_release_date, format_runtime, format_vote_average, poster_url,
};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

const DEFAULT_ORIGIN: &str = "http://localhost:3377";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Discover,
    Search,
    Detail,
}

impl FromStr for Mode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "discover" => Ok(Mode::Discover),
            "search" => Ok(Mode::Search),
            "detail" => Ok(Mode::Detail),
            _ => Err(anyhow::anyhow!(
                "mode must be 'discover', 'search' or 'detail'"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin browse -- discover [sort_token] [pages]");
        eprintln!("       cargo run --bin browse -- search <query> [pages]");
        eprintln!("       cargo run --bin browse -- detail <movie_id>");
        std::process::exit(1);
    }

    let origin = env::var("CINESCROLL_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
    let api = ApiClient::from_env(origin);

    match Mode::from_str(&args[1])? {
        Mode::Discover => {
            let sort = match args.get(2) {
                Some(raw) => SortOption::from_str(raw)?,
                None => DEFAULT_SORT,
            };
            let pages = parse_pages(args.get(3))?;
            browse(&api, ListingSource::Discover(sort), pages).await?
        }
        Mode::Search => {
            let query = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("missing search query"))?;
            let pages = parse_pages(args.get(3))?;
            browse(&api, ListingSource::Search(query.clone()), pages).await?
        }
        Mode::Detail => {
            let id: u64 = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("missing movie id"))?
                .parse()
                .context("movie id must be an integer")?;
            let detail = api.get_movie_detail(id).await?;
            print_detail(&detail);
        }
    }

    Ok(())
}

fn parse_pages(raw: Option<&String>) -> Result<u32> {
    match raw {
        Some(raw) => raw.parse().context("pages must be an integer"),
        None => Ok(3),
    }
}

async fn browse(api: &ApiClient, source: ListingSource, max_pages: u32) -> Result<()> {
    let mut feed = MovieFeed::new(source);
    let mut fetched = 0;
    while fetched < max_pages && feed.fetch_next_page(api).await? {
        fetched += 1;
    }

    for movie in feed.movies() {
        println!(
            "{:>8}  {:<50} {:>4}  {}",
            movie.id,
            movie.title,
            format_vote_average(movie.vote_average),
            format_release_date(&movie.release_date)
        );
    }
    if feed.has_next_page() {
        println!("-- {} movies over {} pages, more available", feed.movies().len(), fetched);
    } else {
        println!("-- reached the end: found {} movies", feed.movies().len());
    }
    Ok(())
}

fn print_detail(movie: &MovieDetail) {
    println!("{} ({})", movie.title, format_release_date(&movie.release_date));
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("  \"{}\"", tagline);
    }
    println!(
        "  Rating:   {} ({} votes)",
        format_vote_average(movie.vote_average),
        movie.vote_count
    );
    println!(
        "  Duration: {}",
        movie
            .runtime
            .filter(|r| *r > 0)
            .map(format_runtime)
            .unwrap_or_else(|| "Unknown".to_string())
    );
    println!("  Language: {}", movie.original_language.to_uppercase());
    println!("  Status:   {}", movie.status);
    let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
    if !genres.is_empty() {
        println!("  Genres:   {}", genres.join(", "));
    }
    if let Some(url) = poster_url(movie.poster_path.as_deref(), "w500") {
        println!("  Poster:   {}", url);
    }
    if movie.has_additional_details() {
        let companies: Vec<&str> = movie
            .production_companies
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        if !companies.is_empty() {
            println!("  Studios:  {}", companies.join(", "));
        }
        if movie.budget > 0 {
            println!("  Budget:   {}", format_money(movie.budget));
        }
        if movie.revenue > 0 {
            println!("  Revenue:  {}", format_money(movie.revenue));
        }
    }
    println!();
    println!("{}", movie.overview);
}
