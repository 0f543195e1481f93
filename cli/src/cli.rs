use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_shared::{car_api::DEFAULT_API_BASE, DashboardFilters, FilterField};

#[derive(Parser)]
#[command(name = "folio", version, about = "Portfolio content and car price service CLI")]
pub struct Cli {
    /// Blog content root.
    #[arg(long, env = "CONTENT_DIR", default_value = "./content/blog", global = true)]
    pub content_dir: PathBuf,
    /// Base URL of the car price service.
    #[arg(long, env = "CAR_API_URL", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List posts, newest first.
    ListPosts {
        /// Only posts of this project.
        #[arg(long)]
        project: Option<String>,
        /// Only posts carrying this tag (case insensitive).
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one post by slug.
    GetPost { slug: String },
    /// Tag usage counts.
    ListTags,
    /// The project catalog.
    ListProjects,
    /// Fetch the dashboard payload for a set of filters.
    Dashboard(DashboardArgs),
    /// Brands, series of a brand, or models of a series.
    Options {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        series: Option<String>,
    },
    /// Model versions, newest first.
    Versions,
    /// Compare feature distributions of two model versions.
    Drift {
        /// Defaults to the second newest version.
        #[arg(long)]
        reference: Option<String>,
        /// Defaults to the newest version.
        #[arg(long)]
        current: Option<String>,
    },
    /// Request a price estimate for a vehicle described in a JSON file.
    Predict {
        #[arg(long)]
        input: PathBuf,
    },
    /// Download the feature-importance image of a model version.
    Shap {
        /// Defaults to the newest version.
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct DashboardArgs {
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub series: Option<String>,
    #[arg(long)]
    pub min_price: Option<String>,
    #[arg(long)]
    pub max_price: Option<String>,
    #[arg(long)]
    pub min_year: Option<String>,
    #[arg(long)]
    pub max_year: Option<String>,
    #[arg(long)]
    pub min_km: Option<String>,
    #[arg(long)]
    pub max_km: Option<String>,
}

impl DashboardArgs {
    /// Initial dashboard filters with the given flags applied.
    pub fn filters(&self) -> DashboardFilters {
        let mut filters = DashboardFilters::initial();
        let flags = [
            (FilterField::Brand, &self.brand),
            (FilterField::Series, &self.series),
            (FilterField::MinPrice, &self.min_price),
            (FilterField::MaxPrice, &self.max_price),
            (FilterField::MinYear, &self.min_year),
            (FilterField::MaxYear, &self.max_year),
            (FilterField::MinKm, &self.min_km),
            (FilterField::MaxKm, &self.max_km),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                filters.set(field, value.as_str());
            }
        }
        filters
    }
}
