pub mod content;
pub mod service;

use anyhow::Result;
use folio_shared::car_api::{CarService, HttpTransport};
use serde::Serialize;
use serde_json::Value;

use crate::cli::{Cli, Commands};

/// Run one command and return its JSON output.
pub async fn execute(cli: Cli) -> Result<Value> {
    let Cli {
        content_dir,
        api_base,
        command,
    } = cli;
    let car_service = || CarService::new(HttpTransport::new(api_base.clone()));

    match command {
        Commands::ListPosts {
            project,
            tag,
        } => content::list_posts(&content_dir, project.as_deref(), tag.as_deref()),
        Commands::GetPost {
            slug,
        } => content::get_post(&content_dir, &slug),
        Commands::ListTags => content::list_tags(&content_dir),
        Commands::ListProjects => content::list_projects(),
        Commands::Dashboard(args) => service::dashboard(&car_service(), &args.filters()).await,
        Commands::Options {
            brand,
            series,
        } => service::options(&car_service(), brand.as_deref(), series.as_deref()).await,
        Commands::Versions => service::versions(&car_service()).await,
        Commands::Drift {
            reference,
            current,
        } => service::drift(&car_service(), reference.as_deref(), current.as_deref()).await,
        Commands::Predict {
            input,
        } => service::predict(&car_service(), &input).await,
        Commands::Shap {
            version,
            out,
        } => service::shap(&car_service(), version.as_deref(), &out).await,
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
