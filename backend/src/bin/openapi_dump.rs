//! Print the OpenAPI document as JSON.

use color_eyre::eyre::Result;
use reviewhub::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi().to_pretty_json()?;
    println!("{document}");
    Ok(())
}
