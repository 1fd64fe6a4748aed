use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory, its store directory and a default `config.json`.
///
/// # Arguments
/// - `pocket_home` - The directory that will be the root of data directory, e.g. `$HOME/pocket`
///
/// # Errors
/// - Returns a `Config` error if the directory cannot be created or is already initialized.
pub async fn init(pocket_home: &Path) -> Result<Out<()>> {
    let config = Config::create(pocket_home).await?;
    Ok(format!(
        "Successfully created the pocket directory at {}",
        config.root().display()
    )
    .into())
}
