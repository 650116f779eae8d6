//! ZIP commands

use survey_intake::{ZipCode, ZipDataset};

use super::Context;
use crate::ZipCommands;

pub async fn handle(action: ZipCommands, ctx: &Context) -> Result<(), String> {
    match action {
        ZipCommands::Lookup { zip, zips } => {
            let path = ctx
                .zip_dataset(zips)
                .ok_or("No ZIP dataset given; pass --zips or set zip_dataset")?;
            let index = ZipDataset::load_from_path(&path).map_err(|e| e.to_string())?;

            let canonical = ZipCode::parse(&zip).map_err(|e| e.to_string())?;
            match index.get(canonical) {
                Some(entry) => ctx.format.print_zip(entry),
                None => return Err(format!("No match for ZIP {canonical}")),
            }
        }
    }
    Ok(())
}
