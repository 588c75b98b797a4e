//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::Result;
use crate::output::Formatter;
use memoir_domain::Conversation;
use memoir_importer::ExportFormat;
use std::path::Path;

/// Execute the import command.
pub fn execute_import(args: ImportArgs, formatter: &Formatter) -> Result<()> {
    let conversations = load_conversations(&args.file, args.source.into())?;
    println!("{}", formatter.format_conversations(&conversations)?);
    Ok(())
}

/// Read and reconstruct every usable conversation in an export file.
pub fn load_conversations(path: &Path, format: ExportFormat) -> Result<Vec<Conversation>> {
    Ok(format.importer().import_file(path)?)
}
