//! Quote command handler

use anyhow::Result;

use lumen_core::random_quote;

use crate::output::Output;

/// Print a random literary quote
pub fn show(output: &Output) -> Result<()> {
    output.print_quote(random_quote());
    Ok(())
}
