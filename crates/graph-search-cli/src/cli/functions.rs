//! `graph-search functions` command implementation.

use colored::Colorize;

use super::Session;
use crate::error::Result;

/// List every registered table function with its signature.
pub fn run(session: &Session) -> Result<()> {
    let registry = session.registry();
    println!("{}:", "Table functions".white().bold());
    for signature in registry.signatures() {
        println!("  {}", signature.name.cyan().bold());
        println!("    {}", signature.to_string().dimmed());
    }
    Ok(())
}
