use statuswatch_core::category::category_for;

use super::{CliError, Context};

pub fn run_services(ctx: &Context) -> Result<(), CliError> {
    match &ctx.config_path {
        Some(path) => println!("Config: {}\n", path.display()),
        None => println!("Config: built-in catalog\n"),
    }

    for entry in ctx.config.entries() {
        let category = category_for(&entry.slug).map(|c| c.name).unwrap_or("Other");
        println!(
            "  {:<14} {:<22} {:<10} {}",
            entry.slug, entry.display_name, category, entry.page_url
        );
        if !entry.components.is_empty() {
            println!("  {:<14} components: {}", "", entry.components.join(", "));
        }
    }

    println!(
        "\n{} services, refreshed every {}s",
        ctx.config.services.len(),
        ctx.config.refresh_interval_secs
    );
    Ok(())
}
