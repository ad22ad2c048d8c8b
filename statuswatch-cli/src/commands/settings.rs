use tracing::info;

use super::{CliError, Context};

pub fn run_filter(
    ctx: &Context,
    service: &str,
    component: &str,
    included: bool,
) -> Result<(), CliError> {
    ensure_known(ctx, service)?;
    let mut settings = ctx.settings()?;
    settings.filters.set(service, component, included);
    settings.save(&ctx.settings_path)?;

    info!(service, component, included, "component filter updated");
    println!(
        "{} / {}: {}",
        service,
        component,
        if included { "shown" } else { "hidden" }
    );
    Ok(())
}

pub fn run_favorite(ctx: &Context, service: &str, component: &str) -> Result<(), CliError> {
    ensure_known(ctx, service)?;
    let mut settings = ctx.settings()?;
    let favorite = settings.favorites.toggle(service, component);
    settings.save(&ctx.settings_path)?;

    println!(
        "{} / {}: {}",
        service,
        component,
        if favorite { "favorite" } else { "not favorite" }
    );
    Ok(())
}

fn ensure_known(ctx: &Context, service: &str) -> Result<(), CliError> {
    if ctx.config.services.contains_key(service) {
        Ok(())
    } else {
        Err(CliError::UnknownServices(vec![service.to_string()]))
    }
}
