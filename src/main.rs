//! admin-registry - print the admin navigation a role would see.
//!
//! Usage: `admin-registry [config.toml] [role]`
//!
//! Without a config path the built-in catalog is used. The role defaults to
//! `admin`.

use admin_registry::{AdminModuleRegistry, Config, RequestingUser, Role};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().filter(|arg| arg != "-");
    let role: Role = args.next().as_deref().unwrap_or("admin").into();

    let mut config = match &config_path {
        Some(path) => Config::load(path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None => Config::default(),
    };
    config.registry = config.registry.with_env_overrides();

    let mut registry = AdminModuleRegistry::from_config(&config);
    registry.initialize();

    for conflict in registry.route_conflicts() {
        tracing::warn!(route = %conflict.route, ids = ?conflict.ids, "Shared module route");
    }

    let viewer = RequestingUser::new("cli", role);
    let navigation = registry.get_navigation_structure(Some(&viewer));
    info!(
        role = %viewer.role,
        visible = registry.get_modules_for_user(Some(&viewer)).len(),
        enabled = registry.get_enabled().len(),
        "Built navigation"
    );

    println!("{}", serde_json::to_string_pretty(&navigation)?);
    Ok(())
}
