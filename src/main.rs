use anyhow::Context;
use audio_router_rs::{hotkeys, watcher, AppPaths, RouterApp};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let paths = AppPaths::resolve().context("failed to resolve application paths")?;

    // the external switcher tool is the one hard startup requirement
    paths.check_dependencies()?;

    let mut app = RouterApp::new(&paths);
    app.refresh();
    app.restore_routes();

    let handle = watcher::spawn(Arc::clone(app.profiles()), Arc::clone(app.executor()))
        .context("failed to start foreground watcher")?;
    handle.set_enabled(true);

    let _hotkeys = hotkeys::spawn(Arc::clone(app.profiles()), Arc::clone(app.executor()))
        .context("failed to start hotkey listener")?;

    info!("audio router engine running");
    handle.join();
    Ok(())
}
