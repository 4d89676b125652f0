use anyhow::Result;
use scenic::{SceneApp, SceneConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::from_env();
    log::info!(
        "Showing {:?} with {} object groups",
        config.text.content,
        config.object_groups
    );

    SceneApp::new(config)?.run()
}
