use anyhow::Result;
use speechprep_configuration::{load_config, setup_logging};
use speechprep_setup::build_and_run;

fn main() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config);
    let response = build_and_run(config)?;
    tracing::info!(
        destination = %response.destination.display(),
        outcome = ?response.outcome,
        "dataset ready"
    );
    Ok(())
}
