use std::io::Read;

use anyhow::Context;

use authstatus_observability::ObservabilityConfig;

fn main() -> anyhow::Result<()> {
    let config = ObservabilityConfig::from_env()?;
    authstatus_observability::init(&config);

    let document = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    println!("{}", authstatus_cli::render_status(&document)?);
    Ok(())
}
