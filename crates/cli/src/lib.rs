//! `authstatus` command: project an authentication record document onto the
//! client-facing authentication status.

use anyhow::Context;

use authstatus_auth::Authentication;
use authstatus_status::project;

/// Decode an authentication record document and return its status as
/// pretty-printed JSON.
pub fn render_status(document: &str) -> anyhow::Result<String> {
    let authentication: Authentication =
        serde_json::from_str(document).context("failed to decode authentication record")?;

    let status = project(&authentication).context("failed to project authentication status")?;

    tracing::info!(
        principal = %status.user.principal,
        authentication_type = %status.authentication_type,
        "authentication status rendered"
    );

    serde_json::to_string_pretty(&status).context("failed to encode authentication status")
}
