//! Change-request command: ServiceNow change creation

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::tracker::create_change_request;
use crate::commands::ConfigArgs;
use crate::domain::tracker::release_label;
use crate::infra::jira::JiraClient;
use crate::infra::servicenow::ServiceNowClient;
use crate::output::human::HumanRenderer;
use crate::output::reporter::TerminalReporter;

#[derive(Subcommand, Debug)]
pub enum ChangeRequestCommand {
    /// Open a change request whose description lists the given issues
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Release version
    #[arg(long = "version-number", env = "CFDEPLOY_VERSION")]
    pub version_number: String,

    /// Length of the change window, starting now
    #[arg(long, default_value_t = 1)]
    pub window_hours: u32,

    /// Issue ids or keys included in the release
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Run a change-request subcommand.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or Jira cannot be reached.
/// A failure to create the change itself is only a warning.
pub async fn run(app: &AppContext, cmd: ChangeRequestCommand) -> Result<()> {
    let ChangeRequestCommand::Create(args) = cmd;
    let build = args.config.load()?;
    let project = build.project_name()?;
    let jira = JiraClient::new(build.resolve_jira(&app.settings, &app.env)?, app.http_timeout())?;
    let servicenow = ServiceNowClient::new(
        build.resolve_servicenow(&app.settings, &app.env)?,
        app.http_timeout(),
    )?;
    let reporter = TerminalReporter::new(&app.output);

    let number = create_change_request(
        &jira,
        &servicenow,
        &reporter,
        &release_label(&project, args.version_number.trim()),
        &args.ids,
        Utc::now(),
        Duration::hours(i64::from(args.window_hours)),
    )
    .await?;
    HumanRenderer::new(&app.output).render_change(number.as_deref());
    Ok(())
}
