//! Stories command: issue details and release tagging in Jira

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::tracker::{story_details, tag_stories};
use crate::commands::ConfigArgs;
use crate::domain::tracker::{release_label, semantic_bump};
use crate::infra::jira::JiraClient;
use crate::output::human::HumanRenderer;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

#[derive(Subcommand, Debug)]
pub enum StoriesCommand {
    /// Show issue details and the suggested version bump
    Show(ShowArgs),
    /// Add `<project>-<version>` to the fix versions of each issue
    Tag(TagArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Issue ids or keys
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Release version
    #[arg(long = "version-number", env = "CFDEPLOY_VERSION")]
    pub version_number: String,

    /// Issue ids or keys
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Run a stories subcommand.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or Jira cannot be reached.
pub async fn run(app: &AppContext, cmd: StoriesCommand) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);
    match cmd {
        StoriesCommand::Show(args) => {
            let build = args.config.load()?;
            let jira = JiraClient::new(build.resolve_jira(&app.settings, &app.env)?, app.http_timeout())?;
            let stories = story_details(&jira, &reporter, &args.ids).await?;
            let bump = semantic_bump(&stories);
            if args.json {
                println!("{}", json::format_stories(&stories, bump)?);
            } else {
                HumanRenderer::new(&app.output).render_stories(&stories, bump);
            }
            Ok(())
        }
        StoriesCommand::Tag(args) => {
            let build = args.config.load()?;
            let project = build.project_name()?;
            let jira = JiraClient::new(build.resolve_jira(&app.settings, &app.env)?, app.http_timeout())?;
            let label = release_label(&project, args.version_number.trim());
            tag_stories(&jira, &reporter, &args.ids, &label).await?;
            Ok(())
        }
    }
}
