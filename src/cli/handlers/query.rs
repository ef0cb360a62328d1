// src/cli/handlers/query.rs

use crate::{
    cli::handlers::commons,
    core::{discovery, project::LaravelProject, query::ModelQuery},
    models::{AppConfig, QueryKind},
};
use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use dialoguer::{Input, Select, theme::ColorfulTheme};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs a common Eloquent query against a model.",
    group(ArgGroup::new("kind").args(["all", "first", "find", "count", "custom"]))
)]
struct QueryArgs {
    /// The model class, e.g. `User` or `App\Models\User`. Prompted when omitted.
    model: Option<String>,
    /// The Laravel project directory.
    #[arg(short, long)]
    project: Option<String>,
    /// `Model::all()`
    #[arg(long)]
    all: bool,
    /// `Model::first()`
    #[arg(long)]
    first: bool,
    /// `Model::find(ID)`
    #[arg(long, value_name = "ID")]
    find: Option<String>,
    /// `'Total: ' . Model::count()`
    #[arg(long)]
    count: bool,
    /// `Model::EXPR`, e.g. `where('active', 1)->get()`
    #[arg(long, value_name = "EXPR")]
    custom: Option<String>,
}

impl QueryArgs {
    /// The query kind given on the command line, if any.
    fn kind(&self) -> Option<QueryKind> {
        if self.all {
            Some(QueryKind::All)
        } else if self.first {
            Some(QueryKind::First)
        } else if self.count {
            Some(QueryKind::Count)
        } else if let Some(id) = &self.find {
            Some(QueryKind::Find(id.clone()))
        } else {
            self.custom.clone().map(QueryKind::Custom)
        }
    }
}

/// Main entry point for the `query` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let query_args = QueryArgs::try_parse_from(&args)?;
    let mut session = commons::open_session(query_args.project.as_deref(), config)?;
    commons::print_unseen(&mut session);

    let project = session
        .project()
        .cloned()
        .ok_or_else(|| anyhow!(t!("session.error.no_project")))?;

    let query = build_query(&project, query_args.model.clone(), query_args.kind())?;
    let started = session.run_query(&query);
    commons::wait_and_print(&mut session);

    if started {
        Ok(())
    } else {
        Err(anyhow!(t!("run.error.not_started")))
    }
}

/// Fills in whatever the command line left out by prompting for it.
pub fn build_query(
    project: &LaravelProject,
    model: Option<String>,
    kind: Option<QueryKind>,
) -> Result<ModelQuery> {
    let model = match model {
        Some(model) => model,
        None => choose_model(project)?,
    };
    let kind = match kind {
        Some(kind) => kind,
        None => choose_kind()?,
    };
    Ok(ModelQuery::new(model, kind)?)
}

/// Offers the models found on disk, with a free-text fallback.
fn choose_model(project: &LaravelProject) -> Result<String> {
    let mut items = discovery::suggest_models(project);
    if items.is_empty() {
        return prompt_text(t!("query.prompt.model_name"));
    }

    let other = t!("query.choice.other_model").to_string();
    items.push(other);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("query.prompt.model"))
        .items(items.as_slice())
        .default(0)
        .interact()?;

    if selection + 1 == items.len() {
        return prompt_text(t!("query.prompt.model_name"));
    }
    items
        .get(selection)
        .cloned()
        .ok_or_else(|| anyhow!(t!("query.error.bad_selection")))
}

fn choose_kind() -> Result<QueryKind> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("query.prompt.kind"))
        .items(&QueryKind::CHOICES)
        .default(0)
        .interact()?;

    let params = if QueryKind::needs_params(index) {
        prompt_text(t!("query.prompt.params"))?
    } else {
        String::new()
    };
    Ok(QueryKind::from_choice(index, &params)?)
}

fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?;
    Ok(value.trim().to_string())
}
