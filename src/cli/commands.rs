//! Command dispatch and terminal rendering

use std::collections::HashMap;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, ChartView, NodeDetail, RenderedChart, ViewState, Viewport,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, FilterArgs, OutputFormat};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{DomainError, FilterCriteria, NodeCategory, NodeId, OrgTree};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help().ok();
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "orgmap", &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => {
            let settings = Settings::load(cli.data_dir.as_deref())?;
            _config(&settings, command)
        }
        Commands::List => _list(&container(cli, None)?),
        Commands::Layout {
            company,
            filter,
            orphans,
            select,
            fit,
            format,
        } => _layout(
            &container(cli, orphans.as_deref())?,
            company,
            filter,
            select.as_deref(),
            *fit,
            *format,
        ),
        Commands::Tree { company, filter } => _tree(&container(cli, None)?, company, filter),
        Commands::Show { company, node_id } => _show(&container(cli, None)?, company, node_id),
        Commands::Search { name } => _search(&container(cli, None)?, name),
    }
}

fn container(cli: &Cli, orphans: Option<&str>) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(cli.data_dir.as_deref())?;
    if let Some(policy) = orphans {
        settings.layout.orphan_policy = policy.parse()?;
    }
    debug!("data_dir: {}", settings.data_dir.display());
    Ok(ServiceContainer::new(settings)?)
}

fn criteria(filter: &FilterArgs) -> CliResult<FilterCriteria> {
    Ok(FilterCriteria::new()
        .with_query(filter.query.as_str())
        .with_category(FilterCriteria::parse_category(&filter.category)?)
        .with_level(FilterCriteria::parse_level(&filter.level)))
}

/// Open a view and fail unless it holds data. `None` means the company is empty.
fn open(container: &ServiceContainer, company: &str) -> CliResult<Option<ChartView>> {
    let view = container.charts.open(company);
    match view.state() {
        ViewState::Ready(_) => {}
        ViewState::Empty => {
            output::warning(&format!("{company} has no organization data"));
            return Ok(None);
        }
        ViewState::Failed(message) => {
            return Err(ApplicationError::ViewNotReady(message.clone()).into())
        }
        other => return Err(ApplicationError::ViewNotReady(other.to_string()).into()),
    }
    Ok(Some(view))
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer) -> CliResult<()> {
    for slug in container.charts.companies()? {
        output::info(&slug);
    }
    Ok(())
}

/// `layout` output: the render contract, plus the viewport when fitted.
#[derive(Debug, Default, Serialize)]
struct LayoutOutput {
    #[serde(flatten)]
    chart: RenderedChart,
    #[serde(skip_serializing_if = "Option::is_none")]
    viewport: Option<Viewport>,
}

#[instrument(skip(container))]
fn _layout(
    container: &ServiceContainer,
    company: &str,
    filter: &FilterArgs,
    select: Option<&str>,
    fit: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let (rendered, detail) = match open(container, company)? {
        Some(mut view) => prepare_layout(&mut view, filter, select, fit)?,
        None => (LayoutOutput::default(), None),
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rendered).map_err(|e| {
                ApplicationError::OperationFailed {
                    context: "serialize chart".into(),
                    source: Box::new(e),
                }
            })?;
            output::info(&json);
        }
        OutputFormat::Text => {
            print_chart(&rendered.chart);
            if let Some(viewport) = &rendered.viewport {
                output::action(
                    "viewport",
                    &format!(
                        "center ({:.1}, {:.1}) zoom {:.2}",
                        viewport.center.x, viewport.center.y, viewport.zoom
                    ),
                );
            }
            if let Some(detail) = detail {
                println!();
                print_detail(&detail);
            }
        }
    }
    Ok(())
}

fn prepare_layout(
    view: &mut ChartView,
    filter: &FilterArgs,
    select: Option<&str>,
    fit: bool,
) -> CliResult<(LayoutOutput, Option<NodeDetail>)> {
    view.apply_filter(criteria(filter)?)?;
    let detail = match select {
        Some(id) => Some(view.select(&NodeId::from(id))?),
        None => None,
    };
    let viewport = if fit { Some(view.fit_view()?) } else { None };
    let chart = view.render()?;
    Ok((LayoutOutput { chart, viewport }, detail))
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, company: &str, filter: &FilterArgs) -> CliResult<()> {
    let Some(mut view) = open(container, company)? else {
        return Ok(());
    };
    view.apply_filter(criteria(filter)?)?;
    let snapshot = view.snapshot()?;

    // Visible hierarchy follows the derived edges, so orphan handling shows up here too
    let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for edge in &snapshot.layout().edges {
        children.entry(&edge.source).or_default().push(&edge.target);
    }
    let targets: Vec<&NodeId> = snapshot.layout().edges.iter().map(|e| &e.target).collect();
    for placed in &snapshot.layout().nodes {
        if !targets.contains(&&placed.id) {
            output::info(&subtree(snapshot.tree(), &children, &placed.id));
        }
    }
    Ok(())
}

fn subtree(tree: &OrgTree, children: &HashMap<&NodeId, Vec<&NodeId>>, id: &NodeId) -> Tree<String> {
    let leaves = children
        .get(id)
        .into_iter()
        .flatten()
        .map(|child| subtree(tree, children, child));
    Tree::new(tree_label(tree, id)).with_leaves(leaves)
}

fn tree_label(tree: &OrgTree, id: &NodeId) -> String {
    let Some(node) = tree.node(id) else {
        return id.to_string();
    };
    let label = match node.category {
        NodeCategory::Root => node.label.purple().bold(),
        NodeCategory::Governance => node.label.blue().bold(),
        NodeCategory::Subunit => node.label.green(),
        NodeCategory::Role => node.label.yellow(),
    };
    match &node.level {
        Some(level) => format!("{} ({}) [{}]", label, level, id.as_str().dimmed()),
        None => format!("{} [{}]", label, id.as_str().dimmed()),
    }
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer, company: &str, node_id: &str) -> CliResult<()> {
    let Some(mut view) = open(container, company)? else {
        return Err(DomainError::NodeNotFound(node_id.to_string()).into());
    };
    let detail = view.select(&NodeId::from(node_id))?;
    print_detail(&detail);
    Ok(())
}

#[instrument(skip(container))]
fn _search(container: &ServiceContainer, name: &str) -> CliResult<()> {
    let results = container.search.search(name)?;
    if results.is_empty() {
        output::warning(&format!("no results for '{name}'"));
        return Ok(());
    }
    for result in results {
        output::header(&result.title);
        if !result.url.is_empty() {
            output::detail(&result.url);
        }
        if !result.source.is_empty() {
            output::detail(&format!("source: {}", result.source));
        }
        if !result.description.is_empty() {
            output::detail(&result.description);
        }
    }
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &describe_path(&path)),
                None => output::action("global", &"(no config directory)"),
            }
            output::action("local", &describe_path(&local_config_path(&settings.data_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(&settings.data_dir)
            };
            init_config(&RealFileSystem, &path)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

fn describe_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

fn init_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs.create_dir_all(parent)
            .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
    }
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

fn print_chart(chart: &RenderedChart) {
    output::header(&format!("{} nodes", chart.nodes.len()));
    for node in &chart.nodes {
        let marker = if node.selected { "*".purple().bold() } else { " ".normal() };
        output::info(&format!(
            "{} {:<28} {:<10} ({:>8.1}, {:>8.1})  {}",
            marker,
            node.id.as_str(),
            node.category.as_str(),
            node.position.x,
            node.position.y,
            node.label
        ));
    }
    output::header(&format!("{} edges", chart.edges.len()));
    for edge in &chart.edges {
        output::detail(&format!(
            "{} -> {} [{}]",
            edge.source,
            edge.target,
            edge.relation_kind.as_str()
        ));
    }
}

fn print_detail(detail: &NodeDetail) {
    output::header(&detail.label);
    output::detail(&format!("id: {}", detail.id));
    output::detail(&format!("category: {}", detail.category));
    if let Some(level) = &detail.level {
        output::detail(&format!("level: {level}"));
    }
    if let Some(description) = &detail.description {
        output::detail(description);
    }
    print_section("Responsibilities", &detail.responsibilities);
    print_section("Requirements", &detail.requirements);
    if !detail.skills.is_empty() {
        output::action("Skills", &detail.skills.iter().join(", "));
    }
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    output::action(title, &"");
    for item in items {
        output::detail(&format!("- {item}"));
    }
}
