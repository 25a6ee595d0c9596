//! Menu link group command line tool.
//!
//! Rebuilds the menu tree from provider link files and the stored groups,
//! manages groups, and syncs them with a config directory.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use menu_link_group::config::Config;
use menu_link_group::config_storage::yaml::{export_config, import_config};
use menu_link_group::config_storage::{FileGroupStorage, GroupStorage};
use menu_link_group::form::{ENTITY_ID_PREFIX, FormResult, FormState, MenuLinkGroupForm};
use menu_link_group::menu::discovery::rebuild;
use menu_link_group::{GroupLinkDeriver, MenuLinkDefinition, MenuLinkTree};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the menu tree with every enabled group applied.
    Tree {
        /// Only print this menu.
        #[arg(long)]
        menu: Option<String>,
    },

    /// Import groups from the sync directory into active config.
    Import {
        /// Validate and report without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Export active groups to the sync directory.
    Export {
        /// Remove group files that were not part of this export.
        #[arg(long)]
        clean: bool,
    },

    /// Manage stored groups.
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// List stored groups.
    List,

    /// Create or update a group.
    Save {
        /// Group id. New ids get the `localgov_menu_link_group_` prefix.
        id: String,

        /// Group name, also the title of its menu link.
        #[arg(long)]
        label: String,

        /// Parent menu link (`menu-name:menu-link-id`).
        #[arg(long)]
        parent: String,

        /// Child menu link (`menu-name:menu-link-id`); repeat for more.
        #[arg(long = "child")]
        children: Vec<String>,

        /// Weight of the group's menu link.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        weight: i32,

        /// Save the group disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// Delete a group.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let storage: Arc<dyn GroupStorage> = Arc::new(FileGroupStorage::new(config.active_config_dir.clone()));

    match args.command {
        Command::Tree { menu } => print_tree(&config, storage.as_ref(), menu.as_deref()).await,
        Command::Import { dry_run } => {
            let result = import_config(storage.as_ref(), &config.sync_config_dir, dry_run).await?;
            for warning in &result.warnings {
                eprintln!("warning: {warning}");
            }
            let verb = if dry_run { "Would import" } else { "Imported" };
            println!("{verb} {} menu link group(s)", result.total());
            Ok(())
        }
        Command::Export { clean } => {
            let result = export_config(storage.as_ref(), &config.sync_config_dir, clean).await?;
            for warning in &result.warnings {
                eprintln!("warning: {warning}");
            }
            println!(
                "Exported {} menu link group(s) to {}",
                result.total(),
                config.sync_config_dir.display()
            );
            Ok(())
        }
        Command::Group { command } => run_group_command(storage, command).await,
    }
}

async fn print_tree(config: &Config, storage: &dyn GroupStorage, only: Option<&str>) -> Result<()> {
    let links = MenuLinkTree::load_links_dir(&config.menu_links_dir).await?;
    let tree = rebuild(storage, links, &GroupLinkDeriver::default()).await?;

    let menus: Vec<&str> = match only {
        Some(menu) => vec![menu],
        None => tree.menu_names().into_iter().collect(),
    };

    for menu in menus {
        println!("{menu}");
        for root in tree.roots(menu) {
            print_link(&tree, root, 1);
        }
    }
    Ok(())
}

fn print_link(tree: &MenuLinkTree, link: &MenuLinkDefinition, depth: usize) {
    let status = if link.enabled { "" } else { " (disabled)" };
    println!("{}{} [{}]{status}", "  ".repeat(depth), link.title, link.id);
    for child in tree.children_of(&link.id) {
        print_link(tree, child, depth + 1);
    }
}

async fn run_group_command(storage: Arc<dyn GroupStorage>, command: GroupCommand) -> Result<()> {
    match command {
        GroupCommand::List => {
            for group in storage.list(None).await? {
                let status = if group.is_enabled() { "enabled" } else { "disabled" };
                println!(
                    "{}\t{}\t{status}\t{}\t{} child link(s)",
                    group.id,
                    group.label(),
                    group.parent_menu_link,
                    group.child_menu_links.len()
                );
            }
            Ok(())
        }
        GroupCommand::Save {
            id,
            label,
            parent,
            children,
            weight,
            disabled,
        } => {
            let mut form = MenuLinkGroupForm::open(storage, &id).await?;

            // The add form takes the id without its prefix.
            let id = id.strip_prefix(ENTITY_ID_PREFIX).unwrap_or(&id);
            let state = FormState::new(form.form_id())
                .with_value("id", id)
                .with_value("group_label", label)
                .with_value("status", !disabled)
                .with_value("weight", weight)
                .with_value("parent_menu_link", parent)
                .with_value("child_menu_links", json!(children));

            match form.process(state).await? {
                FormResult::Redirect { messages, .. } => {
                    for message in messages {
                        println!("{message}");
                    }
                    Ok(())
                }
                FormResult::ValidationFailed(errors) => {
                    for error in &errors {
                        eprintln!("{}: {}", error.field.as_deref().unwrap_or("form"), error.message);
                    }
                    bail!("menu link group was not saved");
                }
            }
        }
        GroupCommand::Delete { id } => {
            let form = MenuLinkGroupForm::edit(storage, &id).await?;
            if let FormResult::Redirect { messages, .. } = form.delete().await? {
                for message in messages {
                    println!("{message}");
                }
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
