use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use wiki_comments_config::Config;
use wiki_comments_engine::{
    CommentStore, Commenter, EditOp, Offset, Opcode, PageChange, Replacement, check_preconditions,
    edits_from_opcodes, io, remap_offsets,
};

const DEFAULT_STORE: &str = "wiki-comments.json";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Comment store file (defaults to the config file's store_path, then ./wiki-comments.json)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Preview where anchors land after a diff, without saving anything
    Remap {
        /// JSON array of {tag, i1, i2, j1, j2} opcodes
        diff: PathBuf,
        /// JSON array of {start, end}
        #[arg(long, value_name = "FILE", required_unless_present = "page")]
        anchors: Option<PathBuf>,
        /// Take the anchors of this page from the store instead
        #[arg(long, conflicts_with = "anchors")]
        page: Option<String>,
    },
    /// Post a comment on a span of a page
    Post {
        page: String,
        start: usize,
        end: usize,
        oauth_provider: String,
        oauth_user_id: String,
        name: String,
        commit_hash: String,
        comment: String,
    },
    /// Print the comments of a page
    List { page: String },
    /// List every page with comments
    Paths,
    /// Replace the text of a comment, as its author
    Edit {
        id: u64,
        oauth_provider: String,
        oauth_user_id: String,
        comment: String,
    },
    /// Delete a comment, as its author
    Delete {
        id: u64,
        oauth_provider: String,
        oauth_user_id: String,
    },
    /// Relocate a page's anchors through a diff of its text
    Modify { page: String, diff: PathBuf },
    /// Move a page's comments to a new path
    Rename { from: String, to: String },
    /// Apply a {"type": "modified" | "renamed", ...} change body to a page
    Apply { page: String, change: PathBuf },
    /// Print the stored commit hash, or set it
    CommitHash { hash: Option<String> },
    /// Show or change the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location and its store path
    Show,
    /// Make FILE the default comment store
    SetStore { path: PathBuf },
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Config { action } => return configure(action),
        Command::Remap {
            diff,
            anchors: Some(anchors),
            ..
        } => return print_json(&remap_files(anchors, diff)?),
        _ => {}
    }

    let store_path = resolve_store_path(cli.store)?;
    let mut store = io::load_store(&store_path)
        .with_context(|| format!("Failed to load store {}", store_path.display()))?;

    let changed = match cli.command {
        Command::Remap {
            diff,
            page: Some(page),
            ..
        } => {
            print_json(&remap_page(&store, &page, &diff)?)?;
            false
        }
        Command::Remap { .. } | Command::Config { .. } => false,
        Command::Post {
            page,
            start,
            end,
            oauth_provider,
            oauth_user_id,
            name,
            commit_hash,
            comment,
        } => {
            let commenter = Commenter {
                oauth_provider,
                oauth_user_id,
                name,
            };
            let id = store.post_comment(
                &page,
                Offset::new(start, end),
                commenter,
                &comment,
                &commit_hash,
                Utc::now(),
            )?;
            println!("{id}");
            true
        }
        Command::List { page } => {
            print_json(&store.comments(&page))?;
            false
        }
        Command::Paths => {
            for path in store.paths() {
                println!("{path}");
            }
            false
        }
        Command::Edit {
            id,
            oauth_provider,
            oauth_user_id,
            comment,
        } => {
            let author = requester(oauth_provider, oauth_user_id);
            store.edit_comment(id, &author, &comment, Utc::now())?;
            true
        }
        Command::Delete {
            id,
            oauth_provider,
            oauth_user_id,
        } => {
            store.delete_comment(id, &requester(oauth_provider, oauth_user_id))?;
            true
        }
        Command::Modify { page, diff } => {
            let opcodes: Vec<Opcode> = io::read_json(&diff)?;
            let change = PageChange::Modified { diff: opcodes };
            print_json(&store.apply_change(&page, &change)?)?;
            true
        }
        Command::Rename { from, to } => {
            store.rename_page(&from, &to)?;
            true
        }
        Command::Apply { page, change } => {
            let change: PageChange = io::read_json(&change)?;
            print_json(&store.apply_change(&page, &change)?)?;
            true
        }
        Command::CommitHash { hash: None } => {
            match store.commit_hash() {
                Some(hash) => println!("{hash}"),
                None => log::warn!("No commit hash stored yet"),
            }
            false
        }
        Command::CommitHash { hash: Some(hash) } => {
            store.set_commit_hash(&hash)?;
            true
        }
    };

    if changed {
        io::save_store(&store_path, &store)
            .with_context(|| format!("Failed to save store {}", store_path.display()))?;
        log::info!("Saved {}", store_path.display());
    }
    Ok(())
}

/// `--store` wins, then the config file, then the working directory.
fn resolve_store_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    match Config::load() {
        Ok(Some(config)) => Ok(config.store_path),
        Ok(None) => Ok(PathBuf::from(DEFAULT_STORE)),
        Err(e) => bail!(
            "{e}\nFix or remove {}, or pass --store",
            Config::config_path().display()
        ),
    }
}

fn configure(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", Config::config_path().display());
            match Config::load()? {
                Some(config) => println!("store_path = {}", config.store_path.display()),
                None => log::warn!("No config file yet, using ./{DEFAULT_STORE}"),
            }
        }
        ConfigAction::SetStore { path } => {
            let written = Config::new(path.clone()).save()?;
            log::info!("Saved {}", written.display());
        }
    }
    Ok(())
}

/// Only provider and id identify an account; the display name is not checked.
fn requester(oauth_provider: String, oauth_user_id: String) -> Commenter {
    Commenter {
        oauth_provider,
        oauth_user_id,
        name: String::new(),
    }
}

fn read_diff(diff: &Path) -> Result<Vec<EditOp>> {
    let opcodes: Vec<Opcode> = io::read_json(diff)?;
    edits_from_opcodes(opcodes).context("Invalid diff")
}

fn remap_files(anchors: &Path, diff: &Path) -> Result<Vec<Replacement>> {
    let mut offsets: Vec<Offset> = io::read_json(anchors)?;
    offsets.sort();
    offsets.dedup();

    let ops = read_diff(diff)?;
    check_preconditions(&offsets, &ops)?;
    Ok(remap_offsets(&offsets, &ops))
}

/// Where a stored page's anchors would land, leaving the store untouched.
fn remap_page(store: &CommentStore, page: &str, diff: &Path) -> Result<Vec<Replacement>> {
    if !store.contains_path(page) {
        bail!("No comments on {page}");
    }

    let offsets = store.offsets(page);
    let ops = read_diff(diff)?;
    check_preconditions(&offsets, &ops)?;
    Ok(remap_offsets(&offsets, &ops))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
