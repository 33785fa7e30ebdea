//! Subcommand definitions and their execution against a store.

use crate::render;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use rosemary_core::{
    export_csv_file, import_csv_file, import_json, save_to_file, split_tags, FuzzyOptions,
    LeafId, Rosemary,
};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new leaf
    Add {
        content: String,
        /// Tags, comma or semicolon separated
        #[arg(short, long, default_value = "")]
        tags: String,
    },

    /// Show one leaf and its connections
    Get { id: String },

    /// List leaves page by page
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Print a report of all leaves
    Report,

    /// Remove a leaf with its connections
    Remove { id: String },

    /// Add tags to a leaf
    Tag {
        id: String,
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove one tag from a leaf
    Untag { id: String, tag: String },

    /// Replace the content of a leaf
    Edit { id: String, content: String },

    /// Connect two leaves
    Connect {
        id1: String,
        id2: String,
        /// Relationship label
        #[arg(short, long, default_value = "")]
        relationship: String,
    },

    /// Get related leaves
    Related {
        id: String,
        /// Maximum distance
        #[arg(short, long, default_value_t = 2)]
        distance: usize,
    },

    /// Search leaves by content
    Search { query: String },

    /// Typo-tolerant search over content and tags
    Fuzzy {
        query: String,
        /// Maximum accepted score in [0, 1]
        #[arg(long, default_value_t = 0.4)]
        threshold: f64,
        /// Fields to match: content,tags
        #[arg(long, default_value = "content,tags")]
        keys: String,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the most used tags
    Tags {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Suggest tags from a partial name
    SuggestTags {
        partial: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Show the most connected leaves
    MostConnected {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Walk a random chain of connected leaves
    Chain {
        /// Start leaf; random when omitted
        #[arg(long)]
        start: Option<String>,
        #[arg(long, default_value_t = 5)]
        length: usize,
    },

    /// Connect leaves sharing tags
    ConnectSimilar {
        /// Minimum number of common tags
        #[arg(long, default_value_t = 1)]
        threshold: usize,
    },

    /// Import leaves from a CSV file
    ImportCsv { path: PathBuf },

    /// Export leaves to a CSV file
    ExportCsv { path: PathBuf },

    /// Replace the store with a JSON snapshot
    ImportJson { path: PathBuf },

    /// Write a JSON snapshot
    ExportJson { path: PathBuf },
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    /// Whether the data file must be saved afterwards.
    pub mutated: bool,
}

impl Outcome {
    fn read(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            mutated: false,
        }
    }

    fn write(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            mutated: true,
        }
    }
}

pub fn execute(store: &mut Rosemary, command: Command) -> Result<Outcome> {
    let outcome = match command {
        Command::Add { content, tags } => {
            let id = store.add_leaf(content, split_tags(&tags));
            Outcome::write(format!("Added leaf with ID: {id}"))
        }
        Command::Get { id } => {
            let leaf = store.leaf(&LeafId::from(id))?;
            Outcome::read(render::leaf_with_connections(leaf, store.stem()))
        }
        Command::List { page, limit } => {
            let page = store.list_leaves(page, limit);
            let mut output = render::leaf_list(&page.leaves);
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("Page {} of {}", page.current_page, page.total_pages));
            Outcome::read(output)
        }
        Command::Report => {
            let leaves: Vec<_> = store.leaves().collect();
            Outcome::read(format!(
                "Knowledge Base Report: {} leaves, {} connections, {} tags\n{}",
                leaves.len(),
                store.stem().total_connections(),
                store.tag_count(),
                render::leaf_list(&leaves)
            ))
        }
        Command::Remove { id } => {
            let removed = store.remove_leaf(&LeafId::from(id))?;
            Outcome::write(format!("Removed leaf {}", removed.id()))
        }
        Command::Tag { id, tags } => {
            let id = LeafId::from(id);
            let tags: Vec<String> = tags.iter().flat_map(|raw| split_tags(raw)).collect();
            store.tag_leaf(&id, &tags)?;
            Outcome::write(format!("Tagged leaf {id}: {}", tags.join(", ")))
        }
        Command::Untag { id, tag } => {
            let id = LeafId::from(id);
            if store.untag_leaf(&id, &tag)? {
                Outcome::write(format!("Removed tag {tag} from leaf {id}"))
            } else {
                Outcome::read(format!("Leaf {id} has no tag {tag}"))
            }
        }
        Command::Edit { id, content } => {
            let id = LeafId::from(id);
            store.update_leaf_content(&id, content)?;
            Outcome::write(format!("Updated leaf {id}"))
        }
        Command::Connect {
            id1,
            id2,
            relationship,
        } => {
            let (id1, id2) = (LeafId::from(id1), LeafId::from(id2));
            store.connect_leaves(&id1, &id2, relationship)?;
            Outcome::write(format!("Connected leaf {id1} and leaf {id2}"))
        }
        Command::Related { id, distance } => {
            let id = LeafId::from(id);
            let related = store.related_leaves(&id, distance)?;
            Outcome::read(format!(
                "Related leaves for ID {id}:\n{}",
                render::leaf_list(&related)
            ))
        }
        Command::Search { query } => {
            let results = store.leaves_by_content(&query);
            if results.is_empty() {
                Outcome::read("No results found.")
            } else {
                Outcome::read(render::leaf_list(&results))
            }
        }
        Command::Fuzzy {
            query,
            threshold,
            keys,
            case_sensitive,
            limit,
        } => {
            let keys = FuzzyOptions::parse_keys(&keys)?;
            if keys.is_empty() {
                bail!("at least one search key is required");
            }
            let mut options = FuzzyOptions::default()
                .with_keys(keys)
                .with_threshold(threshold)
                .with_ignore_case(!case_sensitive);
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            let hits = store.fuzzy_search(&query, &options);
            if hits.is_empty() {
                Outcome::read("No results found.")
            } else {
                Outcome::read(render::fuzzy_hits(&hits))
            }
        }
        Command::Tags { limit } => Outcome::read(render::tag_infos(&store.most_used_tags(limit))),
        Command::SuggestTags { partial, limit } => {
            Outcome::read(store.suggest_tags(&partial, limit).join("\n"))
        }
        Command::MostConnected { limit } => {
            let lines: Vec<String> = store
                .most_connected_leaves(limit)
                .into_iter()
                .map(|leaf| {
                    format!(
                        "{} \"{}\" ({} connections)",
                        leaf.id(),
                        leaf.content(),
                        store.stem().degree(leaf.id())
                    )
                })
                .collect();
            Outcome::read(lines.join("\n"))
        }
        Command::Chain { start, length } => {
            let start = start.map(LeafId::from);
            let chain = store.random_connected_chain(start.as_ref(), length)?;
            let leaves = store.leaves_by_ids(&chain)?;
            let lines: Vec<String> = leaves
                .iter()
                .map(|leaf| format!("{} {}", leaf.id(), leaf.content()))
                .collect();
            Outcome::read(format!("Random chain:\n{}", lines.join("\n")))
        }
        Command::ConnectSimilar { threshold } => {
            let pairs = store.connect_similar_leaves(threshold);
            Outcome::write(format!(
                "Connected {} pairs of leaves based on similar tags.",
                pairs.len()
            ))
        }
        Command::ImportCsv { path } => {
            let report = import_csv_file(store, &path)
                .with_context(|| format!("error importing CSV `{}`", path.display()))?;
            let mut output = format!(
                "Imported {} leaves from CSV ({} replaced)",
                report.imported.len(),
                report.replaced
            );
            for skipped in &report.skipped {
                output.push_str(&format!(
                    "\nSkipped line {}: {}",
                    skipped.line, skipped.reason
                ));
            }
            Outcome::write(output)
        }
        Command::ExportCsv { path } => {
            export_csv_file(store, &path)
                .with_context(|| format!("error exporting CSV `{}`", path.display()))?;
            Outcome::read(format!("CSV file was written to {}", path.display()))
        }
        Command::ImportJson { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            let summary = import_json(store, &json)?;
            Outcome::write(format!(
                "Imported {} leaves, {} connections, {} tags",
                summary.leaves, summary.connections, summary.tags
            ))
        }
        Command::ExportJson { path } => {
            save_to_file(store, &path)?;
            Outcome::read(format!("JSON snapshot written to {}", path.display()))
        }
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{execute, Command};
    use rosemary_core::{LeafId, Rosemary, StoreError};

    fn add(store: &mut Rosemary, content: &str, tags: &str) -> LeafId {
        let outcome = execute(
            store,
            Command::Add {
                content: content.to_string(),
                tags: tags.to_string(),
            },
        )
        .unwrap();
        assert!(outcome.mutated);
        store.leaves().last().unwrap().id().clone()
    }

    #[test]
    fn add_splits_tags_and_marks_mutation() {
        let mut store = Rosemary::seeded(11);
        let id = add(&mut store, "Sage tea", "herbs, drinks;");
        assert_eq!(store.leaf(&id).unwrap().tags(), ["herbs", "drinks"]);
    }

    #[test]
    fn connect_unknown_leaf_surfaces_not_found() {
        let mut store = Rosemary::seeded(12);
        let id = add(&mut store, "Thyme", "herbs");
        let err = execute(
            &mut store,
            Command::Connect {
                id1: id.to_string(),
                id2: "missing".to_string(),
                relationship: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::NotFound(LeafId::from("missing")))
        );
    }

    #[test]
    fn fuzzy_rejects_unknown_keys() {
        let mut store = Rosemary::seeded(13);
        let err = execute(
            &mut store,
            Command::Fuzzy {
                query: "sage".to_string(),
                threshold: 0.4,
                keys: "title".to_string(),
                case_sensitive: false,
                limit: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown search key"));
    }

    #[test]
    fn connect_similar_reports_pair_count() {
        let mut store = Rosemary::seeded(14);
        add(&mut store, "a", "x,y");
        add(&mut store, "b", "y,z");
        let outcome = execute(&mut store, Command::ConnectSimilar { threshold: 1 }).unwrap();
        assert_eq!(
            outcome.output,
            "Connected 1 pairs of leaves based on similar tags."
        );
        assert_eq!(store.stem().total_connections(), 1);
    }
}
