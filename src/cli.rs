//! CLI surface: thin handlers over the generators.
//!
//! Command order mirrors the pipeline: sources feed documents, documents
//! feed dependency graphs, dependency graphs feed learning orders.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::Config;
use crate::core::{ComponentResolver, GraphemeSet, KanjiUniverse, Normalizer, propagate};
use crate::gen::{
    self, GRAPHEME_ORDER_DOC_ID, KANJI_ORDER_DOC_ID,
};
use crate::sources::{Dictionary, IdsTable, StrokeIndex};
use crate::store::{DocumentStore, GraphemeDoc, LearningOrderDoc};
use crate::{Error, Result};

#[derive(Parser, Debug)]
#[command(
    name = "kanjigraph",
    version,
    about = "Learning-dependency knowledge graph builder for Japanese writing",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file path.
    #[arg(long, global = true, value_name = "PATH", default_value = "kanjigraph.toml")]
    pub config: PathBuf,

    /// Data directory (overrides config).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Compute everything, write nothing.
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,

    /// Debug output (repeat for more).
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate kanji documents from the dictionary.
    Kanji,

    /// Regenerate grapheme -> grapheme dependency documents.
    GraphemeDeps,

    /// Regenerate kanji -> kanji dependency documents.
    KanjiDeps,

    /// Regenerate kanji -> grapheme dependency documents.
    KanjiGraphemeDeps,

    /// Regenerate variant-group documents from grapheme names.
    VariantGroups,

    /// Run popularity propagation and write the component report.
    Popularity,

    /// Generate the default grapheme learning order.
    GraphemeOrder,

    /// Generate the default kanji learning order.
    KanjiOrder,

    /// Validate the written learning-order documents.
    Validate,

    /// Run the whole pipeline in dependency order.
    All,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    let verbosity = config.logging.verbosity.max(cli.verbose);
    crate::telemetry::init(verbosity);

    let dry_run = cli.dry_run;
    match cli.command {
        Commands::Kanji => kanji(&config, dry_run),
        Commands::GraphemeDeps => grapheme_deps(&config, dry_run),
        Commands::KanjiDeps => kanji_deps(&config, dry_run),
        Commands::KanjiGraphemeDeps => kanji_grapheme_deps(&config, dry_run),
        Commands::VariantGroups => variant_groups(&config, dry_run),
        Commands::Popularity => popularity(&config, dry_run),
        Commands::GraphemeOrder => grapheme_order(&config, dry_run),
        Commands::KanjiOrder => kanji_order(&config, dry_run),
        Commands::Validate => validate(&config),
        Commands::All => {
            kanji(&config, dry_run)?;
            variant_groups(&config, dry_run)?;
            grapheme_deps(&config, dry_run)?;
            kanji_deps(&config, dry_run)?;
            kanji_grapheme_deps(&config, dry_run)?;
            popularity(&config, dry_run)?;
            grapheme_order(&config, dry_run)?;
            kanji_order(&config, dry_run)?;
            Ok(())
        }
    }
}

fn load_graphemes(config: &Config) -> Result<GraphemeSet> {
    let store = DocumentStore::new(config.paths().grapheme_docs());
    let docs: Vec<GraphemeDoc> = store.load_all()?;
    let mut graphemes = Vec::new();
    for doc in &docs {
        match doc.to_grapheme() {
            Some(grapheme) => graphemes.push(grapheme),
            None => warn!(id = %doc.id, "grapheme document skipped"),
        }
    }
    let set = GraphemeSet::new(graphemes);
    info!(graphemes = set.len(), variants = set.variant_count(), "graphemes loaded");
    Ok(set)
}

fn load_dictionary(config: &Config) -> Result<Dictionary> {
    let dict = Dictionary::load(&config.dictionary_path())?;
    info!(entries = dict.len(), "dictionary loaded");
    Ok(dict)
}

fn kanji(config: &Config, dry_run: bool) -> Result<()> {
    let dict = load_dictionary(config)?;
    let store = DocumentStore::new(config.paths().kanji_docs());
    let summary = gen::generate_kanji_docs(&dict, &store, dry_run)?;
    println!(
        "kanji: {} documents ({} created, {} updated, {} deleted, {} unchanged)",
        summary.documents,
        summary.report.created.len(),
        summary.report.updated.len(),
        summary.report.deleted.len(),
        summary.report.unchanged.len(),
    );
    Ok(())
}

fn grapheme_deps(config: &Config, dry_run: bool) -> Result<()> {
    let graphemes = load_graphemes(config)?;
    let ids = IdsTable::load(&config.ids_table_path());
    let strokes = StrokeIndex::load(&config.stroke_index_path());
    let mut resolver = ComponentResolver::new(&ids, &strokes);
    let store = DocumentStore::new(config.paths().grapheme_dep_docs());

    let summary = gen::generate_grapheme_deps(&graphemes, &mut resolver, &store, dry_run)?;
    println!(
        "grapheme-deps: {} with dependencies, {} without, {} edges",
        summary.with_deps, summary.without_deps, summary.edges
    );
    Ok(())
}

fn kanji_deps(config: &Config, dry_run: bool) -> Result<()> {
    let dict = load_dictionary(config)?;
    let ids = IdsTable::load(&config.ids_table_path());
    let strokes = StrokeIndex::load(&config.stroke_index_path());
    let mut resolver = ComponentResolver::new(&ids, &strokes);
    let store = DocumentStore::new(config.paths().kanji_dep_docs());

    let summary = gen::generate_kanji_deps(&dict, &mut resolver, &store, dry_run)?;
    println!(
        "kanji-deps: {} with prerequisites, {} leaf, {} edges",
        summary.with_deps, summary.without_deps, summary.edges
    );
    Ok(())
}

fn kanji_grapheme_deps(config: &Config, dry_run: bool) -> Result<()> {
    let dict = load_dictionary(config)?;
    let graphemes = load_graphemes(config)?;
    let ids = IdsTable::load(&config.ids_table_path());
    let strokes = StrokeIndex::load(&config.stroke_index_path());
    let mut resolver = ComponentResolver::new(&ids, &strokes);
    let store = DocumentStore::new(config.paths().kanji_grapheme_dep_docs());

    let summary =
        gen::generate_kanji_grapheme_deps(&dict, &graphemes, &mut resolver, &store, dry_run)?;
    println!(
        "kanji-grapheme-deps: {} with components, {} without, {} edges",
        summary.with_deps, summary.without_deps, summary.edges
    );
    Ok(())
}

fn variant_groups(config: &Config, dry_run: bool) -> Result<()> {
    let graphemes = load_graphemes(config)?;
    let store = DocumentStore::new(config.paths().variant_group_docs());

    let summary = gen::generate_variant_groups(&graphemes, &store, dry_run)?;
    println!(
        "variant-groups: {} groups covering {} graphemes ({} unmatched)",
        summary.groups,
        summary.grouped_members,
        summary.unmatched.len()
    );
    Ok(())
}

fn popularity(config: &Config, dry_run: bool) -> Result<()> {
    let dict = load_dictionary(config)?;
    let graphemes = load_graphemes(config)?;
    let ids = IdsTable::load(&config.ids_table_path());
    let strokes = StrokeIndex::load(&config.stroke_index_path());
    let mut resolver = ComponentResolver::new(&ids, &strokes);
    let normalizer = Normalizer::with_variant_fold(graphemes.variant_to_symbol());

    let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);
    info!(universe = universe.len(), "universe built");
    let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);

    let report = gen::build_popularity_report(
        &universe,
        &counts,
        time::OffsetDateTime::now_utc(),
    );
    if dry_run {
        println!(
            "popularity: {} entries computed (dry run, report not written)",
            report.entries.len()
        );
        return Ok(());
    }
    gen::write_popularity_report(&report, &config.paths().popularity_report())?;
    println!(
        "popularity: {} entries, {} graphemes credited",
        report.entries.len(),
        report.metadata.graphemes
    );
    Ok(())
}

fn load_popularity_report_soft(config: &Config) -> Option<gen::PopularityReport> {
    match gen::load_popularity_report(&config.paths().popularity_report()) {
        Ok(report) => Some(report),
        Err(err) => {
            warn!(%err, "popularity report unavailable; counts default to 0");
            None
        }
    }
}

fn grapheme_order(config: &Config, dry_run: bool) -> Result<()> {
    let graphemes = load_graphemes(config)?;
    let group_store = DocumentStore::new(config.paths().variant_group_docs());
    let group_docs = group_store.load_all()?;
    let dep_store = DocumentStore::new(config.paths().grapheme_dep_docs());
    let dep_docs = dep_store.load_all()?;
    let popularity = load_popularity_report_soft(config)
        .map(|report| gen::grapheme_popularity(&report))
        .unwrap_or_default();
    let store = DocumentStore::new(config.paths().learning_order_docs());

    let summary = gen::generate_grapheme_order(
        &graphemes,
        &group_docs,
        &popularity,
        &dep_docs,
        &store,
        dry_run,
    )?;
    println!(
        "grapheme-order: {} ordered, {} dependency violations",
        summary.ordered,
        summary.violations.len()
    );
    for violation in &summary.violations {
        println!("  {violation}");
    }
    Ok(())
}

fn kanji_order(config: &Config, dry_run: bool) -> Result<()> {
    let dict = load_dictionary(config)?;
    let kanji_store = DocumentStore::new(config.paths().kanji_docs());
    let kanji_docs = kanji_store.load_all()?;
    let dep_store = DocumentStore::new(config.paths().kanji_dep_docs());
    let kanji_dep_docs = dep_store.load_all()?;
    let kg_store = DocumentStore::new(config.paths().kanji_grapheme_dep_docs());
    let kanji_grapheme_dep_docs = kg_store.load_all()?;
    let order_store = DocumentStore::new(config.paths().learning_order_docs());
    let grapheme_positions =
        gen::load_default_order_positions(&order_store, GRAPHEME_ORDER_DOC_ID)?;
    let grades = gen::grade_map(&dict);
    let popularity = load_popularity_report_soft(config)
        .map(|report| gen::kanji_popularity(&report))
        .unwrap_or_default();

    let summary = gen::generate_kanji_order(
        &kanji_docs,
        &kanji_dep_docs,
        &kanji_grapheme_dep_docs,
        &grapheme_positions,
        &grades,
        &popularity,
        &order_store,
        dry_run,
    )?;
    println!(
        "kanji-order: {} ordered, {} dependency violations",
        summary.ordered,
        summary.violations.len()
    );
    for violation in summary.violations.iter().take(20) {
        println!("  {violation}");
    }
    if summary.violations.len() > 20 {
        println!("  ... and {} more", summary.violations.len() - 20);
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    let store = DocumentStore::new(config.paths().learning_order_docs());
    let docs: Vec<LearningOrderDoc> = store.load_all()?;
    if docs.is_empty() {
        return Err(Error::Config("no learning-order documents to validate".into()));
    }
    for doc in &docs {
        let default_track =
            doc.id == GRAPHEME_ORDER_DOC_ID || doc.id == KANJI_ORDER_DOC_ID;
        doc.validate(default_track)?;
        println!("{}: {} items, valid", doc.id, doc.many.len());
    }
    Ok(())
}
