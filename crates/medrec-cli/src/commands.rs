use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{CellAlignment, Table};
use tracing::{debug, info, info_span, trace};

use medrec_cli::config::{OptionOverrides, load_options, resolve_options};
use medrec_cli::logging::redact_value;
use medrec_core::{
    DocumentPipeline, EmbeddingProvider, HashingEmbedder, PrecomputedEmbeddings,
    evaluate_categories,
};
use medrec_ingest::{parse_pages_json, read_embeddings_json, read_input_bytes, read_pages_dir};
use medrec_model::Page;
use medrec_output::{
    RunReport, SourceFingerprint, read_output_csv, write_output_csv, write_run_report_json,
};
use medrec_standards::{CategoryMap, CompiledPatterns, PatternStore, resolve_patterns_path, sha256_hex};

use crate::cli::{CategoriesArgs, EvaluateArgs, PatternFileArg, ProcessArgs};
use crate::summary::{align_column, apply_table_style, header_cell};
use crate::types::{EmbedderKind, EvaluationResult, PatternListing, ProcessResult};

pub fn run_process(args: &ProcessArgs) -> Result<ProcessResult> {
    let input = args.input.as_path();
    let process_span = info_span!("document", input = %input.display());
    let _process_guard = process_span.enter();

    let options = resolve_options(args.config.as_deref(), &overrides_from_args(args))?;
    let store = pattern_store(&args.patterns);
    let patterns = store.load();
    let pattern_count = patterns.len();
    let compiled = CompiledPatterns::compile(&patterns);
    debug!(
        path = %store.path().display(),
        pattern_count,
        compiled = compiled.len(),
        "header patterns ready"
    );

    let (pages, input_sha256) =
        load_input(input).with_context(|| format!("read pages from {}", input.display()))?;
    info!(pages = pages.len(), sha256 = %input_sha256, "pages loaded");

    let (provider, embedder): (Box<dyn EmbeddingProvider>, EmbedderKind) = match &args.embeddings
    {
        Some(path) => {
            let vectors = read_embeddings_json(path)
                .with_context(|| format!("read embeddings from {}", path.display()))?;
            let embeddings = PrecomputedEmbeddings::new(vectors).context("load embeddings")?;
            (Box::new(embeddings), EmbedderKind::Precomputed)
        }
        None => (Box::new(HashingEmbedder::default()), EmbedderKind::Hashing),
    };
    debug!(embedder = embedder.describe(), "embedding provider selected");

    let pipeline = DocumentPipeline::new(options, compiled);
    let output = pipeline
        .run(pages, provider.as_ref())
        .context("process document")?;
    for row in &output.rows {
        trace!(
            page = row.page_num,
            category = row.category_id,
            header = redact_value(&row.header),
            dos = redact_value(&row.dos),
            provider = redact_value(&row.provider),
            "output row"
        );
    }

    let (output_csv, report) = if args.dry_run {
        info!("dry run: no files written");
        (None, None)
    } else {
        write_output_csv(&args.output, &output.rows).context("write record csv")?;
        let report = match &args.report {
            Some(path) => {
                let source = SourceFingerprint {
                    path: input.display().to_string(),
                    sha256: input_sha256.clone(),
                };
                write_run_report_json(path, &RunReport::new(source, &output))
                    .context("write run report")?;
                Some(path.clone())
            }
            None => None,
        };
        (Some(args.output.clone()), report)
    };

    Ok(ProcessResult {
        input: args.input.clone(),
        input_sha256,
        embedder,
        pattern_count,
        output_csv,
        report,
        output,
    })
}

pub fn run_patterns_list(file: &PatternFileArg) -> Result<PatternListing> {
    let store = pattern_store(file);
    Ok(PatternListing {
        path: store.path().to_path_buf(),
        patterns: store.load(),
    })
}

pub fn run_patterns_add(file: &PatternFileArg, regex: &str, label: &str) -> Result<()> {
    let store = pattern_store(file);
    let patterns = store
        .add(regex, label)
        .with_context(|| format!("add pattern to {}", store.path().display()))?;
    println!(
        "Added pattern {} ({}) to {}",
        patterns.len() - 1,
        label.trim(),
        store.path().display()
    );
    Ok(())
}

pub fn run_patterns_delete(file: &PatternFileArg, index: usize) -> Result<()> {
    let store = pattern_store(file);
    let removed = store
        .delete(index)
        .with_context(|| format!("delete pattern from {}", store.path().display()))?;
    println!(
        "Removed pattern {index} ({}) from {}",
        removed.label,
        store.path().display()
    );
    Ok(())
}

pub fn run_categories(args: &CategoriesArgs) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    let categories = CategoryMap::builtin().with_overrides(&options.categories);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Header label"), header_cell("Category")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, id) in categories.iter() {
        table.add_row(vec![label.to_string(), id.to_string()]);
    }
    println!("{table}");
    println!(
        "Labels not listed use category {}.",
        categories.default_id()
    );
    Ok(())
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluationResult> {
    let options = load_options(args.config.as_deref())?;
    let categories = CategoryMap::builtin().with_overrides(&options.categories);
    let rows = read_output_csv(&args.csv)?;
    let evaluation = evaluate_categories(&rows, &categories);
    info!(
        rows = evaluation.total_rows,
        agreed = evaluation.agreed_rows,
        unmapped = evaluation.unmapped_headers,
        "category evaluation finished"
    );

    let mut labels: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (label, id) in categories.iter() {
        labels.entry(id).or_default().push(label.to_string());
    }
    Ok(EvaluationResult {
        csv: args.csv.clone(),
        evaluation,
        labels,
    })
}

fn pattern_store(file: &PatternFileArg) -> PatternStore {
    PatternStore::new(resolve_patterns_path(file.path.as_deref()))
}

fn overrides_from_args(args: &ProcessArgs) -> OptionOverrides {
    OptionOverrides {
        eps: args.eps,
        min_samples: args.min_samples,
        max_page_gap: args.max_page_gap,
        max_inherit_gap: args.max_inherit_gap,
        cluster_order: args.cluster_order.map(Into::into),
    }
}

/// Loads the pages with the SHA-256 of exactly the bytes that were parsed.
/// A directory input is fingerprinted by its pages serialized as JSON.
fn load_input(input: &Path) -> Result<(Vec<Page>, String)> {
    if input.is_dir() {
        let pages = read_pages_dir(input)?;
        let bytes = serde_json::to_vec(&pages).context("serialize pages for fingerprint")?;
        return Ok((pages, sha256_hex(&bytes)));
    }
    let bytes = read_input_bytes(input)?;
    let pages = parse_pages_json(&bytes, input)?;
    Ok((pages, sha256_hex(&bytes)))
}
