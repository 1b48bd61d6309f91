//! Pagination driver. Walks the corpus in canonical order and turns every
//! non-empty chapter into one aggregate page plus one page per unit.
//!
//! # Two phases
//! 1. [`plan`] is a single serial pass. It orders chapters, builds a
//!    [`PageRequest`] for every page and assigns each its `global_index`
//!    from a [`Counters`] value that is passed in and handed back.
//! 2. Composition ([`render_item`] / [`paginate_parallel`]) works on planned
//!    items independently. It may run in any order or in parallel; a failed
//!    or panicking item is reported and never shifts another item's index.
//!
//! Aggregate and single pages are numbered by separate counters, each
//! gap-free from 1 within a run.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::corpus::catalog::Catalog;
use crate::corpus::models::{Chapter, ChapterRef};
use crate::layout::canvas::CanvasSpec;
use crate::layout::composer::{
    compose, PageBody, PageLayout, PageRequest, Truncation, UnitBody,
};
use crate::layout::font_metrics::TextMeasurer;
use crate::layout::numerals::encode;
use crate::layout::sanitize::sanitize;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Aggregate,
    Single,
}

/// Last identifier handed out per mode. From `Counters::default()` the first
/// page of each mode gets 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub aggregate: u32,
    pub single: u32,
}

impl Counters {
    /// Advances the counter for `mode` and returns the new identifier.
    fn next(&mut self, mode: OutputMode) -> u32 {
        let slot = match mode {
            OutputMode::Aggregate => &mut self.aggregate,
            OutputMode::Single => &mut self.single,
        };
        *slot += 1;
        *slot
    }
}

/// A page whose identifier is fixed but which has not been composed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub global_index: u32,
    pub mode: OutputMode,
    pub chapter: ChapterRef,
    /// Unit ordinal for single pages.
    pub ordinal: Option<u32>,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub items: Vec<PlannedItem>,
    pub counters: Counters,
    pub skipped_chapters: Vec<ChapterRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    pub global_index: u32,
    pub mode: OutputMode,
    #[serde(flatten)]
    pub chapter: ChapterRef,
    pub ordinal: Option<u32>,
    pub layout: PageLayout,
    pub truncation: Truncation,
}

/// A planned page that could not be composed. Its index stays reserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub global_index: u32,
    pub mode: OutputMode,
    #[serde(flatten)]
    pub chapter: ChapterRef,
    pub ordinal: Option<u32>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<OutputItem>,
    pub failures: Vec<ItemFailure>,
    pub counters: Counters,
    pub skipped_chapters: Vec<ChapterRef>,
}

// ────────────────────────────────────────────────────────────────────────────
// Planning (serial)
// ────────────────────────────────────────────────────────────────────────────

const TITLE_PREFIX: &str = "מסכת";
const CHAPTER_WORD: &str = "פרק";
const UNIT_WORD: &str = "משנה";

/// Orders the corpus canonically and assigns identifiers, continuing from
/// `counters`.
///
/// Chapters are ordered by catalog position of their tractate, then chapter
/// number; units by ordinal. Tractates missing from the catalog follow all
/// known ones in order of first appearance. Empty chapters are skipped
/// without touching either counter.
pub fn plan(corpus: &[Chapter], catalog: &Catalog, mut counters: Counters) -> Plan {
    let mut skipped_chapters = Vec::new();
    let mut items = Vec::new();

    for chapter in canonical_order(corpus, catalog) {
        if chapter.units.is_empty() {
            info!(
                tractate = %chapter.tractate_id,
                chapter = chapter.chapter_number,
                "Skipping chapter with no units"
            );
            skipped_chapters.push(chapter.reference());
            continue;
        }

        let mut units: Vec<_> = chapter.units.iter().collect();
        units.sort_by_key(|u| u.ordinal);
        let bodies: Vec<UnitBody> = units
            .iter()
            .map(|u| UnitBody {
                ordinal: u.ordinal,
                text: sanitize(&u.raw_text),
            })
            .collect();

        let title = format!("{TITLE_PREFIX} {}", catalog.label_for(&chapter.tractate_id));
        let chapter_label = encode(chapter.chapter_number as i64);

        items.push(PlannedItem {
            global_index: counters.next(OutputMode::Aggregate),
            mode: OutputMode::Aggregate,
            chapter: chapter.reference(),
            ordinal: None,
            request: PageRequest {
                title: title.clone(),
                subtitle: format!("{CHAPTER_WORD} {chapter_label}"),
                body: PageBody::Aggregate {
                    units: bodies.clone(),
                },
            },
        });

        for body in bodies {
            items.push(PlannedItem {
                global_index: counters.next(OutputMode::Single),
                mode: OutputMode::Single,
                chapter: chapter.reference(),
                ordinal: Some(body.ordinal),
                request: PageRequest {
                    title: title.clone(),
                    subtitle: format!(
                        "{CHAPTER_WORD} {chapter_label} {UNIT_WORD} {}",
                        encode(body.ordinal as i64)
                    ),
                    body: PageBody::Single { text: body.text },
                },
            });
        }
    }

    Plan {
        items,
        counters,
        skipped_chapters,
    }
}

fn canonical_order<'a>(corpus: &'a [Chapter], catalog: &Catalog) -> Vec<&'a Chapter> {
    let known = catalog.tractates().count();
    let mut unknown: HashMap<&str, usize> = HashMap::new();
    for chapter in corpus {
        if catalog.position(&chapter.tractate_id).is_none() {
            let next = known + unknown.len();
            unknown.entry(chapter.tractate_id.as_str()).or_insert_with(|| {
                warn!(tractate = %chapter.tractate_id, "Tractate not in catalog; ordering after known tractates");
                next
            });
        }
    }

    let mut ordered: Vec<&Chapter> = corpus.iter().collect();
    ordered.sort_by_key(|c| {
        let position = catalog
            .position(&c.tractate_id)
            .or_else(|| unknown.get(c.tractate_id.as_str()).copied())
            .unwrap_or(usize::MAX);
        (position, c.chapter_number)
    });
    ordered
}

// ────────────────────────────────────────────────────────────────────────────
// Composition (order-independent)
// ────────────────────────────────────────────────────────────────────────────

/// Composes one planned item.
pub fn render_item(
    item: &PlannedItem,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<OutputItem, ItemFailure> {
    match compose(&item.request, canvas, measurer) {
        Ok(page) => {
            if !page.truncation.is_empty() {
                warn!(
                    mode = ?item.mode,
                    index = item.global_index,
                    tractate = %item.chapter.tractate_id,
                    chapter = item.chapter.chapter_number,
                    omitted = ?page.truncation.omitted_ordinals,
                    dropped_lines = page.truncation.dropped_lines,
                    "Page truncated at safe zone"
                );
            }
            Ok(OutputItem {
                global_index: item.global_index,
                mode: item.mode,
                chapter: item.chapter.clone(),
                ordinal: item.ordinal,
                layout: page.layout,
                truncation: page.truncation,
            })
        }
        Err(e) => Err(failure(item, e.to_string())),
    }
}

fn failure(item: &PlannedItem, reason: String) -> ItemFailure {
    warn!(
        mode = ?item.mode,
        index = item.global_index,
        tractate = %item.chapter.tractate_id,
        chapter = item.chapter.chapter_number,
        reason = %reason,
        "Page composition failed"
    );
    ItemFailure {
        global_index: item.global_index,
        mode: item.mode,
        chapter: item.chapter.clone(),
        ordinal: item.ordinal,
        reason,
    }
}

/// Composes one planned item, turning a panic during composition into a
/// failure of that item alone.
fn render_isolated(
    item: &PlannedItem,
    canvas: &CanvasSpec,
    measurer: &dyn TextMeasurer,
) -> Result<OutputItem, ItemFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| render_item(item, canvas, measurer))) {
        Ok(result) => result,
        Err(payload) => Err(failure(
            item,
            format!("composition panicked: {}", panic_message(&*payload)),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Items per blocking task when composing in parallel.
const PARALLEL_CHUNK: usize = 32;

/// Plans serially, then composes chunks of items on the blocking pool.
///
/// Each item is composed in isolation, so a panic costs only that item.
/// Results are reassembled in plan order, so the output does not depend on
/// how the blocking pool schedules chunks.
pub async fn paginate_parallel(
    corpus: Vec<Chapter>,
    catalog: Arc<Catalog>,
    canvas: Arc<CanvasSpec>,
    measurer: Arc<dyn TextMeasurer>,
) -> PaginationRun {
    let plan = plan(&corpus, &catalog, Counters::default());
    let Plan {
        items,
        counters,
        skipped_chapters,
    } = plan;

    let mut handles = Vec::new();
    let mut chunks: Vec<Vec<PlannedItem>> = Vec::new();
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(PARALLEL_CHUNK).collect());
    }

    for chunk in chunks {
        let canvas = Arc::clone(&canvas);
        let measurer = Arc::clone(&measurer);
        // A task can still be lost outside composition; keep the items to report them.
        let planned = chunk.clone();
        let handle = tokio::task::spawn_blocking(move || {
            chunk
                .iter()
                .map(|item| render_isolated(item, &canvas, measurer.as_ref()))
                .collect::<Vec<_>>()
        });
        handles.push((planned, handle));
    }

    let mut results = Vec::new();
    for (planned, handle) in handles {
        match handle.await {
            Ok(chunk_results) => results.extend(chunk_results),
            Err(e) => results.extend(
                planned
                    .iter()
                    .map(|item| Err(failure(item, format!("composition task failed: {e}")))),
            ),
        }
    }

    finish_run(results, counters, skipped_chapters)
}

fn finish_run(
    results: Vec<Result<OutputItem, ItemFailure>>,
    counters: Counters,
    skipped_chapters: Vec<ChapterRef>,
) -> PaginationRun {
    let mut items = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(item) => items.push(item),
            Err(f) => failures.push(f),
        }
    }

    let run = PaginationRun {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        items,
        failures,
        counters,
        skipped_chapters,
    };
    info!(
        run_id = %run.run_id,
        aggregate_pages = run.counters.aggregate,
        single_pages = run.counters.single,
        failures = run.failures.len(),
        skipped = run.skipped_chapters.len(),
        "Pagination run complete"
    );
    run
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
