/*!
# Etymon Decoder

Vocabulary data pipeline for the Etymon Decoder flashcard apps, built in Rust.

## Overview

The apps show words broken down into their roots (`dis + tract`), grouped
by the roots they share and by subject. Their data comes from a shared
spreadsheet, from JSON snapshots, and from free-text contributions pasted by
editors. This crate turns all of those into one canonical tree and merges
new material into it without creating duplicates.

## Architecture

Data flows leaves-first through four stages:

### Intake
- **Row Normalizer** (`normalizer`) - tabular record to validated entry;
  trims fields and collapses "empty" markers such as `nan` to `""`
- **Free-Text Parser** (`parser`) - contribution text to a tree

### Assembly
- **Tree Builder** (`builder`) - flat rows to Category → Root Group →
  Vocabulary, deterministic and order preserving
- **Merge Engine** (`merge`) - idempotent union of an incoming tree into the
  canonical one, reporting `MergeStats`

### Persistence
- JSON document (optionally gzip-compressed) or flattened CSV table
  (`saving`), CSV import (`loader`) and export (`downloader`)
- Feedback log of reader error reports (`feedback`)

## Data Model

```text
VocabularyTree
└── Category            "Medical"
    └── RootGroup       roots ["cardio"], meaning "heart"
        └── VocabularyEntry   cardiology = cardio+logy
```

Categories match by exact name, root groups by root *set*, words by
lowercase trimmed spelling.

## Concurrency

Everything here is synchronous and in-memory. A merge owns the loaded tree
for its duration; concurrent writers against one store must be serialized
by the caller.
*/

pub mod builder;
pub mod config;
pub mod downloader;
pub mod error;
pub mod feedback;
pub mod loader;
pub mod merge;
pub mod normalizer;
pub mod parser;
pub mod saving;
pub mod vocab;

/// Re-export the pipeline entry points to make them easier to use
pub use builder::{FlatRow, build_tree, build_tree_from_records, flatten, split_roots};
pub use error::{FeedbackError, LoadError, NormalizationError, ParseError, StoreError};
pub use merge::{MergeStats, merge, merge_into};
pub use normalizer::{RawRecord, normalize_record, normalize_row};
pub use parser::{PENDING_DEFINITION, ParseReport, parse_contribution, parse_contribution_with_report};
pub use saving::{CsvTableStore, JsonFileStore, TreeStore};
pub use vocab::*;
