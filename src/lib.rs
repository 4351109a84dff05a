pub mod core;
pub mod analysis;
pub mod query;
pub mod aggregate;
pub mod export;
pub mod engine;

pub use crate::core::config::Config;
pub use crate::core::dataset::DatasetTable;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{Region, SalesRecord};
pub use crate::engine::SalesEngine;
pub use crate::query::FilterCriteria;

/*
┌────────────────────────────────────────────────────────────────────────────┐
│                          VGSALES QUERY FLOW                                │
└────────────────────────────────────────────────────────────────────────────┘

   query string / JSON body             free text
            │                               │
            ▼                               ▼
   ┌──────────────────┐           ┌───────────────────┐
   │ CriteriaParser   │           │ NlExtractor       │  regions, years,
   │ (query/parser)   │           │ (analysis)        │  vocabulary scan
   └────────┬─────────┘           └─────────┬─────────┘
            └──────────────┬────────────────┘
                           ▼
                 ┌───────────────────┐
                 │ FilterCriteria    │  six facets, AND across, OR within
                 └─────────┬─────────┘
                           ▼
   ┌──────────────┐  ┌───────────────────┐  ┌──────────────┐
   │ QueryCache   │◄─┤ FilterEngine      ├─►│ RecordMatcher│
   │ (lru)        │  │ seq / rayon pool  │  │ (Predicate)  │
   └──────────────┘  └─────────┬─────────┘  └──────────────┘
                               ▼
                 ┌───────────────────┐
                 │ FilteredView<'a>  │  row ids into Arc<DatasetTable>
                 └─────────┬─────────┘
               ┌───────────┴────────────┐
               ▼                        ▼
   ┌───────────────────────┐  ┌───────────────────┐
   │ aggregate             │  │ export::csv       │
   │ top games, regions,   │  │ filtered report   │
   │ KPI, yearly, genre,   │  └───────────────────┘
   │ publisher             │
   └───────────────────────┘

   DatasetTable is loaded once and never written; every request builds its
   own view and aggregates, so readers need no locking.
*/
