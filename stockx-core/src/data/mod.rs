//! Quote clients, raw table shapes, alignment, and normalization.

pub mod align;
pub mod fixture;
pub mod frame;
pub mod history;
pub mod normalize;
pub mod provider;
pub mod raw;
pub mod synthetic;
pub mod yahoo;

pub use align::{align_symbols, AlignedData};
pub use fixture::FixtureProvider;
pub use history::{fetch_history, fetch_multi, fetch_single};
pub use normalize::{normalize, CanonicalTable, SeriesColumn, TableError, DATE_COLUMN};
pub use provider::{latest_quote, DataError, DataSource, QuoteClient, RawBar, SymbolHistory};
pub use raw::{CompoundTable, FlatTable, Metric, RawSeriesTable};
pub use synthetic::SyntheticProvider;
pub use yahoo::{YahooOptions, YahooProvider};
