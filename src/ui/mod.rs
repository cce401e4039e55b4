pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    batch_report, error, header, import_outcome, info, link_stats, muted, section, status, success,
    summary_row,
};
pub use table::{rows_table, stats_table};
pub use theme::{theme, Theme};
