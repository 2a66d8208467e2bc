/// Data layer: measured values, tables, and error-bar series.
///
/// Architecture:
/// ```text
///  .csv / inline literals
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  CSV → cells (number | value(unc) | text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  ufloat   │  "-2.2454(6)" ⇄ nominal ± std-dev
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  aligned x / y / yerr columns for plotting
///   └──────────┘
/// ```

pub mod series;
pub mod table;
pub mod ufloat;
