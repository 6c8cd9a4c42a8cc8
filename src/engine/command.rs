//! Command lines in the engine's textual command language.

/// Fixed field roles of a drillhole table.
pub const HOLE_ID_FIELD: &str = "BHID";
pub const FROM_FIELD: &str = "FROM";
pub const TO_FIELD: &str = "TO";

/// Dump `dataset` to `<dataset>.csv` in the project folder: no row-count
/// header, full-precision decimals, implicit fields expanded.
pub fn export_csv(dataset: &str) -> String {
    format!("output &IN={dataset} @CSV=1 @NODD=0 @DPLACE=-1 @IMPLICIT=1 '{dataset}.csv'")
}

/// Composite `input` into `output` at `interval` metres, breaking at `zone`
/// boundaries, starting at depth zero with no gap tolerance and no report.
pub fn composite(input: &str, output: &str, zone: &str, interval: u32) -> String {
    format!(
        "compdh &IN={input} &OUT={output} \
         *BHID={HOLE_ID_FIELD} *FROM={FROM_FIELD} *TO={TO_FIELD} *ZONE={zone} \
         @INTERVAL={interval} @MAXGAP=0 @START=0 @MODE=1 @PRINT=0"
    )
}
