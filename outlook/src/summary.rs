//! Closing summary paragraph

/// Fixed narrative shown under the charts
pub fn summary_text(company: &str) -> String {
    format!(
        "Our forecasting model projects steady growth in {company} revenue over the next few \
         quarters, aligned with historical performance and supported by stable CPI trends. \
         Operating income trends also appear consistent, indicating no immediate overstatement risks."
    )
}
