// Year filter - narrows the table to one offer year, or passes it through

use crate::record::OfferTable;

/// Keep rows whose offer year equals `year`. `None` returns the table as-is.
///
/// Rows without an offer date never match a specific year.
pub fn filter_by_year(table: OfferTable, year: Option<i32>) -> OfferTable {
    match year {
        None => table,
        Some(year) => table
            .into_iter()
            .filter(|offer| offer.offer_year == Some(year))
            .collect(),
    }
}
