use serde::Serialize;

use crate::models::computer::ComputerRecord;

/// One page of the filtered and sorted computer list
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    pub records: Vec<&'a ComputerRecord>,

    /// Number of records passing the filters, across all pages
    pub total: usize,

    pub page: usize,

    pub page_size: usize,

    pub total_pages: usize,
}

/// Cut page `page` (1-based) of `page_size` out of `records`
///
/// Pages past the end yield an empty slice.
pub fn paginate<'a>(records: Vec<&'a ComputerRecord>, page: usize, page_size: usize) -> Page<'a> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = records.len();
    let offset = (page - 1).saturating_mul(page_size);

    let records = records.into_iter().skip(offset).take(page_size).collect();

    Page {
        records,
        total,
        page,
        page_size,
        total_pages: total.div_ceil(page_size),
    }
}
