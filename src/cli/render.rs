use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::engine::paginate::Page;
use crate::models::computer::{CheckStatus, ComputerRecord};
use crate::models::domain::DomainLookup;

const HOSTNAME_WIDTH: usize = 24;
const OS_WIDTH: usize = 28;
const DOMAIN_WIDTH: usize = 18;
const IP_WIDTH: usize = 16;

fn status_color(status: Option<CheckStatus>) -> Option<Color> {
    match status? {
        CheckStatus::Success => Some(Color::Green),
        CheckStatus::PartiallySuccessful => Some(Color::Yellow),
        CheckStatus::Failed | CheckStatus::Unreachable => Some(Color::Red),
        CheckStatus::Disabled | CheckStatus::IsDeleted => Some(Color::Black),
    }
}

/// Truncate to `width` characters, marking the cut with `~`
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn write_row<W: WriteColor>(
    out: &mut W,
    record: &ComputerRecord,
    domains: &DomainLookup,
) -> io::Result<()> {
    write!(
        out,
        "{:<hw$} {:<ow$} {:<dw$} {:<iw$} ",
        fit(&record.hostname, HOSTNAME_WIDTH),
        fit(record.os_name().unwrap_or("-"), OS_WIDTH),
        fit(domains.name_of(record.domain_id), DOMAIN_WIDTH),
        fit(record.first_ip(), IP_WIDTH),
        hw = HOSTNAME_WIDTH,
        ow = OS_WIDTH,
        dw = DOMAIN_WIDTH,
        iw = IP_WIDTH,
    )?;

    let mut spec = ColorSpec::new();
    spec.set_fg(status_color(record.check_status))
        .set_intense(record.check_status.is_some_and(|s| s.is_hidden_by_default()));
    out.set_color(&spec)?;
    write!(out, "{}", record.check_status.map(|s| s.as_str()).unwrap_or("-"))?;
    out.reset()?;
    writeln!(out)
}

/// Print a page as a fixed-width table with colored statuses
pub fn write_table<W: WriteColor>(
    out: &mut W,
    page: &Page<'_>,
    domains: &DomainLookup,
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(
        out,
        "{:<hw$} {:<ow$} {:<dw$} {:<iw$} STATUS",
        "HOSTNAME",
        "OS",
        "DOMAIN",
        "IP",
        hw = HOSTNAME_WIDTH,
        ow = OS_WIDTH,
        dw = DOMAIN_WIDTH,
        iw = IP_WIDTH,
    )?;
    out.reset()?;

    for record in &page.records {
        write_row(out, record, domains)?;
    }

    writeln!(
        out,
        "page {}/{} - {} of {} computers",
        page.page,
        page.total_pages.max(1),
        page.records.len(),
        page.total
    )
}
