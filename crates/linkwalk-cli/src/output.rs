//! Plain-text rendering of result pages and the pattern table.

use colored::Colorize;
use linkwalk_core::{PatternRegistry, ResultCollector, ResultPager};
use linkwalk_sparql::BgpQuery;

/// Render the page the pager currently points at, with a header line.
pub fn render_page(results: &ResultCollector, pager: &ResultPager) -> String {
    let total = results.len();
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}/{} ({} solutions)\n",
        "page".bold(),
        pager.current() + 1,
        pager.last_page(total) + 1,
        total
    ));
    if results.is_empty() {
        out.push_str("  (no solutions)\n");
        return out;
    }

    let variables = results.variables();
    let page = pager.page(results.rows());
    let mut widths: Vec<usize> = variables.iter().map(|v| v.len()).collect();
    for row in page {
        for (i, value) in ResultCollector::mappings(row).iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(value.len());
            }
        }
    }

    let header: Vec<String> = variables
        .iter()
        .zip(&widths)
        .map(|(v, &w)| format!("{v:<w$}"))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ").trim_end().cyan()));
    for row in page {
        let cells: Vec<String> = ResultCollector::mappings(row)
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ").trim_end()));
    }
    out
}

/// Every page of the result set, first to last.
pub fn render_all_pages(results: &ResultCollector, page_size: usize) -> String {
    let mut pager = ResultPager::new(page_size);
    let last = pager.last_page(results.len());
    let mut out = String::new();
    loop {
        out.push_str(&render_page(results, &pager));
        if pager.current() >= last {
            break;
        }
        pager.next(results.len());
    }
    out
}

pub fn render_patterns(query: &BgpQuery, registry: &PatternRegistry) -> String {
    let mut out = String::new();
    for triple in &query.triples {
        match triple.predicate.signature() {
            Some(signature) => {
                let id = registry
                    .resolve(&signature)
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                out.push_str(&format!("  {:<5} {}\n", id.yellow(), signature));
            }
            None => out.push_str(&format!(
                "  {:<5} {} (variable predicate, never traversed)\n",
                "-", triple
            )),
        }
    }
    out
}
