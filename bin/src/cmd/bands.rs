//! Bands command implementation.

use crate::cmd::banner;
use valora::{
    ValuationBand,
    value::classify::{ENTRY_MARKUP, EXIT_MARKDOWN},
};

/// Report columns and what they hold.
const COLUMNS: [(&str, &str); 13] = [
    ("Symbol", "Stock ticker symbol (e.g., AAPL, INFY.NS)"),
    ("Name", "Full company name"),
    ("Fair Value (EV)", "Estimated intrinsic price based on the EV/EBITDA model"),
    ("Current Price", "Latest market price"),
    ("Undervalued (%)", "How far fair value sits above the current price"),
    ("Valuation Band", "Classification by discount level (see below)"),
    ("Market", "India for .NS listings, otherwise USA"),
    ("Cap Size", "Company size by market cap (Mega, Large, Mid, Small)"),
    ("Industry", "Industry of the company"),
    ("3Y High/Low", "Highest/lowest stock price in the past 3 years"),
    ("Entry Price", "Suggested buy point (within 5% of the 3Y low)"),
    ("Exit Price", "Suggested sell point (within 5% of the 3Y high)"),
    ("Signal", "Buy if fair value is above the current price, otherwise Hold/Sell"),
];

/// Print the column glossary and band descriptions.
pub(crate) fn show_bands() {
    banner("Column Glossary");

    for (column, meaning) in COLUMNS {
        println!("  {column:<18} {meaning}");
    }

    println!();
    println!("Valuation bands:");
    println!("{}", "-".repeat(60));
    for band in ValuationBand::ALL {
        println!("  {:<16} {}", band.label(), band.description());
    }

    println!();
    println!("Variant a (default) uses every band above.");
    println!("Variant b has no Over Valued band; low or negative gaps are Fair/Premium.");
    println!();
    println!(
        "Entry/exit levels: 3Y low x {ENTRY_MARKUP} and 3Y high x {EXIT_MARKDOWN}. With \
         --entry-exit flag they become Yes/No: whether today's price is already at or \
         beyond that level."
    );
    println!();
}
