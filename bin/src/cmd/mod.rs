//! CLI subcommand modules.
//!
//! This module contains the implementations for all valora CLI subcommands.

pub(crate) mod analyze;
pub(crate) mod backtest;
pub(crate) mod bands;

/// Print a boxed section heading.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║ {title:^60} ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Cut `s` to at most `width` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Two-decimal number or `N/A`.
pub(crate) fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Apple Inc.", 24), "Apple Inc.");
        assert_eq!(truncate("Infosys Limited", 8), "Infosys…");
        assert_eq!(truncate("Zürich Insurance", 6).chars().count(), 6);
    }

    #[test]
    fn test_fmt_optional() {
        assert_eq!(fmt_optional(Some(94.5)), "94.50");
        assert_eq!(fmt_optional(None), "N/A");
    }
}
