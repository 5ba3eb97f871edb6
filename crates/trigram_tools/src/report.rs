//! Plain-text reports for balancing work.

use std::fmt::Write as _;

use trigram_core::catalog::Catalog;
use trigram_core::stance::Stance;
use trigram_core::transition::{optimal_path, ranked_transitions};

use crate::error::{Result, ToolError};

/// Parse a stance by romanized name, Hangul, hanja, or ring index.
///
/// # Errors
///
/// Returns an error if the argument names no stance.
pub fn parse_stance(value: &str) -> Result<Stance> {
    if let Some(stance) = Stance::from_name(value) {
        return Ok(stance);
    }
    if let Some(stance) = Stance::all()
        .into_iter()
        .find(|s| s.korean_name() == value || s.hanja() == value)
    {
        return Ok(stance);
    }
    match value.parse::<usize>() {
        Ok(index) if index < Stance::all().len() => Ok(Stance::from_index(index)),
        _ => Err(ToolError::UnknownArgument {
            kind: "stance",
            value: value.to_string(),
        }),
    }
}

/// The 8x8 effectiveness matrix, attacker rows by defender columns, with
/// each row's best target marked.
#[must_use]
pub fn matrix_table(catalog: &Catalog) -> String {
    let matrix = catalog.matrix();
    let mut out = String::from("atk\\def");
    for defender in Stance::all() {
        let _ = write!(out, " {:>6}", defender.name());
    }
    out.push('\n');

    for attacker in Stance::all() {
        let best = matrix.best_target(attacker);
        let _ = write!(out, "{:<7}", attacker.name());
        for defender in Stance::all() {
            let marker = if defender == best { '*' } else { ' ' };
            let _ = write!(out, " {:>5.2}{marker}", matrix.get(attacker, defender));
        }
        out.push('\n');
    }
    let _ = writeln!(out, "off-diagonal mean: {:.4}", matrix.off_diagonal_mean());
    out
}

/// Every transition out of `from`, cheapest first, with the stances
/// passed on the way.
#[must_use]
pub fn transitions_table(from: Stance) -> String {
    let mut out = format!(
        "from {} ({} {} {})\n",
        from.name(),
        from.symbol(),
        from.hanja(),
        from.korean_name()
    );
    for (to, cost) in ranked_transitions(from) {
        let via: Vec<&str> = optimal_path(from, to).iter().map(|s| s.name()).collect();
        let _ = write!(
            out,
            "  -> {:<4} ki {:>3}  stamina {:>3}  {:>5} ms",
            to.name(),
            cost.ki,
            cost.stamina,
            cost.time_ms
        );
        if !via.is_empty() {
            let _ = write!(out, "  via {}", via.join(", "));
        }
        out.push('\n');
    }
    out
}
