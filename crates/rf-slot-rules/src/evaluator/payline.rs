//! Fixed payline matching

use smallvec::SmallVec;

use super::{combined_multiplier, mark_tiles};
use crate::paylines::{PayDirection, PaylineSet};
use crate::payout::{Payout, PayoutKind};
use crate::state::SpinState;
use crate::symbols::{EMPTY, SymbolId};

#[derive(Debug, Clone)]
struct LineMatch {
    symbol: SymbolId,
    factor: f64,
    multiplier: f64,
    tiles: SmallVec<[usize; 12]>,
}

impl LineMatch {
    fn total(&self) -> f64 {
        self.factor * self.multiplier
    }
}

/// Match every line of the set; at most one payout per line.
pub fn evaluate(state: &mut SpinState, lines: &PaylineSet) -> Vec<Payout> {
    let direction = lines.direction();
    let highest = lines.highest_payout();
    let mut payouts = Vec::new();

    for (line, offsets) in lines.iter() {
        let ltr = direction
            .ltr()
            .then(|| {
                let walk: SmallVec<[usize; 12]> = offsets.iter().copied().collect();
                match_line(state, &walk, highest)
            })
            .flatten();
        let rtl = direction
            .rtl()
            .then(|| {
                let walk: SmallVec<[usize; 12]> = offsets.iter().rev().copied().collect();
                match_line(state, &walk, highest)
            })
            .flatten();

        let (found, dir) = match (ltr, rtl) {
            (Some(l), Some(r)) if r.total() > l.total() => (r, PayDirection::RightToLeft),
            (Some(l), _) => (l, PayDirection::LeftToRight),
            (None, Some(r)) => (r, PayDirection::RightToLeft),
            (None, None) => continue,
        };

        mark_tiles(state, &found.tiles);
        log::trace!(
            "Payline {}: symbol {} x{} ({:?})",
            line.id,
            found.symbol,
            found.tiles.len(),
            dir
        );
        payouts.push(
            Payout::new(
                PayoutKind::Payline,
                found.symbol,
                found.tiles.len() as u8,
                found.factor,
                found.multiplier,
            )
            .with_direction(dir)
            .with_payline(line.id, &line.rows)
            .with_tiles(found.tiles.to_vec()),
        );
    }

    payouts
}

fn match_line(state: &SpinState, walk: &[usize], highest: bool) -> Option<LineMatch> {
    let symbols = state.symbols();
    let first = state.indexes[*walk.first()?];
    let first_symbol = symbols.get(first)?;

    let leading_wilds = walk
        .iter()
        .take_while(|&&o| symbols.is_wild(state.indexes[o]))
        .count();

    // Leading wilds take the identity of the first non-wild symbol.
    let symbol = if first_symbol.is_wild() {
        walk.get(leading_wilds)
            .map(|&o| state.indexes[o])
            .filter(|&id| id != EMPTY)
            .unwrap_or(first)
    } else {
        first
    };

    let count = walk
        .iter()
        .take_while(|&&o| symbols.matches(state.indexes[o], symbol))
        .count();

    let mut best = (symbol, count, symbols.get(symbol).map_or(0.0, |s| s.payout(count as u8)));
    if highest && leading_wilds >= 2 {
        if let Some((wild_symbol, pay)) = symbols.best_wild(leading_wilds as u8) {
            if pay > best.2 {
                best = (wild_symbol, leading_wilds, pay);
            }
        }
    }

    let (symbol, count, factor) = best;
    if factor <= 0.0 {
        return None;
    }

    let tiles: SmallVec<[usize; 12]> = walk[..count].iter().copied().collect();
    Some(LineMatch {
        symbol,
        factor,
        multiplier: combined_multiplier(state, &tiles),
        tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::paylines::Payline;
    use approx::assert_relative_eq;

    fn five_lines(state: &SpinState, direction: PayDirection, highest: bool) -> PaylineSet {
        PaylineSet::new(
            state.grid(),
            direction,
            highest,
            vec![
                Payline::new(1, &[1, 1, 1, 1, 1]),
                Payline::new(2, &[0, 0, 0, 0, 0]),
                Payline::new(3, &[2, 2, 2, 2, 2]),
                Payline::new(4, &[1, 2, 2, 2, 1]),
                Payline::new(5, &[1, 0, 0, 0, 1]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_five_of_a_kind_top_row() {
        let mut state = fixtures::state_5x3();
        state.load(&[1, 2, 3, 1, 5, 6, 1, 2, 3, 1, 5, 6, 1, 2, 3]).unwrap();
        let lines = five_lines(&state, PayDirection::LeftToRight, false);

        let payouts = evaluate(&mut state, &lines);
        assert_eq!(payouts.len(), 1);
        let p = &payouts[0];
        assert_eq!(p.symbol, 1);
        assert_eq!(p.count, 5);
        assert_eq!(p.payline_id, 2);
        assert_eq!(p.pay_rows.as_slice(), &[0, 0, 0, 0, 0]);
        assert_eq!(p.tiles, vec![0, 3, 6, 9, 12]);
        assert_eq!(p.direction, PayDirection::LeftToRight);
        assert_relative_eq!(p.factor, 50.0);
        assert_eq!(state.payouts[0], 1);
        assert_eq!(state.payouts[1], 0);
    }

    #[test]
    fn test_deterministic() {
        let grid = [1, 9, 3, 9, 1, 6, 1, 2, 3, 4, 1, 6, 2, 2, 3];
        let mut a = fixtures::state_5x3();
        let mut b = fixtures::state_5x3();
        a.load(&grid).unwrap();
        b.load(&grid).unwrap();
        let lines = five_lines(&a, PayDirection::Both, true);
        assert_eq!(evaluate(&mut a, &lines), evaluate(&mut b, &lines));
        assert_eq!(a.payouts, b.payouts);
    }

    #[test]
    fn test_leading_wild_substitutes() {
        let mut state = fixtures::state_5x3();
        // middle row: W 2 2 W 4
        state.load(&[1, 9, 3, 4, 2, 6, 1, 2, 3, 4, 9, 6, 1, 4, 3]).unwrap();
        let lines = five_lines(&state, PayDirection::LeftToRight, false);

        let payouts = evaluate(&mut state, &lines);
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts[0].symbol, 2);
        assert_eq!(payouts[0].count, 4);
        assert_eq!(payouts[0].payline_id, 1);
        assert_relative_eq!(payouts[0].factor, 8.0);
    }

    #[test]
    fn test_highest_payout_for_wild_run() {
        let mut state = fixtures::state_5x3();
        // middle row: W W W 5 5 → 5 of symbol 5 pays 10, 3 wilds as symbol 1 pays 5
        state.load(&[1, 9, 3, 4, 9, 6, 1, 9, 3, 4, 5, 6, 1, 5, 3]).unwrap();

        let plain = five_lines(&state, PayDirection::LeftToRight, false);
        let p = evaluate(&mut state, &plain);
        assert_eq!((p[0].symbol, p[0].count), (5, 5));

        // W W W 5 4: natural 4 of symbol 5 pays 2, best wild for 3 pays 5
        state.load(&[1, 9, 3, 4, 9, 6, 1, 9, 3, 4, 5, 6, 1, 4, 3]).unwrap();
        let highest = five_lines(&state, PayDirection::LeftToRight, true);
        let p = evaluate(&mut state, &highest);
        assert_eq!((p[0].symbol, p[0].count), (1, 3));
        assert_relative_eq!(p[0].factor, 5.0);
        assert_eq!(p[0].tiles, vec![1, 4, 7]);
    }

    #[test]
    fn test_both_ways_prefers_rtl_only_when_better() {
        let mut state = fixtures::state_5x3();
        // top row: 4 4 4 1 1 … reversed 1 1 1? no: 3 of 4 left, 2 of 1 right
        state.load(&[4, 2, 3, 4, 5, 6, 4, 2, 3, 1, 5, 6, 1, 2, 3]).unwrap();
        let lines = five_lines(&state, PayDirection::Both, false);
        let p = evaluate(&mut state, &lines);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].direction, PayDirection::LeftToRight);
        assert_eq!(p[0].symbol, 4);

        // top row: 5 2 1 1 1 → only right-to-left pays
        state.load(&[5, 2, 3, 2, 5, 6, 1, 2, 3, 1, 5, 6, 1, 2, 3]).unwrap();
        let p = evaluate(&mut state, &lines);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].direction, PayDirection::RightToLeft);
        assert_eq!(p[0].tiles, vec![12, 9, 6]);
    }

    #[test]
    fn test_wild_and_tile_multipliers() {
        let mut state = fixtures::state_5x3();
        // middle row: 1 W×2 1 1 2
        state.load(&[2, 1, 3, 4, 12, 6, 2, 1, 3, 4, 1, 6, 3, 2, 3]).unwrap();
        state.ensure_multipliers()[7] = 3;
        state.multiplier = 2.0;
        let lines = five_lines(&state, PayDirection::LeftToRight, false);
        let p = evaluate(&mut state, &lines);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].count, 4);
        assert_relative_eq!(p[0].multiplier, 12.0);
        assert_relative_eq!(p[0].total(), 120.0);
    }
}
