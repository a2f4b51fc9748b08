//! Symbol ⇔ Column Map
//!
//! The HUD never shows node indices. Each matrix column gets a glyph through a
//! random permutation drawn once per board, so the symbol on a button says
//! nothing about where it leads.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Display alphabet. Boards larger than this pad with decimal indices.
pub const BASE_SYMBOLS: [&str; 20] = [
    "◆", "▲", "●", "■", "★", "♣", "♠", "♦", "▼", "▶", "⬟", "⬢", "⬡", "✶", "✷", "✦", "✧", "✪", "✱", "✳",
];

/// Fixed bijection between display symbols and matrix columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolColumnMap {
    column_to_symbol: Vec<String>,
    symbol_to_column: HashMap<String, usize>,
}

impl SymbolColumnMap {
    /// Symbols for a board of `size` nodes, in alphabet order.
    pub fn alphabet(size: usize) -> Vec<String> {
        (0..size)
            .map(|i| BASE_SYMBOLS.get(i).map_or_else(|| i.to_string(), |s| (*s).to_string()))
            .collect()
    }

    /// Map symbol `i` to column `permutation[i]`.
    ///
    /// Returns `None` unless `permutation` is a permutation of `0..size`.
    pub fn from_permutation(permutation: &[usize]) -> Option<Self> {
        let size = permutation.len();
        let symbols = Self::alphabet(size);
        let mut column_to_symbol = vec![String::new(); size];
        let mut symbol_to_column = HashMap::with_capacity(size);

        for (symbol, &column) in symbols.into_iter().zip(permutation) {
            let slot = column_to_symbol.get_mut(column)?;
            if !slot.is_empty() {
                return None;
            }
            slot.clone_from(&symbol);
            symbol_to_column.insert(symbol, column);
        }

        Some(Self {
            column_to_symbol,
            symbol_to_column,
        })
    }

    /// Draw a fresh random mapping for `size` columns.
    pub fn shuffled<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut permutation: Vec<usize> = (0..size).collect();
        permutation.shuffle(rng);
        let symbols = Self::alphabet(size);
        let mut column_to_symbol = vec![String::new(); size];
        let mut symbol_to_column = HashMap::with_capacity(size);
        for (symbol, column) in symbols.into_iter().zip(permutation) {
            column_to_symbol[column].clone_from(&symbol);
            symbol_to_column.insert(symbol, column);
        }
        Self {
            column_to_symbol,
            symbol_to_column,
        }
    }

    /// Column behind `symbol`, if the symbol belongs to this board.
    #[inline]
    pub fn column_for(&self, symbol: &str) -> Option<usize> {
        self.symbol_to_column.get(symbol).copied()
    }

    /// Symbol shown for `column`.
    #[inline]
    pub fn symbol_for(&self, column: usize) -> Option<&str> {
        self.column_to_symbol.get(column).map(String::as_str)
    }

    /// Symbols for every set column of an adjacency row, in column order.
    pub fn symbols_for_row(&self, row: &[bool]) -> Vec<String> {
        row.iter()
            .enumerate()
            .filter(|&(_, &edge)| edge)
            .filter_map(|(column, _)| self.symbol_for(column).map(str::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.column_to_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column_to_symbol.is_empty()
    }
}
