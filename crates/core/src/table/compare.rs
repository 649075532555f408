//! Ordering of table cells.
//!
//! Every cell is ranked missing, then strictly numeric, then text. Numeric
//! cells compare by value among themselves and text cells by natural order,
//! so a fully numeric column sorts by value and the ordering stays total in
//! mixed columns.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use super::state::SortDirection;
use crate::values::{as_search_text, strict_number, Record};

/// Compares text with embedded digit runs by their numeric value, so
/// `"Port 2"` sorts before `"Port 10"`.
///
/// Equal digit runs of different width (`"07"` vs `"7"`) tie-break on the
/// shorter run first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = digit_run(&mut left);
                let r_run = digit_run(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.cmp(&r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Sort key of one cell. Variant order is the rank across kinds.
#[derive(Debug)]
enum CellKey {
    Missing,
    Number(f64),
    Text(String),
}

impl CellKey {
    fn of(cell: Option<&serde_json::Value>) -> Self {
        match cell {
            None | Some(serde_json::Value::Null) => CellKey::Missing,
            cell => match strict_number(cell) {
                Some(number) => CellKey::Number(number),
                None => CellKey::Text(as_search_text(cell)),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellKey::Missing => 0,
            CellKey::Number(_) => 1,
            CellKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Number(a), CellKey::Number(b)) => a.total_cmp(b),
            (CellKey::Text(a), CellKey::Text(b)) => natural_cmp(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Sorts row indices by one column. Stable; missing cells sort first when
/// ascending.
pub(crate) fn sort_indices(
    records: &[Record],
    indices: &mut [usize],
    column: &str,
    direction: SortDirection,
) {
    let mut keyed: Vec<(usize, CellKey)> = indices
        .iter()
        .map(|&i| (i, CellKey::of(records[i].get(column))))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        let ordering = a.compare(b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    for (slot, (index, _)) in indices.iter_mut().zip(keyed) {
        *slot = index;
    }
}
