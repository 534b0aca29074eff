//! Index-based reordering shared by the store and the interaction engine.

/// Moves the element at `from` so that it ends up at `to`.
///
/// Both indices are clamped into `0..items.len()`; an empty slice is left
/// untouched. All other elements keep their relative order.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let Some(last) = items.len().checked_sub(1) else {
        return;
    };
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return;
    }

    let moved = items.remove(from);
    items.insert(to, moved);
}

/// Index one step away from `index` in a list of `len` items, or `None`
/// when the step would leave the list.
pub fn step(index: usize, len: usize, forward: bool) -> Option<usize> {
    if forward {
        index.checked_add(1).filter(|next| *next < len)
    } else {
        index.checked_sub(1)
    }
}
