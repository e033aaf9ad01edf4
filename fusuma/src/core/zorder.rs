use fusuma_schema::{Card, CardId};

pub fn max_z_index(cards: &[Card]) -> u64 {
    cards.iter().map(|c| c.z_index).max().unwrap_or(0)
}

/// Raise `id` above every other card. Returns the z it received.
pub fn bring_to_front(cards: &mut [Card], next_z_index: &mut u64, id: &CardId) -> Option<u64> {
    let current = cards.iter().find(|c| &c.id == id)?.z_index;
    let already_on_top = cards.iter().all(|c| &c.id == id || c.z_index < current);
    if already_on_top && current > 0 {
        return Some(current);
    }

    let z = (*next_z_index).max(max_z_index(cards) + 1);
    let card = cards.iter_mut().find(|c| &c.id == id)?;
    card.z_index = z;
    *next_z_index = z + 1;
    Some(z)
}

/// Highest non-minimized card.
pub fn topmost(cards: &[Card]) -> Option<&Card> {
    cards
        .iter()
        .filter(|c| c.is_visible())
        .max_by_key(|c| c.z_index)
}

/// Cards back-to-front.
pub fn stacking_order(cards: &[Card]) -> Vec<&Card> {
    let mut sorted: Vec<&Card> = cards.iter().collect();
    sorted.sort_by_key(|c| c.z_index);
    sorted
}

pub fn has_unique_z(cards: &[Card]) -> bool {
    let mut zs: Vec<u64> = cards.iter().map(|c| c.z_index).collect();
    zs.sort_unstable();
    zs.windows(2).all(|w| w[0] != w[1])
}

/// Repair duplicate z values by renumbering in the existing stacking order
/// (ties broken by list position). Returns the re-derived next z.
pub fn normalize(cards: &mut [Card], next_z_index: u64) -> u64 {
    if !has_unique_z(cards) {
        let mut order: Vec<usize> = (0..cards.len()).collect();
        order.sort_by_key(|&i| (cards[i].z_index, i));
        for (rank, &i) in order.iter().enumerate() {
            cards[i].z_index = rank as u64 + 1;
        }
        tracing::debug!("Renumbered z-order of {} cards", cards.len());
    }
    next_z_index.max(max_z_index(cards) + 1)
}
