use std::collections::HashSet;

use fusuma_schema::{CardId, PersistedWorkspace, SCHEMA_VERSION};

/// Combine the local blob with the remote one read at startup.
///
/// An empty side yields to the other. Otherwise cards the remote knows win
/// by id, and local-only cards follow in local order, minus any that would
/// duplicate a remote card's `(type, dataId)`. Workspace-wide preferences
/// come from the remote.
pub fn merge(local: &PersistedWorkspace, remote: &PersistedWorkspace) -> PersistedWorkspace {
    if local.is_empty() && !remote.is_empty() {
        return remote.clone();
    }
    if remote.is_empty() {
        return local.clone();
    }

    let remote_ids: HashSet<&CardId> = remote.cards.iter().map(|c| &c.id).collect();
    let mut cards = remote.cards.clone();
    for card in &local.cards {
        if remote_ids.contains(&card.id) {
            continue;
        }
        let duplicate = card.data_id.as_deref().is_some_and(|data_id| {
            remote
                .cards
                .iter()
                .any(|r| r.matches_data(card.kind(), data_id))
        });
        if duplicate {
            tracing::debug!("Dropping local card {}: remote already shows its data", card.id);
            continue;
        }
        cards.push(card.clone());
    }

    PersistedWorkspace {
        version: SCHEMA_VERSION,
        cards,
        layout_mode: remote.layout_mode,
        context_panel_collapsed: remote.context_panel_collapsed,
        snap_enabled: remote.snap_enabled,
        grid_snap_enabled: remote.grid_snap_enabled,
        last_modified: local.last_modified.max(remote.last_modified),
    }
}

/// Equal apart from the timestamp.
pub fn same_content(a: &PersistedWorkspace, b: &PersistedWorkspace) -> bool {
    a.cards == b.cards
        && a.layout_mode == b.layout_mode
        && a.context_panel_collapsed == b.context_panel_collapsed
        && a.snap_enabled == b.snap_enabled
        && a.grid_snap_enabled == b.grid_snap_enabled
}
