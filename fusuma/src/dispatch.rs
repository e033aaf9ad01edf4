use fusuma_schema::{Card, CardId, CardInfo, Command, Point, Response, Size, StateInfo};

use crate::clock::Clock;
use crate::core::{AddCardOptions, Workspace};
use crate::storage::{LocalCache, RemoteStore};
use crate::store::WorkspaceStore;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown card: {0}")]
    UnknownCard(String),
    #[error("ambiguous card prefix '{prefix}': matches {candidates:?}")]
    AmbiguousCard {
        prefix: String,
        candidates: Vec<String>,
    },
    #[error("{kind} card cannot take {meta} meta")]
    MetaMismatch { kind: String, meta: String },
}

/// Resolve a full card id or a unique prefix of one.
pub fn resolve_card_id(ws: &Workspace, query: &CardId) -> Result<CardId, DispatchError> {
    if ws.card(query).is_some() {
        return Ok(query.clone());
    }

    let candidates: Vec<&CardId> = ws
        .cards
        .iter()
        .map(|c| &c.id)
        .filter(|id| !query.as_str().is_empty() && id.as_str().starts_with(query.as_str()))
        .collect();
    match candidates.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(DispatchError::UnknownCard(query.to_string())),
        many => Err(DispatchError::AmbiguousCard {
            prefix: query.to_string(),
            candidates: many.iter().map(|id| id.to_string()).collect(),
        }),
    }
}

pub fn card_to_info(card: &Card, focused: Option<&CardId>) -> CardInfo {
    CardInfo {
        id: card.id.clone(),
        kind: card.kind(),
        title: card.title.clone(),
        x: card.position.x,
        y: card.position.y,
        width: card.size.width,
        height: card.size.height,
        z_index: card.z_index,
        minimized: card.minimized,
        maximized: card.maximized,
        snapped_to: card.snapped_to,
        data_id: card.data_id.clone(),
        is_focused: focused == Some(&card.id),
    }
}

pub fn workspace_to_info(ws: &Workspace) -> StateInfo {
    StateInfo {
        layout_mode: ws.layout_mode,
        active_mode: ws.active_mode,
        focused_card_id: ws.focused_card_id.clone(),
        card_count: ws.cards.len(),
        visible_count: ws.visible_cards().len(),
        width: ws.bounds.width,
        height: ws.bounds.height,
        snap_enabled: ws.snap_enabled,
        grid_snap_enabled: ws.grid_snap_enabled,
        context_panel_collapsed: ws.context_panel_collapsed,
        is_mobile: ws.is_mobile,
        mobile_active_index: ws.mobile_active_index,
    }
}

/// Apply a protocol command to the store and describe the outcome.
pub fn process_command<L, R, C>(store: &mut WorkspaceStore<L, R, C>, cmd: &Command) -> Response
where
    L: LocalCache,
    R: RemoteStore,
    C: Clock,
{
    match try_process_command(store, cmd) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Command failed: {}", e);
            Response::Error {
                message: e.to_string(),
            }
        }
    }
}

fn try_process_command<L, R, C>(
    store: &mut WorkspaceStore<L, R, C>,
    cmd: &Command,
) -> Result<Response, DispatchError>
where
    L: LocalCache,
    R: RemoteStore,
    C: Clock,
{
    let response = match cmd {
        // Queries
        Command::ListCards => {
            let ws = store.snapshot();
            let focused = ws.focused_card_id.as_ref();
            let cards = ws
                .cards_by_z()
                .into_iter()
                .map(|c| card_to_info(c, focused))
                .collect();
            Response::Cards { cards }
        }
        Command::GetState => Response::State {
            state: workspace_to_info(&store.snapshot()),
        },

        // Card lifecycle
        Command::AddCard {
            kind,
            title,
            data_id,
            position,
            size,
            meta,
        } => {
            if let Some(meta) = meta {
                if meta.kind() != *kind {
                    return Err(DispatchError::MetaMismatch {
                        kind: kind.to_string(),
                        meta: meta.kind().to_string(),
                    });
                }
            }
            let options = AddCardOptions {
                title: title.clone(),
                data_id: data_id.clone(),
                position: *position,
                size: *size,
                meta: meta.clone(),
            };
            let id = store.add_card(*kind, options);
            Response::CardId { id }
        }
        Command::RemoveCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.remove_card(&id);
            Response::Ok
        }
        Command::FocusCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.focus_card(&id);
            Response::Ok
        }
        Command::MinimizeCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.minimize_card(&id);
            Response::Ok
        }
        Command::RestoreCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.restore_card(&id);
            Response::Ok
        }
        Command::MaximizeCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.maximize_card(&id);
            Response::Ok
        }
        Command::UnmaximizeCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.unmaximize_card(&id);
            Response::Ok
        }
        Command::ToggleMaximize { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.toggle_maximize(&id);
            Response::Ok
        }
        Command::SetCardTitle { id, title } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.set_card_title(&id, title);
            Response::Ok
        }

        Command::UpdateCardMeta { id, meta } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            let kind = store.snapshot().card(&id).map(|c| c.kind());
            if let Some(kind) = kind.filter(|k| *k != meta.kind()) {
                return Err(DispatchError::MetaMismatch {
                    kind: kind.to_string(),
                    meta: meta.kind().to_string(),
                });
            }
            store.update_card_meta(&id, meta.clone());
            Response::Ok
        }

        // Placement
        Command::MoveCard { id, x, y } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.move_card(&id, *x, *y);
            Response::Ok
        }
        Command::ResizeCard { id, width, height } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.resize_card(&id, *width, *height);
            Response::Ok
        }
        Command::SnapCard { id, zone } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.snap_card(&id, *zone);
            Response::Ok
        }
        Command::SnapCardAt { id, x, y } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            let zone = store.snap_card_at(&id, Point::new(*x, *y));
            Response::Snapped { zone }
        }
        Command::UnsnapCard { id } => {
            let id = resolve_card_id(&store.snapshot(), id)?;
            store.unsnap_card(&id);
            Response::Ok
        }

        // Layout
        Command::SetLayoutMode { mode } => {
            store.set_layout_mode(*mode);
            Response::Ok
        }
        Command::CascadeCards => {
            store.cascade_cards();
            Response::Ok
        }
        Command::TileCards => {
            store.tile_cards();
            Response::Ok
        }

        // Settings
        Command::SetBounds { width, height } => {
            store.set_bounds(Size::new(*width, *height));
            Response::Ok
        }
        Command::SetActiveMode { mode } => {
            store.set_active_mode(*mode);
            Response::Ok
        }
        Command::SetSnapEnabled { enabled } => {
            store.set_snap_enabled(*enabled);
            Response::Ok
        }
        Command::SetGridSnapEnabled { enabled } => {
            store.set_grid_snap_enabled(*enabled);
            Response::Ok
        }
        Command::SetContextPanelCollapsed { collapsed } => {
            store.set_context_panel_collapsed(*collapsed);
            Response::Ok
        }

        // Mobile carousel
        Command::SetMobile { is_mobile } => {
            store.set_is_mobile(*is_mobile);
            Response::Ok
        }
        Command::SetMobileIndex { index } => {
            store.set_mobile_active_index(*index);
            Response::Ok
        }
        Command::MobileNext => {
            store.mobile_next();
            Response::Ok
        }
        Command::MobilePrev => {
            store.mobile_prev();
            Response::Ok
        }
    };

    Ok(response)
}
