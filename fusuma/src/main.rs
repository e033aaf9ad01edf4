use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use fusuma::clock::SystemClock;
use fusuma::core::Config;
use fusuma::daemon;
use fusuma::dispatch::process_command;
use fusuma::ipc::{default_socket_path, IpcClient};
use fusuma::storage::{FileCache, FileRemote};
use fusuma::store::WorkspaceStore;
use fusuma::sync::SyncEngine;
use fusuma_schema::{
    ActiveMode, CardKind, CardMeta, Command, LayoutMode, Point, Response, Size, SnapZone,
};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fusuma - card workspace manager
#[derive(FromArgs)]
struct Cli {
    /// local cache directory (default: <user cache dir>/fusuma)
    #[argh(option)]
    cache_dir: Option<PathBuf>,
    /// directory backing the remote copy (default: <user data dir>/fusuma)
    #[argh(option)]
    data_dir: Option<PathBuf>,
    /// daemon socket (default: <runtime dir>/fusuma.sock)
    #[argh(option)]
    socket: Option<PathBuf>,
    /// print responses as JSON
    #[argh(switch)]
    json: bool,
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Add(AddCmd),
    Remove(RemoveCmd),
    Focus(FocusCmd),
    Minimize(MinimizeCmd),
    Restore(RestoreCmd),
    Maximize(MaximizeCmd),
    Unmaximize(UnmaximizeCmd),
    ToggleMaximize(ToggleMaximizeCmd),
    Title(TitleCmd),
    Meta(MetaCmd),
    Move(MoveCmd),
    Resize(ResizeCmd),
    Snap(SnapCmd),
    SnapAt(SnapAtCmd),
    Unsnap(UnsnapCmd),
    Layout(LayoutCmd),
    Cascade(CascadeCmd),
    Tile(TileCmd),
    Bounds(BoundsCmd),
    Mode(ModeCmd),
    Set(SetCmd),
    Mobile(MobileCmd),
    List(ListCmd),
    State(StateCmd),
}

/// Run the daemon that owns the workspace
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Open a card, or focus the existing one for the same data
#[derive(FromArgs)]
#[argh(subcommand, name = "add")]
struct AddCmd {
    /// card type (chat, terminal, file-browser, ...)
    #[argh(positional)]
    kind: CardKind,
    /// card title
    #[argh(option)]
    title: Option<String>,
    /// backing data id (conversation, project, ...)
    #[argh(option)]
    data_id: Option<String>,
    /// x position
    #[argh(option)]
    x: Option<i32>,
    /// y position
    #[argh(option)]
    y: Option<i32>,
    /// width
    #[argh(option)]
    width: Option<u32>,
    /// height
    #[argh(option)]
    height: Option<u32>,
}

/// Close a card
#[derive(FromArgs)]
#[argh(subcommand, name = "remove")]
struct RemoveCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Focus a card
#[derive(FromArgs)]
#[argh(subcommand, name = "focus")]
struct FocusCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Minimize a card to the dock
#[derive(FromArgs)]
#[argh(subcommand, name = "minimize")]
struct MinimizeCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Restore a minimized card
#[derive(FromArgs)]
#[argh(subcommand, name = "restore")]
struct RestoreCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Maximize a card over the whole workspace
#[derive(FromArgs)]
#[argh(subcommand, name = "maximize")]
struct MaximizeCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Return a maximized card to its previous geometry
#[derive(FromArgs)]
#[argh(subcommand, name = "unmaximize")]
struct UnmaximizeCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Toggle a card between maximized and normal
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-maximize")]
struct ToggleMaximizeCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Rename a card
#[derive(FromArgs)]
#[argh(subcommand, name = "title")]
struct TitleCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// new title
    #[argh(positional)]
    title: String,
}

/// Replace a card's per-type state with a JSON object
#[derive(FromArgs)]
#[argh(subcommand, name = "meta")]
struct MetaCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// metadata, e.g. '{"type":"terminal","cwd":"/tmp"}'
    #[argh(positional)]
    meta: String,
}

/// Move a card
#[derive(FromArgs)]
#[argh(subcommand, name = "move")]
struct MoveCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// x position
    #[argh(positional)]
    x: i32,
    /// y position
    #[argh(positional)]
    y: i32,
}

/// Resize a card
#[derive(FromArgs)]
#[argh(subcommand, name = "resize")]
struct ResizeCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// width
    #[argh(positional)]
    width: u32,
    /// height
    #[argh(positional)]
    height: u32,
}

/// Dock a card to an edge or corner
#[derive(FromArgs)]
#[argh(subcommand, name = "snap")]
struct SnapCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// zone (left, right, top, bottom, top-left, ...)
    #[argh(positional)]
    zone: SnapZone,
}

/// Dock a card where a drag released at (x, y) would land
#[derive(FromArgs)]
#[argh(subcommand, name = "snap-at")]
struct SnapAtCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
    /// pointer x
    #[argh(positional)]
    x: i32,
    /// pointer y
    #[argh(positional)]
    y: i32,
}

/// Undock a card
#[derive(FromArgs)]
#[argh(subcommand, name = "unsnap")]
struct UnsnapCmd {
    /// card id or unique prefix
    #[argh(positional)]
    id: String,
}

/// Switch the layout mode
#[derive(FromArgs)]
#[argh(subcommand, name = "layout")]
struct LayoutCmd {
    /// free-form, side-by-side, tile, stack or focus
    #[argh(positional)]
    mode: LayoutMode,
}

/// Cascade the visible cards once
#[derive(FromArgs)]
#[argh(subcommand, name = "cascade")]
struct CascadeCmd {}

/// Tile the visible cards once
#[derive(FromArgs)]
#[argh(subcommand, name = "tile")]
struct TileCmd {}

/// Set the workspace size
#[derive(FromArgs)]
#[argh(subcommand, name = "bounds")]
struct BoundsCmd {
    /// width
    #[argh(positional)]
    width: u32,
    /// height
    #[argh(positional)]
    height: u32,
}

/// Switch the application area
#[derive(FromArgs)]
#[argh(subcommand, name = "mode")]
struct ModeCmd {
    /// workspace, chat, agents, studio, files or projects
    #[argh(positional)]
    mode: ActiveMode,
}

/// Toggle a workspace preference
#[derive(FromArgs)]
#[argh(subcommand, name = "set")]
struct SetCmd {
    /// snap, grid-snap or context-panel
    #[argh(positional)]
    name: String,
    /// on or off
    #[argh(positional)]
    value: String,
}

/// Mobile carousel: on, off, next, prev or an index
#[derive(FromArgs)]
#[argh(subcommand, name = "mobile")]
struct MobileCmd {
    /// on, off, next, prev or a card index
    #[argh(positional)]
    action: String,
}

/// List cards
#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
struct ListCmd {}

/// Show workspace state
#[derive(FromArgs)]
#[argh(subcommand, name = "state")]
struct StateCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let socket = cli.socket.clone().unwrap_or_else(default_socket_path);

    match cli.command {
        None => {
            eprintln!("Run 'fusuma --help' for usage");
            Ok(())
        }
        Some(SubCommand::Version(_)) => {
            println!("fusuma {}", VERSION);
            Ok(())
        }
        Some(SubCommand::Start(_)) => {
            tracing::info!("fusuma starting");
            let store = open_store(cli.cache_dir, cli.data_dir)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(daemon::run(store, socket))
        }
        Some(subcmd) => {
            let cmd = to_command(subcmd)?;
            let response = match IpcClient::connect(&socket) {
                Ok(mut client) => client.send(&cmd)?,
                Err(e) => {
                    tracing::debug!("{:#}, running in-process", e);
                    run_local(cli.cache_dir, cli.data_dir, &cmd)?
                }
            };
            print_response(response, cli.json)
        }
    }
}

type FileStore = WorkspaceStore<FileCache, FileRemote, SystemClock>;

fn open_store(cache_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<FileStore> {
    let local = match cache_dir {
        Some(dir) => FileCache::new(dir),
        None => FileCache::in_default_location().context("No local cache directory")?,
    };
    let remote = match data_dir {
        Some(dir) => FileRemote::new(dir),
        None => FileRemote::in_default_location().context("No remote data directory")?,
    };
    let config = Config::new();
    let sync = SyncEngine::new(local, remote, SystemClock, &config);
    Ok(WorkspaceStore::new(sync, &config))
}

/// No daemon running: load, apply one command, write through.
fn run_local(
    cache_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    cmd: &Command,
) -> Result<Response> {
    let mut store = open_store(cache_dir, data_dir)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        store.initialize().await;
        let response = process_command(&mut store, cmd);
        if !cmd.is_query() {
            store.flush_all().await;
        }
        Ok(response)
    })
}

fn print_response(response: Response, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        if let Response::Error { .. } = response {
            std::process::exit(1);
        }
        return Ok(());
    }

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::CardId { id } => println!("{}", id),
        Response::Snapped { zone } => match zone {
            Some(zone) => println!("{}", zone),
            None => std::process::exit(1),
        },
        Response::Cards { cards } => {
            for c in cards {
                println!(
                    "{}: {} - {} [z={}, {}x{} @ ({},{})]{}{}",
                    c.id,
                    c.kind,
                    c.title,
                    c.z_index,
                    c.width,
                    c.height,
                    c.x,
                    c.y,
                    if c.minimized { " (minimized)" } else { "" },
                    if c.is_focused { " *" } else { "" }
                );
            }
        }
        Response::State { state } => {
            println!("Layout mode: {}", state.layout_mode);
            println!("Active mode: {:?}", state.active_mode);
            println!("Focused card: {:?}", state.focused_card_id);
            println!(
                "Cards: {} ({} visible)",
                state.card_count, state.visible_count
            );
            println!("Bounds: {}x{}", state.width, state.height);
        }
    }

    Ok(())
}

fn parse_switch(value: &str) -> Result<bool> {
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => bail!("Expected on or off, got '{}'", value),
    }
}

fn to_command(subcmd: SubCommand) -> Result<Command> {
    let cmd = match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) => {
            unreachable!("handled in main")
        }
        SubCommand::Add(cmd) => {
            let position = match (cmd.x, cmd.y) {
                (Some(x), Some(y)) => Some(Point::new(x, y)),
                (None, None) => None,
                _ => bail!("--x and --y must be given together"),
            };
            let size = match (cmd.width, cmd.height) {
                (Some(w), Some(h)) => Some(Size::new(w, h)),
                (None, None) => None,
                _ => bail!("--width and --height must be given together"),
            };
            Command::AddCard {
                kind: cmd.kind,
                title: cmd.title,
                data_id: cmd.data_id,
                position,
                size,
                meta: None,
            }
        }
        SubCommand::Remove(cmd) => Command::RemoveCard { id: cmd.id.into() },
        SubCommand::Focus(cmd) => Command::FocusCard { id: cmd.id.into() },
        SubCommand::Minimize(cmd) => Command::MinimizeCard { id: cmd.id.into() },
        SubCommand::Restore(cmd) => Command::RestoreCard { id: cmd.id.into() },
        SubCommand::Maximize(cmd) => Command::MaximizeCard { id: cmd.id.into() },
        SubCommand::Unmaximize(cmd) => Command::UnmaximizeCard { id: cmd.id.into() },
        SubCommand::ToggleMaximize(cmd) => Command::ToggleMaximize { id: cmd.id.into() },
        SubCommand::Title(cmd) => Command::SetCardTitle {
            id: cmd.id.into(),
            title: cmd.title,
        },
        SubCommand::Meta(cmd) => {
            let meta: CardMeta =
                serde_json::from_str(&cmd.meta).context("Invalid card metadata")?;
            Command::UpdateCardMeta {
                id: cmd.id.into(),
                meta,
            }
        }
        SubCommand::Move(cmd) => Command::MoveCard {
            id: cmd.id.into(),
            x: cmd.x,
            y: cmd.y,
        },
        SubCommand::Resize(cmd) => Command::ResizeCard {
            id: cmd.id.into(),
            width: cmd.width,
            height: cmd.height,
        },
        SubCommand::Snap(cmd) => Command::SnapCard {
            id: cmd.id.into(),
            zone: cmd.zone,
        },
        SubCommand::SnapAt(cmd) => Command::SnapCardAt {
            id: cmd.id.into(),
            x: cmd.x,
            y: cmd.y,
        },
        SubCommand::Unsnap(cmd) => Command::UnsnapCard { id: cmd.id.into() },
        SubCommand::Layout(cmd) => Command::SetLayoutMode { mode: cmd.mode },
        SubCommand::Cascade(_) => Command::CascadeCards,
        SubCommand::Tile(_) => Command::TileCards,
        SubCommand::Bounds(cmd) => Command::SetBounds {
            width: cmd.width,
            height: cmd.height,
        },
        SubCommand::Mode(cmd) => Command::SetActiveMode { mode: cmd.mode },
        SubCommand::Set(cmd) => {
            let on = parse_switch(&cmd.value)?;
            match cmd.name.as_str() {
                "snap" => Command::SetSnapEnabled { enabled: on },
                "grid-snap" => Command::SetGridSnapEnabled { enabled: on },
                "context-panel" => Command::SetContextPanelCollapsed { collapsed: !on },
                other => bail!("Unknown setting '{}'", other),
            }
        }
        SubCommand::Mobile(cmd) => match cmd.action.as_str() {
            "next" => Command::MobileNext,
            "prev" => Command::MobilePrev,
            "on" | "off" => Command::SetMobile {
                is_mobile: cmd.action == "on",
            },
            index => Command::SetMobileIndex {
                index: index
                    .parse()
                    .with_context(|| format!("Invalid mobile action '{}'", index))?,
            },
        },
        SubCommand::List(_) => Command::ListCards,
        SubCommand::State(_) => Command::GetState,
    };
    Ok(cmd)
}
