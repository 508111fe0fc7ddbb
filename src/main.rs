use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use content_planner::board::{BoardController, BoardLayout};
use content_planner::client::{ContentApi, ContentClient};
use content_planner::config;
use content_planner::model::ContentDraft;
use content_planner::render;
use content_planner::router::Route;

#[derive(Debug, Parser)]
#[command(author, version, about = "Plan short-form video content against the content API")]
struct Args {
    /// Path to YAML config file (defaults to ./config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the content API; overrides CONTENT_API_BASE_URL and the config file
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open a view by path: /ideation, /workflow, /tracking or /content/{id}
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show a single content piece
    Show { id: i64 },
    /// Create a content piece
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update fields of a content piece; unset flags keep their current value
    Update {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Move a content piece to another workflow stage
    SetStatus { id: i64, status: String },
    /// Delete a content piece
    Delete { id: i64 },
}

#[derive(Debug, Default, ClapArgs)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    pillar: Option<String>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    performance: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    upload_date: Option<String>,
    #[arg(long)]
    link: Option<String>,
    #[arg(long)]
    script: Option<String>,
    #[arg(long)]
    shotlist: Option<String>,
    #[arg(long)]
    hook: Option<String>,
    #[arg(long)]
    caption: Option<String>,
}

impl From<FieldArgs> for ContentDraft {
    fn from(args: FieldArgs) -> Self {
        ContentDraft {
            title: args.title,
            content_pillar: args.pillar,
            format: args.format,
            status: args.status,
            performance: args.performance,
            notes: args.notes,
            upload_date: args.upload_date,
            link: args.link,
            script: args.script,
            shotlist: args.shotlist,
            hook: args.hook,
            caption: args.caption,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::resolve(args.config.as_deref(), args.base_url.clone())?;
    let client = ContentClient::from_config(&cfg)?;
    info!(base_url = %client.base_url(), "using content API");
    let api: Arc<dyn ContentApi> = Arc::new(client);

    match args.command {
        Command::Open { path } => open(api, &path).await,
        Command::Show { id } => {
            let piece = api.get_by_id(id).await?;
            print!("{}", render::render_detail(&piece));
            Ok(())
        }
        Command::Create { fields } => {
            let draft = ContentDraft::from(fields);
            let board = mounted_board(api).await?;
            board.create(&draft).await?;
            print!("{}", render::render_board(&board.view().await));
            Ok(())
        }
        Command::Update { id, fields } => {
            let board = mounted_board(api).await?;
            board.open_edit(id).await?;
            let changes = ContentDraft::from(fields);
            board
                .edit_form(move |draft| *draft = std::mem::take(draft).merge(changes))
                .await?;
            board.submit_form().await?;
            let piece = board
                .pieces()
                .await
                .into_iter()
                .find(|p| p.id == id)
                .with_context(|| format!("content piece {id} vanished after update"))?;
            print!("{}", render::render_detail(&piece));
            Ok(())
        }
        Command::SetStatus { id, status } => {
            let piece = api.patch_status(id, &status).await?;
            print!("{}", render::render_detail(&piece));
            Ok(())
        }
        Command::Delete { id } => {
            let board = mounted_board(api).await?;
            board.delete(id).await?;
            println!("Deleted content piece {id}");
            Ok(())
        }
    }
}

async fn mounted_board(api: Arc<dyn ContentApi>) -> Result<BoardController> {
    let board = BoardController::new(api, BoardLayout::ideation());
    board.mount().await.context("failed to load content pieces")?;
    Ok(board)
}

async fn open(api: Arc<dyn ContentApi>, path: &str) -> Result<()> {
    let route = Route::parse(path)?;
    print!("{}", render::render_header(route));
    println!();
    match route {
        Route::Ideation | Route::Workflow => {
            let layout = route
                .layout()
                .context("board route without a layout")?;
            let board = BoardController::new(api, layout);
            // A failed load is shown in the banner rather than aborting.
            let _ = board.mount().await;
            print!("{}", render::render_board(&board.view().await));
        }
        Route::Tracking => {
            let pieces = api.list().await?;
            print!("{}", render::render_tracking(&pieces));
        }
        Route::ContentDetail(id) => {
            let piece = api.get_by_id(id).await?;
            print!("{}", render::render_detail(&piece));
        }
    }
    Ok(())
}
