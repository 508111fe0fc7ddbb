//! Kanban board: cached content pieces grouped into columns, with every
//! mutation committed locally only after the server confirms it.
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::client::{ApiError, ContentApi};
use crate::model::{ContentDraft, ContentPiece};

pub mod grouping;
pub mod state;

pub use grouping::{group, BoardLayout, Column, ColumnDef, GroupBy};
pub use state::{Applied, BoardState, BoardView, ColumnView, Form, FormMode, Submission};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("no content piece with id {0} on this board")]
    UnknownPiece(i64),
    #[error("no column '{0}' on this board")]
    UnknownColumn(String),
    #[error("column '{0}' does not accept drops")]
    NotDroppable(String),
    #[error("no form is open")]
    NoOpenForm,
}

/// Async shell around [`BoardState`]. The state lock is never held across a request.
#[derive(Clone)]
pub struct BoardController {
    api: Arc<dyn ContentApi>,
    state: Arc<Mutex<BoardState>>,
}

impl BoardController {
    pub fn new(api: Arc<dyn ContentApi>, layout: BoardLayout) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(BoardState::new(layout))),
        }
    }

    /// Fetch the list and replace the cached pieces.
    #[instrument(skip_all)]
    pub async fn mount(&self) -> Result<Applied, BoardError> {
        let ticket = self.state.lock().await.begin_load();
        let result = self.api.list().await;
        self.state.lock().await.apply_load(ticket, result)
    }

    pub async fn reload(&self) -> Result<Applied, BoardError> {
        self.mount().await
    }

    /// Invalidate in-flight requests; their responses will be ignored.
    pub async fn unmount(&self) {
        self.state.lock().await.unmount();
    }

    pub async fn view(&self) -> BoardView {
        self.state.lock().await.view()
    }

    pub async fn pieces(&self) -> Vec<ContentPiece> {
        self.state.lock().await.pieces().to_vec()
    }

    pub async fn open_create(&self, column_key: &str) -> Result<(), BoardError> {
        self.state.lock().await.open_create(column_key)
    }

    pub async fn open_edit(&self, id: i64) -> Result<(), BoardError> {
        self.state.lock().await.open_edit(id)
    }

    pub async fn edit_form(&self, edit: impl FnOnce(&mut ContentDraft)) -> Result<(), BoardError> {
        self.state.lock().await.edit_form(edit)
    }

    pub async fn cancel_form(&self) {
        self.state.lock().await.cancel_form();
    }

    /// Send the open form. On failure the form and its draft stay open.
    #[instrument(skip_all)]
    pub async fn submit_form(&self) -> Result<Applied, BoardError> {
        let (ticket, submission) = self.state.lock().await.begin_submit()?;
        match submission {
            Submission::Create(piece) => {
                let result = self.api.create(&piece).await;
                self.state.lock().await.apply_create(ticket, result)
            }
            Submission::Update(id, draft) => {
                let result = self.api.update(id, &draft).await;
                self.state.lock().await.apply_update(ticket, id, result)
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn create(&self, draft: &ContentDraft) -> Result<Applied, BoardError> {
        let (ticket, piece) = self.state.lock().await.begin_create(draft)?;
        let result = self.api.create(&piece).await;
        self.state.lock().await.apply_create(ticket, result)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: i64, draft: &ContentDraft) -> Result<Applied, BoardError> {
        let ticket = self.state.lock().await.begin_update(id)?;
        let result = self.api.update(id, draft).await;
        self.state.lock().await.apply_update(ticket, id, result)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Applied, BoardError> {
        let ticket = self.state.lock().await.begin_delete(id)?;
        let result = self.api.remove(id).await;
        self.state.lock().await.apply_delete(ticket, id, result)
    }

    /// Drag a card onto another column; the card snaps back if the patch fails.
    #[instrument(skip(self))]
    pub async fn move_piece(&self, id: i64, column_key: &str) -> Result<Applied, BoardError> {
        let (ticket, status) = self.state.lock().await.begin_move(id, column_key)?;
        let result = self.api.patch_status(id, &status).await;
        self.state.lock().await.apply_move(ticket, id, result)
    }
}
