use tracing::{debug, info, warn};

use super::grouping::{group, BoardLayout, GroupBy};
use super::BoardError;
use crate::client::ApiResult;
use crate::model::{ContentDraft, ContentPiece, NewContentPiece};

pub const LOAD_FAILED: &str = "Failed to load content pieces";
pub const CREATE_FAILED: &str = "Failed to create content piece";
pub const UPDATE_FAILED: &str = "Failed to update content piece";
pub const DELETE_FAILED: &str = "Failed to delete content piece";
pub const MOVE_FAILED: &str = "Failed to move content piece";

/// Cancellation token handed out when a request starts.
///
/// A response is applied only while its ticket's epoch is still the board's
/// epoch; `unmount` bumps the epoch and so invalidates every ticket issued
/// before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// What happened to a response once it came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    /// The ticket was invalidated while the request was in flight.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub mode: FormMode,
    pub draft: ContentDraft,
}

/// A card dragged onto another column, shown there until the server answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub id: i64,
    pub to_column: String,
    pub status: String,
    seq: u64,
}

/// Request prepared from the open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewContentPiece),
    Update(i64, ContentDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub key: String,
    pub title: String,
    pub droppable: bool,
    pub pieces: Vec<ContentPiece>,
}

/// Owned snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub columns: Vec<ColumnView>,
    pub form: Option<Form>,
}

impl BoardView {
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.pieces.len()).sum()
    }

    pub fn column(&self, key: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.key == key)
    }
}

#[derive(Debug, Clone)]
pub struct BoardState {
    layout: BoardLayout,
    pieces: Vec<ContentPiece>,
    loading: bool,
    /// Set by a failed load; only a successful load clears it.
    load_error: Option<String>,
    error: Option<String>,
    form: Option<Form>,
    /// Sequence of the request sent from the open form, if any.
    form_submit: Option<u64>,
    pending_move: Option<PendingMove>,
    epoch: u64,
    next_seq: u64,
    latest_load: u64,
}

impl BoardState {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            pieces: Vec::new(),
            loading: true,
            load_error: None,
            error: None,
            form: None,
            form_submit: None,
            pending_move: None,
            epoch: 0,
            next_seq: 0,
            latest_load: 0,
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn pieces(&self) -> &[ContentPiece] {
        &self.pieces
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Banner message: the latest action failure, else a failed load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().or(self.load_error.as_deref())
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn pending_move(&self) -> Option<&PendingMove> {
        self.pending_move.as_ref()
    }

    fn ticket(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
        }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        ticket.epoch != self.epoch
    }

    /// Invalidate every outstanding ticket. Late responses are dropped.
    pub fn unmount(&mut self) {
        self.epoch += 1;
        self.pending_move = None;
    }

    fn find(&self, id: i64) -> Result<&ContentPiece, BoardError> {
        self.pieces
            .iter()
            .find(|p| p.id == id)
            .ok_or(BoardError::UnknownPiece(id))
    }

    fn replace(&mut self, piece: ContentPiece) {
        if let Some(slot) = self.pieces.iter_mut().find(|p| p.id == piece.id) {
            *slot = piece;
        }
    }

    fn fail(&mut self, message: &str, err: crate::client::ApiError) -> BoardError {
        warn!(?err, "{}", message);
        self.error = Some(message.to_string());
        BoardError::Api(err)
    }

    fn open_form(&mut self, form: Form) {
        self.form = Some(form);
        self.form_submit = None;
    }

    /// Close the form if `ticket` is the request it submitted.
    fn close_submitted_form(&mut self, ticket: Ticket) {
        if self.form_submit == Some(ticket.seq) {
            self.form = None;
            self.form_submit = None;
        }
    }

    pub fn begin_load(&mut self) -> Ticket {
        let ticket = self.ticket();
        self.latest_load = ticket.seq;
        self.loading = true;
        ticket
    }

    pub fn apply_load(
        &mut self,
        ticket: Ticket,
        result: ApiResult<Vec<ContentPiece>>,
    ) -> Result<Applied, BoardError> {
        if self.is_stale(ticket) || ticket.seq != self.latest_load {
            debug!("dropping superseded load response");
            return Ok(Applied::Stale);
        }
        self.loading = false;
        match result {
            Ok(pieces) => {
                info!(count = pieces.len(), "loaded content pieces");
                self.pieces = pieces;
                self.load_error = None;
                self.error = None;
                Ok(Applied::Committed)
            }
            Err(err) => {
                warn!(?err, "{}", LOAD_FAILED);
                self.pieces.clear();
                self.load_error = Some(LOAD_FAILED.to_string());
                self.error = None;
                Err(BoardError::Api(err))
            }
        }
    }

    /// Open the create form pre-filled for the given column.
    pub fn open_create(&mut self, column_key: &str) -> Result<(), BoardError> {
        let column = self
            .layout
            .column(column_key)
            .ok_or_else(|| BoardError::UnknownColumn(column_key.to_string()))?;
        let mut draft = ContentDraft::default();
        match self.layout.group_by {
            GroupBy::Format => {
                draft.format = Some(column.key.clone());
                draft.status = Some("Ideation".to_string());
            }
            GroupBy::Status => draft.status = Some(column.key.clone()),
        }
        self.open_form(Form {
            mode: FormMode::Create,
            draft,
        });
        Ok(())
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), BoardError> {
        let draft = ContentDraft::from_piece(self.find(id)?);
        self.open_form(Form {
            mode: FormMode::Edit(id),
            draft,
        });
        Ok(())
    }

    pub fn edit_form(&mut self, edit: impl FnOnce(&mut ContentDraft)) -> Result<(), BoardError> {
        let form = self.form.as_mut().ok_or(BoardError::NoOpenForm)?;
        edit(&mut form.draft);
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.form_submit = None;
    }

    pub fn begin_submit(&mut self) -> Result<(Ticket, Submission), BoardError> {
        let form = self.form.as_ref().ok_or(BoardError::NoOpenForm)?;
        let submission = match form.mode {
            FormMode::Create => {
                if form.draft.title_is_blank() {
                    return Err(BoardError::Invalid("title must be non-empty"));
                }
                Submission::Create(form.draft.clone().into_new())
            }
            FormMode::Edit(id) => Submission::Update(id, form.draft.clone()),
        };
        let ticket = self.ticket();
        self.form_submit = Some(ticket.seq);
        Ok((ticket, submission))
    }

    pub fn begin_create(&mut self, draft: &ContentDraft) -> Result<(Ticket, NewContentPiece), BoardError> {
        if draft.title_is_blank() {
            return Err(BoardError::Invalid("title must be non-empty"));
        }
        Ok((self.ticket(), draft.clone().into_new()))
    }

    pub fn apply_create(
        &mut self,
        ticket: Ticket,
        result: ApiResult<ContentPiece>,
    ) -> Result<Applied, BoardError> {
        if self.is_stale(ticket) {
            return Ok(Applied::Stale);
        }
        match result {
            Ok(piece) => {
                info!(id = piece.id, "created content piece");
                self.pieces.push(piece);
                self.close_submitted_form(ticket);
                self.error = None;
                Ok(Applied::Committed)
            }
            Err(err) => Err(self.fail(CREATE_FAILED, err)),
        }
    }

    pub fn begin_update(&mut self, id: i64) -> Result<Ticket, BoardError> {
        self.find(id)?;
        Ok(self.ticket())
    }

    pub fn apply_update(
        &mut self,
        ticket: Ticket,
        id: i64,
        result: ApiResult<ContentPiece>,
    ) -> Result<Applied, BoardError> {
        if self.is_stale(ticket) {
            return Ok(Applied::Stale);
        }
        match result {
            Ok(piece) => {
                info!(id, "updated content piece");
                self.replace(piece);
                self.close_submitted_form(ticket);
                self.error = None;
                Ok(Applied::Committed)
            }
            Err(err) => Err(self.fail(UPDATE_FAILED, err)),
        }
    }

    pub fn begin_delete(&mut self, id: i64) -> Result<Ticket, BoardError> {
        self.find(id)?;
        Ok(self.ticket())
    }

    pub fn apply_delete(
        &mut self,
        ticket: Ticket,
        id: i64,
        result: ApiResult<()>,
    ) -> Result<Applied, BoardError> {
        if self.is_stale(ticket) {
            return Ok(Applied::Stale);
        }
        match result {
            Ok(()) => {
                info!(id, "deleted content piece");
                self.pieces.retain(|p| p.id != id);
                self.error = None;
                Ok(Applied::Committed)
            }
            Err(err) => Err(self.fail(DELETE_FAILED, err)),
        }
    }

    /// Record a drag onto `column_key` and return the status to send.
    pub fn begin_move(&mut self, id: i64, column_key: &str) -> Result<(Ticket, String), BoardError> {
        self.find(id)?;
        let column = self
            .layout
            .column(column_key)
            .ok_or_else(|| BoardError::UnknownColumn(column_key.to_string()))?;
        // A status patch can only move a card on a board grouped by status.
        let status = match (self.layout.group_by, &column.drop_status) {
            (GroupBy::Status, Some(status)) => status.clone(),
            _ => return Err(BoardError::NotDroppable(column_key.to_string())),
        };
        let ticket = self.ticket();
        self.pending_move = Some(PendingMove {
            id,
            to_column: column_key.to_string(),
            status: status.clone(),
            seq: ticket.seq,
        });
        Ok((ticket, status))
    }

    pub fn apply_move(
        &mut self,
        ticket: Ticket,
        id: i64,
        result: ApiResult<ContentPiece>,
    ) -> Result<Applied, BoardError> {
        if self.is_stale(ticket) {
            return Ok(Applied::Stale);
        }
        if matches!(&self.pending_move, Some(m) if m.seq == ticket.seq) {
            self.pending_move = None;
        }
        match result {
            Ok(piece) => {
                info!(id, status = %piece.status, "moved content piece");
                self.replace(piece);
                self.error = None;
                Ok(Applied::Committed)
            }
            Err(err) => Err(self.fail(MOVE_FAILED, err)),
        }
    }

    /// Snapshot with any pending drag shown in its destination column.
    pub fn view(&self) -> BoardView {
        let mut pieces = self.pieces.clone();
        if let Some(pending) = &self.pending_move {
            if let Some(p) = pieces.iter_mut().find(|p| p.id == pending.id) {
                p.status = pending.status.clone();
            }
        }
        let columns = group(&pieces, &self.layout)
            .into_iter()
            .map(|column| ColumnView {
                key: column.def.key.clone(),
                title: column.def.title.clone(),
                droppable: self.layout.group_by == GroupBy::Status
                    && column.def.drop_status.is_some(),
                pieces: column.pieces.into_iter().cloned().collect(),
            })
            .collect();
        BoardView {
            title: self.layout.title.clone(),
            loading: self.loading,
            error: self.error().map(str::to_string),
            columns,
            form: self.form.clone(),
        }
    }
}
