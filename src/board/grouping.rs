//! Pure partitioning of content pieces into kanban columns.
use serde::{Deserialize, Serialize};

use crate::model::ContentPiece;

/// Field a board groups its pieces by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Format,
    Status,
}

impl GroupBy {
    pub fn value_of<'a>(&self, piece: &'a ContentPiece) -> &'a str {
        match self {
            GroupBy::Format => &piece.format,
            GroupBy::Status => &piece.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDef {
    /// Exact value of the grouped field that lands a piece in this column.
    pub key: String,
    pub title: String,
    /// Status a piece receives when dropped here. `None` disables dropping.
    /// Honoured only on boards grouped by status.
    pub drop_status: Option<String>,
}

impl ColumnDef {
    pub fn new(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            drop_status: None,
        }
    }

    pub fn droppable(key: &str, title: &str) -> Self {
        Self {
            drop_status: Some(key.to_string()),
            ..Self::new(key, title)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardLayout {
    pub title: String,
    pub group_by: GroupBy,
    pub columns: Vec<ColumnDef>,
}

impl BoardLayout {
    /// Ideation board: one column per short-form format.
    pub fn ideation() -> Self {
        Self {
            title: "Ideation".to_string(),
            group_by: GroupBy::Format,
            columns: vec![
                ColumnDef::new("Reel", "Reel"),
                ColumnDef::new("Story", "Story"),
                ColumnDef::new("Carousel", "Carousel"),
            ],
        }
    }

    /// Workflow board: one column per production stage, drag to advance.
    pub fn workflow() -> Self {
        Self {
            title: "Workflow".to_string(),
            group_by: GroupBy::Status,
            columns: ["Ideation", "Scripting", "Filming", "Editing", "Posted"]
                .into_iter()
                .map(|stage| ColumnDef::droppable(stage, stage))
                .collect(),
        }
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Column key the piece currently belongs to, if any.
    pub fn column_of(&self, piece: &ContentPiece) -> Option<&str> {
        let value = self.group_by.value_of(piece);
        self.column(value).map(|c| c.key.as_str())
    }
}

/// One rendered column: its definition and the pieces it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub def: &'a ColumnDef,
    pub pieces: Vec<&'a ContentPiece>,
}

impl Column<'_> {
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Partition `pieces` into the layout's columns, in layout order.
///
/// Matching is exact on the grouped field. Pieces that match no column are
/// left out; their relative order inside a column follows `pieces`.
pub fn group<'a>(pieces: &'a [ContentPiece], layout: &'a BoardLayout) -> Vec<Column<'a>> {
    layout
        .columns
        .iter()
        .map(|def| Column {
            def,
            pieces: pieces
                .iter()
                .filter(|p| layout.group_by.value_of(p) == def.key)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: i64, format: &str, status: &str) -> ContentPiece {
        ContentPiece {
            id,
            title: format!("piece {id}"),
            content_pillar: String::new(),
            format: format.into(),
            status: status.into(),
            performance: String::new(),
            notes: None,
            upload_date: None,
            link: None,
            script: None,
            shotlist: None,
            hook: None,
            caption: None,
        }
    }

    fn ids(column: &Column<'_>) -> Vec<i64> {
        column.pieces.iter().map(|p| p.id).collect()
    }

    #[test]
    fn groups_by_format_in_layout_order() {
        let pieces = vec![
            piece(1, "Carousel", "Ideation"),
            piece(2, "Reel", "Ideation"),
            piece(3, "Story", "Scripting"),
            piece(4, "Reel", "Posted"),
        ];
        let layout = BoardLayout::ideation();
        let columns = group(&pieces, &layout);

        let titles: Vec<_> = columns.iter().map(|c| c.def.title.as_str()).collect();
        assert_eq!(titles, ["Reel", "Story", "Carousel"]);
        assert_eq!(ids(&columns[0]), [2, 4]);
        assert_eq!(ids(&columns[1]), [3]);
        assert_eq!(ids(&columns[2]), [1]);
    }

    #[test]
    fn unknown_values_are_omitted() {
        let pieces = vec![piece(1, "Talking Head", "Ideation"), piece(2, "reel", "x")];
        let layout = BoardLayout::ideation();
        let columns = group(&pieces, &layout);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(Column::is_empty));
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn grouping_is_repeatable() {
        let pieces = vec![
            piece(1, "Reel", "Scripting"),
            piece(2, "Story", "Ideation"),
            piece(3, "Reel", "Ideation"),
        ];
        let workflow = BoardLayout::workflow();
        let ideation = BoardLayout::ideation();

        let first = group(&pieces, &workflow);
        let _ = group(&pieces, &ideation);
        let second = group(&pieces, &workflow);
        assert_eq!(first, second);
        assert_eq!(ids(&first[0]), [2, 3]);
        assert_eq!(ids(&first[1]), [1]);
    }

    #[test]
    fn every_piece_lands_in_at_most_one_column() {
        let pieces = vec![piece(1, "Reel", "Editing"), piece(2, "Story", "Filming")];
        let layout = BoardLayout::workflow();
        let total: usize = group(&pieces, &layout).iter().map(Column::len).sum();
        assert_eq!(total, 2);
        assert_eq!(layout.column_of(&pieces[0]), Some("Editing"));
    }

    #[test]
    fn only_workflow_columns_accept_drops() {
        assert!(BoardLayout::ideation()
            .columns
            .iter()
            .all(|c| c.drop_status.is_none()));
        let workflow = BoardLayout::workflow();
        assert_eq!(
            workflow.column("Scripting").unwrap().drop_status.as_deref(),
            Some("Scripting")
        );
    }
}
