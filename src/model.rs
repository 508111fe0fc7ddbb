use serde::{Deserialize, Deserializer, Serialize};

/// A content piece as the server returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentPiece {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content_pillar: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub performance: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub shotlist: Option<String>,
    #[serde(default)]
    pub hook: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Body of a create request. The server assigns `id`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewContentPiece {
    pub title: String,
    pub content_pillar: String,
    pub format: String,
    pub status: String,
    pub performance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shotlist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Partial edit of a content piece: every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDraft {
    pub title: Option<String>,
    pub content_pillar: Option<String>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub performance: Option<String>,
    pub notes: Option<String>,
    pub upload_date: Option<String>,
    pub link: Option<String>,
    pub script: Option<String>,
    pub shotlist: Option<String>,
    pub hook: Option<String>,
    pub caption: Option<String>,
}

/// Fully populated PUT body. Every key is serialized, optional ones as `null`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub id: i64,
    pub title: String,
    pub content_pillar: String,
    pub format: String,
    pub status: String,
    pub performance: String,
    pub notes: Option<String>,
    pub upload_date: Option<String>,
    pub link: Option<String>,
    pub script: Option<String>,
    pub shotlist: Option<String>,
    pub hook: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub status: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ContentDraft {
    /// Draft pre-filled with every field of an existing piece, used by the edit form.
    pub fn from_piece(piece: &ContentPiece) -> Self {
        Self {
            title: Some(piece.title.clone()),
            content_pillar: Some(piece.content_pillar.clone()),
            format: Some(piece.format.clone()),
            status: Some(piece.status.clone()),
            performance: Some(piece.performance.clone()),
            notes: piece.notes.clone(),
            upload_date: piece.upload_date.clone(),
            link: piece.link.clone(),
            script: piece.script.clone(),
            shotlist: piece.shotlist.clone(),
            hook: piece.hook.clone(),
            caption: piece.caption.clone(),
        }
    }

    pub fn title_is_blank(&self) -> bool {
        self.title.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    pub fn into_new(self) -> NewContentPiece {
        NewContentPiece {
            title: self.title.unwrap_or_default(),
            content_pillar: self.content_pillar.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            performance: self.performance.unwrap_or_default(),
            notes: self.notes,
            upload_date: self.upload_date,
            link: self.link,
            script: self.script,
            shotlist: self.shotlist,
            hook: self.hook,
            caption: self.caption,
        }
    }

    /// Normalize into a PUT body: missing required fields become `""`, optional ones `null`.
    pub fn into_update(self, id: i64) -> ContentUpdate {
        ContentUpdate {
            id,
            title: self.title.unwrap_or_default(),
            content_pillar: self.content_pillar.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            performance: self.performance.unwrap_or_default(),
            notes: self.notes,
            upload_date: self.upload_date,
            link: self.link,
            script: self.script,
            shotlist: self.shotlist,
            hook: self.hook,
            caption: self.caption,
        }
    }

    /// Overlay `other` on top of `self`, keeping fields `other` leaves unset.
    pub fn merge(mut self, other: ContentDraft) -> Self {
        self.title = other.title.or(self.title);
        self.content_pillar = other.content_pillar.or(self.content_pillar);
        self.format = other.format.or(self.format);
        self.status = other.status.or(self.status);
        self.performance = other.performance.or(self.performance);
        self.notes = other.notes.or(self.notes);
        self.upload_date = other.upload_date.or(self.upload_date);
        self.link = other.link.or(self.link);
        self.script = other.script.or(self.script);
        self.shotlist = other.shotlist.or(self.shotlist);
        self.hook = other.hook.or(self.hook);
        self.caption = other.caption.or(self.caption);
        self
    }
}

impl From<ContentPiece> for ContentDraft {
    fn from(piece: ContentPiece) -> Self {
        ContentDraft::from_piece(&piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nulls_and_missing_fields() {
        let piece: ContentPiece = serde_json::from_value(json!({
            "id": 3,
            "title": "Lifestyle Video 1",
            "contentPillar": null,
            "format": "Talking Head",
            "status": "Ready to Post",
            "uploadDate": "2024-05-01T10:00:00",
            "hook": null
        }))
        .unwrap();
        assert_eq!(piece.id, 3);
        assert_eq!(piece.content_pillar, "");
        assert_eq!(piece.performance, "");
        assert_eq!(piece.upload_date.as_deref(), Some("2024-05-01T10:00:00"));
        assert!(piece.hook.is_none());
        assert!(piece.notes.is_none());
    }

    #[test]
    fn create_body_omits_absent_optionals() {
        let draft = ContentDraft {
            title: Some("New Video".into()),
            format: Some("Reel".into()),
            status: Some("Ideation".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(draft.into_new()).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "New Video",
                "contentPillar": "",
                "format": "Reel",
                "status": "Ideation",
                "performance": ""
            })
        );
    }

    #[test]
    fn update_body_is_fully_populated() {
        let draft = ContentDraft {
            title: Some("Updated".into()),
            notes: Some("n".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(draft.into_update(9)).unwrap();
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 13);
        assert_eq!(body["id"], 9);
        assert_eq!(body["format"], "");
        assert_eq!(body["notes"], "n");
        assert!(body["caption"].is_null());
        assert!(body["uploadDate"].is_null());
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let base = ContentDraft {
            title: Some("a".into()),
            format: Some("Reel".into()),
            ..Default::default()
        };
        let merged = base.merge(ContentDraft {
            title: Some("b".into()),
            ..Default::default()
        });
        assert_eq!(merged.title.as_deref(), Some("b"));
        assert_eq!(merged.format.as_deref(), Some("Reel"));
    }

    #[test]
    fn blank_title_detection() {
        assert!(ContentDraft::default().title_is_blank());
        let draft = ContentDraft {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(draft.title_is_blank());
    }
}
