//! Board projection: read-only view of the host-supplied columns.
//!
//! The host builds a [`Board`] every render and hands it to the core. The core
//! only ever reads it; the `with_*` helpers return a fresh board for the host
//! to adopt and leave `self` untouched.

use crate::intent::MoveDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Board errors.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),
    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),
    #[error("Id used by both a column and an item: {0}")]
    AmbiguousId(String),
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Item {item} is not in column {column}")]
    WrongSourceColumn { item: String, column: String },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// A draggable unit on the board (a candidate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    /// Any further display fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// Create an item with a name and role.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Label used in announcements: the name, or the id when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

/// A named, ordered container of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "candidates", default)]
    pub items: Vec<Item>,
}

impl Column {
    /// Create an empty column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    /// Builder-style item insertion.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Check if the column holds an item.
    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.id == item_id)
    }

    /// Title for display, falling back to the id.
    pub fn label(&self) -> &str {
        if self.title.is_empty() { &self.id } else { &self.title }
    }
}

/// What lies under the pointer or keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A column's container.
    Column(String),
    /// An item's slot within its column.
    Item(String),
}

impl DropTarget {
    /// The raw id, whichever kind it is.
    pub fn id(&self) -> &str {
        match self {
            DropTarget::Column(id) | DropTarget::Item(id) => id,
        }
    }
}

/// Validated, ordered set of columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Board {
    columns: Vec<Column>,
}

impl TryFrom<Vec<Column>> for Board {
    type Error = BoardError;

    fn try_from(columns: Vec<Column>) -> BoardResult<Self> {
        Board::new(columns)
    }
}

impl From<Board> for Vec<Column> {
    fn from(board: Board) -> Self {
        board.columns
    }
}

impl Board {
    /// Build a board, rejecting duplicate or ambiguous ids.
    pub fn new(columns: Vec<Column>) -> BoardResult<Self> {
        let mut column_ids = HashSet::new();
        for column in &columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::DuplicateColumn(column.id.clone()));
            }
        }

        let mut item_ids = HashSet::new();
        for item in columns.iter().flat_map(|c| c.items.iter()) {
            if column_ids.contains(item.id.as_str()) {
                return Err(BoardError::AmbiguousId(item.id.clone()));
            }
            if !item_ids.insert(item.id.as_str()) {
                return Err(BoardError::DuplicateItem(item.id.clone()));
            }
        }

        Ok(Self { columns })
    }

    /// Parse the host's JSON column list.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let columns: Vec<Column> = serde_json::from_str(json)?;
        Self::new(columns)
    }

    /// Read and parse a JSON column list from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> BoardResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// All columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by id.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Column ids in display order.
    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    pub fn contains_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    /// Total number of items across all columns.
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an item and the id of the column holding it.
    pub fn locate(&self, item_id: &str) -> Option<(&Item, &str)> {
        self.columns.iter().find_map(|column| {
            column
                .items
                .iter()
                .find(|i| i.id == item_id)
                .map(|item| (item, column.id.as_str()))
        })
    }

    /// Resolve a raw target id to a column or an item.
    ///
    /// Column ids take precedence; construction guarantees the two id spaces
    /// never overlap.
    pub fn classify_target(&self, id: &str) -> Option<DropTarget> {
        if self.contains_column(id) {
            Some(DropTarget::Column(id.to_string()))
        } else if self.locate(id).is_some() {
            Some(DropTarget::Item(id.to_string()))
        } else {
            None
        }
    }

    /// The column a drop onto `target` lands in.
    pub fn destination_column(&self, target: &DropTarget) -> Option<&str> {
        match target {
            DropTarget::Column(id) => self.column(id).map(|c| c.id.as_str()),
            DropTarget::Item(id) => self.locate(id).map(|(_, column)| column),
        }
    }

    /// The column following `column_id` in display order.
    pub fn next_column(&self, column_id: &str) -> Option<&Column> {
        let index = self.columns.iter().position(|c| c.id == column_id)?;
        self.columns.get(index + 1)
    }

    /// A new board with the described move applied.
    ///
    /// The item is appended to the destination column; every other item keeps
    /// its relative order.
    pub fn with_move(&self, descriptor: &MoveDescriptor) -> BoardResult<Board> {
        let item_id = descriptor.draggable_id.as_str();
        let from = descriptor.source.droppable_id.as_str();
        let to = descriptor.destination.droppable_id.as_str();

        let (_, owner) = self
            .locate(item_id)
            .ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;
        if owner != from {
            return Err(BoardError::WrongSourceColumn {
                item: item_id.to_string(),
                column: from.to_string(),
            });
        }
        if !self.contains_column(to) {
            return Err(BoardError::UnknownColumn(to.to_string()));
        }

        let mut columns = self.columns.clone();
        let mut moved = None;
        if let Some(source) = columns.iter_mut().find(|c| c.id == from) {
            if let Some(index) = source.items.iter().position(|i| i.id == item_id) {
                moved = Some(source.items.remove(index));
            }
        }
        let item = moved.ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;
        if let Some(destination) = columns.iter_mut().find(|c| c.id == to) {
            destination.items.push(item);
        }

        Ok(Board { columns })
    }

    /// A new board without the given item.
    pub fn without_item(&self, item_id: &str) -> BoardResult<Board> {
        if self.locate(item_id).is_none() {
            return Err(BoardError::UnknownItem(item_id.to_string()));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                items: c.items.iter().filter(|i| i.id != item_id).cloned().collect(),
                ..c.clone()
            })
            .collect();
        Ok(Board { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::MoveIntent;
    use std::io::Write;

    fn pipeline() -> Board {
        Board::new(vec![
            Column::new("applied", "Applied")
                .with_item(Item::new("1", "Alice", "Engineer"))
                .with_item(Item::new("2", "Bob", "Designer"))
                .with_item(Item::new("3", "Carol", "Analyst")),
            Column::new("interview", "Interview").with_item(Item::new("4", "Dan", "Engineer")),
            Column::new("offer", "Offer"),
        ])
        .unwrap()
    }

    fn ids(board: &Board, column: &str) -> Vec<String> {
        board
            .column(column)
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    fn descriptor(item: &str, from: &str, to: &str) -> MoveDescriptor {
        MoveIntent::new(item, from, to).into()
    }

    #[test]
    fn test_locate() {
        let board = pipeline();
        let (item, column) = board.locate("4").unwrap();
        assert_eq!(item.name, "Dan");
        assert_eq!(column, "interview");
        assert!(board.locate("missing").is_none());
    }

    #[test]
    fn test_column_ids_in_order() {
        let board = pipeline();
        let ids: Vec<_> = board.column_ids().collect();
        assert_eq!(ids, vec!["applied", "interview", "offer"]);
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let result = Board::new(vec![
            Column::new("a", "A").with_item(Item::new("1", "Alice", "")),
            Column::new("b", "B").with_item(Item::new("1", "Alice again", "")),
        ]);
        assert!(matches!(result, Err(BoardError::DuplicateItem(id)) if id == "1"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Board::new(vec![Column::new("a", "A"), Column::new("a", "A2")]);
        assert!(matches!(result, Err(BoardError::DuplicateColumn(_))));
    }

    #[test]
    fn test_ambiguous_id_rejected() {
        let result = Board::new(vec![
            Column::new("a", "A").with_item(Item::new("b", "", "")),
            Column::new("b", "B"),
        ]);
        assert!(matches!(result, Err(BoardError::AmbiguousId(id)) if id == "b"));
    }

    #[test]
    fn test_classify_target() {
        let board = pipeline();
        assert_eq!(
            board.classify_target("offer"),
            Some(DropTarget::Column("offer".to_string()))
        );
        assert_eq!(
            board.classify_target("2"),
            Some(DropTarget::Item("2".to_string()))
        );
        assert_eq!(board.classify_target("nowhere"), None);
    }

    #[test]
    fn test_destination_column() {
        let board = pipeline();
        let over_item = DropTarget::Item("4".to_string());
        let over_column = DropTarget::Column("offer".to_string());
        assert_eq!(board.destination_column(&over_item), Some("interview"));
        assert_eq!(board.destination_column(&over_column), Some("offer"));
        assert_eq!(
            board.destination_column(&DropTarget::Item("gone".to_string())),
            None
        );
    }

    #[test]
    fn test_from_json_host_contract() {
        let json = r#"[
            {"id": "applied", "title": "Applied", "candidates": [
                {"id": "1", "name": "Alice", "role": "Engineer", "score": 91}
            ]},
            {"id": "interview", "title": "Interview", "candidates": []}
        ]"#;
        let board = Board::from_json(json).unwrap();
        let (item, column) = board.locate("1").unwrap();
        assert_eq!(column, "applied");
        assert_eq!(item.extra.get("score"), Some(&serde_json::json!(91)));

        let round = serde_json::to_value(&board).unwrap();
        assert_eq!(round[0]["candidates"][0]["score"], 91);
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"[
            {"id": "a", "title": "A", "candidates": [{"id": "1", "name": "x", "role": ""}]},
            {"id": "b", "title": "B", "candidates": [{"id": "1", "name": "y", "role": ""}]}
        ]"#;
        assert!(matches!(Board::from_json(json), Err(BoardError::DuplicateItem(_))));
        assert!(matches!(Board::from_json("not json"), Err(BoardError::Json(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "only", "title": "Only", "candidates": []}}]"#).unwrap();
        let board = Board::from_json_file(file.path()).unwrap();
        assert!(board.contains_column("only"));
        assert!(board.is_empty());

        let missing = file.path().with_extension("missing");
        assert!(matches!(Board::from_json_file(missing), Err(BoardError::Io(_))));
    }

    #[test]
    fn test_with_move_preserves_order() {
        let board = pipeline();
        let moved = board.with_move(&descriptor("2", "applied", "interview")).unwrap();

        assert_eq!(ids(&moved, "applied"), vec!["1", "3"]);
        assert_eq!(ids(&moved, "interview"), vec!["4", "2"]);
        // Original board is untouched.
        assert_eq!(ids(&board, "applied"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_with_move_sequence_keeps_membership() {
        let mut board = pipeline();
        let moves = [
            ("1", "applied", "offer"),
            ("4", "interview", "applied"),
            ("1", "offer", "interview"),
            ("3", "applied", "offer"),
        ];
        for (item, from, to) in moves {
            board = board.with_move(&descriptor(item, from, to)).unwrap();
            for id in ["1", "2", "3", "4"] {
                let owners = board.columns().iter().filter(|c| c.contains(id)).count();
                assert_eq!(owners, 1, "item {id} should live in exactly one column");
            }
        }
        assert_eq!(board.len(), 4);
        assert_eq!(board.locate("1").unwrap().1, "interview");
    }

    #[test]
    fn test_with_move_errors() {
        let board = pipeline();
        assert!(matches!(
            board.with_move(&descriptor("9", "applied", "offer")),
            Err(BoardError::UnknownItem(_))
        ));
        assert!(matches!(
            board.with_move(&descriptor("1", "offer", "interview")),
            Err(BoardError::WrongSourceColumn { .. })
        ));
        assert!(matches!(
            board.with_move(&descriptor("1", "applied", "hired")),
            Err(BoardError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_without_item_and_next_column() {
        let board = pipeline();
        let trimmed = board.without_item("2").unwrap();
        assert_eq!(ids(&trimmed, "applied"), vec!["1", "3"]);
        assert!(board.without_item("2").is_ok());
        assert!(trimmed.without_item("2").is_err());

        assert_eq!(board.next_column("applied").unwrap().id, "interview");
        assert!(board.next_column("offer").is_none());
        assert!(board.next_column("unknown").is_none());
    }
}
