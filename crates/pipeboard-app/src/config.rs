//! Application configuration.

use pipeboard_core::{Board, Column, Item, SensorConfig};

use crate::error::AppResult;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Board shown at startup.
    pub board: Board,
    pub sensors: SensorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pipeboard".to_string(),
            width: 1280,
            height: 800,
            board: demo_board(),
            sensors: SensorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build from command-line arguments (program name excluded).
    ///
    /// An optional first argument names a board JSON file; without it the
    /// demo pipeline is used.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(path) = args.next() {
            log::info!("Loading board from {path}");
            config.board = Board::from_json_file(&path)?;
            config.title = format!("Pipeboard - {path}");
        }
        Ok(config)
    }
}

/// A small hiring pipeline to start from.
pub fn demo_board() -> Board {
    let columns = vec![
        Column::new("applied", "Applied")
            .with_item(Item::new("c1", "Alice Martin", "Backend Engineer"))
            .with_item(Item::new("c2", "Bruno Silva", "Product Designer"))
            .with_item(Item::new("c3", "Chen Wei", "Data Analyst")),
        Column::new("screening", "Screening")
            .with_item(Item::new("c4", "Dana Okafor", "Frontend Engineer")),
        Column::new("interview", "Interview")
            .with_item(Item::new("c5", "Emil Novak", "Engineering Manager")),
        Column::new("offer", "Offer"),
    ];
    // Demo ids are unique by construction.
    Board::new(columns).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_uses_demo_board() {
        let config = AppConfig::from_args(std::iter::empty()).unwrap();
        assert_eq!(config.board.columns().len(), 4);
        assert_eq!(config.board.len(), 5);
        assert_eq!(config.board.column("offer").unwrap().items.len(), 0);
        assert_eq!(config.sensors, SensorConfig::default());
    }

    #[test]
    fn test_board_from_file_argument() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "todo", "title": "To do", "candidates": [{{"id": "1", "name": "Ada"}}]}}]"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = AppConfig::from_args(vec![path].into_iter()).unwrap();
        assert_eq!(config.board.column_ids().collect::<Vec<_>>(), vec!["todo"]);
        assert!(config.title.starts_with("Pipeboard - "));
    }

    #[test]
    fn test_missing_board_file_fails() {
        let result = AppConfig::from_args(vec!["/nonexistent/board.json".to_string()].into_iter());
        assert!(result.is_err());
    }
}
