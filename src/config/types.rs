use serde::{Deserialize, Serialize};

use crate::paging::Size;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub list: ListConfig,
}

/// Paging loader behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Extra area around the footer that still counts as visible
    /// (default: 0 x 0). Grows the footer frame toward the content.
    #[serde(default)]
    pub footer_inset: Size,
    /// Whether the list has a pull-to-refresh control (default: true).
    #[serde(default = "default_true")]
    pub refresh_control: bool,
    /// Load the next page automatically when the footer scrolls into
    /// view (default: true).
    #[serde(default = "default_true")]
    pub auto_load_more: bool,
    /// Capacity of the paging event broadcast channel (default: 64).
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

/// List wrapper behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Animate incremental updates (default: true). When false every
    /// update is a full reload.
    #[serde(default = "default_true")]
    pub animate: bool,
}

fn default_true() -> bool {
    true
}

fn default_event_capacity() -> usize {
    64
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            footer_inset: Size::default(),
            refresh_control: default_true(),
            auto_load_more: default_true(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            animate: default_true(),
        }
    }
}
