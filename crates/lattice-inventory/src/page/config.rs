//! Declarative screen configuration.

use lattice_inventory_core::SlotPos;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The host-native inventory window a screen is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryKind {
    /// Nine columns, one to six rows.
    #[default]
    Chest,
    Dispenser,
    Dropper,
    Hopper,
    Furnace,
    Workbench,
    Brewing,
    Enchanting,
    Anvil,
}

impl InventoryKind {
    /// The fixed `(rows, columns)` shape of this kind, or `None` for chests.
    pub fn fixed_shape(self) -> Option<(usize, usize)> {
        match self {
            Self::Chest => None,
            Self::Dispenser | Self::Dropper => Some((3, 3)),
            Self::Hopper | Self::Brewing => Some((1, 5)),
            Self::Furnace | Self::Anvil => Some((1, 3)),
            Self::Workbench => Some((1, 10)),
            Self::Enchanting => Some((1, 2)),
        }
    }

    /// Whether a grid of `rows` x `columns` fits this kind.
    pub fn accepts(self, rows: usize, columns: usize) -> bool {
        match self.fixed_shape() {
            Some(shape) => shape == (rows, columns),
            None => columns == 9 && (1..=6).contains(&rows),
        }
    }
}

/// Configuration of one openable screen.
///
/// Fields are public; [`PageConfig::validate`] runs when a
/// [`Page`](super::Page) is built from it.
///
/// ```
/// use lattice_inventory::page::{InventoryKind, PageConfig};
///
/// let config = PageConfig::from_toml_str(r#"
///     id = "shop"
///     title = "Shop"
///     rows = 6
///     tick = 20
///     editable = [{ row = 5, column = 4 }]
/// "#)?;
///
/// assert_eq!(config.kind, InventoryKind::Chest);
/// assert_eq!(config.size(), 54);
/// assert!(config.close_on_disconnect);
/// # Ok::<(), lattice_inventory::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Identifier used to find the viewers of this screen.
    pub id: String,
    /// Window title.
    pub title: String,
    pub rows: usize,
    pub columns: usize,
    pub kind: InventoryKind,
    /// Host ticks between provider ticks; 0 disables ticking.
    pub tick: u64,
    /// Run provider ticks on the background worker.
    pub tick_async: bool,
    /// Run close handlers when the viewer disconnects.
    pub close_on_disconnect: bool,
    /// Slots whose clicks are not cancelled by default.
    pub editable: Vec<SlotPos>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            rows: 3,
            columns: 9,
            kind: InventoryKind::Chest,
            tick: 1,
            tick_async: false,
            close_on_disconnect: true,
            editable: Vec::new(),
        }
    }
}

impl PageConfig {
    /// A chest screen with `rows` rows of nine slots.
    pub fn chest(id: impl Into<String>, title: impl Into<String>, rows: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            rows,
            ..Self::default()
        }
    }

    /// A screen shown in a fixed-shape host window.
    ///
    /// Chests fall back to three rows; use [`PageConfig::chest`] to choose.
    pub fn of_kind(id: impl Into<String>, title: impl Into<String>, kind: InventoryKind) -> Self {
        let (rows, columns) = kind.fixed_shape().unwrap_or((3, 9));
        Self {
            id: id.into(),
            title: title.into(),
            rows,
            columns,
            kind,
            ..Self::default()
        }
    }

    /// Set the tick interval.
    pub fn with_tick(mut self, tick: u64, tick_async: bool) -> Self {
        self.tick = tick;
        self.tick_async = tick_async;
        self
    }

    /// Mark a slot as editable.
    pub fn with_editable(mut self, pos: SlotPos) -> Self {
        self.editable.push(pos);
        self
    }

    /// Number of slots in the grid.
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::invalid_config("page id is empty"));
        }
        if !self.kind.accepts(self.rows, self.columns) {
            return Err(Error::invalid_config(format!(
                "a {:?} window cannot show {}x{} slots",
                self.kind, self.rows, self.columns
            )));
        }
        if let Some(pos) = self
            .editable
            .iter()
            .find(|pos| pos.row() >= self.rows || pos.column() >= self.columns)
        {
            return Err(Error::invalid_config(format!("editable slot {pos} is outside the grid")));
        }
        Ok(())
    }

    /// Parse and validate a screen declaration.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
