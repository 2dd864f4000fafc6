//! The renderable payload shown in a slot.

use serde::{Deserialize, Serialize};

/// A stack of items as rendered into a host inventory slot.
///
/// Two stacks are equal when every field matches, including `amount`.
/// [`ItemStack::is_similar`] ignores the amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Host material identifier, e.g. `"minecraft:stone"`.
    pub material: String,
    /// Stack size.
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// Custom display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Lore lines shown below the name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
}

fn default_amount() -> u32 {
    1
}

impl ItemStack {
    /// Material identifier of the empty stack.
    pub const AIR: &'static str = "minecraft:air";

    /// The empty stack, rendered as a blank slot.
    pub fn air() -> Self {
        Self::new(Self::AIR)
    }

    /// Whether this stack renders as a blank slot.
    pub fn is_air(&self) -> bool {
        self.material == Self::AIR || self.amount == 0
    }

    /// Create a single item of the given material.
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            amount: 1,
            display_name: None,
            lore: Vec::new(),
        }
    }

    /// Set the stack size.
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Append a lore line.
    pub fn with_lore(mut self, line: impl Into<String>) -> Self {
        self.lore.push(line.into());
        self
    }

    /// Check whether `other` is the same kind of item, ignoring stack size.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.display_name == other.display_name
            && self.lore == other.lore
    }
}
