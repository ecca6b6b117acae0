use thiserror::Error;

/// A rejected game action
///
/// Every operation that returns one of these leaves the character and the
/// encounter exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{0} is dead")]
    CharacterDead(String),
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    #[error("Combat is not active")]
    CombatNotActive,
    #[error("{ability} is on cooldown for {remaining} more rounds")]
    AbilityOnCooldown { ability: String, remaining: u32 },
    #[error("Inventory is full ({capacity} items)")]
    InventoryFull { capacity: usize },
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Item '{item_id}' is a {actual}, expected {expected}")]
    InvalidItemType {
        item_id: String,
        expected: String,
        actual: String,
    },
    #[error("Insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds { required: u64, available: u64 },
    #[error("Quest not found: {0}")]
    QuestNotFound(String),
    #[error("Quest already accepted: {0}")]
    QuestAlreadyAccepted(String),
    #[error("Quest already completed: {0}")]
    QuestAlreadyCompleted(String),
    #[error("Quest not active: {0}")]
    QuestNotActive(String),
    #[error("Level {required} required, character is level {actual}")]
    InsufficientLevel { required: u32, actual: u32 },
    #[error("Quest '{quest_id}' requires '{missing}' to be completed first")]
    QuestRequirementsNotMet { quest_id: String, missing: String },
    #[error("Invalid character class: {0}")]
    InvalidCharacterClass(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl GameError {
    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        GameError::InvalidData(message.into())
    }
}
