//! Fixed game rule numbers

/// Maximum number of items a character can carry
pub const INVENTORY_CAPACITY: usize = 20;

/// Experience needed per level: a level `n` character needs `n * XP_PER_LEVEL`
pub const XP_PER_LEVEL: u32 = 100;

/// Max health gained per level
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
/// Strength gained per level
pub const LEVEL_UP_STRENGTH: u32 = 2;
/// Magic gained per level
pub const LEVEL_UP_MAGIC: u32 = 2;

/// Basic attacks always deal at least this much
pub const MINIMUM_DAMAGE: u32 = 1;
/// Defender strength is divided by this before being subtracted from an attack
pub const DEFENDER_STRENGTH_DIVISOR: u32 = 4;

/// Cooldown slot shared by every class ability
pub const SPECIAL_COOLDOWN_KEY: &str = "special";
/// Rounds a special ability stays unavailable after use
pub const SPECIAL_COOLDOWN_ROUNDS: u32 = 3;

/// Warrior Power Strike: strength times this
pub const POWER_STRIKE_MULTIPLIER: u32 = 2;
/// Mage Fireball: magic times this
pub const FIREBALL_MULTIPLIER: u32 = 2;
/// Rogue Critical Strike on a hit: strength times this
pub const CRITICAL_STRIKE_MULTIPLIER: u32 = 3;
/// Chance a Critical Strike lands
pub const CRITICAL_STRIKE_CHANCE: f64 = 0.5;
/// Health restored by the Cleric heal (capped at max health)
pub const CLERIC_HEAL_AMOUNT: u32 = 30;

/// Chance an escape attempt succeeds
pub const ESCAPE_CHANCE: f64 = 0.5;
