//! Inventory & economy - carrying, using, equipping, buying and selling items

use crate::character::{Character, EquipmentSlot, EquippedItem};
use crate::error::GameError;
use crate::progression::{add_gold, heal_character};
use crate::rules::INVENTORY_CAPACITY;
use content_core::{Item, ItemKind, Stat, StatEffect};

/// What using a consumable did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUse {
    /// Health restored (after capping at max health)
    Healed(u32),
    /// A non-health stat changed by the item's magnitude
    StatChanged(StatEffect),
}

/// Append an item id to the inventory
pub fn add_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    if character.inventory.len() >= INVENTORY_CAPACITY {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Remove the first occurrence of an item id
pub fn remove_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    let index = character
        .inventory
        .iter()
        .position(|id| id == item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    character.inventory.remove(index);
    Ok(())
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn free_slots(character: &Character) -> usize {
    INVENTORY_CAPACITY.saturating_sub(character.inventory.len())
}

/// Throw an item away without payment
pub fn drop_item(character: &mut Character, item_id: &str) -> Result<(), GameError> {
    remove_item(character, item_id)
}

/// Use a consumable from the inventory, consuming it
pub fn use_item(character: &mut Character, item: &Item) -> Result<ItemUse, GameError> {
    if !has_item(character, &item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }
    if item.kind != ItemKind::Consumable {
        return Err(wrong_kind(item, ItemKind::Consumable));
    }

    let mut next = character.clone();
    let outcome = match item.effect.stat {
        Stat::Health => ItemUse::Healed(heal_character(&mut next, i64::from(item.effect.magnitude))),
        _ => {
            next.adjust_stat(item.effect)?;
            ItemUse::StatChanged(item.effect)
        }
    };
    remove_item(&mut next, &item.id)?;

    *character = next;
    Ok(outcome)
}

/// Equip a weapon or armor piece from the inventory
///
/// Anything already in the slot goes back into the inventory first, so a swap
/// needs a free inventory slot (`InventoryFull` otherwise). Only one
/// occurrence of the item's id leaves the inventory. Returns the id of the
/// replaced item, if any. Nothing changes if any step fails.
pub fn equip(
    character: &mut Character,
    item: &Item,
    slot: EquipmentSlot,
) -> Result<Option<String>, GameError> {
    if !has_item(character, &item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }
    if item.kind != slot.item_kind() {
        return Err(wrong_kind(item, slot.item_kind()));
    }

    let mut next = character.clone();
    let replaced = unequip(&mut next, slot)?;
    remove_item(&mut next, &item.id)?;

    let effect = equipment_effect(item.effect);
    let health_before = next.health;
    next.adjust_stat(effect)?;
    *next.slot_mut(slot) = Some(EquippedItem {
        item_id: item.id.clone(),
        effect,
        health_withheld: health_before.saturating_sub(next.health),
    });

    *character = next;
    Ok(replaced)
}

/// Take off whatever is in a slot and return it to the inventory
///
/// Returns `Ok(None)` for an empty slot. With a full inventory the item stays
/// equipped and `InventoryFull` is returned. Health withheld at equip time is
/// given back unless the character has died since.
pub fn unequip(character: &mut Character, slot: EquipmentSlot) -> Result<Option<String>, GameError> {
    let Some(equipped) = character.equipped(slot).cloned() else {
        return Ok(None);
    };

    let mut next = character.clone();
    add_item(&mut next, &equipped.item_id)?;
    next.adjust_stat(equipped.effect.inverse())?;
    if next.is_alive() {
        heal_character(&mut next, i64::from(equipped.health_withheld));
    }
    *next.slot_mut(slot) = None;

    *character = next;
    Ok(Some(equipped.item_id))
}

/// Buy an item at its catalog cost
pub fn purchase(character: &mut Character, item: &Item) -> Result<u32, GameError> {
    if character.gold < item.cost {
        return Err(GameError::InsufficientFunds {
            required: u64::from(item.cost),
            available: u64::from(character.gold),
        });
    }
    if character.inventory.len() >= INVENTORY_CAPACITY {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }

    let mut next = character.clone();
    let remaining = add_gold(&mut next, -i64::from(item.cost))?;
    add_item(&mut next, &item.id)?;

    *character = next;
    Ok(remaining)
}

/// Sell an item for half its cost (rounded down), returning the gold received
pub fn sell(character: &mut Character, item: &Item) -> Result<u32, GameError> {
    if !has_item(character, &item.id) {
        return Err(GameError::ItemNotFound(item.id.clone()));
    }

    let price = item.sell_price();
    let mut next = character.clone();
    remove_item(&mut next, &item.id)?;
    add_gold(&mut next, i64::from(price))?;

    *character = next;
    Ok(price)
}

/// Equipment boosts to health raise max health instead, so they can be undone
fn equipment_effect(effect: StatEffect) -> StatEffect {
    match effect.stat {
        Stat::Health => StatEffect::new(Stat::MaxHealth, effect.magnitude),
        _ => effect,
    }
}

fn wrong_kind(item: &Item, expected: ItemKind) -> GameError {
    GameError::InvalidItemType {
        item_id: item.id.clone(),
        expected: expected.to_string(),
        actual: item.kind.to_string(),
    }
}
