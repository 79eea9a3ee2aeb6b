use serde::Serialize;

pub const HEADER_SIZE: usize = 0x72;
pub const ABILITY_SIZE: usize = 0x38;
pub const EFFECT_SIZE: usize = 0x30;

/// Field order follows the on-disk layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemHeader {
    /// String table ids
    pub unidentified_name: u32,
    pub identified_name: u32,
    /// Item this one turns into when used up
    pub replacement_item: String,
    pub flags: u32,
    pub item_type: u16,
    /// Bitmask of classes/races/alignments that may NOT use the item
    pub usability: u32,
    pub animation: String,
    pub min_level: u16,
    pub min_strength: u16,
    pub min_strength_bonus: u8,
    pub kit_usability_1: u8,
    pub min_intelligence: u8,
    pub kit_usability_2: u8,
    pub min_dexterity: u8,
    pub kit_usability_3: u8,
    pub min_wisdom: u8,
    pub kit_usability_4: u8,
    pub min_constitution: u8,
    pub proficiency: u8,
    pub min_charisma: u16,
    pub price: u32,
    pub max_stack: u16,
    pub inventory_icon: String,
    pub lore: u16,
    pub ground_icon: String,
    pub weight: u32,
    pub unidentified_description: u32,
    pub identified_description: u32,
    pub description_icon: String,
    pub enchantment: u32,
    pub abilities_offset: u32,
    pub ability_count: u16,
    pub effects_offset: u32,
    pub first_equipping_effect: u16,
    pub equipping_effect_count: u16,
}

/// Extended header, one per way of using the item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAbility {
    /// 1 == melee
    /// 2 == ranged
    /// 3 == magical
    /// 4 == launcher
    pub attack_type: u8,
    pub identify_required: u8,
    pub location: u8,
    pub alternative_dice_sides: u8,
    pub use_icon: String,
    pub target_type: u8,
    pub target_count: u8,
    pub range: u16,
    pub launcher_required: u8,
    pub alternative_dice_thrown: u8,
    pub speed_factor: u8,
    pub alternative_damage_bonus: u8,
    pub thac0_bonus: i16,
    pub dice_sides: u8,
    pub primary_type: u8,
    pub dice_thrown: u8,
    pub secondary_type: u8,
    pub damage_bonus: i16,
    pub damage_type: u16,
    pub effect_count: u16,
    pub first_effect: u16,
    pub charges: u16,
    pub charge_depletion: u16,
    pub flags: u32,
    pub projectile: u16,
    pub melee_animation: [u16; 3],
    pub is_arrow: u16,
    pub is_bolt: u16,
    pub is_bullet: u16,
}

/// Feature block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub opcode: u16,
    pub target: u8,
    pub power: u8,
    pub parameter1: u32,
    pub parameter2: u32,
    pub timing: u8,
    pub resistance: u8,
    pub duration: u32,
    pub probability1: u8,
    pub probability2: u8,
    pub resource: String,
    pub dice_thrown: u32,
    pub dice_sides: u32,
    pub saving_throw: u32,
    pub save_bonus: i32,
    pub special: u32,
}

#[derive(Debug, Serialize)]
pub struct ItemDefinition {
    pub header: ItemHeader,
    pub abilities: Vec<ItemAbility>,
    /// Whole feature table, indexed by the equipping and ability ranges
    pub effects: Vec<Effect>,
}

impl ItemDefinition {
    pub fn equipping_effects(&self) -> &[Effect] {
        let start = self.header.first_equipping_effect as usize;
        let end = start + self.header.equipping_effect_count as usize;
        self.effects.get(start..end).unwrap_or_default()
    }

    pub fn ability_effects(&self, ability: usize) -> Option<&[Effect]> {
        let ability = self.abilities.get(ability)?;
        let start = ability.first_effect as usize;
        self.effects.get(start..start + ability.effect_count as usize)
    }
}
