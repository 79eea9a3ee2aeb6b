use winnow::{
    Parser,
    binary::{le_i16, le_i32, le_u8, le_u16, le_u32},
    combinator::{repeat, seq},
    error::ContextError,
};

use super::types::*;
use crate::file_parsers::{
    FormatError,
    shared::{TraceHelper, WinnowParser, fixed_str, resref, signature},
};

const FORMAT: &str = "ITM";

fn truncated(section: &'static str) -> impl FnOnce(ContextError) -> FormatError {
    move |_| FormatError::Truncated {
        format: FORMAT,
        section,
    }
}

/// Nested tuples, in on-disk order
fn item_header<'a>() -> impl WinnowParser<&'a [u8], ItemHeader> {
    (
        (
            le_u32,
            le_u32,
            resref(),
            le_u32,
            le_u16,
            le_u32,
            fixed_str(2),
            le_u16,
            le_u16,
        ),
        (le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8, le_u8),
        (
            le_u16,
            le_u32,
            le_u16,
            resref(),
            le_u16,
            resref(),
            le_u32,
            le_u32,
            le_u32,
            resref(),
        ),
        (le_u32, le_u32, le_u16, le_u32, le_u16, le_u16),
    )
        .map(
            |(
                (
                    unidentified_name,
                    identified_name,
                    replacement_item,
                    flags,
                    item_type,
                    usability,
                    animation,
                    min_level,
                    min_strength,
                ),
                (
                    min_strength_bonus,
                    kit_usability_1,
                    min_intelligence,
                    kit_usability_2,
                    min_dexterity,
                    kit_usability_3,
                    min_wisdom,
                    kit_usability_4,
                    min_constitution,
                    proficiency,
                ),
                (
                    min_charisma,
                    price,
                    max_stack,
                    inventory_icon,
                    lore,
                    ground_icon,
                    weight,
                    unidentified_description,
                    identified_description,
                    description_icon,
                ),
                (
                    enchantment,
                    abilities_offset,
                    ability_count,
                    effects_offset,
                    first_equipping_effect,
                    equipping_effect_count,
                ),
            )| ItemHeader {
                unidentified_name,
                identified_name,
                replacement_item,
                flags,
                item_type,
                usability,
                animation,
                min_level,
                min_strength,
                min_strength_bonus,
                kit_usability_1,
                min_intelligence,
                kit_usability_2,
                min_dexterity,
                kit_usability_3,
                min_wisdom,
                kit_usability_4,
                min_constitution,
                proficiency,
                min_charisma,
                price,
                max_stack,
                inventory_icon,
                lore,
                ground_icon,
                weight,
                unidentified_description,
                identified_description,
                description_icon,
                enchantment,
                abilities_offset,
                ability_count,
                effects_offset,
                first_equipping_effect,
                equipping_effect_count,
            },
        )
        .trace("item_header")
}

fn item_ability<'a>() -> impl WinnowParser<&'a [u8], ItemAbility> {
    (
        (
            le_u8,
            le_u8,
            le_u8,
            le_u8,
            resref(),
            le_u8,
            le_u8,
            le_u16,
            le_u8,
            le_u8,
            le_u8,
            le_u8,
        ),
        (le_i16, le_u8, le_u8, le_u8, le_u8, le_i16, le_u16),
        (
            le_u16,
            le_u16,
            le_u16,
            le_u16,
            le_u32,
            le_u16,
            (le_u16, le_u16, le_u16),
            le_u16,
            le_u16,
            le_u16,
        ),
    )
        .map(
            |(
                (
                    attack_type,
                    identify_required,
                    location,
                    alternative_dice_sides,
                    use_icon,
                    target_type,
                    target_count,
                    range,
                    launcher_required,
                    alternative_dice_thrown,
                    speed_factor,
                    alternative_damage_bonus,
                ),
                (
                    thac0_bonus,
                    dice_sides,
                    primary_type,
                    dice_thrown,
                    secondary_type,
                    damage_bonus,
                    damage_type,
                ),
                (
                    effect_count,
                    first_effect,
                    charges,
                    charge_depletion,
                    flags,
                    projectile,
                    (melee_1, melee_2, melee_3),
                    is_arrow,
                    is_bolt,
                    is_bullet,
                ),
            )| ItemAbility {
                attack_type,
                identify_required,
                location,
                alternative_dice_sides,
                use_icon,
                target_type,
                target_count,
                range,
                launcher_required,
                alternative_dice_thrown,
                speed_factor,
                alternative_damage_bonus,
                thac0_bonus,
                dice_sides,
                primary_type,
                dice_thrown,
                secondary_type,
                damage_bonus,
                damage_type,
                effect_count,
                first_effect,
                charges,
                charge_depletion,
                flags,
                projectile,
                melee_animation: [melee_1, melee_2, melee_3],
                is_arrow,
                is_bolt,
                is_bullet,
            },
        )
        .trace("item_ability")
}

fn effect<'a>() -> impl WinnowParser<&'a [u8], Effect> {
    seq!(Effect {
        opcode: le_u16,
        target: le_u8,
        power: le_u8,
        parameter1: le_u32,
        parameter2: le_u32,
        timing: le_u8,
        resistance: le_u8,
        duration: le_u32,
        probability1: le_u8,
        probability2: le_u8,
        resource: resref(),
        dice_thrown: le_u32,
        dice_sides: le_u32,
        saving_throw: le_u32,
        save_bonus: le_i32,
        special: le_u32,
    })
    .trace("effect")
}

/// `count` records starting at `offset`
fn table_at<'a, O>(
    contents: &'a [u8],
    offset: u32,
    count: usize,
    section: &'static str,
    record: impl WinnowParser<&'a [u8], O>,
) -> Result<Vec<O>, FormatError> {
    if count == 0 {
        return Ok(vec![]);
    }

    let mut input = contents
        .get(offset as usize..)
        .ok_or(FormatError::OffsetOutOfBounds {
            format: FORMAT,
            section,
            offset: offset as u64,
        })?;

    repeat(count, record)
        .parse_next(&mut input)
        .map_err(truncated(section))
}

pub fn parse_itm_bytes(contents: &[u8]) -> Result<ItemDefinition, FormatError> {
    let mut input = contents;

    let sig = signature()
        .parse_next(&mut input)
        .map_err(truncated("signature"))?;
    match sig {
        b"ITM V1  " => {}
        b"ITM V1.1" | b"ITM V2.0" => {
            return Err(FormatError::UnsupportedVariant {
                format: FORMAT,
                variant: String::from_utf8_lossy(sig).into_owned(),
            });
        }
        _ => return Err(FormatError::bad_signature(FORMAT, sig)),
    }

    let header = item_header()
        .parse_next(&mut input)
        .map_err(truncated("header"))?;

    let abilities = table_at(
        contents,
        header.abilities_offset,
        header.ability_count as usize,
        "abilities",
        item_ability(),
    )?;

    // The feature table only needs to reach the furthest range anything refers to
    let effect_count = abilities
        .iter()
        .map(|a| a.first_effect as usize + a.effect_count as usize)
        .chain([header.first_equipping_effect as usize + header.equipping_effect_count as usize])
        .max()
        .unwrap_or(0);

    let effects = table_at(
        contents,
        header.effects_offset,
        effect_count,
        "effects",
        effect(),
    )?;

    Ok(ItemDefinition {
        header,
        abilities,
        effects,
    })
}
