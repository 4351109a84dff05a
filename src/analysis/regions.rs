use crate::core::types::Region;

/// Surface forms (Vietnamese and English, folded) that name a sales region.
/// Scanned in order; every alias found in the text contributes its region.
pub const REGION_ALIASES: &[(&str, Region)] = &[
    ("bắc mỹ", Region::NA),
    ("bắc mĩ", Region::NA),
    ("north america", Region::NA),
    ("na", Region::NA),

    ("châu âu", Region::EU),
    ("âu", Region::EU),
    ("eu", Region::EU),

    ("nhật", Region::JP),
    ("nhật bản", Region::JP),
    ("japan", Region::JP),
    ("jp", Region::JP),

    ("khác", Region::Other),
    ("other", Region::Other),
];
