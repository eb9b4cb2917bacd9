//! Acceptance filter helpers of the SJA1000 in single filter mode.
//!
//! A message passes the filter if every identifier bit not masked out by
//! the acceptance mask (AMR, a set bit means "don't care") equals the bit
//! of the acceptance code (ACR). Standard identifiers are placed at bit 21,
//! extended identifiers at bit 3.

/// Calculates the acceptance mask for a range of CAN identifiers.
///
/// `rtr_only` accepts remote frames only, `rtr_too` accepts data and remote frames.
pub fn calculate_amr(extended: bool, from_id: u32, to_id: u32, rtr_only: bool, rtr_too: bool) -> u32 {
    let rtr_any = rtr_too && !rtr_only;
    if extended {
        ((from_id ^ to_id) << 3) | if rtr_any { 0x7 } else { 0x3 }
    }
    else {
        ((from_id ^ to_id) << 21) | if rtr_any { 0x1F_FFFF } else { 0xF_FFFF }
    }
}

/// Calculates the acceptance code for a range of CAN identifiers.
pub fn calculate_acr(extended: bool, from_id: u32, to_id: u32, rtr_only: bool, _rtr_too: bool) -> u32 {
    if extended {
        ((from_id & to_id) << 3) | if rtr_only { 0x4 } else { 0 }
    }
    else {
        ((from_id & to_id) << 21) | if rtr_only { 0x10_0000 } else { 0 }
    }
}
