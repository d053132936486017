const PREDEFINED_TEAM_COLORS: &[(&str, &str)] = &[
    ("SALES", "#FF6B6B"),
    ("MARKETING", "#4ECDC4"),
    ("DEVELOPMENT", "#45B7D1"),
    ("DESIGN", "#96CEB4"),
    ("OPERATIONS", "#FFEAA7"),
    ("FINANCE", "#DDA0DD"),
    ("HR", "#98D8C8"),
    ("SUPPORT", "#F7DC6F"),
    ("PRODUCT", "#BB8FCE"),
    ("ENGINEERING", "#85C1E9"),
];

/// Display color for a team. Unknown teams get a stable HSL color derived
/// from the name, so the same team always renders the same way.
pub fn team_color(team: &str) -> String {
    let upper = team.to_uppercase();
    if let Some((_, color)) = PREDEFINED_TEAM_COLORS.iter().find(|(name, _)| *name == upper) {
        return color.to_string();
    }

    let hash = team
        .encode_utf16()
        .fold(0i32, |hash, unit| (unit as i32).wrapping_add((hash << 5).wrapping_sub(hash)));
    let h = hash.unsigned_abs();
    format!("hsl({}, {}%, {}%)", h % 360, 65 + h % 20, 50 + h % 15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_is_case_insensitive() {
        assert_eq!(team_color("Sales"), "#FF6B6B");
        assert_eq!(team_color("engineering"), "#85C1E9");
    }

    #[test]
    fn test_hashed_colors() {
        // "A" hashes to 65.
        assert_eq!(team_color("A"), "hsl(65, 70%, 55%)");
        // "AB": 66 + (65 << 5) - 65 = 2081
        assert_eq!(team_color("AB"), "hsl(281, 66%, 61%)");
        assert_eq!(team_color(""), "hsl(0, 65%, 50%)");
        assert_eq!(team_color("TeamA"), team_color("TeamA"));
    }
}
