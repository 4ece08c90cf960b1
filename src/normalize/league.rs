//! League naming.
//!
//! The history feeds and the live feed name the same competitions
//! differently. History names are mapped onto the live naming so that league
//! grouping and the live league guard see one name per competition.

/// Historical league name -> live feed league name.
const LEAGUE_NAME_MAPPING: &[(&str, &str)] = &[
    (
        "Esoccer Battle - 8 mins play",
        "E-Soccer - Battle - 8 minutos de jogo",
    ),
    (
        "Esoccer Battle Volta - 6 mins play",
        "E-Soccer - Battle Volta - 6 minutos de jogo",
    ),
    (
        "Esoccer GT Leagues - 12 mins play",
        "E-Soccer - GT Leagues - 12 minutos de jogo",
    ),
    (
        "Esoccer GT Leagues \u{2013} 12 mins play",
        "E-Soccer - GT Leagues - 12 minutos de jogo",
    ),
    (
        "Esoccer H2H GG League - 8 mins play",
        "E-Soccer - H2H GG League - 8 minutos de jogo",
    ),
    (
        "Esoccer Adriatic League - 10 mins play",
        "E-Soccer - Adriatic League - 10 minutos de jogo",
    ),
    ("Battle 8m", "E-Soccer - Battle - 8 minutos de jogo"),
    ("Battle 6m", "E-Soccer - Battle Volta - 6 minutos de jogo"),
    ("GT League", "E-Soccer - GT Leagues - 12 minutos de jogo"),
    ("H2H 8m", "E-Soccer - H2H GG League - 8 minutos de jogo"),
];

/// Full league name fragment -> short display label.
const LEAGUE_LABELS: &[(&str, &str)] = &[
    ("Esoccer Battle Volta - 6 mins play", "VOLTA - 6 MIN"),
    ("E-Soccer - Battle Volta - 6 minutos de jogo", "VOLTA - 6 MIN"),
    ("Esoccer Battle - 8 mins play", "BATTLE - 8 MIN"),
    ("E-Soccer - Battle - 8 minutos de jogo", "BATTLE - 8 MIN"),
    ("Esoccer GT Leagues", "GT LEAGUES"),
    ("E-Soccer - GT Leagues - 12 minutos de jogo", "GT LEAGUES"),
    ("Esoccer H2H GG League", "H2H GG LEAGUE"),
    ("Esoccer Adriatic League", "ADRIATIC"),
];

/// Map a historical league name onto the live feed naming.
///
/// Unknown names pass through unchanged.
pub fn canonical_league_name(raw: &str) -> String {
    LEAGUE_NAME_MAPPING
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Short upper-case label for a league, used in cards and notifications.
pub fn league_display_name(full_name: &str) -> String {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return "UNKNOWN".to_string();
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("h2h gg") {
        return "H2H GG LEAGUE".to_string();
    }
    if lower.contains("valhalla") {
        return "VALHALLA CUP".to_string();
    }
    if lower.contains("valkyrie") {
        return "VALKYRIE CUP".to_string();
    }
    let has_cla_word = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "cla");
    if has_cla_word || lower.contains("cyber live arena") {
        return "CLA LEAGUE".to_string();
    }

    if let Some((_, label)) = LEAGUE_LABELS
        .iter()
        .find(|(key, _)| lower.contains(&key.to_lowercase()))
    {
        return label.to_string();
    }

    trimmed
        .replace("Esoccer ", "")
        .replace("E-Soccer - ", "")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_league_name_maps_history_names() {
        assert_eq!(
            canonical_league_name("Esoccer Battle - 8 mins play"),
            "E-Soccer - Battle - 8 minutos de jogo"
        );
        assert_eq!(
            canonical_league_name("H2H 8m"),
            "E-Soccer - H2H GG League - 8 minutos de jogo"
        );
    }

    #[test]
    fn test_canonical_league_name_passes_unknown_through() {
        assert_eq!(canonical_league_name("Friendly Cup"), "Friendly Cup");
        assert_eq!(canonical_league_name(""), "");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            league_display_name("E-Soccer - Battle Volta - 6 minutos de jogo"),
            "VOLTA - 6 MIN"
        );
        assert_eq!(
            league_display_name("E-Soccer - Battle - 8 minutos de jogo"),
            "BATTLE - 8 MIN"
        );
        assert_eq!(
            league_display_name("E-Soccer - H2H GG League - 8 minutos de jogo"),
            "H2H GG LEAGUE"
        );
        assert_eq!(league_display_name("Valhalla Cup A"), "VALHALLA CUP");
        assert_eq!(league_display_name("CLA League 2"), "CLA LEAGUE");
        assert_eq!(league_display_name("Esoccer Classic"), "CLASSIC");
        assert_eq!(league_display_name("  "), "UNKNOWN");
    }
}
