/// Format a height given in decimetres
/// Examples: 7 -> "0.7 m", 100 -> "10.0 m"
pub fn format_height(decimetres: u32) -> String {
    format!("{:.1} m", tenths(decimetres))
}

/// Format a weight given in hectograms
/// Examples: 7 -> "0.7 kg", 100 -> "10.0 kg"
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", tenths(hectograms))
}

#[inline]
fn tenths(v: u32) -> f64 {
    f64::from(v) * 0.1
}

/// Upper-case the first character, leave the rest untouched ("bulbasaur" -> "Bulbasaur")
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dex number padded to three digits ("#025", "#1025")
pub fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}

/// Human label for a stat name ("special-attack" -> "Special Attack")
pub fn stat_label(name: &str) -> String {
    name.split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Width of a stat bar as a percentage of the available track.
/// Base 150 fills the bar; anything above is clamped.
pub fn stat_bar_percent(base: u32) -> u16 {
    let pct = f64::from(base) / 1.5;
    pct.min(100.0) as u16
}

/// Build a text bar `width` cells wide, `percent` of it filled
pub fn text_bar(percent: u16, width: u16) -> String {
    let filled = (u32::from(width) * u32::from(percent.min(100)) / 100) as usize;
    let empty = (width as usize).saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Truncate to `max_len` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let head: String = s.chars().take(max_len - 3).collect();
    format!("{head}...")
}
