//! Lore codec
//!
//! Enchantments are stored on the item itself as lore lines of the form
//! `§r<color><Display Name> <Roman level>`. There is no other storage: an
//! item's enchantments are whatever its lore says.
//!
//! Matching is done on text with formatting stripped:
//! - applying an enchantment drops every line that *contains* its display
//!   name, then appends the new line;
//! - reading an item takes the first line that *starts with* a display name
//!   and parses its last word as the level.
//!
//! Because removal is by containment, a display name that is a substring of
//! another enchantment's name ("Speed" / "Speed Boost") also removes the
//! longer one's line.

use std::collections::BTreeMap;

use enchants_types::formatting::{from_roman, to_roman};
use enchants_types::text::{self, RESET};

use crate::registry::EnchantmentRegistry;

/// Enchantments recovered from an item: id -> level, one level per id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedEnchantments(BTreeMap<String, u32>);

impl AppliedEnchantments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<u32> {
        self.0.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(id, level)| (id.as_str(), *level))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, id: &str, level: u32) {
        self.0.insert(id.to_string(), level);
    }
}

impl FromIterator<(String, u32)> for AppliedEnchantments {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads and writes enchantments on an item's lore.
///
/// The reconciler, the command and the combat procs only go through this
/// trait, so the storage format can change without touching them.
pub trait EnchantmentStore {
    /// Recover every registered enchantment present in the lore
    fn read(&self, lore: &[String]) -> AppliedEnchantments;

    /// New lore with `id` at `level` applied, or `None` if the id is unknown
    /// or the level is out of range
    fn write(&self, lore: &[String], id: &str, level: u32) -> Option<Vec<String>>;
}

/// Text lore codec backed by the registry's display names
#[derive(Debug, Clone, Copy)]
pub struct LoreCodec<'r> {
    registry: &'r EnchantmentRegistry,
}

impl<'r> LoreCodec<'r> {
    pub fn new(registry: &'r EnchantmentRegistry) -> Self {
        Self { registry }
    }

    /// Format the lore line for an enchantment at a level
    pub fn format_line(&self, id: &str, level: u32) -> Option<String> {
        let def = self.registry.lookup(id)?;
        if !def.accepts_level(level) {
            return None;
        }
        Some(format!(
            "{RESET}{}{} {}",
            def.color.marker(),
            def.display_name,
            to_roman(i64::from(level))
        ))
    }

    /// Replace any existing line for `id` with a line at `level`.
    ///
    /// Unrelated lines keep their order and the new line is always last.
    /// Returns `None` (and touches nothing) under the same conditions as
    /// [`Self::format_line`].
    pub fn apply_to_lore(&self, existing: &[String], id: &str, level: u32) -> Option<Vec<String>> {
        let line = self.format_line(id, level)?;
        let def = self.registry.lookup(id)?;
        let needle = text::clean(&def.display_name);

        let mut lore: Vec<String> = existing
            .iter()
            .filter(|existing_line| !text::clean(existing_line).contains(needle.as_str()))
            .cloned()
            .collect();
        lore.push(line);
        Some(lore)
    }

    /// Recover all registered enchantments from lore lines.
    ///
    /// For each definition the first line starting with its display name and
    /// ending in a valid numeral wins; later lines for the same id are
    /// ignored.
    pub fn extract_all(&self, lore: &[String]) -> AppliedEnchantments {
        let cleaned: Vec<String> = lore.iter().map(|line| text::clean(line)).collect();
        let mut applied = AppliedEnchantments::new();

        for (id, def) in self.registry.list_all() {
            let name = text::clean(&def.display_name);
            for line in &cleaned {
                if !line.starts_with(name.as_str()) {
                    continue;
                }
                let Some(numeral) = line.split_whitespace().next_back() else {
                    continue;
                };
                let level = from_roman(numeral);
                if level > 0 {
                    applied.insert(id, level);
                    break;
                }
            }
        }

        applied
    }

    /// Level of a single enchantment on the lore, if present
    pub fn level_of(&self, lore: &[String], id: &str) -> Option<u32> {
        let def = self.registry.lookup(id)?;
        let name = text::clean(&def.display_name);
        lore.iter()
            .map(|line| text::clean(line))
            .filter(|line| line.starts_with(name.as_str()))
            .filter_map(|line| line.split_whitespace().next_back().map(from_roman))
            .find(|level| *level > 0)
    }
}

impl EnchantmentStore for LoreCodec<'_> {
    fn read(&self, lore: &[String]) -> AppliedEnchantments {
        self.extract_all(lore)
    }

    fn write(&self, lore: &[String], id: &str, level: u32) -> Option<Vec<String>> {
        self.apply_to_lore(lore, id, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enchants_types::{ItemTag, TextColor};
    use proptest::prelude::*;

    fn lore(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_line() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        assert_eq!(codec.format_line("haste", 2).as_deref(), Some("§r§eHaste II"));
        assert_eq!(codec.format_line("SPEEDBOOST", 1).as_deref(), Some("§r§bSpeed Boost I"));
        assert_eq!(codec.format_line("poison", 3).as_deref(), Some("§r§2Poison III"));
    }

    #[test]
    fn test_format_line_rejects_bad_input() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        assert_eq!(codec.format_line("haste", 0), None);
        assert_eq!(codec.format_line("haste", 4), None);
        assert_eq!(codec.format_line("speedboost", 3), None);
        assert_eq!(codec.format_line("unbreaking", 1), None);
    }

    #[test]
    fn test_apply_to_lore_rejects_bad_input() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let existing = lore(&["A family heirloom"]);
        assert_eq!(codec.apply_to_lore(&existing, "haste", 0), None);
        assert_eq!(codec.apply_to_lore(&existing, "haste", 9), None);
        assert_eq!(codec.apply_to_lore(&existing, "unknown", 1), None);
        assert_eq!(existing, lore(&["A family heirloom"]));
    }

    #[test]
    fn test_apply_then_extract() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let existing = lore(&["§oForged in the deep", "Mined 1204 blocks"]);

        let updated = codec.apply_to_lore(&existing, "haste", 2).unwrap();
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[0], "§oForged in the deep");
        assert_eq!(updated[1], "Mined 1204 blocks");
        assert_eq!(updated[2], "§r§eHaste II");

        let applied = codec.extract_all(&updated);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied.get("haste"), Some(2));
    }

    #[test]
    fn test_reapply_replaces_line() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);

        let first = codec.apply_to_lore(&[], "poison", 1).unwrap();
        let with_note = [first, lore(&["Sharp"])].concat();
        let second = codec.apply_to_lore(&with_note, "poison", 2).unwrap();

        let poison_lines: Vec<_> = second
            .iter()
            .filter(|line| text::clean(line).contains("Poison"))
            .collect();
        assert_eq!(poison_lines.len(), 1);
        assert_eq!(second, lore(&["Sharp", "§r§2Poison II"]));
        assert_eq!(codec.extract_all(&second).get("poison"), Some(2));
    }

    #[test]
    fn test_multiple_enchantments() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);

        let lore = codec.apply_to_lore(&[], "poison", 3).unwrap();
        let lore = codec.apply_to_lore(&lore, "lifesteal", 1).unwrap();
        let applied = codec.extract_all(&lore);

        assert_eq!(applied.len(), 2);
        assert_eq!(applied.get("poison"), Some(3));
        assert_eq!(applied.get("lifesteal"), Some(1));
    }

    #[test]
    fn test_extract_first_match_wins() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let lines = lore(&["§r§eHaste I", "§r§eHaste III"]);
        assert_eq!(codec.extract_all(&lines).get("haste"), Some(1));
    }

    #[test]
    fn test_extract_skips_undecodable_line() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let lines = lore(&["Haste of the ancients", "§eHaste II"]);
        assert_eq!(codec.extract_all(&lines).get("haste"), Some(2));
    }

    #[test]
    fn test_extract_ignores_unrelated_lore() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let lines = lore(&["Just a stick", "§7Found in a chest II", "XIV", ""]);
        assert!(codec.extract_all(&lines).is_empty());
    }

    #[test]
    fn test_extract_requires_prefix() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        // Contains a display name, but does not start with it
        let lines = lore(&["Immune to Poison II"]);
        assert!(codec.extract_all(&lines).is_empty());
    }

    #[test]
    fn test_level_of() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let lines = lore(&["§r§bSpeed Boost II"]);
        assert_eq!(codec.level_of(&lines, "speedboost"), Some(2));
        assert_eq!(codec.level_of(&lines, "haste"), None);
        assert_eq!(codec.level_of(&lines, "missing"), None);
    }

    #[test]
    fn test_substring_display_name_removes_longer_line() {
        let mut registry = EnchantmentRegistry::with_defaults();
        registry.register("speed", "Speed", 3, &[ItemTag::Boots], TextColor::White);
        let codec = LoreCodec::new(&registry);

        let lines = codec.apply_to_lore(&[], "speedboost", 2).unwrap();
        let lines = codec.apply_to_lore(&lines, "speed", 1).unwrap();

        // Containment match drops the Speed Boost line as well
        assert_eq!(lines, lore(&["§r§fSpeed I"]));
    }

    #[test]
    fn test_store_trait_delegates() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let store: &dyn EnchantmentStore = &codec;

        let lines = store.write(&[], "lifesteal", 3).unwrap();
        assert_eq!(store.read(&lines).get("lifesteal"), Some(3));
        assert!(store.write(&lines, "lifesteal", 4).is_none());
    }

    proptest! {
        #[test]
        fn prop_apply_then_extract_recovers_level(
            unrelated in proptest::collection::vec("(§[0-9a-f])?[a-z0-9 ]{0,24}", 0..6),
            id in prop::sample::select(vec!["poison", "lifesteal", "haste", "speedboost"]),
            level in 1u32..=3,
        ) {
            let registry = EnchantmentRegistry::with_defaults();
            let codec = LoreCodec::new(&registry);
            let level = level.min(registry.lookup(id).unwrap().max_level);

            let updated = codec.apply_to_lore(&unrelated, id, level).unwrap();
            let applied = codec.extract_all(&updated);

            prop_assert_eq!(applied.len(), 1);
            prop_assert_eq!(applied.get(id), Some(level));
            prop_assert_eq!(&updated[..unrelated.len()], &unrelated[..]);
        }
    }
}
