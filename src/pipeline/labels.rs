//! Per-language species label tables for the classification model.
//!
//! The classifier emits one score per index; these tables give the indices
//! their localized names. All tables list the same 26 species in the same
//! order.

/// Languages a pipeline can be configured with.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "fr", "it", "de"];

const SPECIES_EN: [&str; 26] = [
    "badger",
    "ibex",
    "red deer",
    "chamois",
    "cat",
    "goat",
    "roe deer",
    "dog",
    "squirrel",
    "equid",
    "genet",
    "hedgehog",
    "lagomorph",
    "wolf",
    "lynx",
    "marmot",
    "micromammal",
    "mouflon",
    "sheep",
    "mustelid",
    "bird",
    "bear",
    "nutria",
    "fox",
    "wild boar",
    "cow",
];

const SPECIES_FR: [&str; 26] = [
    "blaireau",
    "bouquetin",
    "cerf",
    "chamois",
    "chat",
    "chevre",
    "chevreuil",
    "chien",
    "ecureuil",
    "equide",
    "genette",
    "herisson",
    "lagomorphe",
    "loup",
    "lynx",
    "marmotte",
    "micromammifere",
    "mouflon",
    "mouton",
    "mustelide",
    "oiseau",
    "ours",
    "ragondin",
    "renard",
    "sanglier",
    "vache",
];

const SPECIES_IT: [&str; 26] = [
    "tasso",
    "stambecco",
    "cervo",
    "camoscio",
    "gatto",
    "capra",
    "capriolo",
    "cane",
    "scoiattolo",
    "equide",
    "genet",
    "riccio",
    "lagomorfo",
    "lupo",
    "lince",
    "marmotta",
    "micromammifero",
    "muflone",
    "pecora",
    "mustelide",
    "uccello",
    "orso",
    "nutria",
    "volpe",
    "cinghiale",
    "mucca",
];

const SPECIES_DE: [&str; 26] = [
    "Dachs",
    "Steinbock",
    "Rothirsch",
    "Gämse",
    "Katze",
    "Ziege",
    "Rehwild",
    "Hund",
    "Eichhörnchen",
    "Equiden",
    "Ginsterkatze",
    "Igel",
    "Lagomorpha",
    "Wolf",
    "Luchs",
    "Murmeltier",
    "Kleinsäuger",
    "Mufflon",
    "Schaf",
    "Mustelide",
    "Vogen",
    "Bär",
    "Nutria",
    "Fuchs",
    "Wildschwein",
    "Kuh",
];

/// Label table for a language code, or `None` for an unsupported language.
pub fn species_labels(language: &str) -> Option<&'static [&'static str]> {
    match language {
        "en" => Some(&SPECIES_EN),
        "fr" => Some(&SPECIES_FR),
        "it" => Some(&SPECIES_IT),
        "de" => Some(&SPECIES_DE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_align() {
        for language in SUPPORTED_LANGUAGES {
            let labels = species_labels(language).unwrap();
            assert_eq!(labels.len(), 26, "table for {language}");
        }
        // Same species index across languages.
        assert_eq!(species_labels("en").unwrap()[21], "bear");
        assert_eq!(species_labels("it").unwrap()[21], "orso");
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(species_labels("es").is_none());
    }
}
