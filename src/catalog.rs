// this_file: fontpick/src/catalog.rs
//
// Static catalog of installable fonts

use crate::{FontpickError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Font directories published by the ProgrammingFonts repository
pub const PROGRAMMING_FONTS: &[&str] = &[
    "3270-font", "agave", "anka-coder", "anonymous-pro", "apl-2741", "apl-385",
    "aurulent", "average", "b612-mono", "bedstead", "bitstream-vera", "borg-sans-mono",
    "bpmono", "bront-dejavu", "bront-ubuntu", "camingo-code", "cascadia-code",
    "Classic-X11-6x13", "code-new-roman", "consolamono", "Consolas", "Courier-New",
    "courier-prime", "courier-prime-code", "Cousine", "Crystal", "cutive", "d2coding",
    "daddytimemono", "dank-mono", "DEC-Terminal-Modern", "Deja-Vu-Sans-Mono", "Dina",
    "DM_Mono", "Droid-Sans-Mono", "Edlo", "effects-eighty", "Envy Code R PR7",
    "envy-code-r", "EspressoMono", "fairfax", "fairfax-hd", "fairfax-serif",
    "FantasqueSansMono", "fifteen", "fira", "Fira-Code", "FiraFlott", "fixedsys",
    "fixedsys-ligatures", "generic", "Generic Mono", "gnu-freefont", "gohufont",
    "go-mono", "Hack", "Hasklig", "Hermit", "ia-writer-mono", "IBM Plex Mono",
    "Inconsolata", "Input", "Inter-UI-3", "iosevka", "Jetbrains Mono", "JuliaMono",
    "latin-modern", "league", "lekton", "liberation", "Luculent", "luxi", "M+",
    "Menlo", "mensch", "meslo", "Microsoft-YaHei-Mono", "Monaco", "Monofur",
    "Monoid", "MonoLisa", "Mononoki", "nanum-gothic-coding", "notcouriersans", "noto",
    "nova", "office-code-pro", "Overpass Mono", "Oxygen-Mono", "plex-mono",
    "Pragmata-Pro", "profont", "Proggy", "Pt-Mono", "recursive", "RedHatMono",
    "Ricty-Diminished", "Roboto_Mono", "Sarasa-Gothic", "saxMono", "SomeType-Mono",
    "Source-Code-Pro", "space", "Triskweline", "Ubuntu-Mono", "Unifont",
    "Victor Mono", "Vintage Fonts Pack",
];

/// One installable font
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FontEntry {
    /// Identifier, also the remote directory name
    pub id: String,
}

impl FontEntry {
    /// Name shown to users
    pub fn display_name(&self) -> &str {
        &self.id
    }
}

/// Ordered, read-only collection of known fonts
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<FontEntry>,
}

impl Catalog {
    /// Build a catalog in registration order. Later duplicates are dropped.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let entries = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| seen.insert(id.clone()))
            .map(|id| FontEntry { id })
            .collect();

        Self { entries }
    }

    /// The built-in ProgrammingFonts catalog
    pub fn programming_fonts() -> Self {
        Self::new(PROGRAMMING_FONTS.iter().copied())
    }

    /// All entries in registration order
    pub fn list(&self) -> &[FontEntry] {
        &self.entries
    }

    /// Entries whose id contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> Vec<&FontEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| needle.is_empty() || entry.id.to_lowercase().contains(&needle))
            .collect()
    }

    /// Exact lookup by id
    pub fn get(&self, id: &str) -> Result<&FontEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| FontpickError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
