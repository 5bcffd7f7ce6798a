use serde::Serialize;

/// Extensions kept intact when a name is rebuilt, longest first
const KNOWN_EXTENSIONS: &[&str] = &[
    ".fastq.gz", ".fq.gz", ".fastq", ".fq", ".fasta", ".fa", ".fas", ".fna",
];

/// Which underscore-separated fields of a file name survive a rename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenameScheme {
    /// `<first>_<last><ext>`
    #[default]
    FirstLast,
    /// `<first><suffix><ext>`
    FirstOnly,
    /// `<first>_<second><suffix><ext>`
    FirstTwo,
}

/// Split a file name into stem and extension.
///
/// Known sequence extensions are matched case-insensitively and returned with
/// their original case; other names split at the last `.`.
pub fn split_extension(name: &str) -> (&str, &str) {
    let lower = name.to_ascii_lowercase();
    if let Some(ext) = KNOWN_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)) {
        return name.split_at(name.len() - ext.len());
    }
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(i) => name.split_at(i),
    }
}

impl RenameScheme {
    /// Rebuild `name` under this scheme.
    ///
    /// Names with fewer than two fields are returned unchanged. `suffix` is
    /// not used by `FirstLast`.
    #[must_use]
    pub fn rename(self, name: &str, suffix: &str) -> String {
        let (stem, ext) = split_extension(name);
        let fields: Vec<&str> = stem.split('_').collect();
        if fields.len() < 2 {
            return name.to_string();
        }

        let first = fields[0];
        match self {
            RenameScheme::FirstLast => format!("{first}_{}{ext}", fields[fields.len() - 1]),
            RenameScheme::FirstOnly => format!("{first}{suffix}{ext}"),
            RenameScheme::FirstTwo => format!("{first}_{}{suffix}{ext}", fields[1]),
        }
    }
}

impl std::fmt::Display for RenameScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RenameScheme::FirstLast => "first-last",
            RenameScheme::FirstOnly => "first-only",
            RenameScheme::FirstTwo => "first-two",
        };
        write!(f, "{name}")
    }
}
