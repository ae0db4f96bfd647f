use std::{collections::HashSet, sync::LazyLock};

///
/// RESERVED_WORDS
/// keywords that can never name a record type or a field
///

static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut words = Vec::new();

    // strict
    // https://doc.rust-lang.org/reference/keywords.html
    words.extend(vec![
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
        "true", "type", "unsafe", "use", "where", "while",
    ]);

    // reserved for future use
    words.extend(vec![
        "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
        "typeof", "unsized", "virtual", "yield",
    ]);

    words.into_iter().collect()
});

/// Check if an identifier is a reserved word.
pub(crate) fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word)
}
