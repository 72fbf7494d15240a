//! English pluralization for block paths.
//!
//! Paths are the keys the persistence layer groups records under, so the
//! rule set mirrors the `pluralize` package used by the admin UI. Rules are
//! tried newest first; whole-word irregulars and uncountables win over them.
//!
//! ```text
//! cloudinaryImage → cloudinaryImages
//! gallery         → galleries
//! analysis        → analyses
//! quiz            → quizzes
//! ```

use regex::Regex;
use std::sync::OnceLock;

const PLURAL_RULES: &[(&str, &str)] = &[
    (r"s?$", "s"),
    (r"[^\x00-\x7F]$", "${0}"),
    (r"([^aeiou]ese)$", "${1}"),
    (r"(ax|test)is$", "${1}es"),
    (r"(alias|[^aou]us|t[lm]as|gas|ris)$", "${1}es"),
    (r"(e[mn]u)s?$", "${1}s"),
    (r"([^l]ias|[aeiou]las|[ejzr]as|[iu]am)$", "${1}"),
    (
        r"(alumn|syllab|vir|radi|nucle|fung|cact|stimul|termin|bacill|foc|uter|loc|strat)(?:us|i)$",
        "${1}i",
    ),
    (r"(alumn|alg|vertebr)(?:a|ae)$", "${1}ae"),
    (r"(seraph|cherub)(?:im)?$", "${1}im"),
    (r"(her|at|gr)o$", "${1}oes"),
    (
        r"(agend|addend|millenni|dat|extrem|bacteri|desiderat|strat|candelabr|errat|ov|symposi|curricul|automat|quor)(?:a|um)$",
        "${1}a",
    ),
    (
        r"(apheli|hyperbat|periheli|asyndet|noumen|phenomen|criteri|organ|prolegomen|hedr|automat)(?:a|on)$",
        "${1}a",
    ),
    (r"sis$", "ses"),
    (r"(?:(kni|wi|li)fe|(ar|l|ea|eo|oa|hoo)f)$", "${1}${2}ves"),
    (r"([^aeiouy]|qu)y$", "${1}ies"),
    (r"([^ch][ieo][ln])ey$", "${1}ies"),
    (r"(x|ch|ss|sh|zz)$", "${1}es"),
    (r"(matr|cod|mur|sil|vert|ind|append)(?:ix|ex)$", "${1}ices"),
    (r"\b((?:tit)?m|l)(?:ice|ouse)$", "${1}ice"),
    (r"(pe)(?:rson|ople)$", "${1}ople"),
    (r"(child)(?:ren)?$", "${1}ren"),
    (r"eaux$", "${0}"),
    (r"m[ae]n$", "men"),
    (r"^thou$", "you"),
];

/// Suffix patterns that never change
const UNCOUNTABLE_RULES: &[&str] = &[
    r"pok[eé]mon$",
    r"[^aeiou]ese$",
    r"deer$",
    r"fish$",
    r"measles$",
    r"o[iu]s$",
    r"pox$",
    r"sheep$",
];

const UNCOUNTABLE: &[&str] = &[
    "adulthood", "advice", "agenda", "aid", "aircraft", "alcohol", "ammo", "analytics", "anime",
    "athletics", "audio", "bison", "blood", "bream", "buffalo", "butter", "carp", "cash", "chassis",
    "chess", "clothing", "cod", "commerce", "cooperation", "corps", "debris", "diabetes", "digestion",
    "elk", "energy", "equipment", "excretion", "expertise", "firmware", "flounder", "fun", "gallows",
    "garbage", "graffiti", "hardware", "headquarters", "health", "herpes", "highjinks", "homework",
    "housework", "information", "jeans", "justice", "kudos", "labour", "literature", "machinery",
    "mackerel", "mail", "media", "mews", "moose", "music", "mud", "manga", "news", "only", "personnel",
    "pike", "plankton", "pliers", "police", "pollution", "premises", "rain", "research", "rice",
    "salmon", "scissors", "series", "sewage", "shambles", "shrimp", "software", "staff", "swine",
    "tennis", "traffic", "transportation", "trout", "tuna", "wealth", "welfare", "whiting",
    "wildebeest", "wildlife", "you",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("i", "we"),
    ("me", "us"),
    ("he", "they"),
    ("she", "they"),
    ("them", "them"),
    ("myself", "ourselves"),
    ("yourself", "yourselves"),
    ("itself", "themselves"),
    ("herself", "themselves"),
    ("himself", "themselves"),
    ("themself", "themselves"),
    ("is", "are"),
    ("was", "were"),
    ("has", "have"),
    ("this", "these"),
    ("that", "those"),
    ("echo", "echoes"),
    ("dingo", "dingoes"),
    ("volcano", "volcanoes"),
    ("tornado", "tornadoes"),
    ("torpedo", "torpedoes"),
    ("genus", "genera"),
    ("viscus", "viscera"),
    ("stigma", "stigmata"),
    ("stoma", "stomata"),
    ("dogma", "dogmata"),
    ("lemma", "lemmata"),
    ("schema", "schemata"),
    ("anathema", "anathemata"),
    ("ox", "oxen"),
    ("axe", "axes"),
    ("die", "dice"),
    ("yes", "yeses"),
    ("foot", "feet"),
    ("eave", "eaves"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("quiz", "quizzes"),
    ("human", "humans"),
    ("proof", "proofs"),
    ("carve", "carves"),
    ("valve", "valves"),
    ("looey", "looies"),
    ("thief", "thieves"),
    ("groove", "grooves"),
    ("pickaxe", "pickaxes"),
    ("passerby", "passersby"),
];

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Compiled rules, newest first
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let plural = PLURAL_RULES.iter().copied();
        let uncountable = UNCOUNTABLE_RULES.iter().map(|pattern| (*pattern, "${0}"));

        plural
            .chain(uncountable)
            .rev()
            .map(|(pattern, replacement)| Rule {
                pattern: Regex::new(&format!("(?i){}", pattern)).expect("pluralization rules are valid regexes"),
                replacement,
            })
            .collect()
    })
}

/// Plural form of a block type tag
pub fn pluralize(word: &str) -> String {
    let token = word.to_lowercase();

    if IRREGULAR.iter().any(|(_, plural)| *plural == token) {
        return restore_case(word, &token);
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == token) {
        return restore_case(word, plural);
    }

    if token.is_empty() || UNCOUNTABLE.contains(&token.as_str()) {
        return word.to_string();
    }

    rules()
        .iter()
        .find_map(|rule| apply(rule, word))
        .unwrap_or_else(|| word.to_string())
}

/// Replace the first match, keeping the casing of the text it replaces
fn apply(rule: &Rule, word: &str) -> Option<String> {
    let captures = rule.pattern.captures(word)?;
    let matched = captures.get(0)?;

    let mut replaced = String::new();
    captures.expand(rule.replacement, &mut replaced);

    // An empty match takes its casing from the character before it
    let reference = if matched.as_str().is_empty() {
        word[..matched.start()]
            .chars()
            .last()
            .map(String::from)
            .unwrap_or_default()
    } else {
        matched.as_str().to_string()
    };

    Some(format!(
        "{}{}{}",
        &word[..matched.start()],
        restore_case(&reference, &replaced),
        &word[matched.end()..]
    ))
}

fn restore_case(original: &str, token: &str) -> String {
    if original == token {
        return token.to_string();
    }
    if original == original.to_lowercase() {
        return token.to_lowercase();
    }
    if original == original.to_uppercase() {
        return token.to_uppercase();
    }

    let mut chars = token.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(head)) if first.is_uppercase() => {
            head.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect()
        }
        _ => token.to_lowercase(),
    }
}
