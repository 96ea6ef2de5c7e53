//! Word-to-math normalizer.
//!
//! Rewrites conversational phrasing ("what is five times three", "25% of 80")
//! into an expression string the parser understands. Every rule runs on the
//! output of the previous one, so the order below is part of the behavior.

use std::sync::LazyLock;

use regex::Regex;

struct Patterns {
    what_is: Regex,
    whats: Regex,
    percent_sign: Regex,
    percent_word: Regex,
    number_words: Vec<(Regex, &'static str)>,
    whitespace: Regex,
    squared_gap: Regex,
    cubed_gap: Regex,
}

const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("seventy", "70"),
    ("eighty", "80"),
    ("ninety", "90"),
    ("hundred", "*100"),
    ("thousand", "*1000"),
    ("million", "*1000000"),
    ("billion", "*1000000000"),
    ("first", "1st"),
    ("second", "2nd"),
    ("third", "3rd"),
    ("fourth", "4th"),
    ("fifth", "5th"),
    ("sixth", "6th"),
    ("seventh", "7th"),
    ("eighth", "8th"),
    ("ninth", "9th"),
    ("tenth", "10th"),
];

/// Literal, space-delimited phrase rewrites applied in this exact order.
/// Later entries see the output of earlier ones.
const PHRASES: &[(&str, &str)] = &[
    (" to the power of ", "**"),
    (" to the power ", "**"),
    (" raised to ", "**"),
    (" multiplied by ", "*"),
    (" divided by ", "/"),
    (" times ", "*"),
    (" squared ", "**2"),
    (" cubed ", "**3"),
    (" square ", "**2"),
    (" cube ", "**3"),
    (" power ", "**"),
    (" minus ", " - "),
    (" plus ", " + "),
    (" subtract ", " - "),
    (" multiply ", " * "),
    (" divide ", " / "),
    (" and ", " + "),
    (" over ", " / "),
    (" by ", " / "),
    (" half ", " / 2"),
    (" double ", " * 2"),
    (" triple ", " * 3"),
    (" point ", "."),
    (" root ", "sqrt"),
    (" square root ", "sqrt"),
    (" cubic root ", "root(3,"),
    (" cube root ", "root(3,"),
    (" log ", "log"),
    (" natural log ", "ln"),
    (" ln ", "ln"),
    (" sin ", "sin"),
    (" cos ", "cos"),
    (" tan ", "tan"),
    (" cot ", "cot"),
    (" sec ", "sec"),
    (" csc ", "csc"),
    (" factorial ", "!"),
    (" factorial", "!"),
    (" equals ", " = "),
    (" equal ", " = "),
    (" is ", " = "),
    (" approximately ", " ≈ "),
    (" approximately equals ", " ≈ "),
    (" greater than or equal to ", " >= "),
    (" less than or equal to ", " <= "),
    (" greater than ", " > "),
    (" less than ", " < "),
    // story phrasing
    (" gives ", " - "),
    (" gave ", " - "),
    (" gets ", " + "),
    (" got ", " + "),
    (" has ", ""),
    (" have ", ""),
    (" total ", " + "),
    (" altogether ", " + "),
    (" in all ", " + "),
    (" remaining ", " - "),
    (" left ", " - "),
    (" more than ", " + "),
    (" less than ", " - "),
    (" difference ", " - "),
    (" product ", " * "),
    (" ratio ", " / "),
    (" per ", " / "),
    (" each ", " * "),
    (" among ", " / "),
    (" between ", " / "),
];

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(build_patterns);

fn build_patterns() -> Option<Patterns> {
    let number_words = NUMBER_WORDS
        .iter()
        .map(|(word, digits)| Regex::new(&format!(r"(?i)\b{word}\b")).map(|re| (re, *digits)))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(Patterns {
        what_is: Regex::new(r"(?i)^what\s+is\s+(.+)").ok()?,
        whats: Regex::new(r"(?i)^what'?s\s+(.+)").ok()?,
        percent_sign: Regex::new(r"(?i)(\d+)%\s+of\s+(\d+)").ok()?,
        percent_word: Regex::new(r"(?i)(\d+)\s*percent\s+of\s+(\d+)").ok()?,
        number_words,
        whitespace: Regex::new(r"\s+").ok()?,
        squared_gap: Regex::new(r"(\w+)\s+\*\*2").ok()?,
        cubed_gap: Regex::new(r"(\w+)\s+\*\*3").ok()?,
    })
}

/// Normalize free-form input. Never fails; if the rule patterns are
/// unavailable the input is returned unchanged.
pub fn normalize(raw: &str) -> String {
    match PATTERNS.as_ref() {
        Some(p) => apply(p, raw),
        None => raw.to_string(),
    }
}

fn apply(p: &Patterns, raw: &str) -> String {
    // The frame is matched against the untrimmed input.
    let mut text = match p
        .what_is
        .captures(raw)
        .or_else(|| p.whats.captures(raw))
        .and_then(|c| c.get(1))
    {
        Some(rest) => rest.as_str().trim().to_string(),
        None => raw.trim().to_string(),
    };

    text = p
        .percent_sign
        .replace_all(&text, "(${1}/100) * ${2}")
        .into_owned();
    text = p
        .percent_word
        .replace_all(&text, "(${1}/100) * ${2}")
        .into_owned();

    // Once any number word matched, the lower-cased copy replaces the text.
    let lowered = text.to_lowercase();
    let mut substituted = lowered.clone();
    for (re, digits) in &p.number_words {
        substituted = re.replace_all(&substituted, *digits).into_owned();
    }
    if substituted != lowered {
        text = substituted;
    }

    for (phrase, replacement) in PHRASES {
        text = text.replace(phrase, replacement);
    }

    text = p.whitespace.replace_all(&text, " ").trim().to_string();

    text = p.squared_gap.replace_all(&text, "${1}**2").into_owned();
    p.cubed_gap.replace_all(&text, "${1}**3").into_owned()
}
